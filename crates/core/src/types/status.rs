//! Status enums for UI feedback.

/// Severity of a transient alert banner.
///
/// Maps onto the page's `alert-{severity}` styling classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertSeverity {
    /// A cart action went through.
    Success,
    /// The server rejected the action or the request failed.
    Danger,
}

impl AlertSeverity {
    /// The suffix used in the `alert-*` CSS class.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_class_suffix() {
        assert_eq!(AlertSeverity::Success.to_string(), "success");
        assert_eq!(AlertSeverity::Danger.to_string(), "danger");
    }
}
