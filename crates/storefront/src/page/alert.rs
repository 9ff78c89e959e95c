//! Transient alert banners.

use core::fmt;

use askama::Template;
use bazaar_core::AlertSeverity;
use uuid::Uuid;

/// Identifies one alert node so its delayed dismissal hits the right one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlertId(Uuid);

impl AlertId {
    /// Generate a fresh ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AlertId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "alert-{}", self.0.simple())
    }
}

/// A dismissible alert shown after a cart action completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub id: AlertId,
    pub severity: AlertSeverity,
    pub message: String,
}

impl AlertMessage {
    #[must_use]
    pub fn new(severity: AlertSeverity, message: impl Into<String>) -> Self {
        Self {
            id: AlertId::new(),
            severity,
            message: message.into(),
        }
    }

    /// Markup for the alert, as inserted into a browser page.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_html(&self) -> Result<String, askama::Error> {
        AlertHtml {
            id: self.id,
            severity: self.severity,
            message: &self.message,
        }
        .render()
    }
}

/// Dismissible Bootstrap alert; the message is escaped.
#[derive(Template)]
#[template(path = "alert.html")]
struct AlertHtml<'a> {
    id: AlertId,
    severity: AlertSeverity,
    message: &'a str,
}
