//! Cookie string parsing.
//!
//! Reads values out of a `document.cookie`-style string
//! (`"a=1; csrftoken=XYZ; b=2"`). The cart service expects its anti-forgery
//! token echoed back from the cookie of the same name.

use std::borrow::Cow;

/// Return the percent-decoded value of the first cookie called `name`.
///
/// Returns `None` when the string is empty, no entry matches, or the value
/// does not decode to valid UTF-8.
///
/// ```
/// use bazaar_core::get_cookie;
///
/// assert_eq!(get_cookie("a=1; csrftoken=XYZ; b=2", "csrftoken").as_deref(), Some("XYZ"));
/// assert_eq!(get_cookie("a=1; b=2", "csrftoken"), None);
/// ```
#[must_use]
pub fn get_cookie(cookies: &str, name: &str) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }

    let prefix = format!("{name}=");
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))
        .and_then(|raw| urlencoding::decode(raw).ok().map(Cow::into_owned))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_middle_entry() {
        assert_eq!(
            get_cookie("a=1; csrftoken=XYZ; b=2", "csrftoken").as_deref(),
            Some("XYZ")
        );
    }

    #[test]
    fn test_missing_key() {
        assert_eq!(get_cookie("a=1; b=2", "csrftoken"), None);
        assert_eq!(get_cookie("", "csrftoken"), None);
    }

    #[test]
    fn test_name_must_match_whole_key() {
        assert_eq!(get_cookie("xcsrftoken=nope; csrftokenx=no", "csrftoken"), None);
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            get_cookie("csrftoken=first; csrftoken=second", "csrftoken").as_deref(),
            Some("first")
        );
    }

    #[test]
    fn test_value_is_percent_decoded() {
        assert_eq!(
            get_cookie("session=a%20b%3Bc", "session").as_deref(),
            Some("a b;c")
        );
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(get_cookie("csrftoken=; a=1", "csrftoken").as_deref(), Some(""));
    }

    #[test]
    fn test_invalid_utf8_is_absent() {
        assert_eq!(get_cookie("bad=%FF%FE", "bad"), None);
    }
}
