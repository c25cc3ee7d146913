//! Error types for txlock.
//!
//! Uses thiserror for derive macros. Every fatal error carries a
//! human-readable message naming the affected path and the underlying cause;
//! no operation retries internally.

use thiserror::Error;

/// Main error type for txlock operations.
#[derive(Error, Debug)]
pub enum TxlockError {
    /// A filesystem operation on the lock store failed (write, chmod, delete,
    /// or directory creation for a reason other than "already exists").
    #[error("lock storage failure: {0}")]
    Storage(String),

    /// A storage backend failed internally (e.g. poisoned state in the
    /// in-memory provider).
    #[error("lock provider failure: {0}")]
    Provider(String),
}

/// Result type alias for txlock operations.
pub type Result<T> = std::result::Result<T, TxlockError>;

/// Strip markup tags from an OS error message.
///
/// Some environments decorate error strings with HTML-ish markup before they
/// reach us; lock errors must stay plain text, so anything between `<` and
/// `>` is dropped.
pub(crate) fn strip_markup(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut in_tag = false;
    for c in message.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_message_is_prefixed() {
        let err = TxlockError::Storage("unable to write \"/tmp/x.tmp\"".to_string());
        assert_eq!(
            err.to_string(),
            "lock storage failure: unable to write \"/tmp/x.tmp\""
        );
    }

    #[test]
    fn provider_error_message_is_prefixed() {
        let err = TxlockError::Provider("state mutex poisoned".to_string());
        assert_eq!(
            err.to_string(),
            "lock provider failure: state mutex poisoned"
        );
    }

    #[test]
    fn strip_markup_removes_tags() {
        assert_eq!(
            strip_markup("<b>Permission denied</b> (os error 13)"),
            "Permission denied (os error 13)"
        );
    }

    #[test]
    fn strip_markup_passes_plain_text_through() {
        assert_eq!(
            strip_markup("No such file or directory"),
            "No such file or directory"
        );
    }

    #[test]
    fn strip_markup_tolerates_unclosed_tag() {
        assert_eq!(strip_markup("broken <tag"), "broken ");
    }
}
