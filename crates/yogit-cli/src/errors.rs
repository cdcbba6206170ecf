// SPDX-License-Identifier: Apache-2.0

//! CLI-specific error formatting with user-friendly hints.
//!
//! Downcasts `anyhow::Error` to `YogitError` and appends a tip where the
//! user can do something about the failure.

use anyhow::Error;
use yogit_core::error::YogitError;

/// Formats an error for CLI display with helpful hints.
///
/// Errors that are not a `YogitError` are shown with their context chain.
pub fn format_error(error: &Error) -> String {
    let Some(yogit_err) = error.downcast_ref::<YogitError>() else {
        return format!("{error:#}");
    };

    match yogit_err {
        YogitError::Unauthorized => format!(
            "{yogit_err}\n\nTip: Your token may be revoked or expired, run `yogit account setup` again."
        ),
        YogitError::BadRequest => format!(
            "{yogit_err}\n\nTip: Make sure your token has the read:org, read:user, user:email and repo scopes."
        ),
        YogitError::Config { .. } => format!(
            "{yogit_err}\n\nTip: Check your config file at {}",
            yogit_core::config_file_path().display()
        ),
        YogitError::Settings { .. } => format!(
            "{yogit_err}\n\nTip: Check that {} is writable.",
            yogit_core::config_dir().display()
        ),
        YogitError::PaginationLimit { .. } => format!(
            "{yogit_err}\n\nTip: Raise `max_pages` in the [query] section of {}",
            yogit_core::config_file_path().display()
        ),
        YogitError::Failure { .. }
        | YogitError::ResponseShape { .. }
        | YogitError::AccountRequired
        | YogitError::InvalidInput { .. } => yogit_err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_has_tip() {
        let err = anyhow::Error::new(YogitError::Unauthorized);
        let formatted = format_error(&err);
        assert!(formatted.starts_with("Unauthorized"));
        assert!(formatted.contains("yogit account setup"));
    }

    #[test]
    fn test_invalid_input_is_plain() {
        let err = anyhow::Error::new(YogitError::invalid("Bad date format, should be `%Y-%m-%d`"));
        assert_eq!(format_error(&err), "Bad date format, should be `%Y-%m-%d`");
    }

    #[test]
    fn test_account_required_is_plain() {
        let err = anyhow::Error::new(YogitError::AccountRequired);
        assert_eq!(
            format_error(&err),
            "Account required, please `yogit account setup` first."
        );
    }

    #[test]
    fn test_pagination_limit_mentions_setting() {
        let err = anyhow::Error::new(YogitError::PaginationLimit { pages: 3 });
        let formatted = format_error(&err);
        assert!(formatted.contains("3 pages"));
        assert!(formatted.contains("max_pages"));
    }

    #[test]
    fn test_foreign_error_keeps_context() {
        let err = anyhow::anyhow!("root cause").context("Failed to read answers");
        assert_eq!(format_error(&err), "Failed to read answers: root cause");
    }

    #[test]
    fn test_context_does_not_hide_yogit_error() {
        let err = anyhow::Error::new(YogitError::Unauthorized).context("Fetching login");
        assert!(format_error(&err).contains("yogit account setup"));
    }
}
