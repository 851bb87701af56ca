//! Account input rules and the error values they produce.
//!
//! Usernames and emails are compared case-insensitively everywhere; the
//! stored value keeps the casing the user chose.

use validator::ValidationErrors;

use crate::error::CoreError;

/// Which write is being validated; only changes the suggested action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountWrite {
    Register,
    Update,
}

impl AccountWrite {
    fn purpose(self) -> &'static str {
        match self {
            Self::Register => "to sign up",
            Self::Update => "to perform this operation",
        }
    }
}

/// Case-insensitive identifier equality.
pub fn same_identifier(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

pub fn duplicate_email(write: AccountWrite) -> CoreError {
    CoreError::validation(
        "The email provided is already in use.",
        format!("Use another email {}.", write.purpose()),
    )
}

pub fn duplicate_username(write: AccountWrite) -> CoreError {
    CoreError::validation(
        "The username provided is already in use.",
        format!("Use another username {}.", write.purpose()),
    )
}

pub fn username_not_found() -> CoreError {
    CoreError::not_found(
        "The username provided was not found.",
        "Check that the username is spelled correctly.",
    )
}

/// Convert `validator` output into a single [`CoreError::Validation`].
///
/// Reports the alphabetically first failing field so the response is stable.
pub fn validation_error(errors: &ValidationErrors) -> CoreError {
    let field_errors = errors.field_errors();
    let mut fields: Vec<String> = field_errors.keys().map(|k| k.to_string()).collect();
    fields.sort();

    match fields.first() {
        Some(field) => CoreError::validation(
            format!("The `{field}` field is invalid."),
            format!("Check the value sent in `{field}`."),
        ),
        None => CoreError::validation(
            "The request body is invalid.",
            "Check the submitted data.",
        ),
    }
}
