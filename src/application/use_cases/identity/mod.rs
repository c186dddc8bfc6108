pub mod change_password;
pub mod confirm_email;
pub mod current_user;
pub mod register;
pub mod sign_in;

use crate::domain::identity::PasswordRule;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("'{0}' is not a valid email address.")]
    InvalidEmail(String),
    #[error("Username '{0}' is already taken.")]
    DuplicateUserName(String),
    #[error("The password and confirmation password do not match.")]
    PasswordMismatch,
    #[error("{}", join_rules(.0))]
    WeakPassword(Vec<PasswordRule>),
    #[error("Invalid login attempt.")]
    InvalidCredentials,
    #[error("You must confirm your email before signing in.")]
    NotAllowed,
    #[error("Error confirming your email.")]
    InvalidToken,
    #[error("Incorrect password.")]
    IncorrectPassword,
    #[error("Unable to load the signed-in user.")]
    UserNotFound,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl IdentityError {
    /// Messages suitable for a form's validation summary.
    pub fn messages(&self) -> Vec<String> {
        match self {
            IdentityError::WeakPassword(rules) => rules.iter().map(|r| r.to_string()).collect(),
            other => vec![other.to_string()],
        }
    }
}

fn join_rules(rules: &[PasswordRule]) -> String {
    rules
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
