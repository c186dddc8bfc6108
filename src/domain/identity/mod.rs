mod password_policy;
mod user;

pub use password_policy::{PasswordPolicy, PasswordRule};
pub use user::{IdentityUser, NewUser, is_valid_email, normalize};
