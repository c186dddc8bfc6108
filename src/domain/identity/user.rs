use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct IdentityUser {
    pub id: Uuid,
    pub user_name: String,
    pub normalized_user_name: String,
    pub email: String,
    pub normalized_email: String,
    pub email_confirmed: bool,
    pub password_hash: Option<String>,
    pub security_stamp: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Insert payload for a freshly registered account. The user name is the e-mail.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub security_stamp: String,
}

impl NewUser {
    pub fn normalized_email(&self) -> String {
        normalize(&self.email)
    }
}

/// Lookup key used for case-insensitive user name and e-mail uniqueness.
pub fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+$").expect("email pattern is valid")
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}
