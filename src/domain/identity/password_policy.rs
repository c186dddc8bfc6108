use std::collections::HashSet;
use std::fmt;

/// Password strength rules applied at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub required_length: usize,
    pub required_unique_chars: usize,
    pub require_digit: bool,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_non_alphanumeric: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            required_length: 6,
            required_unique_chars: 1,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            require_non_alphanumeric: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordRule {
    TooShort { required: usize },
    RequiresUniqueChars { required: usize },
    RequiresDigit,
    RequiresLower,
    RequiresUpper,
    RequiresNonAlphanumeric,
}

impl fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordRule::TooShort { required } => {
                write!(f, "Passwords must be at least {required} characters.")
            }
            PasswordRule::RequiresUniqueChars { required } => write!(
                f,
                "Passwords must use at least {required} different characters."
            ),
            PasswordRule::RequiresDigit => {
                f.write_str("Passwords must have at least one digit ('0'-'9').")
            }
            PasswordRule::RequiresLower => {
                f.write_str("Passwords must have at least one lowercase ('a'-'z').")
            }
            PasswordRule::RequiresUpper => {
                f.write_str("Passwords must have at least one uppercase ('A'-'Z').")
            }
            PasswordRule::RequiresNonAlphanumeric => {
                f.write_str("Passwords must have at least one non alphanumeric character.")
            }
        }
    }
}

impl PasswordPolicy {
    /// Returns every rule the password violates, in a stable order.
    pub fn validate(&self, password: &str) -> Vec<PasswordRule> {
        let mut failed = Vec::new();
        if password.chars().count() < self.required_length {
            failed.push(PasswordRule::TooShort {
                required: self.required_length,
            });
        }
        if self.require_non_alphanumeric && password.chars().all(|c| c.is_ascii_alphanumeric()) {
            failed.push(PasswordRule::RequiresNonAlphanumeric);
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            failed.push(PasswordRule::RequiresDigit);
        }
        if self.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            failed.push(PasswordRule::RequiresLower);
        }
        if self.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            failed.push(PasswordRule::RequiresUpper);
        }
        if self.required_unique_chars >= 1 {
            let unique: HashSet<char> = password.chars().collect();
            if unique.len() < self.required_unique_chars {
                failed.push(PasswordRule::RequiresUniqueChars {
                    required: self.required_unique_chars,
                });
            }
        }
        failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_password_passes_defaults() {
        assert!(PasswordPolicy::default().validate("Passw0rd!").is_empty());
    }

    #[test]
    fn reports_every_missing_class() {
        let failed = PasswordPolicy::default().validate("abc");
        assert_eq!(
            failed,
            vec![
                PasswordRule::TooShort { required: 6 },
                PasswordRule::RequiresNonAlphanumeric,
                PasswordRule::RequiresDigit,
                PasswordRule::RequiresUpper,
            ]
        );
    }

    #[test]
    fn empty_password_fails_unique_chars() {
        let failed = PasswordPolicy::default().validate("");
        assert!(failed.contains(&PasswordRule::RequiresUniqueChars { required: 1 }));
        assert!(failed.contains(&PasswordRule::RequiresLower));
    }

    #[test]
    fn relaxed_policy() {
        let policy = PasswordPolicy {
            required_length: 4,
            required_unique_chars: 3,
            require_digit: false,
            require_lowercase: true,
            require_uppercase: false,
            require_non_alphanumeric: false,
        };
        assert!(policy.validate("abcd").is_empty());
        assert_eq!(
            policy.validate("aaaa"),
            vec![PasswordRule::RequiresUniqueChars { required: 3 }]
        );
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            PasswordRule::TooShort { required: 6 }.to_string(),
            "Passwords must be at least 6 characters."
        );
        assert!(PasswordRule::RequiresDigit.to_string().contains("digit"));
    }
}
