use uuid::Uuid;

use super::IdentityError;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::passwords::{hash_password, new_security_stamp, verify_password};
use crate::domain::identity::{IdentityUser, PasswordPolicy};

pub struct ChangePassword<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
    pub policy: &'a PasswordPolicy,
}

#[derive(Debug, Clone)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl<'a, R: UserRepository + ?Sized> ChangePassword<'a, R> {
    /// Rotates the security stamp along with the hash, so confirmation codes
    /// issued before the change stop validating.
    pub async fn execute(
        &self,
        user_id: Uuid,
        req: &ChangePasswordRequest,
    ) -> Result<IdentityUser, IdentityError> {
        if req.new_password != req.confirm_password {
            return Err(IdentityError::PasswordMismatch);
        }
        let Some(user) = self.repo.find_by_id(user_id).await? else {
            return Err(IdentityError::UserNotFound);
        };
        let Some(hash) = user.password_hash.as_deref() else {
            return Err(IdentityError::IncorrectPassword);
        };
        if !verify_password(hash, &req.old_password)? {
            tracing::debug!(user_id = %user.id, "change_password_bad_old_password");
            return Err(IdentityError::IncorrectPassword);
        }
        let failed = self.policy.validate(&req.new_password);
        if !failed.is_empty() {
            return Err(IdentityError::WeakPassword(failed));
        }

        let updated = self
            .repo
            .update_password(user.id, &hash_password(&req.new_password)?, &new_security_stamp())
            .await?
            .ok_or(IdentityError::UserNotFound)?;
        tracing::info!(user_id = %updated.id, "password_changed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryUserRepository;

    fn request(old: &str, new: &str) -> ChangePasswordRequest {
        ChangePasswordRequest {
            old_password: old.into(),
            new_password: new.into(),
            confirm_password: new.into(),
        }
    }

    #[tokio::test]
    async fn replaces_hash_and_rotates_stamp() {
        let repo = InMemoryUserRepository::default();
        let before = repo.seed("alice@example.com", "Passw0rd!", true).await;
        let policy = PasswordPolicy::default();
        let uc = ChangePassword {
            repo: &repo,
            policy: &policy,
        };
        let after = uc
            .execute(before.id, &request("Passw0rd!", "N3w-Secret"))
            .await
            .unwrap();
        assert_ne!(after.security_stamp, before.security_stamp);
        let hash = after.password_hash.as_deref().unwrap();
        assert!(verify_password(hash, "N3w-Secret").unwrap());
        assert!(!verify_password(hash, "Passw0rd!").unwrap());

        let stored = repo.find_by_id(before.id).await.unwrap().unwrap();
        assert_eq!(stored.security_stamp, after.security_stamp);
    }

    #[tokio::test]
    async fn wrong_old_password_changes_nothing() {
        let repo = InMemoryUserRepository::default();
        let before = repo.seed("alice@example.com", "Passw0rd!", true).await;
        let policy = PasswordPolicy::default();
        let uc = ChangePassword {
            repo: &repo,
            policy: &policy,
        };
        let err = uc
            .execute(before.id, &request("wrong", "N3w-Secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::IncorrectPassword));
        assert_eq!(err.to_string(), "Incorrect password.");

        let stored = repo.find_by_id(before.id).await.unwrap().unwrap();
        assert_eq!(stored.security_stamp, before.security_stamp);
    }

    #[tokio::test]
    async fn new_password_is_validated() {
        let repo = InMemoryUserRepository::default();
        let user = repo.seed("alice@example.com", "Passw0rd!", true).await;
        let policy = PasswordPolicy::default();
        let uc = ChangePassword {
            repo: &repo,
            policy: &policy,
        };

        let err = uc.execute(user.id, &request("Passw0rd!", "weak")).await;
        assert!(matches!(err, Err(IdentityError::WeakPassword(_))));

        let mut mismatched = request("Passw0rd!", "N3w-Secret");
        mismatched.confirm_password = "N3w-Secret?".into();
        let err = uc.execute(user.id, &mismatched).await;
        assert!(matches!(err, Err(IdentityError::PasswordMismatch)));

        let err = uc
            .execute(Uuid::new_v4(), &request("Passw0rd!", "N3w-Secret"))
            .await;
        assert!(matches!(err, Err(IdentityError::UserNotFound)));
    }
}
