use uuid::Uuid;

use super::IdentityError;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::passwords::{hash_password, new_security_stamp};
use crate::domain::identity::{IdentityUser, NewUser, PasswordPolicy, is_valid_email};

pub struct Register<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
    pub policy: &'a PasswordPolicy,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl<'a, R: UserRepository + ?Sized> Register<'a, R> {
    pub async fn execute(&self, req: &RegisterRequest) -> Result<IdentityUser, IdentityError> {
        let email = req.email.trim();
        if !is_valid_email(email) {
            return Err(IdentityError::InvalidEmail(email.to_string()));
        }
        if req.password != req.confirm_password {
            return Err(IdentityError::PasswordMismatch);
        }
        let failed = self.policy.validate(&req.password);
        if !failed.is_empty() {
            return Err(IdentityError::WeakPassword(failed));
        }

        let new_user = NewUser {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: hash_password(&req.password)?,
            security_stamp: new_security_stamp(),
        };
        let user = self
            .repo
            .create_user(&new_user)
            .await?
            .ok_or_else(|| IdentityError::DuplicateUserName(email.to_string()))?;
        tracing::info!(user_id = %user.id, "user_registered");
        Ok(user)
    }
}
