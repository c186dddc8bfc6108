use uuid::Uuid;

use super::IdentityError;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::tokens::TokenIssuer;

pub struct ConfirmEmail<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
    pub tokens: &'a TokenIssuer,
}

impl<'a, R: UserRepository + ?Sized> ConfirmEmail<'a, R> {
    pub async fn execute(&self, user_id: Uuid, code: &str) -> Result<(), IdentityError> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(IdentityError::InvalidToken)?;
        if !self.tokens.verify_email_confirmation(&user, code) {
            return Err(IdentityError::InvalidToken);
        }
        if !user.email_confirmed && !self.repo.confirm_email(user.id).await? {
            return Err(IdentityError::InvalidToken);
        }
        tracing::info!(user_id = %user.id, "email_confirmed");
        Ok(())
    }
}
