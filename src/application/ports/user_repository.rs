use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::identity::{IdentityUser, NewUser};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns `None` when the normalized user name or e-mail is already taken.
    async fn create_user(&self, user: &NewUser) -> anyhow::Result<Option<IdentityUser>>;
    async fn find_by_normalized_email(
        &self,
        normalized_email: &str,
    ) -> anyhow::Result<Option<IdentityUser>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<IdentityUser>>;
    async fn confirm_email(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Replaces the password hash and security stamp together. `None` when
    /// the user no longer exists.
    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        security_stamp: &str,
    ) -> anyhow::Result<Option<IdentityUser>>;
}
