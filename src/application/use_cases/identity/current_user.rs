use uuid::Uuid;

use crate::application::ports::user_repository::UserRepository;
use crate::domain::identity::IdentityUser;

pub struct GetCurrentUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> GetCurrentUser<'a, R> {
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<Option<IdentityUser>> {
        self.repo.find_by_id(id).await
    }
}
