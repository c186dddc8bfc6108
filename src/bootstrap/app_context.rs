use std::sync::Arc;

use crate::application::ports::schema_migrations::SchemaMigrations;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::tokens::TokenIssuer;
use crate::bootstrap::config::Config;
use crate::domain::identity::PasswordPolicy;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
    tokens: TokenIssuer,
}

#[derive(Clone)]
pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    schema_migrations: Arc<dyn SchemaMigrations>,
}

impl AppServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        schema_migrations: Arc<dyn SchemaMigrations>,
    ) -> Self {
        Self {
            user_repo,
            schema_migrations,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        let tokens = TokenIssuer::new(&cfg.auth_secret);
        Self {
            cfg,
            services: Arc::new(services),
            tokens,
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn schema_migrations(&self) -> Arc<dyn SchemaMigrations> {
        self.services.schema_migrations.clone()
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy::default()
    }
}
