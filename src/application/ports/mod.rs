pub mod schema_migrations;
pub mod user_repository;
