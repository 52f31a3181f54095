//! User repository interface

use async_trait::async_trait;

use super::model::User;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Save a new user
    async fn insert(&self, user: User) -> DomainResult<()>;

    /// Update an existing user
    async fn update(&self, user: &User) -> DomainResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    /// Find user by email (unique)
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
}
