//! Persistence for users and posts.
//!
//! Handlers only see the [`Store`] trait object, so the backing storage can be
//! swapped out (PostgreSQL in production, an in-memory store in tests).

#[cfg(test)]
pub mod memory;
pub mod postgres;

use uuid::Uuid;

use crate::route::{
	auth::model::{NewUser, User},
	post::model::{CreatePostInput, Post, UpdatePostInput},
};

#[cfg(test)]
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A field that must be unique across all users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unique {
	Email,
	Username,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("duplicate {0:?}")]
	Duplicate(Unique),
}

#[axum::async_trait]
pub trait UserStore: Send + Sync {
	/// Persists a new user, failing with [`Error::Duplicate`] if the email
	/// or username is already taken.
	async fn insert_user(&self, user: NewUser) -> Result<User, Error>;

	async fn find_user(&self, id: Uuid) -> Result<Option<User>, Error>;

	async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, Error>;

	/// Returns the users with the given ids. Unknown ids are skipped.
	async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, Error>;
}

#[axum::async_trait]
pub trait PostStore: Send + Sync {
	async fn insert_post(&self, author_id: Uuid, input: CreatePostInput) -> Result<Post, Error>;

	/// Returns every post, oldest first.
	async fn list_posts(&self) -> Result<Vec<Post>, Error>;

	async fn find_post(&self, id: Uuid) -> Result<Option<Post>, Error>;

	/// Applies the provided fields, returning [`None`] if the post does not exist.
	async fn update_post(&self, id: Uuid, input: UpdatePostInput) -> Result<Option<Post>, Error>;

	/// Removes a post, returning whether it existed.
	async fn delete_post(&self, id: Uuid) -> Result<bool, Error>;
}

pub trait Store: UserStore + PostStore {}

impl<T> Store for T where T: UserStore + PostStore {}
