pub use crate::route::model::IdInput;

use macros::model;
use schemars::JsonSchema;
use serde::Serialize;
use uuid::Uuid;

use crate::route::auth::model::User;

/// A single post, as it is stored.
#[model]
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The user that created the post.
	#[serde(skip_deserializing)]
	pub author_id: Uuid,
	/// The title of the post.
	#[validate(length(min = 1))]
	pub title: String,
	/// The content of the post.
	#[validate(length(min = 1))]
	pub content: String,
	/// A link to the image shown with the post.
	#[validate(length(min = 1))]
	pub image: String,
	/// The creation time of the post.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A single post, with its author joined in.
///
/// The author is `null` if their account no longer exists.
#[derive(Debug, Serialize, JsonSchema)]
pub struct PostWithAuthor {
	/// The unique identifier of the post.
	pub id: Uuid,
	/// The title of the post.
	pub title: String,
	/// The content of the post.
	pub content: String,
	/// A link to the image shown with the post.
	pub image: String,
	/// The user that created the post.
	pub author: Option<User>,
	/// The creation time of the post.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

impl PostWithAuthor {
	pub fn new(post: Post, author: Option<User>) -> Self {
		Self {
			id: post.id,
			title: post.title,
			content: post.content,
			image: post.image,
			author,
			created_at: post.created_at,
		}
	}
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct Deleted {
	/// A confirmation message.
	pub success: String,
}
