use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A single user.
#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct User {
	/// The unique identifier of the user.
	pub id: Uuid,
	/// The user's first name.
	pub firstname: String,
	/// The user's last name.
	pub lastname: String,
	/// The username that is displayed to the public.
	pub username: String,
	/// The user's email address, used for logging in.
	pub email: String,
	/// The hashed password, in PHC string format.
	#[serde(skip)]
	pub password: String,
	/// The creation time of the user.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A user that has not been persisted yet. The password is already hashed.
#[derive(Debug)]
pub struct NewUser {
	pub firstname: String,
	pub lastname: String,
	pub username: String,
	pub email: String,
	pub password: String,
}

/// A bearer token to send in the `Authorization` header.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Token {
	pub token: String,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct LoginInput {
	#[validate(length(min = 1))]
	pub email: String,
	#[validate(length(min = 1))]
	pub password: String,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct RegisterInput {
	#[validate(length(min = 1))]
	pub firstname: String,
	#[validate(length(min = 1))]
	pub lastname: String,
	/// The username that is displayed to the public.
	#[validate(length(min = 1))]
	pub username: String,
	#[validate(length(min = 1))]
	pub email: String,
	#[validate(length(min = 1))]
	pub password: String,
}

impl RegisterInput {
	/// Converts the input into a [`NewUser`], replacing the plaintext
	/// password with its hash.
	pub fn into_user(self, password: String) -> NewUser {
		NewUser {
			firstname: self.firstname,
			lastname: self.lastname,
			username: self.username,
			email: self.email,
			password,
		}
	}
}
