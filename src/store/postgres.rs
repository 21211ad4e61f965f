use sqlx::PgPool;
use uuid::Uuid;

use super::{Error, PostStore, Unique, UserStore};
use crate::route::{
	auth::model::{NewUser, User},
	post::model::{CreatePostInput, Post, UpdatePostInput},
};

/// A [`Store`](super::Store) backed by PostgreSQL.
#[derive(Clone)]
pub struct PgStore {
	pool: PgPool,
}

impl PgStore {
	/// Connects to the database and brings the schema up to date.
	pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
		let pool = PgPool::connect(url).await?;

		sqlx::migrate!().run(&pool).await?;

		Ok(Self { pool })
	}
}

/// Maps a unique constraint violation on the user table to [`Error::Duplicate`].
fn map_unique(error: sqlx::Error) -> Error {
	if let sqlx::Error::Database(ref database) = error {
		match database.constraint() {
			Some("user_email_key") => return Error::Duplicate(Unique::Email),
			Some("user_username_key") => return Error::Duplicate(Unique::Username),
			_ => {}
		}
	}

	Error::Database(error)
}

#[axum::async_trait]
impl UserStore for PgStore {
	async fn insert_user(&self, user: NewUser) -> Result<User, Error> {
		sqlx::query_as::<_, User>(
			r#"
				INSERT INTO "user" (id, firstname, lastname, username, email, password)
				VALUES ($1, $2, $3, $4, $5, $6)
				RETURNING *
			"#,
		)
		.bind(Uuid::new_v4())
		.bind(user.firstname)
		.bind(user.lastname)
		.bind(user.username)
		.bind(user.email)
		.bind(user.password)
		.fetch_one(&self.pool)
		.await
		.map_err(map_unique)
	}

	async fn find_user(&self, id: Uuid) -> Result<Option<User>, Error> {
		Ok(
			sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE id = $1"#)
				.bind(id)
				.fetch_optional(&self.pool)
				.await?,
		)
	}

	async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, Error> {
		Ok(
			sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE email = $1"#)
				.bind(email)
				.fetch_optional(&self.pool)
				.await?,
		)
	}

	async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, Error> {
		Ok(
			sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE id = ANY($1)"#)
				.bind(ids)
				.fetch_all(&self.pool)
				.await?,
		)
	}
}

#[axum::async_trait]
impl PostStore for PgStore {
	async fn insert_post(&self, author_id: Uuid, input: CreatePostInput) -> Result<Post, Error> {
		Ok(sqlx::query_as::<_, Post>(
			r#"
				INSERT INTO post (id, author_id, title, content, image)
				VALUES ($1, $2, $3, $4, $5)
				RETURNING *
			"#,
		)
		.bind(Uuid::new_v4())
		.bind(author_id)
		.bind(input.title)
		.bind(input.content)
		.bind(input.image)
		.fetch_one(&self.pool)
		.await?)
	}

	async fn list_posts(&self) -> Result<Vec<Post>, Error> {
		Ok(
			sqlx::query_as::<_, Post>("SELECT * FROM post ORDER BY created_at ASC")
				.fetch_all(&self.pool)
				.await?,
		)
	}

	async fn find_post(&self, id: Uuid) -> Result<Option<Post>, Error> {
		Ok(
			sqlx::query_as::<_, Post>("SELECT * FROM post WHERE id = $1")
				.bind(id)
				.fetch_optional(&self.pool)
				.await?,
		)
	}

	async fn update_post(&self, id: Uuid, input: UpdatePostInput) -> Result<Option<Post>, Error> {
		Ok(sqlx::query_as::<_, Post>(
			r#"
				UPDATE post
				SET
					title = COALESCE($1, title),
					content = COALESCE($2, content),
					image = COALESCE($3, image)
				WHERE id = $4
				RETURNING *
			"#,
		)
		.bind(input.title)
		.bind(input.content)
		.bind(input.image)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?)
	}

	async fn delete_post(&self, id: Uuid) -> Result<bool, Error> {
		let status = sqlx::query("DELETE FROM post WHERE id = $1")
			.bind(id)
			.execute(&self.pool)
			.await?;

		Ok(status.rows_affected() > 0)
	}
}
