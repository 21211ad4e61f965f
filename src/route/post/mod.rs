use std::fmt;

use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// A mutation that only the author of a post may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
	Update,
	Delete,
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Update => "update",
			Self::Delete => "delete",
		})
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("No posts found")]
	NoPosts,
	#[error("Post with ID {0} not found")]
	UnknownPost(String),
	#[error("Post {0} does not exist")]
	MissingPost(String),
	/// Answered with a 401 rather than a 403.
	#[error("No permission to {0} this post")]
	NotOwner(Action),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_posts, get_posts_docs).post_with(create_post, create_post_docs),
		)
		.api_route(
			"/:id",
			get_with(get_post, get_post_docs)
				.put_with(update_post, update_post_docs)
				.delete_with(delete_post, delete_post_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::NoPosts | Self::UnknownPost(..) | Self::MissingPost(..) => StatusCode::NOT_FOUND,
			Self::NotOwner(..) => StatusCode::UNAUTHORIZED,
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	fn post_body() -> Value {
		json!({
			"title": "My First Post",
			"content": "This is the content of my first post.",
			"image": "https://example.com/image.jpg",
		})
	}

	async fn create(app: &TestServer, token: &str) -> Value {
		let response = app
			.post("/posts")
			.add_header(header::AUTHORIZATION, authorization(token))
			.json(&post_body())
			.await;

		assert_eq!(response.status_code(), StatusCode::CREATED);
		response.json::<Value>()
	}

	#[tokio::test]
	async fn test_list_empty_then_one() {
		let app = app();

		let response = app.get("/posts").await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(response.json::<Value>(), json!({ "error": "No posts found" }));

		let token = register(&app, "john", "john@smith.com").await;
		create(&app, &token).await;

		let response = app.get("/posts").await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let posts = response.json::<Vec<Value>>();
		assert_eq!(posts.len(), 1);
		assert_eq!(posts[0]["author"]["username"], "john");
		assert!(posts[0]["author"].get("password").is_none());
	}

	#[tokio::test]
	async fn test_orphaned_post_has_no_author() {
		let store = std::sync::Arc::new(MemoryStore::default());
		let post = store
			.insert_post(
				uuid::Uuid::new_v4(),
				super::model::CreatePostInput {
					title: "Orphan".into(),
					content: "Written by a deleted account.".into(),
					image: "https://example.com/orphan.jpg".into(),
				},
			)
			.await
			.unwrap();

		let app = app_with(store);

		let response = app.get("/posts").await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let posts = response.json::<Vec<Value>>();
		assert_eq!(posts.len(), 1);
		assert_eq!(posts[0]["id"], post.id.to_string());
		assert_eq!(posts[0]["author"], Value::Null);

		let response = app.get(&format!("/posts/{}", post.id)).await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>()["author"], Value::Null);
	}

	#[tokio::test]
	async fn test_create_then_read_back() {
		let app = app();
		let token = register(&app, "john", "john@smith.com").await;
		let user = me(&app, &token).await;

		let created = create(&app, &token).await;
		assert_eq!(created["author"]["id"], user["id"]);

		let id = created["id"].as_str().unwrap();
		let response = app.get(&format!("/posts/{id}")).await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let post = response.json::<Value>();
		assert_eq!(post["id"], id);
		assert_eq!(post["title"], "My First Post");
		assert_eq!(post["content"], "This is the content of my first post.");
		assert_eq!(post["image"], "https://example.com/image.jpg");
		assert_eq!(post["author"]["id"], user["id"]);
	}

	#[tokio::test]
	async fn test_create_requires_token() {
		let app = app();

		let response = app.post("/posts").json(&post_body()).await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
		assert_eq!(response.json::<Value>()["error"], "Please login");
	}

	#[tokio::test]
	async fn test_create_requires_every_field() {
		let app = app();
		let token = register(&app, "john", "john@smith.com").await;

		let response = app
			.post("/posts")
			.add_header(header::AUTHORIZATION, authorization(&token))
			.json(&json!({ "title": "Title", "content": "Content", "image": "" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(response.json::<Value>()["error"], "image is required");
	}

	#[tokio::test]
	async fn test_get_unknown_post() {
		let app = app();
		let id = uuid::Uuid::new_v4();

		let response = app.get(&format!("/posts/{id}")).await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(
			response.json::<Value>()["error"],
			format!("Post with ID {id} not found")
		);

		let response = app.get("/posts/not-an-id").await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(
			response.json::<Value>()["error"],
			"Post with ID not-an-id not found"
		);
	}

	#[tokio::test]
	async fn test_only_author_can_update() {
		let app = app();
		let author = register(&app, "john", "john@smith.com").await;
		let other = register(&app, "jane", "jane@smith.com").await;

		let post = create(&app, &author).await;
		let path = format!("/posts/{}", post["id"].as_str().unwrap());

		let response = app
			.put(&path)
			.add_header(header::AUTHORIZATION, authorization(&other))
			.json(&json!({ "title": "Hijacked" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
		assert_eq!(
			response.json::<Value>()["error"],
			"No permission to update this post"
		);

		let response = app
			.put(&path)
			.add_header(header::AUTHORIZATION, authorization(&author))
			.json(&json!({ "title": "Updated Title" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let updated = response.json::<Value>();
		assert_eq!(updated["title"], "Updated Title");
		assert_eq!(updated["content"], post["content"]);
		assert_eq!(updated["author"]["id"], post["author"]["id"]);

		let stored = app.get(&path).await.json::<Value>();
		assert_eq!(stored["title"], "Updated Title");
	}

	#[tokio::test]
	async fn test_update_rejects_empty_field() {
		let app = app();
		let token = register(&app, "john", "john@smith.com").await;
		let post = create(&app, &token).await;
		let path = format!("/posts/{}", post["id"].as_str().unwrap());

		let response = app
			.put(&path)
			.add_header(header::AUTHORIZATION, authorization(&token))
			.json(&json!({ "title": "" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(
			response.json::<Value>(),
			json!({ "error": "title is required" })
		);

		let stored = app.get(&path).await.json::<Value>();
		assert_eq!(stored["title"], post["title"]);
	}

	#[tokio::test]
	async fn test_update_unknown_post() {
		let app = app();
		let token = register(&app, "john", "john@smith.com").await;
		let id = uuid::Uuid::new_v4();

		let response = app
			.put(&format!("/posts/{id}"))
			.add_header(header::AUTHORIZATION, authorization(&token))
			.json(&json!({ "title": "Updated Title" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(
			response.json::<Value>()["error"],
			format!("Post {id} does not exist")
		);
	}

	#[tokio::test]
	async fn test_only_author_can_delete() {
		let app = app();
		let author = register(&app, "john", "john@smith.com").await;
		let other = register(&app, "jane", "jane@smith.com").await;

		let post = create(&app, &author).await;
		let id = post["id"].as_str().unwrap();
		let path = format!("/posts/{id}");

		let response = app
			.delete(&path)
			.add_header(header::AUTHORIZATION, authorization(&other))
			.await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
		assert_eq!(
			response.json::<Value>()["error"],
			"No permission to delete this post"
		);

		let response = app
			.delete(&path)
			.add_header(header::AUTHORIZATION, authorization(&author))
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(
			response.json::<Value>(),
			json!({ "success": format!("Post with ID {id} was deleted") })
		);

		let response = app.get(&path).await;
		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

		let response = app
			.delete(&path)
			.add_header(header::AUTHORIZATION, authorization(&author))
			.await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn test_mutations_require_token() {
		let app = app();
		let token = register(&app, "john", "john@smith.com").await;
		let post = create(&app, &token).await;
		let path = format!("/posts/{}", post["id"].as_str().unwrap());

		let response = app.put(&path).json(&json!({ "title": "x" })).await;
		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

		let response = app.delete(&path).await;
		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
	}
}
