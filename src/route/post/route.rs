use std::collections::HashMap;

use axum::extract::{Path, State};
use macros::route;

use crate::{
	extract::{Created, Json, Session},
	openapi::tag,
	route::auth::model::User,
	store, Database,
};

use super::{model, Action, Error, RouteError};

/// Joins each post with its author, looking all authors up at once.
async fn populate(
	database: &Database,
	posts: Vec<model::Post>,
) -> Result<Vec<model::PostWithAuthor>, store::Error> {
	let mut ids = posts.iter().map(|post| post.author_id).collect::<Vec<_>>();
	ids.sort_unstable();
	ids.dedup();

	let authors = database
		.find_users(&ids)
		.await?
		.into_iter()
		.map(|user| (user.id, user))
		.collect::<HashMap<_, _>>();

	Ok(posts
		.into_iter()
		.map(|post| {
			let author = authors.get(&post.author_id).cloned();
			model::PostWithAuthor::new(post, author)
		})
		.collect())
}

/// Finds a post that `user` is about to mutate, checking that they wrote it.
async fn find_owned(
	database: &Database,
	id: &model::IdInput,
	user: &User,
	action: Action,
) -> Result<model::Post, RouteError> {
	let post = match id.uuid() {
		Some(post_id) => database.find_post(post_id).await?,
		None => None,
	};

	let post = post.ok_or_else(|| Error::MissingPost(id.id.clone()))?;

	if post.author_id != user.id {
		tracing::info!(post = %post.id, user = %user.id, ?action, "rejected mutation by non-author");
		return Err(Error::NotOwner(action).into());
	}

	Ok(post)
}

/// Get all posts
/// Returns every post with its author, oldest first. Responds with 404 if there are none.
#[route(
	tag = tag::POST,
	response(status = 404, description = "There are no posts yet.")
)]
pub async fn get_posts(
	State(database): State<Database>,
) -> Result<Json<Vec<model::PostWithAuthor>>, RouteError> {
	let posts = database.list_posts().await?;

	if posts.is_empty() {
		return Err(Error::NoPosts.into());
	}

	Ok(Json(populate(&database, posts).await?))
}

/// Get single post
/// Returns a single post by its unique id.
#[route(
	tag = tag::POST,
	response(status = 404, description = "The post does not exist.")
)]
pub async fn get_post(
	State(database): State<Database>,
	Path(id): Path<model::IdInput>,
) -> Result<Json<model::PostWithAuthor>, RouteError> {
	let post = match id.uuid() {
		Some(post_id) => database.find_post(post_id).await?,
		None => None,
	};

	let post = post.ok_or(Error::UnknownPost(id.id))?;
	let author = database.find_user(post.author_id).await?;

	Ok(Json(model::PostWithAuthor::new(post, author)))
}

/// Create post
/// Creates a new post written by the authenticated user.
#[route(
	tag = tag::POST,
	response(status = 201, description = "Post created successfully.", shape = "Created<model::PostWithAuthor>")
)]
pub async fn create_post(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::CreatePostInput>,
) -> Result<Created<model::PostWithAuthor>, RouteError> {
	let post = database.insert_post(session.user.id, input).await?;

	tracing::info!(post = %post.id, user = %session.user.id, "created post");

	Ok(Created(model::PostWithAuthor::new(post, Some(session.user))))
}

/// Update post
/// Updates the provided fields of a post. Only its author may do so.
#[route(
	tag = tag::POST,
	response(status = 401, description = "You are not the author of the post."),
	response(status = 404, description = "The post does not exist.")
)]
pub async fn update_post(
	State(database): State<Database>,
	session: Session,
	Path(id): Path<model::IdInput>,
	Json(input): Json<model::UpdatePostInput>,
) -> Result<Json<model::PostWithAuthor>, RouteError> {
	let post = find_owned(&database, &id, &session.user, Action::Update).await?;

	// The post may have been deleted since it was looked up.
	let post = database
		.update_post(post.id, input)
		.await?
		.ok_or(Error::MissingPost(id.id))?;

	tracing::info!(post = %post.id, "updated post");

	Ok(Json(model::PostWithAuthor::new(post, Some(session.user))))
}

/// Delete post
/// Deletes a post. Only its author may do so.
#[route(
	tag = tag::POST,
	response(status = 401, description = "You are not the author of the post."),
	response(status = 404, description = "The post does not exist.")
)]
pub async fn delete_post(
	State(database): State<Database>,
	session: Session,
	Path(id): Path<model::IdInput>,
) -> Result<Json<model::Deleted>, RouteError> {
	let post = find_owned(&database, &id, &session.user, Action::Delete).await?;

	if !database.delete_post(post.id).await? {
		return Err(Error::MissingPost(id.id).into());
	}

	tracing::info!(post = %post.id, "deleted post");

	Ok(Json(model::Deleted {
		success: format!("Post with ID {} was deleted", id.id),
	}))
}
