use axum::extract::State;
use chrono::Duration;
use macros::route;

use crate::{
	extract::{Created, Json, Session},
	openapi::tag,
	store, token, AppState,
};

use super::{model, Error, RouteError};

/// Register account
/// Registers a new account, returning a token that does not expire.
#[route(
	tag = tag::AUTH,
	response(status = 201, description = "Registered successfully.", shape = "Created<model::Token>"),
	response(status = 409, description = "The email or username is already taken.")
)]
pub async fn register(
	State(state): State<AppState>,
	Json(input): Json<model::RegisterInput>,
) -> Result<Created<model::Token>, RouteError> {
	if state
		.database
		.find_user_by_email(&input.email)
		.await?
		.is_some()
	{
		return Err(Error::EmailTaken.into());
	}

	let password = state.hasher.hash(&input.password).await?;
	let user = state
		.database
		.insert_user(input.into_user(password))
		.await
		.map_err(|e| match e {
			store::Error::Duplicate(store::Unique::Email) => Error::EmailTaken.into(),
			store::Error::Duplicate(store::Unique::Username) => Error::UsernameTaken.into(),
			e => RouteError::from(e),
		})?;

	// Registration tokens are issued without an expiry, unlike login tokens.
	let token = state.tokens.issue(user.id, None)?;

	tracing::info!(user = %user.id, "registered account");

	Ok(Created(model::Token { token }))
}

/// Log in
/// Logs in to an account, returning a token that is valid for 30 minutes.
#[route(
	tag = tag::AUTH,
	response(status = 200, description = "Logged in successfully.", shape = "Json<model::Token>"),
	response(status = 401, description = "The email or password is not correct.")
)]
pub async fn login(
	State(state): State<AppState>,
	Json(input): Json<model::LoginInput>,
) -> Result<Json<model::Token>, RouteError> {
	let Some(user) = state.database.find_user_by_email(&input.email).await? else {
		state.hasher.verify_absent(&input.password).await?;
		return Err(Error::InvalidCredentials.into());
	};

	if !state.hasher.verify(&input.password, &user.password).await? {
		tracing::info!(user = %user.id, "rejected login with wrong password");
		return Err(Error::InvalidCredentials.into());
	}

	let token = state
		.tokens
		.issue(user.id, Some(Duration::minutes(token::LOGIN_TTL_MINUTES)))?;

	Ok(Json(model::Token { token }))
}

/// Get user
/// Returns the authenticated user.
#[route(tag = tag::AUTH)]
pub async fn get_me(session: Session) -> Json<model::User> {
	Json(session.user)
}
