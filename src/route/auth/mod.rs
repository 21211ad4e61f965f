use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Shared by unknown emails and wrong passwords, so a caller cannot
	/// tell which one it was.
	#[error("User or password not correct")]
	InvalidCredentials,
	#[error("Please login")]
	NoToken,
	#[error("Invalid token")]
	InvalidToken,
	#[error("An account with this email already exists")]
	EmailTaken,
	#[error("An account with this username already exists")]
	UsernameTaken,
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/register", post_with(register, register_docs))
		.api_route("/login", post_with(login, login_docs))
		.api_route("/me", get_with(get_me, get_me_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidCredentials | Self::NoToken | Self::InvalidToken => {
				StatusCode::UNAUTHORIZED
			}
			Self::EmailTaken | Self::UsernameTaken => StatusCode::CONFLICT,
		}
	}
}
