use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request},
};

use crate::{
	error::RouteError,
	openapi::SECURITY_SCHEME_TOKEN,
	route::auth::{self, model::User},
	token::TokenService,
	Database,
};

/// Extracts the authenticated user from the request.
///
/// The token is read raw from the `Authorization` header, without a `Bearer ` prefix.
///
/// If the header is missing, a [`auth::Error::NoToken`] is returned.
/// If the token is invalid or expired, or its user no longer exists,
/// a [`auth::Error::InvalidToken`] is returned.
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{:?}", session.user);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub user: User,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Database: FromRef<S>,
	TokenService: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<auth::Error>;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let token = parts
			.headers
			.get(header::AUTHORIZATION)
			.filter(|value| !value.is_empty())
			.ok_or(auth::Error::NoToken)?;

		let token = token.to_str().map_err(|_| auth::Error::InvalidToken)?;
		let user_id = TokenService::from_ref(state)
			.verify(token)
			.map_err(|_| auth::Error::InvalidToken)?;

		let database = Database::from_ref(state);
		let user = database
			.find_user(user_id)
			.await?
			.ok_or(auth::Error::InvalidToken)?;

		Ok(Self { user })
	}
}

impl OperationInput for Session {
	/// Operation input for the session extractor.
	///
	/// This adds a token requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.push(
			[(SECURITY_SCHEME_TOKEN.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		);
	}
}
