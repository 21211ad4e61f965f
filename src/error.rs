use std::convert::Infallible;

use aide::OperationOutput;
use axum::{
	body::Body,
	extract::rejection::JsonRejection,
	http::{Response, StatusCode},
	response::IntoResponse,
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::{password, store, token};

/// An error specific to a group of routes.
///
/// The [`Display`](std::fmt::Display) output is sent to the client as-is,
/// so it must not contain sensitive information.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;
}

impl ErrorShape for Infallible {
	fn status(&self) -> StatusCode {
		match *self {}
	}
}

/// Error type for a route, wrapping its own error with the failures any route can run into.
///
/// Only [`RouteError::Route`], validation and body errors are described to the client.
/// Everything else is logged and answered with a 500.
#[derive(Debug, thiserror::Error)]
pub enum RouteError<T> {
	#[error("{0}")]
	Route(T),
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] JsonRejection),
	#[error("store error: {0}")]
	Store(#[from] store::Error),
	#[error("password error: {0}")]
	Password(#[from] password::Error),
	#[error("token error: {0}")]
	Token(#[from] token::Error),
}

/// Error type for extractors that are not tied to a group of routes.
pub type AppError = RouteError<Infallible>;

impl<T: ErrorShape> From<T> for RouteError<T> {
	fn from(error: T) -> Self {
		Self::Route(error)
	}
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse {
	/// A human-readable description of what went wrong.
	pub error: String,
}

impl<T: ErrorShape> RouteError<T> {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::Route(error) => error.status(),
			Self::Validation(..) | Self::Json(..) => StatusCode::BAD_REQUEST,
			Self::Store(..) | Self::Password(..) | Self::Token(..) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}

	/// The message sent to the client.
	pub fn message(&self) -> String {
		match self {
			Self::Route(error) => error.to_string(),
			Self::Validation(errors) => validation_message(errors),
			Self::Json(rejection) => rejection.body_text(),
			Self::Store(..) | Self::Password(..) | Self::Token(..) => {
				"Internal server error".into()
			}
		}
	}
}

/// Joins field errors into a single sentence, sorted by field name.
fn validation_message(errors: &validator::ValidationErrors) -> String {
	let mut messages = errors
		.field_errors()
		.into_iter()
		.flat_map(|(field, errors)| {
			errors.iter().map(move |error| match &error.message {
				Some(message) => format!("{field}: {message}"),
				None if error.code == "length" => format!("{field} is required"),
				None => format!("{field} is invalid"),
			})
		})
		.collect::<Vec<_>>();

	messages.sort();
	messages.join(", ")
}

impl<T: ErrorShape> IntoResponse for RouteError<T> {
	fn into_response(self) -> Response<Body> {
		let status = self.status();

		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		}

		(
			status,
			axum::Json(ErrorResponse {
				error: self.message(),
			}),
		)
			.into_response()
	}
}

impl<T: ErrorShape> OperationOutput for RouteError<T> {
	type Inner = ErrorResponse;
}
