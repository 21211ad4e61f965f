use std::sync::Arc;

use aide::{
	axum::{
		routing::{get, get_with},
		ApiRouter,
	},
	openapi::OpenApi,
	scalar::Scalar,
};
use axum::{
	response::{IntoResponse, Response},
	Extension,
};

use crate::extract::Json;

pub const OPENAPI_PATH: &str = "/api-docs/private/api.json";

pub fn routes() -> ApiRouter {
	ApiRouter::new()
		.api_route(
			"/",
			get_with(
				Scalar::new(OPENAPI_PATH).with_title("Blog API").axum_handler(),
				|op| op.description("This documentation page."),
			),
		)
		.route("/private/api.json", get(serve_docs))
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> Response {
	Json(api.as_ref()).into_response()
}
