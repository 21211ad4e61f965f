#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod openapi;
mod password;
mod route;
mod store;
mod token;
mod trace;


use std::{process::ExitCode, sync::Arc};

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::{
	cors::CorsLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

use crate::{config::Config, password::Hasher, token::TokenService};

pub type Database = Arc<dyn store::Store>;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as the store, the password hasher and the token service.
///
/// For dependencies only used by a single handler, you can combine states instead.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Hasher,
	pub tokens: TokenService,
}

#[derive(Debug, thiserror::Error)]
enum StartupError {
	#[error("failed to connect to database: {0}")]
	Database(#[from] sqlx::Error),
	#[error("failed to bind to address: {0}")]
	Io(#[from] std::io::Error),
}

/// Builds the router, with the generated documentation served under `/api-docs`.
pub fn app(state: AppState) -> Router {
	aide::gen::extract_schemas(true);

	let mut api = OpenApi::default();
	let router = ApiRouter::new()
		.nest("/auth", route::auth::routes())
		.nest("/posts", route::post::routes())
		.with_state(state)
		.nest("/api-docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs);

	router.layer(Extension(Arc::new(api))).layer(
		ServiceBuilder::new()
			.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
			.layer(TraceLayer::new_for_http())
			.layer(PropagateRequestIdLayer::x_request_id())
			.layer(CorsLayer::permissive()),
	)
}

async fn serve(config: Config) -> Result<(), StartupError> {
	let database = store::PgStore::connect(&config.database_url).await?;

	tracing::info!("connected to database");

	let state = State {
		database: Arc::new(database),
		hasher: Hasher::default(),
		tokens: TokenService::new(config.jwt_secret.as_bytes()),
	};

	let listener = tokio::net::TcpListener::bind((config.host, config.port)).await?;

	tracing::info!("listening on {}", listener.local_addr()?);

	axum::serve(listener, app(state))
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

async fn shutdown_signal() {
	if let Err(error) = tokio::signal::ctrl_c().await {
		tracing::error!(%error, "failed to listen for shutdown signal");
		std::future::pending::<()>().await;
	}

	tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> ExitCode {
	let config = match Config::from_env() {
		Ok(config) => config,
		Err(error) => {
			eprintln!("invalid configuration: {error}");
			return ExitCode::FAILURE;
		}
	};

	let _guard = match trace::init_tracing_subscriber(config.otlp_endpoint.as_deref()) {
		Ok(guard) => guard,
		Err(error) => {
			eprintln!("{error}");
			return ExitCode::FAILURE;
		}
	};

	match serve(config).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(error) => {
			tracing::error!(%error, "server stopped");
			ExitCode::FAILURE
		}
	}
}
