use std::net::IpAddr;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0} must be set")]
	Missing(&'static str),
	#[error("PORT must be a number, got {0:?}")]
	InvalidPort(String),
	#[error("HOST must be an IP address, got {0:?}")]
	InvalidHost(String),
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
	/// PostgreSQL connection string.
	pub database_url: String,
	/// Secret used to sign bearer tokens.
	pub jwt_secret: String,
	pub host: IpAddr,
	pub port: u16,
	/// Where to export traces and metrics. Export is disabled when unset.
	pub otlp_endpoint: Option<String>,
}

impl Config {
	pub const DEFAULT_HOST: IpAddr = IpAddr::V4(std::net::Ipv4Addr::LOCALHOST);
	pub const DEFAULT_PORT: u16 = 3000;

	/// Reads the configuration from the environment, loading a `.env` file first if there is one.
	pub fn from_env() -> Result<Self, Error> {
		dotenvy::dotenv().ok();

		Self::from_lookup(|key| std::env::var(key).ok())
	}

	pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
	where
		F: Fn(&str) -> Option<String>,
	{
		let required = |key: &'static str| {
			lookup(key)
				.filter(|value| !value.is_empty())
				.ok_or(Error::Missing(key))
		};

		let host = match lookup("HOST") {
			Some(host) => host.parse().map_err(|_| Error::InvalidHost(host))?,
			None => Self::DEFAULT_HOST,
		};

		let port = match lookup("PORT") {
			Some(port) => port.parse().map_err(|_| Error::InvalidPort(port))?,
			None => Self::DEFAULT_PORT,
		};

		Ok(Self {
			database_url: required("DATABASE_URL")?,
			jwt_secret: required("JWT_SECRET")?,
			host,
			port,
			otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|value| !value.is_empty()),
		})
	}
}
