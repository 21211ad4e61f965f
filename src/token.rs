use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a token issued on login stays valid.
pub const LOGIN_TTL_MINUTES: i64 = 30;

#[derive(Debug, thiserror::Error)]
#[error("token error: {0}")]
pub struct Error(#[from] jsonwebtoken::errors::Error);

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
	/// The id of the user the token was issued to.
	uid: Uuid,
	iat: i64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	exp: Option<i64>,
}

/// Issues and verifies HS256-signed bearer tokens.
#[derive(Clone)]
pub struct TokenService {
	encoding: EncodingKey,
	decoding: DecodingKey,
	validation: Validation,
}

impl TokenService {
	pub fn new(secret: &[u8]) -> Self {
		let mut validation = Validation::new(Algorithm::HS256);

		// Registration tokens carry no `exp`, so it cannot be required.
		validation.required_spec_claims.clear();
		validation.validate_exp = true;
		validation.leeway = 0;

		Self {
			encoding: EncodingKey::from_secret(secret),
			decoding: DecodingKey::from_secret(secret),
			validation,
		}
	}

	/// Issues a token for `subject`. Without a `ttl` the token never expires.
	pub fn issue(&self, subject: Uuid, ttl: Option<Duration>) -> Result<String, Error> {
		self.issue_at(subject, ttl, Utc::now())
	}

	pub fn issue_at(
		&self,
		subject: Uuid,
		ttl: Option<Duration>,
		issued_at: DateTime<Utc>,
	) -> Result<String, Error> {
		let claims = Claims {
			uid: subject,
			iat: issued_at.timestamp(),
			exp: ttl.map(|ttl| (issued_at + ttl).timestamp()),
		};

		Ok(jsonwebtoken::encode(
			&Header::new(Algorithm::HS256),
			&claims,
			&self.encoding,
		)?)
	}

	/// Returns the subject of a token if its signature is valid and it has not expired.
	pub fn verify(&self, token: &str) -> Result<Uuid, Error> {
		let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)?;

		Ok(data.claims.uid)
	}
}
