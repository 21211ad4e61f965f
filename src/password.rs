use std::sync::Arc;

use argon2::{
	password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
	Algorithm, Argon2, Params, Version,
};
use tokio::sync::OnceCell;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("failed to hash password: {0}")]
	Hash(argon2::password_hash::Error),
	#[error("password task failed: {0}")]
	Join(#[from] tokio::task::JoinError),
}

/// Hashes and verifies passwords with Argon2id.
///
/// Every hash gets a fresh random salt, and the result is stored as a PHC
/// string so the parameters travel with it. Both operations are expensive
/// on purpose, so they run on the blocking thread pool.
#[derive(Clone)]
pub struct Hasher {
	argon2: Argon2<'static>,
	/// Hash of an empty password, checked against when there is no stored hash.
	dummy: Arc<OnceCell<String>>,
}

impl Default for Hasher {
	/// Uses the default Argon2 work factor (19 MiB, 2 iterations, 1 lane).
	fn default() -> Self {
		Self::new(Params::DEFAULT)
	}
}

impl Hasher {
	pub fn new(params: Params) -> Self {
		Self {
			argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
			dummy: Arc::default(),
		}
	}

	pub async fn hash(&self, password: &str) -> Result<String, Error> {
		let argon2 = self.argon2.clone();
		let password = password.to_owned();

		tokio::task::spawn_blocking(move || {
			let salt = SaltString::generate(&mut OsRng);

			argon2
				.hash_password(password.as_bytes(), &salt)
				.map(|hash| hash.to_string())
		})
		.await?
		.map_err(Error::Hash)
	}

	/// Returns whether `password` matches `hash`.
	///
	/// A malformed hash never matches.
	pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, Error> {
		let argon2 = self.argon2.clone();
		let password = password.to_owned();
		let hash = hash.to_owned();

		Ok(tokio::task::spawn_blocking(move || {
			let hash = match PasswordHash::new(&hash) {
				Ok(hash) => hash,
				Err(error) => {
					tracing::warn!(%error, "stored password hash is malformed");
					return false;
				}
			};

			argon2.verify_password(password.as_bytes(), &hash).is_ok()
		})
		.await?)
	}

	/// Verifies `password` against a hash that belongs to nobody, taking as
	/// long as [`Hasher::verify`] does for a real account.
	///
	/// Used when a login names an unknown email, so the response time does not
	/// reveal whether the account exists.
	pub async fn verify_absent(&self, password: &str) -> Result<(), Error> {
		let hash = self.dummy.get_or_try_init(|| self.hash("")).await?;

		self.verify(password, hash).await?;
		Ok(())
	}
}
