use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// A resource id taken from the path.
///
/// Ids are kept as strings so that a malformed id can be reported
/// the same way as an unknown one.
#[derive(Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	pub id: String,
}

impl IdInput {
	/// Returns the id as a [`Uuid`], or [`None`] if it is not well-formed.
	pub fn uuid(&self) -> Option<Uuid> {
		Uuid::parse_str(&self.id).ok()
	}
}
