//! Keypath references into the data model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference to a value in the data model, such as `name`, `user.name`,
/// `this` (or `.`) for the current context, or `@index` for the position of
/// the innermost list instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference(String);

impl Reference {
	/// Creates a reference from its source text.
	pub fn new(source: impl Into<String>) -> Self {
		Self(source.into().trim().to_string())
	}

	/// Returns the source text.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Whether this refers to the current context (`this` or `.`).
	pub fn is_context(&self) -> bool {
		matches!(self.0.as_str(), "this" | ".")
	}

	/// Whether this refers to the index of the innermost list instance.
	pub fn is_index(&self) -> bool {
		self.0 == "@index"
	}

	/// Splits the keypath into its segments, dropping a leading `this.` or `./`.
	pub fn segments(&self) -> Vec<&str> {
		let path = self
			.0
			.strip_prefix("this.")
			.or_else(|| self.0.strip_prefix("./"))
			.unwrap_or(&self.0);
		if self.is_context() {
			return Vec::new();
		}
		path.split('.').filter(|s| !s.is_empty()).collect()
	}

	/// Whether the reference is explicitly relative to the current context.
	pub fn is_explicitly_relative(&self) -> bool {
		self.is_context() || self.0.starts_with("this.") || self.0.starts_with("./")
	}
}

impl fmt::Display for Reference {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Reference {
	fn from(source: &str) -> Self {
		Self::new(source)
	}
}

impl From<String> for Reference {
	fn from(source: String) -> Self {
		Self::new(source)
	}
}
