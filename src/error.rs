use thiserror::Error;

/// Errors surfaced by cache `get`/`set` operations.
///
/// Every failure during a multi-segment path traversal aborts the whole
/// operation; there is no partial result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
	/// The attribute does not exist on the model and no default was supplied.
	#[error("`{model}` has no attribute `{name}`")]
	MissingAttribute {
		/// Type name of the model the lookup ran against.
		model: &'static str,
		/// The attribute name that failed to resolve.
		name: String,
	},

	/// An intermediate path segment resolved to a plain value instead of an
	/// object, so the remaining segments have nothing to resolve against.
	#[error("segment `{segment}` of path `{path}` did not resolve to an object")]
	NotAnObject {
		/// The full path being resolved.
		path: String,
		/// The segment whose value was not an object.
		segment: String,
	},
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_display() {
		let err = AccessError::MissingAttribute {
			model: "Person",
			name: "age".to_string(),
		};
		assert_eq!(err.to_string(), "`Person` has no attribute `age`");

		let err = AccessError::NotAnObject {
			path: "address.city".to_string(),
			segment: "address".to_string(),
		};
		assert_eq!(
			err.to_string(),
			"segment `address` of path `address.city` did not resolve to an object"
		);
	}
}
