//! Errors raised while constructing an instance.

use reinhardt_enhance_dom::DomError;

/// Configuration errors that abort instance construction.
///
/// These are raised before the document is touched. Structural differences
/// between the template and the existing DOM are never errors: they are
/// healed during the pass.
#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
	/// `enhance` and `append` were both requested.
	#[error("Cannot use append and enhance at the same time")]
	ConflictingOptions,
	/// The template includes a partial that is not registered.
	#[error("Could not find partial '{0}'")]
	UnknownPartial(String),
	/// The template invokes a component that is not registered.
	#[error("Could not find component '{0}'")]
	UnknownComponent(String),
	/// No target node was supplied.
	#[error("No target node was supplied to render into")]
	MissingTarget,
	/// The target node was rejected by the document.
	#[error(transparent)]
	Dom(#[from] DomError),
}

/// Result alias for instance construction.
pub type EnhanceResult<T> = Result<T, EnhanceError>;
