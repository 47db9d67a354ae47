//! Errors raised by DOM operations.

use crate::node::NodeId;

/// Errors returned by [`Document`](crate::Document) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
	/// The operation requires an element node.
	#[error("Node {0} is not an element")]
	NotAnElement(NodeId),
	/// The operation requires a text node.
	#[error("Node {0} is not a text node")]
	NotAText(NodeId),
	/// The node cannot hold children.
	#[error("Node {0} cannot have children")]
	NotAContainer(NodeId),
	/// The reference node is not a child of the given parent.
	#[error("Node {child} is not a child of {parent}")]
	NotAChild {
		/// The expected parent.
		parent: NodeId,
		/// The node that was expected to be its child.
		child: NodeId,
	},
	/// Inserting the node would make it its own ancestor.
	#[error("Inserting {child} into {parent} would create a cycle")]
	HierarchyRequest {
		/// The would-be parent.
		parent: NodeId,
		/// The node being inserted.
		child: NodeId,
	},
	/// A text offset is past the end of the data or inside a UTF-8 sequence.
	#[error("Offset {offset} is not a valid split point for text of length {len}")]
	InvalidOffset {
		/// The requested byte offset.
		offset: usize,
		/// The byte length of the text.
		len: usize,
	},
	/// An attribute name contains characters HTML does not allow.
	#[error("Invalid attribute name: '{0}'")]
	InvalidAttributeName(String),
	/// Markup could not be parsed.
	#[error("Failed to parse markup at byte {position}: {message}")]
	Parse {
		/// Byte offset in the source where parsing stopped.
		position: usize,
		/// Description of the problem.
		message: String,
	},
	/// A selector could not be parsed.
	#[error("Invalid selector '{selector}': {message}")]
	InvalidSelector {
		/// The selector source.
		selector: String,
		/// Description of the problem.
		message: String,
	},
}

/// Result alias for DOM operations.
pub type DomResult<T> = Result<T, DomError>;
