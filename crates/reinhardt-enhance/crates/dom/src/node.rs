//! Node identifiers and per-node storage.

use std::collections::HashMap;
use std::fmt;

/// Identity of a node inside a [`Document`](crate::Document).
///
/// Ids are never reused: a node detached from the tree keeps its id, so code
/// holding on to it can still tell that it is no longer attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
	/// Returns the arena index of this node.
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// The kind of a DOM node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
	/// A parentless container (like a `DocumentFragment`).
	Fragment,
	/// An element such as `<p>`.
	Element,
	/// A text node.
	Text,
	/// A comment node.
	Comment,
}

impl NodeKind {
	/// Whether nodes of this kind may have children.
	pub fn is_container(self) -> bool {
		matches!(self, NodeKind::Fragment | NodeKind::Element)
	}
}

#[derive(Debug, Clone)]
pub(crate) enum NodeData {
	Fragment,
	Element(ElementData),
	Text(String),
	Comment(String),
}

impl NodeData {
	pub(crate) fn kind(&self) -> NodeKind {
		match self {
			NodeData::Fragment => NodeKind::Fragment,
			NodeData::Element(_) => NodeKind::Element,
			NodeData::Text(_) => NodeKind::Text,
			NodeData::Comment(_) => NodeKind::Comment,
		}
	}
}

#[derive(Debug, Clone)]
pub(crate) struct ElementData {
	/// Lowercase tag name.
	pub(crate) tag: String,
	/// Attributes in source order; names are lowercase and unique.
	pub(crate) attrs: Vec<(String, String)>,
	/// Live property state that has diverged from the attributes.
	pub(crate) dirty: DirtyState,
}

impl ElementData {
	pub(crate) fn new(tag: &str) -> Self {
		Self {
			tag: tag.to_ascii_lowercase(),
			attrs: Vec::new(),
			dirty: DirtyState::default(),
		}
	}

	pub(crate) fn attr(&self, name: &str) -> Option<&str> {
		self.attrs
			.iter()
			.find(|(k, _)| k == name)
			.map(|(_, v)| v.as_str())
	}
}

/// Property values set directly on a node (the way user input would),
/// shadowing the attribute-derived defaults.
#[derive(Debug, Clone, Default)]
pub(crate) struct DirtyState {
	pub(crate) value: Option<String>,
	pub(crate) flags: HashMap<String, bool>,
}

#[derive(Debug, Clone)]
pub(crate) struct Slot {
	pub(crate) data: NodeData,
	pub(crate) parent: Option<NodeId>,
	pub(crate) children: Vec<NodeId>,
}

impl Slot {
	pub(crate) fn new(data: NodeData) -> Self {
		Self {
			data,
			parent: None,
			children: Vec::new(),
		}
	}
}
