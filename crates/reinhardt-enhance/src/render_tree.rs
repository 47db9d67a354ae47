//! The render tree produced by a pass.
//!
//! It mirrors the template item tree one to one and records which DOM node
//! backs each item. The document owns the nodes; entries hold ids only.

use reinhardt_enhance_dom::{Document, NodeId, NodeKind, Selector};
use reinhardt_enhance_template::{Reference, SectionKind};
use serde::Serialize;

use crate::binding::Binding;
use crate::model::Model;

/// Where a rendered node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeOrigin {
	/// An existing node reused in place.
	Adopted,
	/// Split off an existing text node.
	Split,
	/// Created during the pass.
	Created,
}

/// A DOM node backing a render tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
	/// The node.
	pub id: NodeId,
	/// How the node was obtained.
	pub origin: NodeOrigin,
}

impl NodeRef {
	pub(crate) fn new(id: NodeId, origin: NodeOrigin) -> Self {
		Self { id, origin }
	}
}

/// An `on-<event>` directive wired to a rendered element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener {
	/// The element.
	pub node: NodeId,
	/// The DOM event name.
	pub event: String,
	/// The handler name.
	pub handler: String,
}

/// A component rendered inside its parent.
#[derive(Debug, Clone)]
pub struct ComponentInstance {
	/// The registered component name.
	pub name: String,
	/// The component's own data.
	pub model: Model,
	/// The component's rendered items.
	pub nodes: Vec<RenderNode>,
	/// Two-way bindings inside the component.
	pub bindings: Vec<Binding>,
	/// Event listeners inside the component.
	pub listeners: Vec<Listener>,
}

/// One rendered template item.
#[derive(Debug, Clone)]
pub enum RenderNode {
	/// An element and its rendered children.
	Element {
		/// The element node.
		node: NodeRef,
		/// Rendered children.
		children: Vec<RenderNode>,
	},
	/// Literal text.
	Text {
		/// The text node.
		node: NodeRef,
	},
	/// An interpolated value.
	Interpolator {
		/// The text node.
		node: NodeRef,
		/// The referenced value.
		reference: Reference,
	},
	/// A section with one fragment per instance.
	Section {
		/// The section kind.
		kind: SectionKind,
		/// The referenced value.
		reference: Reference,
		/// One fragment per rendered instance.
		instances: Vec<Vec<RenderNode>>,
		/// The `{{else}}` fragment, when it rendered.
		otherwise: Option<Vec<RenderNode>>,
	},
	/// An included partial.
	Partial {
		/// The partial name.
		name: String,
		/// The partial's rendered items.
		children: Vec<RenderNode>,
	},
	/// A nested component instance.
	Component(Box<ComponentInstance>),
}

impl RenderNode {
	/// The node backing this entry, for entries backed by exactly one node.
	pub fn node(&self) -> Option<NodeRef> {
		match self {
			Self::Element { node, .. } | Self::Text { node } | Self::Interpolator { node, .. } => {
				Some(*node)
			}
			Self::Section { .. } | Self::Partial { .. } | Self::Component(_) => None,
		}
	}

	fn children(&self) -> Box<dyn Iterator<Item = &RenderNode> + '_> {
		match self {
			Self::Element { children, .. } | Self::Partial { children, .. } => {
				Box::new(children.iter())
			}
			Self::Section {
				instances,
				otherwise,
				..
			} => Box::new(instances.iter().flatten().chain(otherwise.iter().flatten())),
			Self::Component(component) => Box::new(component.nodes.iter()),
			Self::Text { .. } | Self::Interpolator { .. } => Box::new(std::iter::empty()),
		}
	}
}

/// Visits every node-backed entry under `nodes` in document order.
pub fn node_refs(nodes: &[RenderNode]) -> Vec<NodeRef> {
	let mut out = Vec::new();
	collect(nodes.iter(), &mut out);
	out
}

fn collect<'a>(nodes: impl Iterator<Item = &'a RenderNode>, out: &mut Vec<NodeRef>) {
	for node in nodes {
		if let Some(node_ref) = node.node() {
			out.push(node_ref);
		}
		collect(node.children(), out);
	}
}

/// Returns every rendered element matching `selector`, in document order.
pub(crate) fn select(doc: &Document, nodes: &[RenderNode], selector: &Selector) -> Vec<NodeId> {
	node_refs(nodes)
		.into_iter()
		.map(|r| r.id)
		.filter(|&id| doc.kind(id) == NodeKind::Element && selector.matches(doc, id))
		.collect()
}
