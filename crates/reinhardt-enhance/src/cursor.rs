//! Forward-only cursor over a snapshot of existing children.

use std::collections::VecDeque;

use reinhardt_enhance_dom::{Document, DomResult, NodeId};

/// A position over the children a parent had when its adoption started.
///
/// Nodes are either claimed (adopted by a template item) or passed over.
/// Passed-over nodes and nodes still pending when the parent finishes are
/// surplus and get removed by [`Cursor::finish`].
#[derive(Debug, Clone)]
pub struct Cursor {
	parent: NodeId,
	pending: VecDeque<NodeId>,
	passed: Vec<NodeId>,
}

impl Cursor {
	/// Snapshots the current children of `parent`.
	pub fn over_children(doc: &Document, parent: NodeId) -> Self {
		Self {
			parent,
			pending: doc.children(parent).iter().copied().collect(),
			passed: Vec::new(),
		}
	}

	/// A cursor that never matches: everything rendered through it is
	/// created and appended to `parent`.
	pub fn empty(parent: NodeId) -> Self {
		Self {
			parent,
			pending: VecDeque::new(),
			passed: Vec::new(),
		}
	}

	/// The node whose children this cursor walks.
	pub fn parent(&self) -> NodeId {
		self.parent
	}

	/// The next unclaimed node.
	pub fn peek(&self) -> Option<NodeId> {
		self.pending.front().copied()
	}

	/// The unclaimed nodes, next first.
	pub fn upcoming(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.pending.iter().copied()
	}

	/// Whether no unclaimed nodes remain.
	pub fn is_exhausted(&self) -> bool {
		self.pending.is_empty()
	}

	/// Claims the next node.
	pub fn claim(&mut self) -> Option<NodeId> {
		let node = self.pending.pop_front()?;
		tracing::trace!(node = %node, parent = %self.parent, "Claimed existing node");
		Some(node)
	}

	/// Passes over the next node, leaving it for removal.
	pub fn pass(&mut self) -> Option<NodeId> {
		let node = self.pending.pop_front()?;
		tracing::trace!(node = %node, parent = %self.parent, "Passed over existing node");
		self.passed.push(node);
		Some(node)
	}

	/// Hands nodes back at the current position, in order.
	///
	/// Used for text split off a claimed node that its run did not need.
	pub fn hand_back(&mut self, nodes: impl IntoIterator<Item = NodeId>) {
		let nodes: Vec<NodeId> = nodes.into_iter().collect();
		for &node in nodes.iter().rev() {
			self.pending.push_front(node);
		}
	}

	/// Inserts a freshly created node immediately before the next unclaimed
	/// node, or appends it when none remain.
	pub fn insert(&self, doc: &mut Document, node: NodeId) -> DomResult<()> {
		doc.insert_before(self.parent, node, self.peek())
	}

	/// Removes every node that was never claimed. Returns how many were
	/// still attached to the parent.
	pub fn finish(self, doc: &mut Document) -> usize {
		let mut removed = 0;
		for node in self.passed.into_iter().chain(self.pending) {
			if doc.parent(node) == Some(self.parent) && doc.remove(node) {
				tracing::trace!(node = %node, parent = %self.parent, "Removed surplus node");
				removed += 1;
			}
		}
		removed
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_fresh_nodes_go_before_the_next_unclaimed_node() {
		let mut doc = Document::new();
		let root = doc.create_element("div");
		doc.set_inner_html(root, "<a></a><b></b>").unwrap();

		let mut cursor = Cursor::over_children(&doc, root);
		cursor.claim();
		let fresh = doc.create_element("i");
		cursor.insert(&mut doc, fresh).unwrap();
		assert_eq!(doc.inner_html(root), "<a></a><i></i><b></b>");

		assert_eq!(cursor.finish(&mut doc), 1);
		assert_eq!(doc.inner_html(root), "<a></a><i></i>");
	}

	#[rstest]
	fn test_handed_back_nodes_come_first() {
		let mut doc = Document::new();
		let root = doc.create_element("div");
		doc.set_inner_html(root, "abc<p></p>").unwrap();

		let mut cursor = Cursor::over_children(&doc, root);
		let text = cursor.claim().unwrap();
		let tail = doc.split_text(text, 1).unwrap();
		cursor.hand_back([tail]);

		assert_eq!(cursor.peek(), Some(tail));
		assert_eq!(cursor.pass(), Some(tail));
		assert_eq!(cursor.finish(&mut doc), 2);
		assert_eq!(doc.inner_html(root), "a");
	}

	#[rstest]
	fn test_empty_cursor_appends() {
		let mut doc = Document::new();
		let root = doc.create_element("div");
		doc.set_inner_html(root, "<p></p>").unwrap();

		let cursor = Cursor::empty(root);
		assert!(cursor.is_exhausted());
		let fresh = doc.create_text("x");
		cursor.insert(&mut doc, fresh).unwrap();
		assert_eq!(cursor.finish(&mut doc), 0);
		assert_eq!(doc.inner_html(root), "<p></p>x");
	}
}
