//! Counters describing what a pass did to the document.

use serde::Serialize;

use crate::attributes::AttributeReport;
use crate::render_tree::NodeOrigin;

/// Summary of one instance construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnhanceReport {
	/// Existing nodes reused in place.
	pub adopted: usize,
	/// Nodes created because nothing suitable existed.
	pub created: usize,
	/// Text nodes produced by splitting an existing text node.
	pub split: usize,
	/// Text nodes folded into a neighbour.
	pub merged: usize,
	/// Existing nodes removed from the document.
	pub removed: usize,
	/// Attributes added to adopted elements.
	pub attributes_added: usize,
	/// Attributes whose value changed on adopted elements.
	pub attributes_updated: usize,
	/// Attributes removed from adopted elements.
	pub attributes_removed: usize,
	/// Operations that failed and were skipped.
	pub failures: Vec<String>,
}

impl EnhanceReport {
	/// Whether every node the pass produced was adopted.
	pub fn is_fully_adopted(&self) -> bool {
		self.created == 0 && self.removed == 0
	}

	pub(crate) fn record(&mut self, origin: NodeOrigin) {
		match origin {
			NodeOrigin::Adopted => self.adopted += 1,
			NodeOrigin::Created => self.created += 1,
			// Counted when the split happens.
			NodeOrigin::Split => {}
		}
	}

	pub(crate) fn record_attributes(&mut self, attributes: &AttributeReport) {
		self.attributes_added += attributes.added.len();
		self.attributes_updated += attributes.updated.len();
		self.attributes_removed += attributes.removed.len();
		self.failures.extend(
			attributes
				.failed
				.iter()
				.map(|(name, reason)| format!("attribute '{}': {}", name, reason)),
		);
	}

	pub(crate) fn failure(&mut self, message: impl Into<String>) {
		let message = message.into();
		tracing::warn!(%message, "Enhancement operation failed");
		self.failures.push(message);
	}
}
