//! Instance construction: the entry point of the engine.

use reinhardt_enhance_dom::{Document, DomError, NodeId, Selector};
use serde_json::Value;

use crate::adopt::{InstanceState, Pass};
use crate::binding::Binding;
use crate::cursor::Cursor;
use crate::error::{EnhanceError, EnhanceResult};
use crate::model::Model;
use crate::options::InstanceOptions;
use crate::render_tree::{Listener, NodeRef, RenderNode, node_refs, select};
use crate::report::EnhanceReport;

/// A rendered template bound to a target node.
#[derive(Debug, Clone)]
pub struct Instance {
	target: NodeId,
	model: Model,
	nodes: Vec<RenderNode>,
	bindings: Vec<Binding>,
	listeners: Vec<Listener>,
	report: EnhanceReport,
}

impl Instance {
	/// Renders `options.template` into `options.target`.
	///
	/// With `enhance`, existing children are adopted wherever they fit and
	/// everything else is healed. With `append`, the render goes after the
	/// existing children. With neither, existing children are replaced.
	///
	/// # Errors
	///
	/// Fails before touching the document when the options are inconsistent,
	/// name an unregistered partial or component, or lack a usable target.
	///
	/// # Example
	///
	/// ```
	/// use reinhardt_enhance::{Instance, InstanceOptions};
	/// use reinhardt_enhance_dom::Document;
	/// use reinhardt_enhance_template::{ElementItem, Template};
	///
	/// let mut doc = Document::new();
	/// let root = doc.create_element("div");
	/// doc.set_inner_html(root, "<p></p>").unwrap();
	/// let p = doc.children(root)[0];
	///
	/// let template = Template::new([ElementItem::new("p").into_item()]);
	/// let instance = Instance::new(&mut doc, InstanceOptions::new(template).target(root).enhance(true))
	/// 	.unwrap();
	///
	/// assert_eq!(instance.find(&doc, "p"), Some(p));
	/// ```
	pub fn new(doc: &mut Document, mut options: InstanceOptions) -> EnhanceResult<Self> {
		options.validate()?;
		let target = options.target.ok_or(EnhanceError::MissingTarget)?;
		if target.index() >= doc.len() || !doc.kind(target).is_container() {
			return Err(DomError::NotAContainer(target).into());
		}

		let flags = options.flags;
		let mut report = EnhanceReport::default();
		let mut cursor = if flags.enhance {
			Cursor::over_children(doc, target)
		} else {
			if !flags.append {
				report.removed += doc.children(target).len();
				doc.clear_children(target);
			}
			Cursor::empty(target)
		};

		let mut state = InstanceState::new(Model::new(std::mem::take(&mut options.data)));
		let mut pass = Pass::new(doc, options.registry(), report);
		let nodes = pass.render_fragment(&mut state, options.template.items(), &mut cursor);
		let mut report = pass.finish();
		report.removed += cursor.finish(doc);

		let mode = match (flags.enhance, flags.append) {
			(true, _) => "enhance",
			(false, true) => "append",
			(false, false) => "replace",
		};
		tracing::info!(
			target = %target,
			mode,
			adopted = report.adopted,
			created = report.created,
			split = report.split,
			removed = report.removed,
			failures = report.failures.len(),
			"Instance rendered"
		);

		Ok(Self {
			target,
			model: state.model,
			nodes,
			bindings: state.bindings,
			listeners: state.listeners,
			report,
		})
	}

	/// The node the instance rendered into.
	pub fn target(&self) -> NodeId {
		self.target
	}

	/// The first rendered element matching `selector`, in document order.
	///
	/// Elements rendered by sections, partials and components are included.
	/// An invalid selector matches nothing.
	pub fn find(&self, doc: &Document, selector: &str) -> Option<NodeId> {
		self.find_all(doc, selector).into_iter().next()
	}

	/// Every rendered element matching `selector`, in document order.
	pub fn find_all(&self, doc: &Document, selector: &str) -> Vec<NodeId> {
		match Selector::parse(selector) {
			Ok(selector) => select(doc, &self.nodes, &selector),
			Err(err) => {
				tracing::warn!(%err, "Invalid selector");
				Vec::new()
			}
		}
	}

	/// Reads a value from the instance data.
	pub fn get(&self, keypath: &str) -> Option<&Value> {
		self.model.get(keypath)
	}

	/// The instance data.
	pub fn data(&self) -> &Value {
		self.model.data()
	}

	/// What the construction pass did.
	pub fn report(&self) -> &EnhanceReport {
		&self.report
	}

	/// Two-way bindings of this instance. Components keep their own.
	pub fn bindings(&self) -> &[Binding] {
		&self.bindings
	}

	/// Event listeners of this instance. Components keep their own.
	pub fn listeners(&self) -> &[Listener] {
		&self.listeners
	}

	/// The rendered items, one entry per top-level template item.
	pub fn render_tree(&self) -> &[RenderNode] {
		&self.nodes
	}

	/// Every node backing the render tree, in document order.
	pub fn nodes(&self) -> Vec<NodeRef> {
		node_refs(&self.nodes)
	}
}
