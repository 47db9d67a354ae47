//! The depth-first pass that renders template items against existing DOM.
//!
//! Every item kind is handled by one adopter. All of them share the
//! cursor of the fragment they render into, so sections, partials and
//! components claim existing nodes exactly where a fresh render would have
//! put theirs.

use reinhardt_enhance_dom::{Document, NodeId, is_boolean_property};
use reinhardt_enhance_template::{
	AttrPart, AttrValue, ComponentItem, ElementItem, Reference, SectionItem, SectionKind,
	TemplateItem,
};
use serde_json::{Map, Value};

use crate::attributes::{self, DeclaredAttr, reconcile};
use crate::binding::{self, Binding};
use crate::cursor::Cursor;
use crate::matcher::{Expectation, MatchResult, match_item};
use crate::model::{Model, Resolution, Scope, is_truthy, join_keypath, stringify};
use crate::options::Registry;
use crate::render_tree::{ComponentInstance, Listener, NodeOrigin, NodeRef, RenderNode};
use crate::report::EnhanceReport;
use crate::text_run::{Segment, adopt_text_run};

/// Partials and components nested deeper than this render nothing.
const MAX_INCLUSION_DEPTH: usize = 64;

/// Mutable state of one instance (the root or a component) during a pass.
#[derive(Debug, Default)]
pub(crate) struct InstanceState {
	pub(crate) model: Model,
	pub(crate) scope: Scope,
	pub(crate) bindings: Vec<Binding>,
	pub(crate) listeners: Vec<Listener>,
}

impl InstanceState {
	pub(crate) fn new(model: Model) -> Self {
		Self {
			model,
			..Self::default()
		}
	}
}

/// A textual item of a run.
#[derive(Clone, Copy)]
enum RunItem<'t> {
	Text(&'t str),
	Interpolator(&'t Reference),
}

/// An item that renders on its own.
#[derive(Clone, Copy)]
enum Structural<'t> {
	Element(&'t ElementItem),
	Section(&'t SectionItem),
	Partial(&'t str),
	Component(&'t ComponentItem),
}

enum Classified<'t> {
	Textual(RunItem<'t>),
	Structural(Structural<'t>),
}

fn classify(item: &TemplateItem) -> Classified<'_> {
	match item {
		TemplateItem::Text { text } => Classified::Textual(RunItem::Text(text)),
		TemplateItem::Interpolator { reference } => {
			Classified::Textual(RunItem::Interpolator(reference))
		}
		TemplateItem::Element(element) => Classified::Structural(Structural::Element(element)),
		TemplateItem::Section(section) => Classified::Structural(Structural::Section(section)),
		TemplateItem::Partial { name } => Classified::Structural(Structural::Partial(name)),
		TemplateItem::Component(component) => {
			Classified::Structural(Structural::Component(component))
		}
	}
}

/// One synchronous pass over a template.
pub(crate) struct Pass<'d, 'r> {
	doc: &'d mut Document,
	registry: Registry<'r>,
	report: EnhanceReport,
	depth: usize,
}

impl<'d, 'r> Pass<'d, 'r> {
	pub(crate) fn new(doc: &'d mut Document, registry: Registry<'r>, report: EnhanceReport) -> Self {
		Self {
			doc,
			registry,
			report,
			depth: 0,
		}
	}

	pub(crate) fn finish(self) -> EnhanceReport {
		self.report
	}

	/// Renders a list of sibling items through `cursor`.
	///
	/// Adjacent text and interpolator items are adopted together as one run.
	pub(crate) fn render_fragment(
		&mut self,
		state: &mut InstanceState,
		items: &[TemplateItem],
		cursor: &mut Cursor,
	) -> Vec<RenderNode> {
		let mut rendered = Vec::with_capacity(items.len());
		let mut run = Vec::new();
		for item in items {
			tracing::trace!(item = %item.describe(), "Rendering item");
			match classify(item) {
				Classified::Textual(run_item) => run.push(run_item),
				Classified::Structural(structural) => {
					if !run.is_empty() {
						rendered.extend(self.render_text_run(state, &run, cursor));
						run.clear();
					}
					rendered.push(self.render_structural(state, structural, cursor));
				}
			}
		}
		if !run.is_empty() {
			rendered.extend(self.render_text_run(state, &run, cursor));
		}
		rendered
	}

	fn render_structural(
		&mut self,
		state: &mut InstanceState,
		item: Structural<'_>,
		cursor: &mut Cursor,
	) -> RenderNode {
		match item {
			Structural::Element(element) => self.render_element(state, element, cursor),
			Structural::Section(section) => self.render_section(state, section, cursor),
			Structural::Partial(name) => self.render_partial(state, name, cursor),
			Structural::Component(component) => self.render_component(state, component, cursor),
		}
	}

	// ------------------------------------------------------------------
	// Text
	// ------------------------------------------------------------------

	fn render_text_run(
		&mut self,
		state: &mut InstanceState,
		run: &[RunItem<'_>],
		cursor: &mut Cursor,
	) -> Vec<RenderNode> {
		let segments: Vec<Segment> = run
			.iter()
			.map(|item| match item {
				RunItem::Text(text) => Segment::literal(*text),
				RunItem::Interpolator(reference) => {
					Segment::dynamic(stringify(&state.scope.value(&state.model, reference)))
				}
			})
			.collect();
		let nodes = adopt_text_run(self.doc, cursor, &segments, &mut self.report);
		run.iter()
			.zip(nodes)
			.map(|(item, node)| match item {
				RunItem::Text(_) => RenderNode::Text { node },
				RunItem::Interpolator(reference) => RenderNode::Interpolator {
					node,
					reference: (*reference).clone(),
				},
			})
			.collect()
	}

	// ------------------------------------------------------------------
	// Elements
	// ------------------------------------------------------------------

	fn render_element(
		&mut self,
		state: &mut InstanceState,
		element: &ElementItem,
		cursor: &mut Cursor,
	) -> RenderNode {
		let (node, mut child_cursor) =
			match match_item(self.doc, Expectation::Element(&element.tag), cursor) {
				MatchResult::Adopted(node) => {
					tracing::debug!(tag = %element.tag, node = %node, "Adopted existing element");
					let bindings = binding::declared_bindings(element, node, &state.model, &state.scope);
					for binding in &bindings {
						binding::seed(self.doc, binding, &mut state.model);
					}
					let declared = self.resolve_attrs(state, element);
					let changes = reconcile(self.doc, node, &declared);
					self.report.record_attributes(&changes);
					state.bindings.extend(bindings);
					(
						NodeRef::new(node, NodeOrigin::Adopted),
						Cursor::over_children(self.doc, node),
					)
				}
				MatchResult::Fresh => {
					let node = self.doc.create_element(&element.tag);
					tracing::debug!(tag = %element.tag, node = %node, "Creating element");
					for attr in self.resolve_attrs(state, element) {
						if let Err(err) = attributes::apply(self.doc, node, &attr) {
							self.report
								.failure(format!("attribute '{}' on {}: {}", attr.name, node, err));
						}
					}
					if let Err(err) = cursor.insert(self.doc, node) {
						self.report.failure(format!("insertion of {}: {}", node, err));
					}
					state.bindings.extend(binding::declared_bindings(
						element,
						node,
						&state.model,
						&state.scope,
					));
					(NodeRef::new(node, NodeOrigin::Created), Cursor::empty(node))
				}
			};
		self.report.record(node.origin);
		self.wire_events(state, element, node.id);

		let children = self.render_fragment(state, &element.children, &mut child_cursor);
		self.report.removed += child_cursor.finish(self.doc);
		RenderNode::Element { node, children }
	}

	fn wire_events(&mut self, state: &mut InstanceState, element: &ElementItem, node: NodeId) {
		for directive in &element.events {
			tracing::debug!(
				node = %node,
				event = %directive.event,
				handler = %directive.handler,
				"Wiring event listener"
			);
			state.listeners.push(Listener {
				node,
				event: directive.event.clone(),
				handler: directive.handler.clone(),
			});
		}
	}

	/// Resolves the declared attributes of an element against the model.
	///
	/// A boolean property bound to a falsy value is left out, so it ends up
	/// absent.
	fn resolve_attrs(&self, state: &InstanceState, element: &ElementItem) -> Vec<DeclaredAttr> {
		element
			.attrs
			.iter()
			.filter_map(|attr| {
				let value = match &attr.value {
					AttrValue::Empty => String::new(),
					AttrValue::Static(value) => value.clone(),
					AttrValue::Dynamic(parts) => {
						if is_boolean_property(&attr.name.to_ascii_lowercase()) {
							if let Some(reference) = attr.value.single_reference() {
								let value = state.scope.value(&state.model, reference);
								if !is_truthy(&value) {
									return None;
								}
								return Some(DeclaredAttr::new(attr.name.as_str(), ""));
							}
						}
						self.join_parts(state, parts)
					}
				};
				Some(DeclaredAttr::new(attr.name.as_str(), value))
			})
			.collect()
	}

	fn join_parts(&self, state: &InstanceState, parts: &[AttrPart]) -> String {
		parts
			.iter()
			.map(|part| match part {
				AttrPart::Literal(text) => text.clone(),
				AttrPart::Reference(reference) => {
					stringify(&state.scope.value(&state.model, reference))
				}
			})
			.collect()
	}

	// ------------------------------------------------------------------
	// Sections
	// ------------------------------------------------------------------

	fn render_section(
		&mut self,
		state: &mut InstanceState,
		section: &SectionItem,
		cursor: &mut Cursor,
	) -> RenderNode {
		let contexts = section_contexts(&state.model, &state.scope, section);
		tracing::debug!(
			kind = section.kind.keyword(),
			reference = %section.reference,
			instances = contexts.len(),
			"Rendering section"
		);

		let mut instances = Vec::with_capacity(contexts.len());
		for context in contexts {
			let pushed = context.is_some();
			if let Some((keypath, index)) = context {
				state.scope.push(keypath, index);
			}
			instances.push(self.render_fragment(state, &section.body, cursor));
			if pushed {
				state.scope.pop();
			}
		}

		let otherwise = match (&section.else_body, instances.is_empty()) {
			(Some(else_body), true) => Some(self.render_fragment(state, else_body, cursor)),
			_ => None,
		};
		RenderNode::Section {
			kind: section.kind,
			reference: section.reference.clone(),
			instances,
			otherwise,
		}
	}

	// ------------------------------------------------------------------
	// Partials and components
	// ------------------------------------------------------------------

	fn render_partial(
		&mut self,
		state: &mut InstanceState,
		name: &str,
		cursor: &mut Cursor,
	) -> RenderNode {
		let items = match self.registry.partial(name) {
			Some(items) if self.depth < MAX_INCLUSION_DEPTH => items,
			Some(_) => {
				self.report
					.failure(format!("partial '{}' nested too deeply", name));
				&[]
			}
			None => {
				self.report.failure(format!("partial '{}' is not registered", name));
				&[]
			}
		};
		tracing::debug!(partial = name, "Rendering partial");
		self.depth += 1;
		let children = self.render_fragment(state, items, cursor);
		self.depth -= 1;
		RenderNode::Partial {
			name: name.to_string(),
			children,
		}
	}

	fn render_component(
		&mut self,
		state: &mut InstanceState,
		component: &ComponentItem,
		cursor: &mut Cursor,
	) -> RenderNode {
		let definition = match self.registry.component(&component.name) {
			Some(definition) if self.depth < MAX_INCLUSION_DEPTH => Some(definition),
			Some(_) => {
				self.report
					.failure(format!("component '{}' nested too deeply", component.name));
				None
			}
			None => {
				self.report
					.failure(format!("component '{}' is not registered", component.name));
				None
			}
		};

		let mut model = Model::new(definition.map(|d| d.data.clone()).unwrap_or(Value::Null));
		model.merge(self.component_data(state, component));
		let mut inner = InstanceState::new(model);

		tracing::debug!(component = %component.name, "Entering component");
		self.depth += 1;
		let nodes = match definition {
			Some(definition) => self.render_fragment(&mut inner, definition.template.items(), cursor),
			None => Vec::new(),
		};
		self.depth -= 1;
		tracing::debug!(component = %component.name, "Leaving component");

		RenderNode::Component(Box::new(ComponentInstance {
			name: component.name.clone(),
			model: inner.model,
			nodes,
			bindings: inner.bindings,
			listeners: inner.listeners,
		}))
	}

	/// Resolves a component invocation's attribute mappings in the parent
	/// context. A mapping that is exactly one reference keeps the value's
	/// type.
	fn component_data(&self, state: &InstanceState, component: &ComponentItem) -> Map<String, Value> {
		component
			.attrs
			.iter()
			.map(|attr| {
				let value = match &attr.value {
					AttrValue::Empty => Value::Bool(true),
					AttrValue::Static(value) => Value::String(value.clone()),
					AttrValue::Dynamic(parts) => match attr.value.single_reference() {
						Some(reference) => state.scope.value(&state.model, reference),
						None => Value::String(self.join_parts(state, parts)),
					},
				};
				(attr.name.clone(), value)
			})
			.collect()
	}
}

/// Context pushed for each section instance. `None` keeps the enclosing
/// context.
type InstanceContext = Option<(String, Option<usize>)>;

fn section_contexts(model: &Model, scope: &Scope, section: &SectionItem) -> Vec<InstanceContext> {
	let value = scope.value(model, &section.reference);
	let base = match scope.resolve(model, &section.reference) {
		Resolution::Keypath(keypath) => keypath,
		Resolution::Index(_) => scope.context().to_string(),
	};
	match section.kind {
		SectionKind::If if is_truthy(&value) => vec![None],
		SectionKind::Unless if !is_truthy(&value) => vec![None],
		SectionKind::If | SectionKind::Unless => Vec::new(),
		SectionKind::Each => match &value {
			Value::Array(items) => (0..items.len())
				.map(|i| Some((join_keypath(&base, &i.to_string()), Some(i))))
				.collect(),
			Value::Object(map) => map
				.keys()
				.enumerate()
				.map(|(i, key)| Some((join_keypath(&base, key), Some(i))))
				.collect(),
			other if is_truthy(other) => vec![Some((base, None))],
			_ => Vec::new(),
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(SectionKind::If, json!(true), 1)]
	#[case(SectionKind::If, json!([]), 0)]
	#[case(SectionKind::Unless, json!(null), 1)]
	#[case(SectionKind::Unless, json!("x"), 0)]
	#[case(SectionKind::Each, json!(["a", "b", "c"]), 3)]
	#[case(SectionKind::Each, json!({"a": 1, "b": 2}), 2)]
	#[case(SectionKind::Each, json!("scalar"), 1)]
	#[case(SectionKind::Each, json!(0), 0)]
	fn test_section_instance_counts(
		#[case] kind: SectionKind,
		#[case] value: Value,
		#[case] expected: usize,
	) {
		let model = Model::new(json!({ "x": value }));
		let section = SectionItem::new(kind, "x");
		assert_eq!(
			section_contexts(&model, &Scope::default(), &section).len(),
			expected
		);
	}

	#[rstest]
	fn test_each_contexts_address_elements() {
		let model = Model::new(json!({ "items": ["a", "b"] }));
		let contexts = section_contexts(&model, &Scope::default(), &SectionItem::each("items"));
		assert_eq!(
			contexts,
			vec![
				Some(("items.0".to_string(), Some(0))),
				Some(("items.1".to_string(), Some(1)))
			]
		);
	}
}
