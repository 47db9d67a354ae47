//! The arena document.

use crate::error::{DomError, DomResult};
use crate::node::{ElementData, NodeData, NodeId, NodeKind, Slot};
use crate::parser::{ParsedNode, parse_fragment};
use crate::selector::Selector;
use crate::serialize::serialize_children;

/// Boolean properties whose live state is exposed through a property as well
/// as through attribute presence.
pub const BOOLEAN_PROPERTIES: &[&str] = &[
	"allowfullscreen",
	"async",
	"autofocus",
	"autoplay",
	"checked",
	"controls",
	"default",
	"defer",
	"disabled",
	"formnovalidate",
	"hidden",
	"inert",
	"ismap",
	"loop",
	"multiple",
	"muted",
	"nomodule",
	"novalidate",
	"open",
	"playsinline",
	"readonly",
	"required",
	"reversed",
	"selected",
];

/// Boolean properties that only default to their attribute: once set through
/// the property they no longer follow it.
const DETACHED_FLAGS: &[&str] = &["checked", "selected"];

/// Returns whether `name` is a boolean property.
pub fn is_boolean_property(name: &str) -> bool {
	BOOLEAN_PROPERTIES.contains(&name)
}

/// An arena of DOM nodes.
///
/// Nodes are addressed by [`NodeId`]. Accessors panic when handed an id that
/// belongs to another document; structural operations report misuse through
/// [`DomError`].
#[derive(Debug, Clone, Default)]
pub struct Document {
	nodes: Vec<Slot>,
}

impl Document {
	/// Creates an empty document.
	pub fn new() -> Self {
		Self::default()
	}

	fn push(&mut self, data: NodeData) -> NodeId {
		let id = NodeId(self.nodes.len() as u32);
		self.nodes.push(Slot::new(data));
		id
	}

	fn slot(&self, id: NodeId) -> &Slot {
		&self.nodes[id.index()]
	}

	fn slot_mut(&mut self, id: NodeId) -> &mut Slot {
		&mut self.nodes[id.index()]
	}

	fn element(&self, id: NodeId) -> DomResult<&ElementData> {
		match &self.slot(id).data {
			NodeData::Element(el) => Ok(el),
			_ => Err(DomError::NotAnElement(id)),
		}
	}

	fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
		match &mut self.slot_mut(id).data {
			NodeData::Element(el) => Ok(el),
			_ => Err(DomError::NotAnElement(id)),
		}
	}

	/// Creates a detached fragment container.
	pub fn create_fragment(&mut self) -> NodeId {
		self.push(NodeData::Fragment)
	}

	/// Creates a detached element. The tag name is stored lowercase.
	pub fn create_element(&mut self, tag: &str) -> NodeId {
		self.push(NodeData::Element(ElementData::new(tag)))
	}

	/// Creates a detached text node.
	pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
		self.push(NodeData::Text(text.into()))
	}

	/// Creates a detached comment node.
	pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
		self.push(NodeData::Comment(text.into()))
	}

	/// Returns the number of nodes ever created in this document.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Returns whether the document has never created a node.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Returns the kind of a node.
	pub fn kind(&self, id: NodeId) -> NodeKind {
		self.slot(id).data.kind()
	}

	/// Returns the lowercase tag name of an element.
	pub fn tag_name(&self, id: NodeId) -> Option<&str> {
		self.element(id).ok().map(|el| el.tag.as_str())
	}

	/// Returns the data of a text or comment node.
	pub fn text(&self, id: NodeId) -> Option<&str> {
		match &self.slot(id).data {
			NodeData::Text(text) | NodeData::Comment(text) => Some(text),
			_ => None,
		}
	}

	/// Returns the parent of a node.
	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.slot(id).parent
	}

	/// Returns the children of a node in order.
	pub fn children(&self, id: NodeId) -> &[NodeId] {
		&self.slot(id).children
	}

	/// Returns the sibling following `id`.
	pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
		let parent = self.parent(id)?;
		let siblings = self.children(parent);
		let pos = siblings.iter().position(|&c| c == id)?;
		siblings.get(pos + 1).copied()
	}

	/// Returns whether `ancestor` is `node` or one of its ancestors.
	pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
		let mut current = Some(node);
		while let Some(id) = current {
			if id == ancestor {
				return true;
			}
			current = self.parent(id);
		}
		false
	}

	/// Iterates the descendants of `root` in document order, excluding `root`.
	pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
		let mut stack: Vec<NodeId> = self.children(root).to_vec();
		stack.reverse();
		Descendants { doc: self, stack }
	}

	/// Concatenated data of all descendant text nodes.
	pub fn text_content(&self, id: NodeId) -> String {
		if let Some(text) = self.text(id) {
			return text.to_string();
		}
		self.descendants(id)
			.filter(|&n| self.kind(n) == NodeKind::Text)
			.filter_map(|n| self.text(n))
			.collect()
	}

	// ------------------------------------------------------------------
	// Tree mutation
	// ------------------------------------------------------------------

	fn check_insert(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
		if !self.kind(parent).is_container() {
			return Err(DomError::NotAContainer(parent));
		}
		if self.contains(child, parent) {
			return Err(DomError::HierarchyRequest { parent, child });
		}
		Ok(())
	}

	fn detach(&mut self, id: NodeId) {
		if let Some(parent) = self.slot_mut(id).parent.take() {
			self.slot_mut(parent).children.retain(|&c| c != id);
		}
	}

	/// Appends `child` to `parent`, moving it if it is attached elsewhere.
	pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
		self.check_insert(parent, child)?;
		self.detach(child);
		self.slot_mut(parent).children.push(child);
		self.slot_mut(child).parent = Some(parent);
		Ok(())
	}

	/// Inserts `child` before `reference`, or appends when `reference` is `None`.
	pub fn insert_before(
		&mut self,
		parent: NodeId,
		child: NodeId,
		reference: Option<NodeId>,
	) -> DomResult<()> {
		let Some(reference) = reference else {
			return self.append_child(parent, child);
		};
		if self.parent(reference) != Some(parent) {
			return Err(DomError::NotAChild {
				parent,
				child: reference,
			});
		}
		if reference == child {
			return Ok(());
		}
		self.check_insert(parent, child)?;
		self.detach(child);
		let siblings = &mut self.slot_mut(parent).children;
		let pos = siblings
			.iter()
			.position(|&c| c == reference)
			.unwrap_or(siblings.len());
		siblings.insert(pos, child);
		self.slot_mut(child).parent = Some(parent);
		Ok(())
	}

	/// Detaches a node from its parent. Returns whether it was attached.
	pub fn remove(&mut self, id: NodeId) -> bool {
		let attached = self.parent(id).is_some();
		self.detach(id);
		attached
	}

	/// Removes every child of `parent`.
	pub fn clear_children(&mut self, parent: NodeId) {
		let children = std::mem::take(&mut self.slot_mut(parent).children);
		for child in children {
			self.slot_mut(child).parent = None;
		}
	}

	// ------------------------------------------------------------------
	// Text
	// ------------------------------------------------------------------

	/// Replaces the data of a text node.
	pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> DomResult<()> {
		match &mut self.slot_mut(id).data {
			NodeData::Text(data) => {
				*data = text.into();
				Ok(())
			}
			_ => Err(DomError::NotAText(id)),
		}
	}

	/// Appends to the data of a text node.
	pub fn append_text(&mut self, id: NodeId, text: &str) -> DomResult<()> {
		match &mut self.slot_mut(id).data {
			NodeData::Text(data) => {
				data.push_str(text);
				Ok(())
			}
			_ => Err(DomError::NotAText(id)),
		}
	}

	/// Splits a text node at a byte offset.
	///
	/// `id` keeps the data before `offset`; a new text node holding the rest
	/// is inserted right after it (when `id` is attached) and returned.
	pub fn split_text(&mut self, id: NodeId, offset: usize) -> DomResult<NodeId> {
		let tail = match &mut self.slot_mut(id).data {
			NodeData::Text(data) => {
				if offset > data.len() || !data.is_char_boundary(offset) {
					return Err(DomError::InvalidOffset {
						offset,
						len: data.len(),
					});
				}
				data.split_off(offset)
			}
			_ => return Err(DomError::NotAText(id)),
		};
		let new_node = self.create_text(tail);
		if let Some(parent) = self.parent(id) {
			let next = self.next_sibling(id);
			self.insert_before(parent, new_node, next)?;
		}
		Ok(new_node)
	}

	// ------------------------------------------------------------------
	// Attributes
	// ------------------------------------------------------------------

	/// Returns an attribute value.
	pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
		self.element(id)
			.ok()
			.and_then(|el| el.attr(&name.to_ascii_lowercase()))
	}

	/// Returns whether an attribute is present.
	pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
		self.attribute(id, name).is_some()
	}

	/// Returns the attributes of an element in source order.
	pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
		match &self.slot(id).data {
			NodeData::Element(el) => &el.attrs,
			_ => &[],
		}
	}

	/// Returns the attribute names of an element in source order.
	pub fn attribute_names(&self, id: NodeId) -> Vec<String> {
		self.attributes(id).iter().map(|(k, _)| k.clone()).collect()
	}

	/// Sets an attribute, replacing any previous value.
	pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
		validate_attribute_name(name)?;
		let name = name.to_ascii_lowercase();
		let el = self.element_mut(id)?;
		match el.attrs.iter_mut().find(|(k, _)| *k == name) {
			Some((_, v)) => *v = value.to_string(),
			None => el.attrs.push((name, value.to_string())),
		}
		Ok(())
	}

	/// Removes an attribute. Returns whether it was present.
	pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<bool> {
		let name = name.to_ascii_lowercase();
		let el = self.element_mut(id)?;
		let before = el.attrs.len();
		el.attrs.retain(|(k, _)| *k != name);
		Ok(el.attrs.len() != before)
	}

	// ------------------------------------------------------------------
	// Properties
	// ------------------------------------------------------------------

	/// Reads a boolean property such as `disabled` or `checked`.
	pub fn bool_property(&self, id: NodeId, name: &str) -> DomResult<bool> {
		let name = name.to_ascii_lowercase();
		let el = self.element(id)?;
		Ok(match el.dirty.flags.get(&name) {
			Some(&flag) => flag,
			None => el.attr(&name).is_some(),
		})
	}

	/// Writes a boolean property.
	///
	/// Reflecting properties add or remove their attribute; `checked` and
	/// `selected` only change the live state.
	pub fn set_bool_property(&mut self, id: NodeId, name: &str, value: bool) -> DomResult<()> {
		let name = name.to_ascii_lowercase();
		if DETACHED_FLAGS.contains(&name.as_str()) {
			self.element_mut(id)?.dirty.flags.insert(name, value);
			return Ok(());
		}
		self.element_mut(id)?.dirty.flags.remove(&name);
		if value {
			self.set_attribute(id, &name, "")
		} else {
			self.remove_attribute(id, &name).map(|_| ())
		}
	}

	/// Reads the live `value` of a form control.
	///
	/// Falls back to the `value` attribute for inputs, the text content for
	/// `<textarea>` and the selected option for `<select>`.
	pub fn value_property(&self, id: NodeId) -> DomResult<String> {
		let el = self.element(id)?;
		if let Some(value) = &el.dirty.value {
			return Ok(value.clone());
		}
		Ok(match el.tag.as_str() {
			"textarea" => self.text_content(id),
			"select" => self.selected_option_value(id).unwrap_or_default(),
			_ => el.attr("value").unwrap_or_default().to_string(),
		})
	}

	/// Writes the live `value` of a form control without touching attributes.
	pub fn set_value_property(&mut self, id: NodeId, value: impl Into<String>) -> DomResult<()> {
		self.element_mut(id)?.dirty.value = Some(value.into());
		Ok(())
	}

	fn selected_option_value(&self, select: NodeId) -> Option<String> {
		let options: Vec<NodeId> = self
			.descendants(select)
			.filter(|&n| self.tag_name(n) == Some("option"))
			.collect();
		let chosen = options
			.iter()
			.copied()
			.find(|&o| self.bool_property(o, "selected").unwrap_or(false))
			.or_else(|| options.first().copied())?;
		Some(
			self.attribute(chosen, "value")
				.map(str::to_string)
				.unwrap_or_else(|| self.text_content(chosen)),
		)
	}

	// ------------------------------------------------------------------
	// Markup
	// ------------------------------------------------------------------

	/// Replaces the children of `parent` with nodes parsed from `html`.
	pub fn set_inner_html(&mut self, parent: NodeId, html: &str) -> DomResult<()> {
		if !self.kind(parent).is_container() {
			return Err(DomError::NotAContainer(parent));
		}
		let parsed = parse_fragment(html)?;
		self.clear_children(parent);
		for node in parsed {
			self.build(parent, node)?;
		}
		Ok(())
	}

	fn build(&mut self, parent: NodeId, node: ParsedNode) -> DomResult<()> {
		match node {
			ParsedNode::Element {
				tag,
				attrs,
				children,
			} => {
				let id = self.create_element(&tag);
				for (name, value) in attrs {
					self.set_attribute(id, &name, &value)?;
				}
				self.append_child(parent, id)?;
				for child in children {
					self.build(id, child)?;
				}
			}
			ParsedNode::Text(text) => {
				let id = self.create_text(text);
				self.append_child(parent, id)?;
			}
			ParsedNode::Comment(text) => {
				let id = self.create_comment(text);
				self.append_child(parent, id)?;
			}
		}
		Ok(())
	}

	/// Serializes the children of a node to HTML.
	pub fn inner_html(&self, id: NodeId) -> String {
		let mut out = String::new();
		serialize_children(self, id, &mut out);
		out
	}

	// ------------------------------------------------------------------
	// Queries
	// ------------------------------------------------------------------

	/// Returns the first descendant of `root` matching `selector`.
	pub fn query_selector(&self, root: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
		let selector = Selector::parse(selector)?;
		Ok(self.descendants(root).find(|&n| selector.matches(self, n)))
	}

	/// Returns every descendant of `root` matching `selector`, in document order.
	pub fn query_selector_all(&self, root: NodeId, selector: &str) -> DomResult<Vec<NodeId>> {
		let selector = Selector::parse(selector)?;
		Ok(self
			.descendants(root)
			.filter(|&n| selector.matches(self, n))
			.collect())
	}
}

/// Pre-order iterator over descendants. See [`Document::descendants`].
pub struct Descendants<'a> {
	doc: &'a Document,
	stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
	type Item = NodeId;

	fn next(&mut self) -> Option<NodeId> {
		let id = self.stack.pop()?;
		self.stack
			.extend(self.doc.children(id).iter().rev().copied());
		Some(id)
	}
}

fn validate_attribute_name(name: &str) -> DomResult<()> {
	let invalid = name.is_empty()
		|| name.chars().any(|c| {
			c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '=' | '<')
		});
	if invalid {
		return Err(DomError::InvalidAttributeName(name.to_string()));
	}
	Ok(())
}
