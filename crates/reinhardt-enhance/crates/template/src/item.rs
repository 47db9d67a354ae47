//! Template items and their builders.

use serde::{Deserialize, Serialize};

use crate::reference::Reference;

/// A node of a compiled template.
///
/// The set of kinds is closed: every consumer dispatches over it with an
/// exhaustive `match`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemplateItem {
	/// An element with attributes and children.
	Element(ElementItem),
	/// Literal text.
	Text {
		/// The text content.
		text: String,
	},
	/// A `{{reference}}` whose value renders as text.
	Interpolator {
		/// The referenced value.
		reference: Reference,
	},
	/// A conditional, inverted or list section.
	Section(SectionItem),
	/// A `{{>name}}` partial inclusion.
	Partial {
		/// The registered partial name.
		name: String,
	},
	/// A component invocation such as `<Item name="{{this}}"/>`.
	Component(ComponentItem),
}

impl TemplateItem {
	/// Creates a literal text item.
	pub fn text(text: impl Into<String>) -> Self {
		Self::Text { text: text.into() }
	}

	/// Creates an interpolator item.
	pub fn interpolator(reference: impl Into<Reference>) -> Self {
		Self::Interpolator {
			reference: reference.into(),
		}
	}

	/// Creates a partial inclusion.
	pub fn partial(name: impl Into<String>) -> Self {
		Self::Partial { name: name.into() }
	}

	/// Returns a short label used in diagnostics.
	pub fn describe(&self) -> String {
		match self {
			Self::Element(el) => format!("<{}>", el.tag),
			Self::Text { text } => format!("text {:?}", text),
			Self::Interpolator { reference } => format!("{{{{{}}}}}", reference),
			Self::Section(section) => format!("{{{{#{} {}}}}}", section.kind.keyword(), section.reference),
			Self::Partial { name } => format!("{{{{>{}}}}}", name),
			Self::Component(component) => format!("<{}/>", component.name),
		}
	}
}

/// A piece of an attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrPart {
	/// Literal text.
	Literal(String),
	/// A referenced value rendered as text.
	Reference(Reference),
}

impl AttrPart {
	/// Creates a literal part.
	pub fn literal(text: impl Into<String>) -> Self {
		Self::Literal(text.into())
	}

	/// Creates a reference part.
	pub fn reference(reference: impl Into<Reference>) -> Self {
		Self::Reference(reference.into())
	}
}

/// The declared value of an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrValue {
	/// Present without a value, as in `<button disabled>`.
	Empty,
	/// A literal value.
	Static(String),
	/// A value assembled from literal text and references.
	Dynamic(Vec<AttrPart>),
}

impl AttrValue {
	/// Returns the reference when the value is exactly one `{{reference}}`.
	///
	/// Such attributes are eligible for two-way binding.
	pub fn single_reference(&self) -> Option<&Reference> {
		match self {
			Self::Dynamic(parts) => match parts.as_slice() {
				[AttrPart::Reference(reference)] => Some(reference),
				_ => None,
			},
			_ => None,
		}
	}
}

/// An attribute declared on an element or component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateAttr {
	/// The attribute name.
	pub name: String,
	/// The declared value.
	pub value: AttrValue,
}

/// An `on-<event>` directive naming the handler to call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDirective {
	/// The DOM event name, such as `click`.
	pub event: String,
	/// The handler name resolved by the host.
	pub handler: String,
}

/// An element item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementItem {
	/// The tag name as written in the template.
	pub tag: String,
	/// Declared attributes in template order.
	#[serde(default)]
	pub attrs: Vec<TemplateAttr>,
	/// Event directives.
	#[serde(default)]
	pub events: Vec<EventDirective>,
	/// Child items.
	#[serde(default)]
	pub children: Vec<TemplateItem>,
}

impl ElementItem {
	/// Creates an element with no attributes or children.
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			attrs: Vec::new(),
			events: Vec::new(),
			children: Vec::new(),
		}
	}

	fn push_attr(mut self, name: impl Into<String>, value: AttrValue) -> Self {
		self.attrs.push(TemplateAttr {
			name: name.into(),
			value,
		});
		self
	}

	/// Adds a static attribute.
	pub fn attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.push_attr(name, AttrValue::Static(value.into()))
	}

	/// Adds a valueless attribute, such as `disabled`.
	pub fn flag(self, name: impl Into<String>) -> Self {
		self.push_attr(name, AttrValue::Empty)
	}

	/// Adds an attribute whose value is exactly `{{reference}}`.
	pub fn bind(self, name: impl Into<String>, reference: impl Into<Reference>) -> Self {
		self.push_attr(
			name,
			AttrValue::Dynamic(vec![AttrPart::Reference(reference.into())]),
		)
	}

	/// Adds an attribute assembled from several parts.
	pub fn attr_parts(self, name: impl Into<String>, parts: Vec<AttrPart>) -> Self {
		self.push_attr(name, AttrValue::Dynamic(parts))
	}

	/// Adds an `on-<event>` directive.
	pub fn on(mut self, event: impl Into<String>, handler: impl Into<String>) -> Self {
		self.events.push(EventDirective {
			event: event.into(),
			handler: handler.into(),
		});
		self
	}

	/// Appends a child item.
	pub fn child(mut self, child: impl Into<TemplateItem>) -> Self {
		self.children.push(child.into());
		self
	}

	/// Appends several child items.
	pub fn children(mut self, children: impl IntoIterator<Item = TemplateItem>) -> Self {
		self.children.extend(children);
		self
	}

	/// Appends a literal text child.
	pub fn text(self, text: impl Into<String>) -> Self {
		self.child(TemplateItem::text(text))
	}

	/// Wraps the element into a [`TemplateItem`].
	pub fn into_item(self) -> TemplateItem {
		TemplateItem::Element(self)
	}
}

impl From<ElementItem> for TemplateItem {
	fn from(element: ElementItem) -> Self {
		TemplateItem::Element(element)
	}
}

/// How a section turns its referenced value into instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
	/// `{{#if x}}`: one instance when the value is truthy.
	If,
	/// `{{#each x}}`: one instance per array element or object entry.
	Each,
	/// `{{^x}}` / `{{#unless x}}`: one instance when the value is falsy.
	Unless,
}

impl SectionKind {
	/// The mustache keyword for this kind.
	pub fn keyword(self) -> &'static str {
		match self {
			Self::If => "if",
			Self::Each => "each",
			Self::Unless => "unless",
		}
	}
}

/// A section item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionItem {
	/// The section kind.
	pub kind: SectionKind,
	/// The referenced value deciding the instance count.
	pub reference: Reference,
	/// Items rendered once per instance.
	#[serde(default)]
	pub body: Vec<TemplateItem>,
	/// Items rendered when there are no instances (`{{else}}`).
	#[serde(default)]
	pub else_body: Option<Vec<TemplateItem>>,
}

impl SectionItem {
	/// Creates a section with an empty body.
	pub fn new(kind: SectionKind, reference: impl Into<Reference>) -> Self {
		Self {
			kind,
			reference: reference.into(),
			body: Vec::new(),
			else_body: None,
		}
	}

	/// Creates an `{{#if}}` section.
	pub fn if_(reference: impl Into<Reference>) -> Self {
		Self::new(SectionKind::If, reference)
	}

	/// Creates an `{{#each}}` section.
	pub fn each(reference: impl Into<Reference>) -> Self {
		Self::new(SectionKind::Each, reference)
	}

	/// Creates an `{{#unless}}` section.
	pub fn unless(reference: impl Into<Reference>) -> Self {
		Self::new(SectionKind::Unless, reference)
	}

	/// Sets the body.
	pub fn body(mut self, body: impl IntoIterator<Item = TemplateItem>) -> Self {
		self.body = body.into_iter().collect();
		self
	}

	/// Sets the `{{else}}` body.
	pub fn otherwise(mut self, body: impl IntoIterator<Item = TemplateItem>) -> Self {
		self.else_body = Some(body.into_iter().collect());
		self
	}

	/// Wraps the section into a [`TemplateItem`].
	pub fn into_item(self) -> TemplateItem {
		TemplateItem::Section(self)
	}
}

impl From<SectionItem> for TemplateItem {
	fn from(section: SectionItem) -> Self {
		TemplateItem::Section(section)
	}
}

/// A component invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentItem {
	/// The registered component name.
	pub name: String,
	/// Attribute mappings that become the component's data.
	#[serde(default)]
	pub attrs: Vec<TemplateAttr>,
}

impl ComponentItem {
	/// Creates a component invocation without mappings.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			attrs: Vec::new(),
		}
	}

	/// Maps a static value into the component's data.
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attrs.push(TemplateAttr {
			name: name.into(),
			value: AttrValue::Static(value.into()),
		});
		self
	}

	/// Maps `{{reference}}` from the parent context into the component's data.
	pub fn bind(mut self, name: impl Into<String>, reference: impl Into<Reference>) -> Self {
		self.attrs.push(TemplateAttr {
			name: name.into(),
			value: AttrValue::Dynamic(vec![AttrPart::Reference(reference.into())]),
		});
		self
	}

	/// Wraps the component into a [`TemplateItem`].
	pub fn into_item(self) -> TemplateItem {
		TemplateItem::Component(self)
	}
}

impl From<ComponentItem> for TemplateItem {
	fn from(component: ComponentItem) -> Self {
		TemplateItem::Component(component)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_single_reference_detection() {
		let bound = AttrValue::Dynamic(vec![AttrPart::reference("answer")]);
		let mixed = AttrValue::Dynamic(vec![AttrPart::literal("n-"), AttrPart::reference("id")]);
		assert_eq!(bound.single_reference(), Some(&Reference::new("answer")));
		assert_eq!(mixed.single_reference(), None);
		assert_eq!(AttrValue::Static("42".into()).single_reference(), None);
	}

	#[rstest]
	#[case(ElementItem::new("p").into_item(), "<p>")]
	#[case(TemplateItem::interpolator("name"), "{{name}}")]
	#[case(SectionItem::each("items").into_item(), "{{#each items}}")]
	#[case(TemplateItem::partial("foo"), "{{>foo}}")]
	#[case(ComponentItem::new("Item").into_item(), "<Item/>")]
	fn test_describe(#[case] item: TemplateItem, #[case] expected: &str) {
		assert_eq!(item.describe(), expected);
	}

	#[rstest]
	fn test_element_builder_collects_attrs_and_events() {
		let button = ElementItem::new("button")
			.attr("class", "live")
			.flag("disabled")
			.on("click", "save")
			.text("go");
		assert_eq!(button.attrs.len(), 2);
		assert_eq!(button.attrs[1].value, AttrValue::Empty);
		assert_eq!(button.events[0].handler, "save");
		assert!(matches!(button.children[0], TemplateItem::Text { .. }));
	}
}
