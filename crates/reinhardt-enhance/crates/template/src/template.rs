//! The root of a compiled template.

use serde::{Deserialize, Serialize};

use crate::item::TemplateItem;

/// A compiled template: the ordered top-level items of a fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template {
	items: Vec<TemplateItem>,
}

impl Template {
	/// Creates a template from its top-level items.
	pub fn new(items: impl IntoIterator<Item = TemplateItem>) -> Self {
		Self {
			items: items.into_iter().collect(),
		}
	}

	/// Returns the top-level items.
	pub fn items(&self) -> &[TemplateItem] {
		&self.items
	}

	/// Whether the template has no items.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Deserializes a template from its JSON item array.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// Serializes the template to JSON.
	pub fn to_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(self)
	}

	/// Visits every item in document order, descending into element
	/// children and both section bodies.
	///
	/// Partials and components are visited but not expanded.
	pub fn walk(&self, visit: &mut impl FnMut(&TemplateItem)) {
		walk_items(&self.items, visit);
	}

	/// Names of all partials included anywhere in the template.
	pub fn partial_names(&self) -> Vec<&str> {
		let mut names = Vec::new();
		walk_items(&self.items, &mut |item| {
			if let TemplateItem::Partial { name } = item {
				names.push(name.as_str());
			}
		});
		names
	}

	/// Names of all components invoked anywhere in the template.
	pub fn component_names(&self) -> Vec<&str> {
		let mut names = Vec::new();
		walk_items(&self.items, &mut |item| {
			if let TemplateItem::Component(component) = item {
				names.push(component.name.as_str());
			}
		});
		names
	}
}

fn walk_items<'a>(items: &'a [TemplateItem], visit: &mut impl FnMut(&'a TemplateItem)) {
	for item in items {
		visit(item);
		match item {
			TemplateItem::Element(element) => walk_items(&element.children, visit),
			TemplateItem::Section(section) => {
				walk_items(&section.body, visit);
				if let Some(else_body) = &section.else_body {
					walk_items(else_body, visit);
				}
			}
			TemplateItem::Text { .. }
			| TemplateItem::Interpolator { .. }
			| TemplateItem::Partial { .. }
			| TemplateItem::Component(_) => {}
		}
	}
}

impl From<Vec<TemplateItem>> for Template {
	fn from(items: Vec<TemplateItem>) -> Self {
		Self { items }
	}
}

impl FromIterator<TemplateItem> for Template {
	fn from_iter<I: IntoIterator<Item = TemplateItem>>(iter: I) -> Self {
		Self::new(iter)
	}
}

impl<'a> IntoIterator for &'a Template {
	type Item = &'a TemplateItem;
	type IntoIter = std::slice::Iter<'a, TemplateItem>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.iter()
	}
}
