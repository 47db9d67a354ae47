//! Brings an adopted element's attributes in line with the template.

use reinhardt_enhance_dom::{Document, DomResult, NodeId, is_boolean_property};

/// An attribute with its value resolved against the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredAttr {
	/// Lowercase attribute name.
	pub name: String,
	/// The resolved value. Valueless attributes resolve to `""`.
	pub value: String,
}

impl DeclaredAttr {
	/// Creates a declared attribute.
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into().to_ascii_lowercase(),
			value: value.into(),
		}
	}
}

/// What reconciling one element changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeReport {
	/// Attributes that were absent and got set.
	pub added: Vec<String>,
	/// Attributes whose value changed.
	pub updated: Vec<String>,
	/// Attributes that were present but not declared.
	pub removed: Vec<String>,
	/// Attributes whose operation failed, with the reason.
	pub failed: Vec<(String, String)>,
}

impl AttributeReport {
	/// Whether nothing changed and nothing failed.
	pub fn is_clean(&self) -> bool {
		self.added.is_empty()
			&& self.updated.is_empty()
			&& self.removed.is_empty()
			&& self.failed.is_empty()
	}
}

/// Makes the attribute set of `node` equal to `declared`.
///
/// Every present attribute missing from `declared` is removed and every
/// declared attribute is set. Boolean properties are written through the
/// property so live state follows, and `value` on form controls updates the
/// live value too. Operations are independent: a failure is logged and
/// reported, and the rest still run.
pub fn reconcile(doc: &mut Document, node: NodeId, declared: &[DeclaredAttr]) -> AttributeReport {
	let mut report = AttributeReport::default();

	for name in doc.attribute_names(node) {
		if declared.iter().any(|attr| attr.name == name) {
			continue;
		}
		match remove(doc, node, &name) {
			Ok(()) => report.removed.push(name),
			Err(err) => fail(&mut report, node, name, err.to_string()),
		}
	}

	for attr in declared {
		let previous = doc.attribute(node, &attr.name).map(str::to_string);
		match apply(doc, node, attr) {
			Ok(()) => match previous {
				None => report.added.push(attr.name.clone()),
				Some(old) if old != attr.value => report.updated.push(attr.name.clone()),
				Some(_) => {}
			},
			Err(err) => fail(&mut report, node, attr.name.clone(), err.to_string()),
		}
	}

	if !report.is_clean() {
		tracing::debug!(
			node = %node,
			added = ?report.added,
			updated = ?report.updated,
			removed = ?report.removed,
			"Reconciled attributes"
		);
	}
	report
}

/// Writes a declared attribute onto an element, including its live state.
pub(crate) fn apply(doc: &mut Document, node: NodeId, attr: &DeclaredAttr) -> DomResult<()> {
	if is_boolean_property(&attr.name) {
		doc.set_bool_property(node, &attr.name, true)?;
	}
	doc.set_attribute(node, &attr.name, &attr.value)?;
	if attr.name == "value" && is_form_control(doc, node) {
		doc.set_value_property(node, attr.value.as_str())?;
	}
	Ok(())
}

fn remove(doc: &mut Document, node: NodeId, name: &str) -> DomResult<()> {
	if is_boolean_property(name) {
		doc.set_bool_property(node, name, false)?;
	}
	doc.remove_attribute(node, name)?;
	if name == "value" && is_form_control(doc, node) {
		doc.set_value_property(node, "")?;
	}
	Ok(())
}

fn fail(report: &mut AttributeReport, node: NodeId, name: String, reason: String) {
	tracing::warn!(node = %node, attribute = %name, %reason, "Attribute operation failed");
	report.failed.push((name, reason));
}

pub(crate) fn is_form_control(doc: &Document, node: NodeId) -> bool {
	matches!(doc.tag_name(node), Some("input" | "textarea" | "select"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;
	use std::collections::BTreeSet;

	fn element(html: &str) -> (Document, NodeId) {
		let mut doc = Document::new();
		let root = doc.create_element("div");
		doc.set_inner_html(root, html).unwrap();
		let node = doc.children(root)[0];
		(doc, node)
	}

	#[rstest]
	fn test_undeclared_attributes_are_removed() {
		let (mut doc, button) = element(r#"<button disabled data-live="false"></button>"#);
		let report = reconcile(&mut doc, button, &[DeclaredAttr::new("class", "live")]);

		assert_eq!(report.added, vec!["class"]);
		assert_eq!(report.removed, vec!["disabled", "data-live"]);
		assert_eq!(doc.attributes(button), &[("class".to_string(), "live".to_string())]);
		assert!(!doc.bool_property(button, "disabled").unwrap());
	}

	#[rstest]
	fn test_unchanged_attribute_is_not_reported() {
		let (mut doc, p) = element(r#"<p class="a" id="x"></p>"#);
		let report = reconcile(
			&mut doc,
			p,
			&[DeclaredAttr::new("class", "a"), DeclaredAttr::new("id", "y")],
		);
		assert!(report.added.is_empty());
		assert_eq!(report.updated, vec!["id"]);
	}

	#[rstest]
	fn test_checked_goes_through_the_property() {
		let (mut doc, input) = element(r#"<input type="checkbox">"#);
		reconcile(
			&mut doc,
			input,
			&[DeclaredAttr::new("type", "checkbox"), DeclaredAttr::new("checked", "")],
		);
		assert!(doc.bool_property(input, "checked").unwrap());

		reconcile(&mut doc, input, &[DeclaredAttr::new("type", "checkbox")]);
		assert!(!doc.bool_property(input, "checked").unwrap());
		assert!(!doc.has_attribute(input, "checked"));
	}

	#[rstest]
	fn test_value_updates_live_property() {
		let (mut doc, input) = element(r#"<input value="old">"#);
		doc.set_value_property(input, "typed").unwrap();
		reconcile(&mut doc, input, &[DeclaredAttr::new("value", "new")]);
		assert_eq!(doc.value_property(input).unwrap(), "new");
		assert_eq!(doc.attribute(input, "value"), Some("new"));
	}

	#[rstest]
	fn test_failure_does_not_stop_other_operations() {
		let (mut doc, p) = element(r#"<p title="t"></p>"#);
		let report = reconcile(
			&mut doc,
			p,
			&[DeclaredAttr::new("bad name", "x"), DeclaredAttr::new("class", "ok")],
		);
		assert_eq!(report.failed.len(), 1);
		assert_eq!(report.failed[0].0, "bad name");
		assert_eq!(report.removed, vec!["title"]);
		assert_eq!(doc.attribute(p, "class"), Some("ok"));
	}

	fn attr_name() -> impl Strategy<Value = String> {
		prop::sample::select(vec![
			"id", "class", "title", "disabled", "hidden", "data-a", "data-b", "role",
		])
		.prop_map(str::to_string)
	}

	proptest! {
		#[test]
		fn test_attribute_set_equals_declared_set(
			present in prop::collection::btree_set(attr_name(), 0..6),
			declared in prop::collection::btree_set(attr_name(), 0..6),
		) {
			let mut doc = Document::new();
			let node = doc.create_element("div");
			for name in &present {
				doc.set_attribute(node, name, "old").unwrap();
			}
			let declared_attrs: Vec<DeclaredAttr> = declared
				.iter()
				.map(|name| DeclaredAttr::new(name.as_str(), "new"))
				.collect();

			let report = reconcile(&mut doc, node, &declared_attrs);

			let after: BTreeSet<String> = doc.attribute_names(node).into_iter().collect();
			prop_assert_eq!(&after, &declared);
			prop_assert!(report.failed.is_empty());
			for name in &declared {
				prop_assert_eq!(doc.attribute(node, name), Some("new"));
			}
			let removed: BTreeSet<String> = report.removed.into_iter().collect();
			let expected_removed: BTreeSet<String> = present.difference(&declared).cloned().collect();
			prop_assert_eq!(removed, expected_removed);
		}
	}
}
