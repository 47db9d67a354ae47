//! Two-way bindings and their initialisation from existing DOM.
//!
//! On an adopted form control the user may already have typed something
//! before the instance existed. The live property wins over the template:
//! it is written to the model before attributes are reconciled, so the
//! rendered attribute reflects what the user sees.

use reinhardt_enhance_dom::{Document, NodeId};
use reinhardt_enhance_template::{AttrValue, ElementItem, Reference};
use serde_json::{Number, Value};

use crate::model::{Model, Resolution, Scope};

/// The property a binding keeps in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingProperty {
	/// The `value` of an input, textarea or select.
	Value,
	/// The `checked` state of a checkbox or radio input.
	Checked,
}

/// A two-way binding between a form control and a model keypath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
	/// The bound element.
	pub node: NodeId,
	/// The bound property.
	pub property: BindingProperty,
	/// The reference as written in the template.
	pub reference: Reference,
	/// The absolute keypath the reference resolved to.
	pub keypath: String,
	/// Whether the value is coerced to a number.
	pub numeric: bool,
}

/// Finds the two-way bindings an element declares.
///
/// `value` binds on `input`, `textarea` and `select`; `checked` binds on
/// checkbox and radio inputs. References that do not resolve to a keypath,
/// such as `@index`, cannot bind.
pub(crate) fn declared_bindings(
	element: &ElementItem,
	node: NodeId,
	model: &Model,
	scope: &Scope,
) -> Vec<Binding> {
	let tag = element.tag.to_ascii_lowercase();
	let input_type = element
		.attrs
		.iter()
		.find(|attr| attr.name.eq_ignore_ascii_case("type"))
		.and_then(|attr| match &attr.value {
			AttrValue::Static(value) => Some(value.to_ascii_lowercase()),
			_ => None,
		})
		.unwrap_or_else(|| "text".to_string());

	element
		.attrs
		.iter()
		.filter_map(|attr| {
			let property = match (attr.name.to_ascii_lowercase().as_str(), tag.as_str()) {
				("value", "input" | "textarea" | "select") => BindingProperty::Value,
				("checked", "input") if matches!(input_type.as_str(), "checkbox" | "radio") => {
					BindingProperty::Checked
				}
				_ => return None,
			};
			let reference = attr.value.single_reference()?;
			let Resolution::Keypath(keypath) = scope.resolve(model, reference) else {
				return None;
			};
			Some(Binding {
				node,
				property,
				reference: reference.clone(),
				keypath,
				numeric: tag == "input" && matches!(input_type.as_str(), "number" | "range"),
			})
		})
		.collect()
}

/// Copies the live state of an adopted control into the model.
pub(crate) fn seed(doc: &Document, binding: &Binding, model: &mut Model) {
	let value = match binding.property {
		BindingProperty::Checked => match doc.bool_property(binding.node, "checked") {
			Ok(checked) => Value::Bool(checked),
			Err(err) => {
				tracing::warn!(node = %binding.node, %err, "Could not read checked state");
				return;
			}
		},
		BindingProperty::Value => match doc.value_property(binding.node) {
			Ok(raw) if binding.numeric => parse_number(&raw),
			Ok(raw) => Value::String(raw),
			Err(err) => {
				tracing::warn!(node = %binding.node, %err, "Could not read live value");
				return;
			}
		},
	};
	tracing::debug!(keypath = %binding.keypath, %value, "Seeding binding from existing DOM");
	if !model.set(&binding.keypath, value) {
		tracing::warn!(keypath = %binding.keypath, "Binding keypath is not writable");
	}
}

/// Parses user input the way a number input reports it. Integral values
/// become integers; anything unparsable becomes `null`.
pub(crate) fn parse_number(raw: &str) -> Value {
	let raw = raw.trim();
	if let Ok(int) = raw.parse::<i64>() {
		return Value::from(int);
	}
	match raw.parse::<f64>() {
		Ok(float) if float.is_finite() && float.fract() == 0.0 && float.abs() < i64::MAX as f64 => {
			Value::from(float as i64)
		}
		Ok(float) => Number::from_f64(float).map_or(Value::Null, Value::Number),
		Err(_) => Value::Null,
	}
}
