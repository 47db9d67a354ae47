//! The data model and reference resolution.

use reinhardt_enhance_template::Reference;
use serde_json::{Map, Value};

/// The data behind an instance: a JSON value addressed by dotted keypaths.
///
/// Array elements are addressed by their index, as in `items.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
	data: Value,
}

impl Default for Model {
	fn default() -> Self {
		Self::new(Value::Object(Map::new()))
	}
}

impl Model {
	/// Wraps initial data. Non-object roots are replaced by an empty object.
	pub fn new(data: Value) -> Self {
		let data = match data {
			Value::Object(_) => data,
			Value::Null => Value::Object(Map::new()),
			other => {
				tracing::warn!(data = %other, "Instance data must be an object; ignoring it");
				Value::Object(Map::new())
			}
		};
		Self { data }
	}

	/// Returns the whole data object.
	pub fn data(&self) -> &Value {
		&self.data
	}

	/// Returns the value at `keypath`. The empty keypath is the root.
	pub fn get(&self, keypath: &str) -> Option<&Value> {
		split_keypath(keypath).try_fold(&self.data, |value, key| match value {
			Value::Object(map) => map.get(key),
			Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
			_ => None,
		})
	}

	/// Writes `value` at `keypath`, creating intermediate objects as needed.
	///
	/// Returns `false` when the path runs through a scalar or past the end of
	/// an array.
	pub fn set(&mut self, keypath: &str, value: Value) -> bool {
		let keys: Vec<&str> = split_keypath(keypath).collect();
		let Some((last, parents)) = keys.split_last() else {
			self.data = value;
			return true;
		};
		let mut current = &mut self.data;
		for key in parents {
			current = match current {
				Value::Object(map) => map
					.entry(key.to_string())
					.or_insert_with(|| Value::Object(Map::new())),
				Value::Array(items) => match key.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
					Some(item) => item,
					None => return false,
				},
				_ => return false,
			};
		}
		match current {
			Value::Object(map) => {
				map.insert(last.to_string(), value);
				true
			}
			Value::Array(items) => match last.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
				Some(slot) => {
					*slot = value;
					true
				}
				None => false,
			},
			_ => false,
		}
	}

	/// Shallow-merges the entries of `overrides` into the root object.
	pub(crate) fn merge(&mut self, overrides: Map<String, Value>) {
		if let Value::Object(map) = &mut self.data {
			map.extend(overrides);
		}
	}
}

fn split_keypath(keypath: &str) -> impl Iterator<Item = &str> {
	keypath.split('.').filter(|k| !k.is_empty())
}

pub(crate) fn join_keypath(base: &str, key: &str) -> String {
	match (base.is_empty(), key.is_empty()) {
		(true, _) => key.to_string(),
		(_, true) => base.to_string(),
		_ => format!("{}.{}", base, key),
	}
}

/// A reference resolved against the context stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
	/// An absolute keypath into the model.
	Keypath(String),
	/// The position of the innermost list instance.
	Index(usize),
}

#[derive(Debug, Clone)]
struct Frame {
	keypath: String,
	index: Option<usize>,
}

/// The stack of contexts pushed by section instances.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scope {
	frames: Vec<Frame>,
}

impl Scope {
	pub(crate) fn push(&mut self, keypath: String, index: Option<usize>) {
		self.frames.push(Frame { keypath, index });
	}

	pub(crate) fn pop(&mut self) {
		self.frames.pop();
	}

	pub(crate) fn context(&self) -> &str {
		self.frames.last().map(|f| f.keypath.as_str()).unwrap_or("")
	}

	/// Resolves a reference.
	///
	/// Plain references are looked up in the innermost context first and
	/// then in each enclosing one, falling back to the root.
	pub(crate) fn resolve(&self, model: &Model, reference: &Reference) -> Resolution {
		if reference.is_index() {
			let index = self.frames.iter().rev().find_map(|f| f.index).unwrap_or(0);
			return Resolution::Index(index);
		}
		let segments = reference.segments();
		let path = segments.join(".");
		if reference.is_explicitly_relative() {
			return Resolution::Keypath(join_keypath(self.context(), &path));
		}
		let Some(head) = segments.first() else {
			return Resolution::Keypath(self.context().to_string());
		};
		for frame in self.frames.iter().rev() {
			let base = model.get(&frame.keypath);
			let has_head = match base {
				Some(Value::Object(map)) => map.contains_key(*head),
				_ => false,
			};
			if has_head {
				return Resolution::Keypath(join_keypath(&frame.keypath, &path));
			}
		}
		Resolution::Keypath(path)
	}

	/// Resolves a reference and reads its current value.
	pub(crate) fn value(&self, model: &Model, reference: &Reference) -> Value {
		match self.resolve(model, reference) {
			Resolution::Keypath(keypath) => model.get(&keypath).cloned().unwrap_or(Value::Null),
			Resolution::Index(index) => Value::from(index),
		}
	}
}

/// Renders a value the way it appears in text and attributes.
pub(crate) fn stringify(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::Bool(b) => b.to_string(),
		Value::Number(n) => n.to_string(),
		Value::String(s) => s.clone(),
		Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
		Value::Object(_) => value.to_string(),
	}
}

/// Section truthiness: empty strings, zero, `null`, `false` and empty arrays
/// are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
		Value::String(s) => !s.is_empty(),
		Value::Array(items) => !items.is_empty(),
		Value::Object(_) => true,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn model() -> Model {
		Model::new(json!({
			"name": "root",
			"user": { "name": "ada" },
			"items": [{ "name": "a" }, { "label": "b" }],
		}))
	}

	#[rstest]
	#[case("name", Some(json!("root")))]
	#[case("user.name", Some(json!("ada")))]
	#[case("items.1.label", Some(json!("b")))]
	#[case("items.7", None)]
	#[case("name.length", None)]
	fn test_get(model: Model, #[case] keypath: &str, #[case] expected: Option<Value>) {
		assert_eq!(model.get(keypath).cloned(), expected);
	}

	#[rstest]
	fn test_set_creates_intermediate_objects(mut model: Model) {
		assert!(model.set("form.answer", json!(42)));
		assert_eq!(model.get("form.answer"), Some(&json!(42)));
		assert!(model.set("items.0.name", json!("z")));
		assert_eq!(model.get("items.0.name"), Some(&json!("z")));
		assert!(!model.set("name.first", json!(1)));
		assert!(!model.set("items.9", json!(1)));
	}

	#[rstest]
	fn test_resolution_walks_outward(model: Model) {
		let mut scope = Scope::default();
		scope.push("items.1".to_string(), Some(1));

		// `label` exists in the instance context, `name` only at the root.
		assert_eq!(
			scope.resolve(&model, &Reference::new("label")),
			Resolution::Keypath("items.1.label".into())
		);
		assert_eq!(scope.value(&model, &Reference::new("name")), json!("root"));
		assert_eq!(scope.value(&model, &Reference::new("this.name")), Value::Null);
		assert_eq!(scope.value(&model, &Reference::new("@index")), json!(1));
		assert_eq!(
			scope.resolve(&model, &Reference::new(".")),
			Resolution::Keypath("items.1".into())
		);
	}

	#[rstest]
	#[case(json!(null), "")]
	#[case(json!("hi"), "hi")]
	#[case(json!(42), "42")]
	#[case(json!(1.5), "1.5")]
	#[case(json!(true), "true")]
	#[case(json!(["a", 1]), "a,1")]
	fn test_stringify(#[case] value: Value, #[case] expected: &str) {
		assert_eq!(stringify(&value), expected);
	}

	#[rstest]
	#[case(json!(0), false)]
	#[case(json!(""), false)]
	#[case(json!([]), false)]
	#[case(json!(null), false)]
	#[case(json!("0"), true)]
	#[case(json!({}), true)]
	#[case(json!([0]), true)]
	fn test_truthiness(#[case] value: Value, #[case] expected: bool) {
		assert_eq!(is_truthy(&value), expected);
	}
}
