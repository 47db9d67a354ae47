//! Instance configuration.

use std::collections::{HashMap, HashSet};

use reinhardt_enhance_dom::NodeId;
use reinhardt_enhance_template::{Template, TemplateItem};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EnhanceError, EnhanceResult};

/// How an instance treats the existing children of its target.
///
/// Loadable from JSON settings:
///
/// ```
/// use reinhardt_enhance::MountFlags;
///
/// let flags = MountFlags::from_json(r#"{"enhance": true}"#).unwrap();
/// assert!(flags.enhance);
/// assert!(!flags.append);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountFlags {
	/// Adopt the existing children instead of replacing them.
	pub enhance: bool,
	/// Render after the existing children.
	pub append: bool,
}

impl MountFlags {
	/// Parses flags from a JSON object. Missing keys default to `false`.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// Rejects contradictory combinations.
	pub fn validate(&self) -> EnhanceResult<()> {
		if self.enhance && self.append {
			return Err(EnhanceError::ConflictingOptions);
		}
		Ok(())
	}
}

/// A reusable component: a template plus its default data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentDefinition {
	/// The component's template.
	pub template: Template,
	/// Default data, overridden by the invocation's attribute mappings.
	pub data: Value,
}

impl ComponentDefinition {
	/// Creates a component with no default data.
	pub fn new(template: impl Into<Template>) -> Self {
		Self {
			template: template.into(),
			data: Value::Object(Default::default()),
		}
	}

	/// Sets the default data.
	pub fn data(mut self, data: Value) -> Self {
		self.data = data;
		self
	}
}

/// Options for [`Instance::new`](crate::Instance::new).
///
/// # Example
///
/// ```
/// use reinhardt_enhance::InstanceOptions;
/// use reinhardt_enhance_template::{ElementItem, Template};
/// use serde_json::json;
///
/// let options = InstanceOptions::new(Template::new([ElementItem::new("p").into_item()]))
/// 	.data(json!({ "name": "world" }))
/// 	.enhance(true);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct InstanceOptions {
	/// The node whose children the instance renders into.
	pub target: Option<NodeId>,
	/// The compiled template.
	pub template: Template,
	/// Initial data.
	pub data: Value,
	/// Partial registry.
	pub partials: HashMap<String, Template>,
	/// Component registry.
	pub components: HashMap<String, ComponentDefinition>,
	/// How existing children are treated.
	pub flags: MountFlags,
}

impl Default for InstanceOptions {
	fn default() -> Self {
		Self {
			target: None,
			template: Template::default(),
			data: Value::Object(Default::default()),
			partials: HashMap::new(),
			components: HashMap::new(),
			flags: MountFlags::default(),
		}
	}
}

impl InstanceOptions {
	/// Creates options rendering `template`.
	pub fn new(template: impl Into<Template>) -> Self {
		Self {
			template: template.into(),
			..Self::default()
		}
	}

	/// Sets the target node.
	pub fn target(mut self, target: NodeId) -> Self {
		self.target = Some(target);
		self
	}

	/// Sets the initial data.
	pub fn data(mut self, data: Value) -> Self {
		self.data = data;
		self
	}

	/// Registers a partial.
	pub fn partial(mut self, name: impl Into<String>, template: impl Into<Template>) -> Self {
		self.partials.insert(name.into(), template.into());
		self
	}

	/// Registers a component.
	pub fn component(mut self, name: impl Into<String>, definition: ComponentDefinition) -> Self {
		self.components.insert(name.into(), definition);
		self
	}

	/// Adopts the existing children of the target.
	pub fn enhance(mut self, enhance: bool) -> Self {
		self.flags.enhance = enhance;
		self
	}

	/// Renders after the existing children of the target.
	pub fn append(mut self, append: bool) -> Self {
		self.flags.append = append;
		self
	}

	/// Replaces both mount flags.
	pub fn flags(mut self, flags: MountFlags) -> Self {
		self.flags = flags;
		self
	}

	/// Checks the options before any DOM work.
	///
	/// Fails on conflicting flags, and when the template, or any partial or
	/// component it reaches, names an unregistered partial or component.
	pub fn validate(&self) -> EnhanceResult<()> {
		self.flags.validate()?;

		let mut pending = vec![&self.template];
		let mut seen_partials = HashSet::new();
		let mut seen_components = HashSet::new();
		while let Some(template) = pending.pop() {
			for name in template.partial_names() {
				let partial = self
					.partials
					.get(name)
					.ok_or_else(|| EnhanceError::UnknownPartial(name.to_string()))?;
				if seen_partials.insert(name) {
					pending.push(partial);
				}
			}
			for name in template.component_names() {
				let component = self
					.components
					.get(name)
					.ok_or_else(|| EnhanceError::UnknownComponent(name.to_string()))?;
				if seen_components.insert(name) {
					pending.push(&component.template);
				}
			}
		}
		Ok(())
	}

	pub(crate) fn registry(&self) -> Registry<'_> {
		Registry {
			partials: &self.partials,
			components: &self.components,
		}
	}
}

/// Read-only view of the partial and component registries used by a pass.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Registry<'a> {
	partials: &'a HashMap<String, Template>,
	components: &'a HashMap<String, ComponentDefinition>,
}

impl<'a> Registry<'a> {
	pub(crate) fn partial(&self, name: &str) -> Option<&'a [TemplateItem]> {
		self.partials.get(name).map(|t| t.items())
	}

	pub(crate) fn component(&self, name: &str) -> Option<&'a ComponentDefinition> {
		self.components.get(name)
	}
}
