//! Progressive enhancement for Reinhardt templates.
//!
//! A server has already rendered markup for a template. Instead of throwing
//! it away and rendering again, an [`Instance`] constructed with
//! `enhance(true)` walks the template and the existing DOM together and
//! adopts every compatible node in place. Bindings and event listeners are
//! wired to the adopted nodes, and anything that does not fit is healed:
//!
//! - missing nodes are created where a fresh render would put them
//! - surplus nodes are removed
//! - attributes are brought in line with the template
//! - a text node holding `hello, world!` is split so an interpolator gets a
//!   node of its own, and stale text is replaced
//!
//! Matching is shallow: an element matches when its tag does,
//! and a text node matches a text item. Attributes and child counts never
//! prevent adoption.
//!
//! ## Example
//!
//! ```
//! use reinhardt_enhance::{Instance, InstanceOptions};
//! use reinhardt_enhance_dom::Document;
//! use reinhardt_enhance_template::{ElementItem, SectionItem, Template, TemplateItem};
//! use serde_json::json;
//!
//! let mut doc = Document::new();
//! let root = doc.create_element("div");
//! doc.set_inner_html(root, "<ul><li>a</li><li>b</li></ul>").unwrap();
//! let existing = doc.query_selector_all(root, "li").unwrap();
//!
//! let template = Template::new([ElementItem::new("ul")
//! 	.child(
//! 		SectionItem::each("items")
//! 			.body([ElementItem::new("li").child(TemplateItem::interpolator("this")).into_item()]),
//! 	)
//! 	.into_item()]);
//!
//! let instance = Instance::new(
//! 	&mut doc,
//! 	InstanceOptions::new(template)
//! 		.target(root)
//! 		.data(json!({ "items": ["a", "b"] }))
//! 		.enhance(true),
//! )
//! .unwrap();
//!
//! assert_eq!(instance.find_all(&doc, "li"), existing);
//! assert!(instance.report().is_fully_adopted());
//! ```

#![warn(missing_docs)]

mod adopt;
pub mod attributes;
pub mod binding;
pub mod cursor;
mod error;
mod instance;
pub mod matcher;
mod model;
mod options;
pub mod render_tree;
mod report;
pub mod text_run;

pub use attributes::{AttributeReport, DeclaredAttr, reconcile};
pub use binding::{Binding, BindingProperty};
pub use cursor::Cursor;
pub use error::{EnhanceError, EnhanceResult};
pub use instance::Instance;
pub use matcher::{Expectation, MatchResult, match_item};
pub use model::{Model, Resolution};
pub use options::{ComponentDefinition, InstanceOptions, MountFlags};
pub use render_tree::{ComponentInstance, Listener, NodeOrigin, NodeRef, RenderNode};
pub use report::EnhanceReport;
pub use text_run::{Segment, adopt_text_run};
