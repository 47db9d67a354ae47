//! # Reinhardt
//!
//! Progressive enhancement for server-rendered pages.
//!
//! A page arrives with markup already produced on the server. Rendering the
//! same template again on the client would throw that markup away. The
//! [`enhance`] module instead walks the template alongside the existing DOM,
//! adopts every node that fits, and heals the rest.
//!
//! ## Crates
//!
//! - [`enhance`] - the engine (`reinhardt-enhance`)
//! - [`dom`] - the arena DOM host it operates on (`reinhardt-enhance-dom`)
//! - [`template`] - compiled template item trees (`reinhardt-enhance-template`)
//!
//! ## Quick Start
//!
//! ```
//! use reinhardt::prelude::*;
//! use serde_json::json;
//!
//! let mut doc = Document::new();
//! let root = doc.create_element("div");
//! doc.set_inner_html(root, "<p>Hello, world!</p>").unwrap();
//! let p = doc.children(root)[0];
//!
//! let template = Template::new([ElementItem::new("p")
//! 	.text("Hello, ")
//! 	.child(TemplateItem::interpolator("name"))
//! 	.text("!")
//! 	.into_item()]);
//!
//! let instance = Instance::new(
//! 	&mut doc,
//! 	InstanceOptions::new(template)
//! 		.target(root)
//! 		.data(json!({ "name": "world" }))
//! 		.enhance(true),
//! )
//! .unwrap();
//!
//! assert_eq!(instance.find(&doc, "p"), Some(p));
//! assert_eq!(doc.inner_html(root), "<p>Hello, world!</p>");
//! ```

#![warn(missing_docs)]

pub mod dom;
pub mod enhance;
pub mod template;

/// The types most hosts need to mount an instance.
pub mod prelude {
	pub use crate::dom::{Document, NodeId};
	pub use crate::enhance::{
		EnhanceError, EnhanceReport, Instance, InstanceOptions, MountFlags,
	};
	pub use crate::template::{
		ComponentItem, ElementItem, SectionItem, Template, TemplateItem,
	};
}
