//! Arena-backed DOM host for the Reinhardt enhancement engine.
//!
//! The enhancement engine adopts nodes that already exist in a document, so it
//! needs a host DOM whose node identities are stable and observable. This
//! crate provides one that runs natively (no browser required):
//!
//! - [`Document`]: an arena of nodes addressed by [`NodeId`], with tree
//!   mutation, text splitting, attributes and live properties
//! - Fragment parsing and serialization (`set_inner_html` / `inner_html`)
//! - [`Selector`]: a CSS selector subset for `query_selector[_all]`
//!
//! ## Example
//!
//! ```
//! use reinhardt_enhance_dom::Document;
//!
//! let mut doc = Document::new();
//! let root = doc.create_element("div");
//! doc.set_inner_html(root, "<p class=\"note\">hi</p>").unwrap();
//!
//! let p = doc.query_selector(root, "p.note").unwrap().unwrap();
//! assert_eq!(doc.text_content(p), "hi");
//! assert_eq!(doc.inner_html(root), "<p class=\"note\">hi</p>");
//! ```

#![warn(missing_docs)]

mod document;
mod error;
mod node;
mod parser;
mod selector;
mod serialize;

pub use document::{BOOLEAN_PROPERTIES, Descendants, Document, is_boolean_property};
pub use error::{DomError, DomResult};
pub use node::{NodeId, NodeKind};
pub use parser::VOID_ELEMENTS;
pub use selector::Selector;
