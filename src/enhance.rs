//! The progressive enhancement engine
//!
//! This module provides access to reinhardt-enhance. See
//! [`Instance::new`] for the construction pass and [`InstanceOptions`] for
//! the mount modes.
//!
//! ## Example
//!
//! ```
//! use reinhardt::dom::Document;
//! use reinhardt::enhance::{EnhanceError, Instance, InstanceOptions};
//! use reinhardt::template::Template;
//!
//! let mut doc = Document::new();
//! let root = doc.create_element("div");
//! let options = InstanceOptions::new(Template::default())
//! 	.target(root)
//! 	.enhance(true)
//! 	.append(true);
//!
//! let err = Instance::new(&mut doc, options).unwrap_err();
//! assert!(matches!(err, EnhanceError::ConflictingOptions));
//! ```

pub use reinhardt_enhance::*;
