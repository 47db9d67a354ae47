//! Compiled template items for the Reinhardt enhancement engine.
//!
//! Templates arrive already compiled: a tree of [`TemplateItem`]s made of
//! elements, literal text, `{{interpolators}}`, sections, partial inclusions
//! and component invocations. Trees can be built in code with the builder
//! methods or loaded from JSON.
//!
//! ## Example
//!
//! ```
//! use reinhardt_enhance_template::{ElementItem, SectionItem, Template, TemplateItem};
//!
//! // <ul>{{#each items}}<li>{{this}}</li>{{/each}}</ul>
//! let template = Template::new([ElementItem::new("ul")
//! 	.child(
//! 		SectionItem::each("items")
//! 			.body([ElementItem::new("li").child(TemplateItem::interpolator("this")).into_item()]),
//! 	)
//! 	.into_item()]);
//!
//! let json = template.to_json().unwrap();
//! assert_eq!(Template::from_json(&json).unwrap(), template);
//! ```

#![warn(missing_docs)]

mod item;
mod reference;
mod template;

pub use item::{
	AttrPart, AttrValue, ComponentItem, ElementItem, EventDirective, SectionItem, SectionKind,
	TemplateAttr, TemplateItem,
};
pub use reference::Reference;
pub use template::Template;
