//! The DOM host the engine adopts nodes from
//!
//! Re-exports reinhardt-enhance-dom: an arena document with a fragment
//! parser, a serializer and selector queries.

pub use reinhardt_enhance_dom::*;
