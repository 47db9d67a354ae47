//! Compiled template items
//!
//! Re-exports reinhardt-enhance-template.

pub use reinhardt_enhance_template::*;
