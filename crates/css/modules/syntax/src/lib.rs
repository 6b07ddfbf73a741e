//! CSS Syntax Module Level 3: value segmentation and declaration blocks.
//! Spec: <https://www.w3.org/TR/css-syntax-3/>
//!
//! Both entry points are thin layers over `cssparser`: [`split_value_segments`] cuts a
//! shorthand value into the segments the shorthand resolver assigns to its members, and
//! [`parse_declaration_block`] turns `name: value;` lists into declarations with line numbers.

#![forbid(unsafe_code)]

mod declarations;
mod segments;

pub use declarations::{Declaration, parse_declaration_block};
pub use segments::{CommaPolicy, SegmentError, split_value_segments};
