//! Shared type definitions for Swatchbook.
//!
//! These types describe the two vocabularies every other crate speaks: the
//! drawing tools palettes are scoped to, and the style attributes a palette
//! captures from the drawing engine's live state.

use serde_json::{Map, Value};

pub mod style;
pub mod tool;

pub use style::{StyleAttribute, StyleSnapshot, StyleValue};
pub use tool::{ParseToolTypeError, ToolType};

/// Full (or partial) application state object exchanged with the drawing
/// engine. Keys are engine-defined; only the style attributes and
/// `activeTool` are interpreted here.
pub type StateObject = Map<String, Value>;
