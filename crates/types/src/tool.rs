use crate::StateObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Drawing tools that can own saved palettes.
///
/// The lowercase names double as the first-level keys of the persisted
/// palette blob and as the `activeTool.type` values reported by the drawing
/// engine.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    Rectangle,
    Diamond,
    Ellipse,
    Arrow,
    Line,
    Freedraw,
    Text,
}

impl ToolType {
    /// Every tool type, in the order the drawing engine lists them.
    pub const ALL: [ToolType; 7] = [
        ToolType::Rectangle,
        ToolType::Diamond,
        ToolType::Ellipse,
        ToolType::Arrow,
        ToolType::Line,
        ToolType::Freedraw,
        ToolType::Text,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Diamond => "diamond",
            Self::Ellipse => "ellipse",
            Self::Arrow => "arrow",
            Self::Line => "line",
            Self::Freedraw => "freedraw",
            Self::Text => "text",
        }
    }

    /// Reads `activeTool.type` from a live state object.
    ///
    /// Returns `None` when no tool is active or the active tool is not one of
    /// the palette-capable types (selection, eraser, hand, ...).
    pub fn active_in(state: &StateObject) -> Option<Self> {
        state
            .get("activeTool")
            .and_then(|tool| tool.get("type"))
            .and_then(Value::as_str)
            .and_then(|raw| raw.parse().ok())
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolType {
    type Err = ParseToolTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| ParseToolTypeError(s.to_string()))
    }
}

/// Raised when a string names no palette-capable tool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tool type '{0}'")]
pub struct ParseToolTypeError(String);
