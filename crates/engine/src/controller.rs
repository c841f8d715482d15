//! Palette orchestration: extraction, storage, lookup and application.

use crate::extract::extract_from_state;
use crate::live_state::{LiveStateError, LiveStateSource};
use std::sync::Arc;
use swatchbook_types::{StateObject, StyleSnapshot, ToolType};
use swatchbook_util::{PaletteStore, PaletteStoreError};
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced by palette operations.
#[derive(Debug, Error)]
pub enum PaletteError {
    /// No drawing tool is active, or the active tool cannot own palettes.
    #[error("No valid tool selected")]
    NoValidTool,
    /// The palette store could not be read or flushed.
    #[error(transparent)]
    Persistence(#[from] PaletteStoreError),
    /// The live state could not be read or written.
    #[error(transparent)]
    LiveState(#[from] LiveStateError),
}

/// Result of [`PaletteController::save_current`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The current style was stored as `name` under `tool`.
    Saved { tool: ToolType, name: String },
    /// The name was blank after trimming; nothing was stored.
    BlankName,
}

/// Tool-aware palette operations over an injected store and live state.
///
/// Cloning is cheap; clones share the same store and live state.
#[derive(Clone)]
pub struct PaletteController {
    store: Arc<dyn PaletteStore>,
    live_state: Arc<dyn LiveStateSource>,
}

impl PaletteController {
    pub fn new(store: Arc<dyn PaletteStore>, live_state: Arc<dyn LiveStateSource>) -> Self {
        Self { store, live_state }
    }

    /// Tool currently active in the drawing engine, if it can own palettes.
    pub fn current_tool_type(&self) -> Result<Option<ToolType>, PaletteError> {
        let state = self.live_state.get_state()?;
        Ok(ToolType::active_in(&state))
    }

    /// Palette names for the current tool; empty when no valid tool is active.
    pub fn current_palette_names(&self) -> Result<Vec<String>, PaletteError> {
        Ok(self
            .current_tool_type()?
            .map(|tool| self.store.list_names(tool))
            .unwrap_or_default())
    }

    /// Palette names saved for `tool`.
    pub fn palette_names(&self, tool: ToolType) -> Vec<String> {
        self.store.list_names(tool)
    }

    /// Saves the current style of the active tool as `name`.
    ///
    /// The tool is checked before the name, so an invalid tool is reported
    /// even when the name is blank. Surrounding whitespace is trimmed from
    /// `name` before it is stored.
    pub fn save_current(&self, name: &str) -> Result<SaveOutcome, PaletteError> {
        let state = self.live_state.get_state()?;
        let tool = ToolType::active_in(&state).ok_or(PaletteError::NoValidTool)?;
        self.save_state(tool, name, &state)
    }

    /// Saves the current style under `tool`, whatever tool is active now.
    pub fn save_as(&self, tool: ToolType, name: &str) -> Result<SaveOutcome, PaletteError> {
        let state = self.live_state.get_state()?;
        self.save_state(tool, name, &state)
    }

    fn save_state(&self, tool: ToolType, name: &str, state: &StateObject) -> Result<SaveOutcome, PaletteError> {
        let name = name.trim();
        if name.is_empty() {
            debug!(tool = %tool, "Ignoring save with blank palette name");
            return Ok(SaveOutcome::BlankName);
        }

        let snapshot = extract_from_state(state);
        self.store.save(tool, name, snapshot)?;
        info!(tool = %tool, name, "Saved palette");
        Ok(SaveOutcome::Saved {
            tool,
            name: name.to_string(),
        })
    }

    /// Applies the palette `name` of `tool` to the live state.
    ///
    /// Stored attributes override the live values; everything else in the
    /// live state keeps its current value. Returns `false` without touching
    /// the live state when no such palette exists.
    pub fn apply_palette(&self, tool: ToolType, name: &str) -> Result<bool, PaletteError> {
        let Some(snapshot) = self.store.get(tool, name) else {
            debug!(tool = %tool, name, "No palette to apply");
            return Ok(false);
        };

        let state = self.live_state.get_state()?;
        self.live_state.set_state(overlay(state, &snapshot))?;
        info!(tool = %tool, name, attributes = snapshot.len(), "Applied palette");
        Ok(true)
    }

    /// Deletes the palette `name` of `tool`. Returns `false` when it did not exist.
    pub fn remove_palette(&self, tool: ToolType, name: &str) -> Result<bool, PaletteError> {
        let removed = self.store.delete(tool, name)?;
        if removed {
            info!(tool = %tool, name, "Removed palette");
        }
        Ok(removed)
    }
}

/// Writes the snapshot's attributes over `state`.
pub fn overlay(mut state: StateObject, snapshot: &StyleSnapshot) -> StateObject {
    for (attribute, value) in snapshot.iter() {
        state.insert(attribute.key().to_string(), value.clone().into());
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live_state::InMemoryLiveState;
    use serde_json::{Value, json};
    use swatchbook_types::StyleAttribute;
    use swatchbook_util::InMemoryPaletteStore;

    fn object(value: Value) -> StateObject {
        value.as_object().cloned().unwrap_or_default()
    }

    fn controller(state: Value) -> (PaletteController, Arc<InMemoryPaletteStore>, Arc<InMemoryLiveState>) {
        let store = Arc::new(InMemoryPaletteStore::new());
        let live = Arc::new(InMemoryLiveState::new(object(state)));
        (PaletteController::new(store.clone(), live.clone()), store, live)
    }

    #[test]
    fn current_tool_type_ignores_non_palette_tools() {
        let (controller, _, live) = controller(json!({ "activeTool": { "type": "rectangle" } }));
        assert_eq!(controller.current_tool_type().unwrap(), Some(ToolType::Rectangle));

        live.select_tool("eraser");
        assert_eq!(controller.current_tool_type().unwrap(), None);
        assert!(controller.current_palette_names().unwrap().is_empty());
    }

    #[test]
    fn save_current_stores_trimmed_name() {
        let (controller, store, _) = controller(json!({
            "activeTool": { "type": "diamond" },
            "currentItemStrokeColor": "#2f9e44",
            "currentItemFillStyle": "solid"
        }));

        let outcome = controller.save_current("  forest ").unwrap();
        assert_eq!(
            outcome,
            SaveOutcome::Saved {
                tool: ToolType::Diamond,
                name: "forest".into()
            }
        );

        let snapshot = store.get(ToolType::Diamond, "forest").unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(store.list_names(ToolType::Diamond), vec!["forest"]);
    }

    #[test]
    fn blank_names_leave_store_untouched() {
        let (controller, store, _) = controller(json!({ "activeTool": { "type": "rectangle" } }));

        assert_eq!(controller.save_current("").unwrap(), SaveOutcome::BlankName);
        assert_eq!(controller.save_current("   ").unwrap(), SaveOutcome::BlankName);
        assert_eq!(store.book(), Default::default());
    }

    #[test]
    fn save_without_valid_tool_is_rejected() {
        let (controller, store, _) = controller(json!({ "activeTool": { "type": "selection" } }));

        assert!(matches!(controller.save_current("bold"), Err(PaletteError::NoValidTool)));
        assert!(matches!(controller.save_current(""), Err(PaletteError::NoValidTool)));
        assert_eq!(store.book(), Default::default());
    }

    #[test]
    fn save_as_ignores_the_active_tool() {
        let (controller, store, _) = controller(json!({
            "activeTool": { "type": "eraser" },
            "currentItemStrokeWidth": 4
        }));

        let outcome = controller.save_as(ToolType::Line, " heavy ").unwrap();
        assert_eq!(
            outcome,
            SaveOutcome::Saved {
                tool: ToolType::Line,
                name: "heavy".into()
            }
        );
        assert_eq!(controller.save_as(ToolType::Line, " ").unwrap(), SaveOutcome::BlankName);
        assert_eq!(store.list_names(ToolType::Line), vec!["heavy"]);
    }

    #[test]
    fn apply_overlays_only_snapshot_keys() {
        let (controller, store, live) = controller(json!({
            "activeTool": { "type": "ellipse" },
            "currentItemStrokeColor": "#fff",
            "currentItemOpacity": 30,
            "viewBackgroundColor": "#f8f9fa"
        }));
        let snapshot = StyleSnapshot::default()
            .with(StyleAttribute::StrokeColor, "#000")
            .with(StyleAttribute::EndArrowhead, Value::Null);
        store.save(ToolType::Ellipse, "ink", snapshot).unwrap();

        assert!(controller.apply_palette(ToolType::Ellipse, "ink").unwrap());
        assert_eq!(
            Value::Object(live.snapshot()),
            json!({
                "activeTool": { "type": "ellipse" },
                "currentItemStrokeColor": "#000",
                "currentItemEndArrowhead": null,
                "currentItemOpacity": 30,
                "viewBackgroundColor": "#f8f9fa"
            })
        );
    }

    #[test]
    fn apply_of_missing_palette_does_not_write() {
        let (controller, _, live) = controller(json!({ "activeTool": { "type": "line" }, "currentItemOpacity": 30 }));
        let before = live.snapshot();

        assert!(!controller.apply_palette(ToolType::Line, "ghost").unwrap());
        assert_eq!(live.snapshot(), before);
        assert_eq!(live.write_count(), 0);
    }

    #[test]
    fn remove_palette_delegates_to_store() {
        let (controller, store, _) = controller(json!({ "activeTool": { "type": "text" } }));
        controller.save_current("title").unwrap();

        assert!(controller.remove_palette(ToolType::Text, "title").unwrap());
        assert!(!controller.remove_palette(ToolType::Text, "title").unwrap());
        assert!(store.list_names(ToolType::Text).is_empty());
    }
}
