use crate::controller::{PaletteController, PaletteError};
use swatchbook_types::ToolType;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadFlowState {
    /// The palette list is shown. Removing an item keeps the flow here.
    Listing,
    Applied { name: String },
    Cancelled,
}

/// "Load style" list for the tool that was active when the flow opened.
pub struct LoadFlow {
    controller: PaletteController,
    tool: ToolType,
    items: Vec<String>,
    state: LoadFlowState,
}

impl LoadFlow {
    /// Opens the list. Fails with [`PaletteError::NoValidTool`] when no
    /// palette-capable tool is active.
    pub fn open(controller: PaletteController) -> Result<Self, PaletteError> {
        let tool = controller.current_tool_type()?.ok_or(PaletteError::NoValidTool)?;
        let items = controller.palette_names(tool);
        debug!(tool = %tool, palettes = items.len(), "Opened load flow");
        Ok(Self {
            controller,
            tool,
            items,
            state: LoadFlowState::Listing,
        })
    }

    pub fn tool(&self) -> ToolType {
        self.tool
    }

    /// Names currently shown, in store order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Title line for the list, or the empty-state message.
    pub fn heading(&self) -> String {
        if self.items.is_empty() {
            format!("No styles found for {} tool", self.tool)
        } else {
            format!("Pick style for {} tool", self.tool)
        }
    }

    pub fn state(&self) -> &LoadFlowState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == LoadFlowState::Listing
    }

    /// Applies `name` to the live state and closes the list. An unknown name
    /// writes nothing and leaves the list open.
    pub fn apply(&mut self, name: &str) -> Result<&LoadFlowState, PaletteError> {
        if !self.is_open() {
            return Ok(&self.state);
        }
        if self.controller.apply_palette(self.tool, name)? {
            self.state = LoadFlowState::Applied { name: name.to_string() };
        }
        Ok(&self.state)
    }

    /// Deletes `name` and drops it from the visible list; the list stays open.
    ///
    /// The item is dropped even when the flush fails, since the store has
    /// already forgotten it in memory.
    pub fn remove(&mut self, name: &str) -> Result<&LoadFlowState, PaletteError> {
        if !self.is_open() {
            return Ok(&self.state);
        }
        let removed = self.controller.remove_palette(self.tool, name);
        self.items.retain(|item| item != name);
        removed?;
        Ok(&self.state)
    }

    pub fn cancel(&mut self) {
        if self.is_open() {
            self.state = LoadFlowState::Cancelled;
        }
    }
}
