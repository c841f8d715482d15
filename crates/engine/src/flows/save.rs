use crate::controller::{PaletteController, PaletteError, SaveOutcome};
use swatchbook_types::ToolType;
use tracing::debug;

/// Prompt shown while waiting for a palette name.
pub const SAVE_PLACEHOLDER: &str = "Provide name for the style. Or pick existing one to update";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveFlowState {
    /// Prompt is open; existing names are offered as suggestions.
    AwaitingName,
    Saved { name: String },
    Cancelled,
}

/// "Save style" prompt for the active tool.
pub struct SaveFlow {
    controller: PaletteController,
    tool: ToolType,
    state: SaveFlowState,
}

impl SaveFlow {
    /// Opens the prompt. Fails with [`PaletteError::NoValidTool`] when no
    /// palette-capable tool is active.
    pub fn open(controller: PaletteController) -> Result<Self, PaletteError> {
        let tool = controller.current_tool_type()?.ok_or(PaletteError::NoValidTool)?;
        debug!(tool = %tool, "Opened save flow");
        Ok(Self {
            controller,
            tool,
            state: SaveFlowState::AwaitingName,
        })
    }

    pub fn tool(&self) -> ToolType {
        self.tool
    }

    pub fn placeholder(&self) -> &'static str {
        SAVE_PLACEHOLDER
    }

    pub fn state(&self) -> &SaveFlowState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SaveFlowState::AwaitingName
    }

    /// Existing names of the flow's tool containing `query`, ignoring case.
    pub fn suggestions(&self, query: &str) -> Vec<String> {
        let needle = query.to_lowercase();
        self.controller
            .palette_names(self.tool)
            .into_iter()
            .filter(|name| name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Saves the current style under the typed `input` for the flow's tool.
    /// Blank input keeps the prompt open.
    pub fn submit(&mut self, input: &str) -> Result<&SaveFlowState, PaletteError> {
        if !self.is_open() {
            return Ok(&self.state);
        }
        if let SaveOutcome::Saved { name, .. } = self.controller.save_as(self.tool, input)? {
            self.state = SaveFlowState::Saved { name };
        }
        Ok(&self.state)
    }

    /// Picks an existing suggestion, overwriting that palette with the
    /// current style.
    pub fn choose(&mut self, suggestion: &str) -> Result<&SaveFlowState, PaletteError> {
        self.submit(suggestion)
    }

    pub fn cancel(&mut self) {
        if self.is_open() {
            self.state = SaveFlowState::Cancelled;
        }
    }
}
