//! # Swatchbook Engine
//!
//! Saves the drawing engine's current tool style under a name, scoped per
//! tool type, and applies or deletes saved styles later.
//!
//! ## Architecture
//!
//! - **`live_state`**: the injected `{get_state, set_state}` capability over
//!   the drawing engine's state, with scene-file and in-memory backends
//! - **`extract`**: captures the fixed style attributes from the live state
//! - **`controller`**: tool-aware save/apply/remove on top of a palette store
//! - **`flows`**: headless save-prompt and load-list state machines
//! - **`commands`**: the "Save style" / "Load style" command surface
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use swatchbook_engine::{InMemoryLiveState, PaletteController};
//! use swatchbook_types::ToolType;
//! use swatchbook_util::InMemoryPaletteStore;
//!
//! let live = Arc::new(InMemoryLiveState::with_active_tool("rectangle"));
//! let controller = PaletteController::new(Arc::new(InMemoryPaletteStore::new()), live);
//!
//! controller.save_current("bold")?;
//! assert_eq!(controller.current_palette_names()?, vec!["bold"]);
//! assert!(controller.apply_palette(ToolType::Rectangle, "bold")?);
//! # Ok::<(), swatchbook_engine::PaletteError>(())
//! ```

pub mod commands;
pub mod controller;
pub mod extract;
pub mod flows;
pub mod live_state;

pub use commands::{Notifier, OpenedFlow, PaletteCommand, run_command};
pub use controller::{PaletteController, PaletteError, SaveOutcome, overlay};
pub use extract::{extract, extract_from_state};
pub use flows::{LoadFlow, LoadFlowState, SaveFlow, SaveFlowState};
pub use live_state::{InMemoryLiveState, LiveStateError, LiveStateSource, SceneFileSource, ToolOverride};
