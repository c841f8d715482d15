//! Access to the drawing engine's live application state.
//!
//! The engine's state is owned elsewhere; Swatchbook only reads a full copy
//! and writes partial updates back. [`LiveStateSource`] is the capability
//! handed to the controller, with a scene-file backend for the CLI and an
//! in-memory backend for tests and embedding.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use swatchbook_types::{StateObject, ToolType};
use thiserror::Error;
use tracing::debug;

/// Key of the application state inside an Excalidraw scene document.
pub const APP_STATE_KEY: &str = "appState";

/// Key of the active tool descriptor inside the application state.
pub const ACTIVE_TOOL_KEY: &str = "activeTool";

/// Errors raised while talking to the live state.
#[derive(Debug, Error)]
pub enum LiveStateError {
    /// The backing file could not be read or written.
    #[error("live state I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The backing document is not valid JSON.
    #[error("live state serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The backing document parsed, but is not a JSON object.
    #[error("scene file {} is not a JSON object", .0.display())]
    NotAnObject(PathBuf),
}

/// Read/write capability over the drawing engine's state.
pub trait LiveStateSource: Send + Sync {
    /// Returns a copy of the full current state.
    fn get_state(&self) -> Result<StateObject, LiveStateError>;

    /// Shallow-merges `partial` onto the current state: every top-level key
    /// in `partial` replaces the current value, all other keys are kept.
    fn set_state(&self, partial: StateObject) -> Result<(), LiveStateError>;
}

fn merge_shallow(target: &mut StateObject, partial: StateObject) {
    for (key, value) in partial {
        target.insert(key, value);
    }
}

/// Live state held in memory.
#[derive(Debug, Default)]
pub struct InMemoryLiveState {
    state: Mutex<StateObject>,
    writes: AtomicUsize,
}

impl InMemoryLiveState {
    pub fn new(state: StateObject) -> Self {
        Self {
            state: Mutex::new(state),
            writes: AtomicUsize::new(0),
        }
    }

    /// Convenience constructor for a state whose active tool is `tool`.
    pub fn with_active_tool(tool: &str) -> Self {
        let mut state = StateObject::new();
        set_active_tool(&mut state, tool);
        Self::new(state)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> StateObject {
        self.lock().clone()
    }

    /// Number of `set_state` calls seen so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Switches the active tool, as a user clicking the toolbar would.
    pub fn select_tool(&self, tool: &str) {
        set_active_tool(&mut self.lock(), tool);
    }

    fn lock(&self) -> MutexGuard<'_, StateObject> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LiveStateSource for InMemoryLiveState {
    fn get_state(&self) -> Result<StateObject, LiveStateError> {
        Ok(self.snapshot())
    }

    fn set_state(&self, partial: StateObject) -> Result<(), LiveStateError> {
        merge_shallow(&mut self.lock(), partial);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Live state stored in an Excalidraw scene file (`*.excalidraw`).
///
/// The application state lives under `appState`; every other top-level key of
/// the scene (elements, files, ...) is left untouched on write.
#[derive(Debug, Clone)]
pub struct SceneFileSource {
    path: PathBuf,
}

impl SceneFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_scene(&self) -> Result<Map<String, Value>, LiveStateError> {
        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content)? {
            Value::Object(scene) => Ok(scene),
            _ => Err(LiveStateError::NotAnObject(self.path.clone())),
        }
    }
}

impl LiveStateSource for SceneFileSource {
    fn get_state(&self) -> Result<StateObject, LiveStateError> {
        let mut scene = self.read_scene()?;
        match scene.remove(APP_STATE_KEY) {
            Some(Value::Object(app_state)) => Ok(app_state),
            _ => Ok(StateObject::new()),
        }
    }

    fn set_state(&self, partial: StateObject) -> Result<(), LiveStateError> {
        let mut scene = self.read_scene()?;
        let app_state = scene
            .entry(APP_STATE_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if !app_state.is_object() {
            *app_state = Value::Object(Map::new());
        }
        if let Value::Object(app_state) = app_state {
            merge_shallow(app_state, partial);
        }

        fs::write(&self.path, serde_json::to_string_pretty(&Value::Object(scene))?)?;
        debug!(path = %self.path.display(), "Wrote scene app state");
        Ok(())
    }
}

/// Reports a fixed active tool on top of another source.
///
/// Useful when the backing state does not record the active tool (saved scene
/// files usually do not). The override is never written back: `activeTool` is
/// dropped from partial updates before they reach the inner source.
#[derive(Debug, Clone)]
pub struct ToolOverride<S> {
    inner: S,
    tool: ToolType,
}

impl<S: LiveStateSource> ToolOverride<S> {
    pub fn new(inner: S, tool: ToolType) -> Self {
        Self { inner, tool }
    }
}

impl<S: LiveStateSource> LiveStateSource for ToolOverride<S> {
    fn get_state(&self) -> Result<StateObject, LiveStateError> {
        let mut state = self.inner.get_state()?;
        set_active_tool(&mut state, self.tool.as_str());
        Ok(state)
    }

    fn set_state(&self, mut partial: StateObject) -> Result<(), LiveStateError> {
        partial.remove(ACTIVE_TOOL_KEY);
        self.inner.set_state(partial)
    }
}

fn set_active_tool(state: &mut StateObject, tool: &str) {
    let active = state
        .entry(ACTIVE_TOOL_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    match active.as_object_mut() {
        Some(descriptor) => {
            descriptor.insert("type".to_string(), Value::String(tool.to_string()));
        }
        None => {
            *active = serde_json::json!({ "type": tool });
        }
    }
}
