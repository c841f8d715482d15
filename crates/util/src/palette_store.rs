//! Palette persistence for saved tool styles.
//!
//! The store is a two-level mapping, tool type → palette name → style
//! snapshot, persisted as a single JSON document. The whole document is read
//! once when the store is loaded and rewritten after every mutation.
//! Top-level entries that are not tool palettes are kept verbatim so foreign
//! data in the file survives a save.

use crate::paths::{default_palettes_path, expand_tilde};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use swatchbook_types::{StyleSnapshot, ToolType};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors surfaced by palette store operations.
#[derive(Debug, Error)]
pub enum PaletteStoreError {
    /// I/O failure while reading or writing the palette file.
    #[error("palette store I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The palette file could not be encoded or decoded.
    #[error("palette store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Saved styles for one tool, keyed by palette name in insertion order.
pub type Palette = IndexMap<String, PaletteEntry>;

/// One named value inside a tool palette.
///
/// Anything that is not a JSON object cannot be a snapshot; it is carried
/// along untouched so its siblings stay usable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaletteEntry {
    Snapshot(StyleSnapshot),
    Foreign(Value),
}

impl PaletteEntry {
    pub fn snapshot(&self) -> Option<&StyleSnapshot> {
        match self {
            Self::Snapshot(snapshot) => Some(snapshot),
            Self::Foreign(_) => None,
        }
    }
}

/// In-memory image of the persisted palette document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaletteBook {
    entries: IndexMap<String, BookEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum BookEntry {
    Palette(Palette),
    Foreign(Value),
}

impl PaletteBook {
    /// Palette for `tool`, if anything was ever saved under it.
    pub fn palette(&self, tool: ToolType) -> Option<&Palette> {
        match self.entries.get(tool.as_str()) {
            Some(BookEntry::Palette(palette)) => Some(palette),
            _ => None,
        }
    }

    pub fn get(&self, tool: ToolType, name: &str) -> Option<&StyleSnapshot> {
        self.palette(tool)
            .and_then(|palette| palette.get(name))
            .and_then(PaletteEntry::snapshot)
    }

    /// Names holding a usable snapshot for `tool`, in insertion order.
    pub fn names(&self, tool: ToolType) -> Vec<String> {
        self.palette(tool)
            .map(|palette| {
                palette
                    .iter()
                    .filter(|(_, entry)| entry.snapshot().is_some())
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Stores `snapshot` under `name`, replacing any snapshot already there.
    pub fn upsert(&mut self, tool: ToolType, name: &str, snapshot: StyleSnapshot) {
        let entry = self
            .entries
            .entry(tool.as_str().to_string())
            .or_insert_with(|| BookEntry::Palette(Palette::new()));
        let entry_snapshot = PaletteEntry::Snapshot(snapshot);
        match entry {
            BookEntry::Palette(palette) => {
                palette.insert(name.to_string(), entry_snapshot);
            }
            BookEntry::Foreign(value) => {
                warn!(tool = %tool, found = %value, "Replacing malformed palette entry");
                *entry = BookEntry::Palette(Palette::from([(name.to_string(), entry_snapshot)]));
            }
        }
    }

    /// Removes `name` from `tool`'s palette. Returns whether a snapshot was removed.
    pub fn remove(&mut self, tool: ToolType, name: &str) -> bool {
        match self.entries.get_mut(tool.as_str()) {
            Some(BookEntry::Palette(palette)) if palette.get(name).is_some_and(|entry| entry.snapshot().is_some()) => {
                palette.shift_remove(name).is_some()
            }
            _ => false,
        }
    }
}

/// Shared trait implemented by palette persistence backends.
///
/// Lookups never touch storage. Mutations update the in-memory book and then
/// flush it exactly once; when the flush fails the in-memory book keeps the
/// change and the error is returned to the caller.
pub trait PaletteStore: Send + Sync {
    /// Snapshot saved as `name` for `tool`.
    fn get(&self, tool: ToolType, name: &str) -> Option<StyleSnapshot>;

    /// Names saved for `tool`, in insertion order. Empty for untouched tools.
    fn list_names(&self, tool: ToolType) -> Vec<String>;

    /// Saves `snapshot` as `name`, overwriting an existing palette of that name.
    fn save(&self, tool: ToolType, name: &str, snapshot: StyleSnapshot) -> Result<(), PaletteStoreError>;

    /// Deletes `name` from `tool`'s palette. Returns `false` (and writes
    /// nothing) when no such palette exists.
    fn delete(&self, tool: ToolType, name: &str) -> Result<bool, PaletteStoreError>;
}

/// JSON-backed palette store persisted on disk.
pub struct JsonPaletteStore {
    path: PathBuf,
    book: Mutex<PaletteBook>,
}

impl JsonPaletteStore {
    /// Loads the store from `path` (or the default path when omitted).
    ///
    /// A missing or empty file yields an empty store. A file that exists but
    /// does not hold a palette document is an error rather than being
    /// silently replaced on the next save.
    pub fn load<P: Into<Option<PathBuf>>>(path: P) -> Result<Self, PaletteStoreError> {
        let resolved_path = match path.into() {
            Some(path) => expand_tilde(&path.to_string_lossy()),
            None => default_palettes_path(),
        };

        let book = load_palette_book(&resolved_path)?;
        debug!(
            path = %resolved_path.display(),
            tools = book.entries.len(),
            "Loaded palette store"
        );
        Ok(Self {
            path: resolved_path,
            book: Mutex::new(book),
        })
    }

    /// Access the underlying palette file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush_locked(&self, book: &PaletteBook) -> Result<(), PaletteStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(book)?;
        fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), "Flushed palette store");
        Ok(())
    }
}

impl PaletteStore for JsonPaletteStore {
    fn get(&self, tool: ToolType, name: &str) -> Option<StyleSnapshot> {
        lock(&self.book).get(tool, name).cloned()
    }

    fn list_names(&self, tool: ToolType) -> Vec<String> {
        lock(&self.book).names(tool)
    }

    fn save(&self, tool: ToolType, name: &str, snapshot: StyleSnapshot) -> Result<(), PaletteStoreError> {
        let mut book = lock(&self.book);
        book.upsert(tool, name, snapshot);
        self.flush_locked(&book)
    }

    fn delete(&self, tool: ToolType, name: &str) -> Result<bool, PaletteStoreError> {
        let mut book = lock(&self.book);
        if !book.remove(tool, name) {
            return Ok(false);
        }
        self.flush_locked(&book)?;
        Ok(true)
    }
}

/// In-memory palette store primarily used for unit testing and embedding.
#[derive(Default)]
pub struct InMemoryPaletteStore {
    book: Mutex<PaletteBook>,
}

impl InMemoryPaletteStore {
    /// Create an empty in-memory palette store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current book contents.
    pub fn book(&self) -> PaletteBook {
        lock(&self.book).clone()
    }
}

impl PaletteStore for InMemoryPaletteStore {
    fn get(&self, tool: ToolType, name: &str) -> Option<StyleSnapshot> {
        lock(&self.book).get(tool, name).cloned()
    }

    fn list_names(&self, tool: ToolType) -> Vec<String> {
        lock(&self.book).names(tool)
    }

    fn save(&self, tool: ToolType, name: &str, snapshot: StyleSnapshot) -> Result<(), PaletteStoreError> {
        lock(&self.book).upsert(tool, name, snapshot);
        Ok(())
    }

    fn delete(&self, tool: ToolType, name: &str) -> Result<bool, PaletteStoreError> {
        Ok(lock(&self.book).remove(tool, name))
    }
}

fn lock(book: &Mutex<PaletteBook>) -> MutexGuard<'_, PaletteBook> {
    book.lock().unwrap_or_else(PoisonError::into_inner)
}

fn load_palette_book(path: &Path) -> Result<PaletteBook, PaletteStoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(PaletteBook::default()),
        Err(error) => return Err(PaletteStoreError::Io(error)),
    };
    if content.trim().is_empty() {
        return Ok(PaletteBook::default());
    }
    // A literal `null` is what an empty store looks like to some hosts.
    let book: Option<PaletteBook> = serde_json::from_str(&content)?;
    Ok(book.unwrap_or_default())
}
