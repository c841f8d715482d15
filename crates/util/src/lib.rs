//! Storage and configuration helpers shared by the Swatchbook crates.

pub mod palette_store;
pub mod paths;

pub use palette_store::{
    InMemoryPaletteStore, JsonPaletteStore, Palette, PaletteBook, PaletteEntry, PaletteStore, PaletteStoreError,
};
pub use paths::{expand_tilde, resolve_palettes_path, resolve_scene_path};
