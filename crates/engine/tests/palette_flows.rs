use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use swatchbook_engine::{
    InMemoryLiveState, LiveStateSource, LoadFlow, LoadFlowState, PaletteController, PaletteError, SaveFlow, SceneFileSource,
    ToolOverride,
};
use swatchbook_types::{StyleAttribute, StyleSnapshot, StyleValue, ToolType};
use swatchbook_util::{JsonPaletteStore, PaletteStore, PaletteStoreError};

fn write_scene(path: &Path, app_state: Value) {
    let scene = json!({
        "type": "excalidraw",
        "version": 2,
        "source": "https://excalidraw.com",
        "elements": [],
        "appState": app_state
    });
    fs::write(path, serde_json::to_string_pretty(&scene).unwrap()).unwrap();
}

#[test]
fn names_are_scoped_to_the_current_tool() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonPaletteStore::load(Some(dir.path().join("palettes.json"))).unwrap());
    let live = Arc::new(InMemoryLiveState::with_active_tool("rectangle"));
    let controller = PaletteController::new(store.clone(), live.clone());

    store
        .save(ToolType::Rectangle, "bold", StyleSnapshot::default().with(StyleAttribute::StrokeColor, "#000"))
        .unwrap();

    assert_eq!(controller.current_palette_names().unwrap(), vec!["bold"]);
    live.select_tool("ellipse");
    assert!(controller.current_palette_names().unwrap().is_empty());
}

#[test]
fn saved_styles_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("palettes.json");
    let live = Arc::new(InMemoryLiveState::with_active_tool("arrow"));
    live.set_state(
        json!({ "currentItemEndArrowhead": "triangle", "currentItemStrokeStyle": "dashed" })
            .as_object()
            .cloned()
            .unwrap(),
    )
    .unwrap();

    {
        let store = Arc::new(JsonPaletteStore::load(Some(store_path.clone())).unwrap());
        let controller = PaletteController::new(store, live.clone());
        let mut flow = SaveFlow::open(controller).unwrap();
        flow.submit("pointer").unwrap();
    }

    let store = JsonPaletteStore::load(Some(store_path)).unwrap();
    let snapshot = store.get(ToolType::Arrow, "pointer").unwrap();
    assert_eq!(snapshot.get(StyleAttribute::EndArrowhead), Some(&StyleValue::from("triangle")));
    assert_eq!(snapshot.get(StyleAttribute::StrokeStyle), Some(&StyleValue::from("dashed")));
}

#[test]
fn load_flow_removal_keeps_flow_open() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonPaletteStore::load(Some(dir.path().join("palettes.json"))).unwrap());
    let live = Arc::new(InMemoryLiveState::with_active_tool("rectangle"));
    let controller = PaletteController::new(store, live);
    controller.save_current("bold").unwrap();
    controller.save_current("thin").unwrap();

    let mut flow = LoadFlow::open(controller.clone()).unwrap();
    flow.remove("bold").unwrap();

    assert_eq!(flow.state(), &LoadFlowState::Listing);
    assert_eq!(flow.items(), ["thin"]);
    assert_eq!(controller.current_palette_names().unwrap(), vec!["thin"]);
}

#[test]
fn removal_leaves_the_list_even_when_the_flush_fails() {
    let dir = tempfile::tempdir().unwrap();
    let parent = dir.path().join("store");
    let store = Arc::new(JsonPaletteStore::load(Some(parent.join("palettes.json"))).unwrap());
    let live = Arc::new(InMemoryLiveState::with_active_tool("diamond"));
    let controller = PaletteController::new(store.clone(), live);
    controller.save_current("gem").unwrap();
    controller.save_current("flat").unwrap();

    let mut flow = LoadFlow::open(controller.clone()).unwrap();
    fs::remove_dir_all(&parent).unwrap();
    fs::write(&parent, "").unwrap();

    let removed = flow.remove("gem");
    assert!(matches!(removed, Err(PaletteError::Persistence(PaletteStoreError::Io(_)))));
    assert!(flow.is_open());
    assert_eq!(flow.items(), ["flat"]);
    assert_eq!(store.list_names(ToolType::Diamond), vec!["flat"]);
    assert_eq!(controller.current_palette_names().unwrap(), vec!["flat"]);
}

#[test]
fn applies_a_palette_to_a_scene_file() {
    let dir = tempfile::tempdir().unwrap();
    let scene_path = dir.path().join("board.excalidraw");
    write_scene(
        &scene_path,
        json!({
            "viewBackgroundColor": "#ffffff",
            "currentItemStrokeColor": "#1e1e1e",
            "currentItemRoughness": 1,
            "currentItemFontFamily": 1
        }),
    );

    let store = Arc::new(JsonPaletteStore::load(Some(dir.path().join("palettes.json"))).unwrap());
    store
        .save(
            ToolType::Text,
            "handwritten",
            StyleSnapshot::default()
                .with(StyleAttribute::FontFamily, 2_i64)
                .with(StyleAttribute::StrokeColor, "#c2255c"),
        )
        .unwrap();

    let live = Arc::new(ToolOverride::new(SceneFileSource::new(&scene_path), ToolType::Text));
    let controller = PaletteController::new(store, live);
    let mut flow = LoadFlow::open(controller).unwrap();
    assert_eq!(flow.heading(), "Pick style for text tool");
    flow.apply("handwritten").unwrap();

    let written: Value = serde_json::from_str(&fs::read_to_string(&scene_path).unwrap()).unwrap();
    assert_eq!(
        written["appState"],
        json!({
            "viewBackgroundColor": "#ffffff",
            "currentItemStrokeColor": "#c2255c",
            "currentItemRoughness": 1,
            "currentItemFontFamily": 2
        })
    );
    assert_eq!(written["source"], json!("https://excalidraw.com"));
}

#[test]
fn blank_names_never_touch_the_palette_file() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("palettes.json");
    let store = Arc::new(JsonPaletteStore::load(Some(store_path.clone())).unwrap());
    let live = Arc::new(InMemoryLiveState::with_active_tool("rectangle"));
    let controller = PaletteController::new(store, live);

    let mut flow = SaveFlow::open(controller).unwrap();
    flow.submit("").unwrap();
    flow.submit("   ").unwrap();

    assert!(flow.is_open());
    assert!(!store_path.exists());
}

#[test]
fn unreadable_palette_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("palettes.json");
    fs::write(&store_path, "{ not json").unwrap();

    assert!(JsonPaletteStore::load(Some(store_path)).is_err());
}
