use crate::live_state::{LiveStateError, LiveStateSource};
use swatchbook_types::{StateObject, StyleAttribute, StyleSnapshot};
use tracing::trace;

/// Captures the current style attributes from `source`.
///
/// Fails only when the live state cannot be read.
pub fn extract(source: &dyn LiveStateSource) -> Result<StyleSnapshot, LiveStateError> {
    let state = source.get_state()?;
    Ok(extract_from_state(&state))
}

/// Copies every style attribute present in `state` verbatim. Attributes the
/// state does not carry are left out of the snapshot; an explicit `null` is
/// kept as one.
pub fn extract_from_state(state: &StateObject) -> StyleSnapshot {
    let snapshot = StyleAttribute::ALL
        .iter()
        .fold(StyleSnapshot::default(), |snapshot, &attribute| match state.get(attribute.key()) {
            Some(value) => snapshot.with(attribute, value.clone()),
            None => snapshot,
        });
    trace!(captured = snapshot.len(), "Extracted style snapshot");
    snapshot
}
