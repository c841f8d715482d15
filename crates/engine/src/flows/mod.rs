//! Headless save and load flows.
//!
//! Each flow models one modal interaction: it is opened for the tool active
//! at that moment, accepts user actions, and ends in a terminal state. A host
//! UI renders the flow and forwards events; it never talks to the store
//! directly.

pub mod load;
pub mod save;

pub use load::{LoadFlow, LoadFlowState};
pub use save::{SaveFlow, SaveFlowState};
