//! Controller layer: UI events, wizard transitions, view state, and command orchestration.

pub mod events;
pub mod orchestration;
pub mod reducer;
pub mod view_state;
pub mod wizard;
