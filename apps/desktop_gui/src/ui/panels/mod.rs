//! One panel per wizard step. Panels read state and report [`ViewAction`]s;
//! only the twin picker edits its own form fields in place.
//!
//! [`ViewAction`]: crate::controller::events::ViewAction

pub mod match_result;
pub mod planner;
pub mod simulation;
pub mod twin_picker;
