//! UI layer for desktop GUI: app shell, step panels, chart, and theme.

pub mod app;
pub mod chart;
pub mod panels;
pub mod theme;

pub use app::{PersistedSettings, TwinTrainerApp, APP_TITLE, SETTINGS_STORAGE_KEY};
