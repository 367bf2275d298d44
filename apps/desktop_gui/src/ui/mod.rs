//! UI layer for desktop GUI: app shell, study panel, chat and composer.

pub mod app;

pub use app::{StartupConfig, StudyGuiApp};
