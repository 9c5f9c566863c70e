//! Configuration module for Reelsmith.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    FootageSettings, GeneralSettings, RenderSettings, ServerSettings, Settings, SpeechEngine,
    SpeechSettings,
};
