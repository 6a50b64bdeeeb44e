use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::audio::CUE_DEFAULT_ADDR;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub globe: GlobeConfig,
    #[serde(default)]
    pub audio: AudioConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Interaction variant: "carousel" or "overwatch"
    #[serde(default = "default_variant")]
    pub variant: String,
    /// Target processing rate (frames per second)
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GlobeConfig {
    /// Initial center latitude (degrees)
    #[serde(default = "default_lat")]
    pub lat: f32,
    /// Initial center longitude (degrees)
    #[serde(default = "default_lng")]
    pub lng: f32,
    /// Initial zoom scale
    #[serde(default = "default_scale")]
    pub scale: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AudioConfig {
    /// Send OSC cues to the synth
    #[serde(default)]
    pub enabled: bool,
    /// Cue synth UDP address
    #[serde(default = "default_audio_addr")]
    pub addr: String,
}

fn default_variant() -> String { "carousel".to_string() }
fn default_target_fps() -> u32 { 30 }
fn default_lat() -> f32 { 19.0760 }
fn default_lng() -> f32 { 72.8777 }
fn default_scale() -> f32 { 1.5 }
fn default_audio_addr() -> String { CUE_DEFAULT_ADDR.to_string() }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            variant: default_variant(),
            target_fps: default_target_fps(),
        }
    }
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            lat: default_lat(),
            lng: default_lng(),
            scale: default_scale(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: default_audio_addr(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is missing
    /// or unreadable.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_default()
    }
}
