//! The `key=value` settings file. Lines starting with `#` are comments;
//! unknown keys are ignored with a warning so older builds can read
//! newer files. Out-of-range values are clamped, never rejected.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub sound_volume: i64,
    pub sound_enabled: bool,
    pub music_volume: i64,
    pub music_enabled: bool,
    pub show_damage_numbers: bool,
    pub auto_advance_dialogue: bool,
    pub tutorial_hints: bool,
    pub show_fps: bool,
    pub screen_shake: bool,
    pub ui_scale: f64,
    pub fullscreen: bool,
    pub vsync: bool,
    pub resolution_index: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_volume: 80,
            sound_enabled: true,
            music_volume: 60,
            music_enabled: true,
            show_damage_numbers: true,
            auto_advance_dialogue: false,
            tutorial_hints: true,
            show_fps: false,
            screen_shake: true,
            ui_scale: 1.0,
            fullscreen: false,
            vsync: true,
            resolution_index: 0,
        }
    }
}

impl Settings {
    /// A missing file is not an error: first launch gets defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("settings: {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;

        let mut settings = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                log::warn!("settings: skipping malformed line `{line}`");
                continue;
            };
            settings.apply(key.trim(), value.trim());
        }
        settings.clamp();
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut out = String::from("# pontoon settings\n");
        out.push_str(&format!("sound_volume={}\n", self.sound_volume));
        out.push_str(&format!("sound_enabled={}\n", self.sound_enabled));
        out.push_str(&format!("music_volume={}\n", self.music_volume));
        out.push_str(&format!("music_enabled={}\n", self.music_enabled));
        out.push_str(&format!(
            "show_damage_numbers={}\n",
            self.show_damage_numbers
        ));
        out.push_str(&format!(
            "auto_advance_dialogue={}\n",
            self.auto_advance_dialogue
        ));
        out.push_str(&format!("tutorial_hints={}\n", self.tutorial_hints));
        out.push_str(&format!("show_fps={}\n", self.show_fps));
        out.push_str(&format!("screen_shake={}\n", self.screen_shake));
        out.push_str(&format!("ui_scale={}\n", self.ui_scale));
        out.push_str(&format!("fullscreen={}\n", self.fullscreen));
        out.push_str(&format!("vsync={}\n", self.vsync));
        out.push_str(&format!("resolution_index={}\n", self.resolution_index));
        fs::write(path, out)
            .with_context(|| format!("writing settings file {}", path.display()))
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "sound_volume" => parse_int(key, value, &mut self.sound_volume),
            "sound_enabled" => parse_bool(key, value, &mut self.sound_enabled),
            "music_volume" => parse_int(key, value, &mut self.music_volume),
            "music_enabled" => parse_bool(key, value, &mut self.music_enabled),
            "show_damage_numbers" => parse_bool(key, value, &mut self.show_damage_numbers),
            "auto_advance_dialogue" => parse_bool(key, value, &mut self.auto_advance_dialogue),
            "tutorial_hints" => parse_bool(key, value, &mut self.tutorial_hints),
            "show_fps" => parse_bool(key, value, &mut self.show_fps),
            "screen_shake" => parse_bool(key, value, &mut self.screen_shake),
            "ui_scale" => parse_float(key, value, &mut self.ui_scale),
            "fullscreen" => parse_bool(key, value, &mut self.fullscreen),
            "vsync" => parse_bool(key, value, &mut self.vsync),
            "resolution_index" => parse_int(key, value, &mut self.resolution_index),
            unknown => log::warn!("settings: ignoring unknown key `{unknown}`"),
        }
    }

    fn clamp(&mut self) {
        self.sound_volume = self.sound_volume.clamp(0, 100);
        self.music_volume = self.music_volume.clamp(0, 100);
        self.ui_scale = self.ui_scale.clamp(0.5, 2.0);
        self.resolution_index = self.resolution_index.max(0);
    }
}

fn parse_int(key: &str, value: &str, slot: &mut i64) {
    match value.parse() {
        Ok(parsed) => *slot = parsed,
        Err(_) => log::warn!("settings: `{key}` expects an integer, got `{value}`"),
    }
}

fn parse_float(key: &str, value: &str, slot: &mut f64) {
    match value.parse() {
        Ok(parsed) => *slot = parsed,
        Err(_) => log::warn!("settings: `{key}` expects a number, got `{value}`"),
    }
}

fn parse_bool(key: &str, value: &str, slot: &mut bool) {
    match value {
        "true" | "1" => *slot = true,
        "false" | "0" => *slot = false,
        other => log::warn!("settings: `{key}` expects a boolean, got `{other}`"),
    }
}
