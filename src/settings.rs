//! Application settings storage

use crate::error::BubbleError;
use crate::layout::Insets;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Theme (dark/light)
    pub theme: Theme,

    /// Bubble shape settings
    pub bubble: BubbleSettings,

    /// Link interaction timing
    pub interaction: InteractionSettings,

    /// Content sizing
    pub layout: LayoutSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            bubble: BubbleSettings::default(),
            interaction: InteractionSettings::default(),
            layout: LayoutSettings::default(),
        }
    }
}

/// Theme options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Self::Dark
    }
}

/// Bubble shape settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleSettings {
    /// Corner radius requested for every bubble
    pub corner_radius: f32,

    /// Border width of text bubbles. Should not exceed the corner radius.
    pub border_width: f32,

    /// Border width of image bubbles
    pub image_border_width: f32,

    /// Clip image content to the bubble outline
    pub mask_images: bool,
}

impl Default for BubbleSettings {
    fn default() -> Self {
        Self {
            corner_radius: 16.0,
            border_width: 0.0,
            image_border_width: 4.0,
            mask_images: true,
        }
    }
}

/// Link interaction timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Delay before a link highlight is cleared (milliseconds)
    pub highlight_clear_ms: u64,

    /// Delay before the message copy menu is shown (milliseconds)
    pub menu_delay_ms: u64,
}

impl InteractionSettings {
    pub fn highlight_clear_delay(&self) -> Duration {
        Duration::from_millis(self.highlight_clear_ms)
    }

    pub fn menu_delay(&self) -> Duration {
        Duration::from_millis(self.menu_delay_ms)
    }
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            highlight_clear_ms: 400,
            menu_delay_ms: 100,
        }
    }
}

/// Content sizing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Share of the available width a text bubble may use
    pub text_width_fraction: f32,

    /// Padding between the bubble outline and the text
    pub text_insets: Insets,

    /// Share of the screen width an image bubble uses
    pub image_width_fraction: f32,

    /// Maximum image height as a multiple of the image width cap
    pub image_height_factor: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            text_width_fraction: 0.90,
            text_insets: Insets::default(),
            image_width_fraction: 2.0 / 3.0,
            image_height_factor: 2.0,
        }
    }
}

/// Settings repository
pub struct SettingsRepository {
    settings_path: PathBuf,
    settings: Settings,
}

impl SettingsRepository {
    /// Create a repository backed by `settings.json` inside `config_dir`
    pub fn new(config_dir: &Path) -> Self {
        let settings_path = config_dir.join("settings.json");

        let settings = if settings_path.exists() {
            std::fs::read_to_string(&settings_path)
                .ok()
                .and_then(|content| match serde_json::from_str(&content) {
                    Ok(settings) => Some(settings),
                    Err(e) => {
                        tracing::warn!("Ignoring unreadable settings {:?}: {}", settings_path, e);
                        None
                    }
                })
                .unwrap_or_default()
        } else {
            Settings::default()
        };

        Self {
            settings_path,
            settings,
        }
    }

    /// Open the repository in the platform config directory
    pub fn open_default() -> Result<Self, BubbleError> {
        let project_dirs = ProjectDirs::from("org", "chat-bubbles", "ChatBubbles")
            .ok_or(BubbleError::NoConfigDir)?;

        let config_dir = project_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        tracing::info!("Settings directory: {:?}", config_dir);

        Ok(Self::new(config_dir))
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Get mutable settings
    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Save settings
    pub fn save(&self) -> Result<(), BubbleError> {
        let content = serde_json::to_string_pretty(&self.settings)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    /// Reset to defaults
    pub fn reset(&mut self) {
        self.settings = Settings::default();
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let repo = SettingsRepository::new(dir.path());
        assert_eq!(repo.get(), &Settings::default());
        assert_eq!(repo.get().interaction.highlight_clear_delay(), Duration::from_millis(400));
        assert_eq!(repo.get().interaction.menu_delay(), Duration::from_millis(100));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let mut repo = SettingsRepository::new(dir.path());
        repo.get_mut().bubble.corner_radius = 12.0;
        repo.get_mut().theme = Theme::Light;
        repo.save().unwrap();

        let reloaded = SettingsRepository::new(dir.path());
        assert_eq!(reloaded.get().bubble.corner_radius, 12.0);
        assert_eq!(reloaded.get().theme, Theme::Light);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{ "interaction": { "highlight_clear_ms": 250 } }"#,
        )
        .unwrap();

        let repo = SettingsRepository::new(dir.path());
        assert_eq!(repo.get().interaction.highlight_clear_ms, 250);
        assert_eq!(repo.get().interaction.menu_delay_ms, 100);
        assert_eq!(repo.get().layout, LayoutSettings::default());
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "not json").unwrap();

        let mut repo = SettingsRepository::new(dir.path());
        assert_eq!(repo.get(), &Settings::default());

        repo.get_mut().bubble.border_width = 2.0;
        repo.reset();
        assert_eq!(repo.get().bubble.border_width, 0.0);
    }
}
