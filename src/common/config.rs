use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub fn config_file() -> PathBuf { dirs::home_dir().unwrap().join(".shove.toml") }

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub timings: Timings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Process-name substrings (case-insensitive) of apps whose windows have
    /// no title bar, so the drag must grab the top edge instead. Only
    /// consulted when the accessibility probe cannot answer.
    #[serde(default = "default_borderless_apps")]
    pub borderless_apps: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            borderless_apps: default_borderless_apps(),
        }
    }
}

fn default_borderless_apps() -> Vec<String> {
    ["alacritty", "ghostty", "kitty"].map(String::from).to_vec()
}

/// Settle durations between synthesis phases, in milliseconds. The window
/// manager only recognizes the gesture when each phase has time to register,
/// so these are floors tuned against Mission Control, not polish.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Timings {
    /// Pause before the gesture starts so the user can let go of the mouse.
    #[serde(default = "default_grace_ms")]
    pub grace_ms: u64,
    /// After warping the pointer to the drag anchor.
    #[serde(default = "default_warp_ms")]
    pub warp_ms: u64,
    /// After pressing the button, before the window manager owns the drag.
    #[serde(default = "default_press_ms")]
    pub press_ms: u64,
    /// After the small confirming drag movement.
    #[serde(default = "default_drag_ms")]
    pub drag_ms: u64,
    /// Between key-down and key-up of the switch shortcut.
    #[serde(default = "default_switch_tap_ms")]
    pub switch_tap_ms: u64,
    /// After the shortcut, while the space-switch animation runs.
    #[serde(default = "default_switch_ms")]
    pub switch_ms: u64,
    /// After releasing the button, while the drop animation runs.
    #[serde(default = "default_release_ms")]
    pub release_ms: u64,
}

fn default_grace_ms() -> u64 { 500 }
fn default_warp_ms() -> u64 { 150 }
fn default_press_ms() -> u64 { 250 }
fn default_drag_ms() -> u64 { 150 }
fn default_switch_tap_ms() -> u64 { 50 }
fn default_switch_ms() -> u64 { 400 }
fn default_release_ms() -> u64 { 300 }

impl Default for Timings {
    fn default() -> Self {
        Timings {
            grace_ms: default_grace_ms(),
            warp_ms: default_warp_ms(),
            press_ms: default_press_ms(),
            drag_ms: default_drag_ms(),
            switch_tap_ms: default_switch_tap_ms(),
            switch_ms: default_switch_ms(),
            release_ms: default_release_ms(),
        }
    }
}

impl Timings {
    pub fn grace(&self) -> Duration { Duration::from_millis(self.grace_ms) }

    pub fn warp(&self) -> Duration { Duration::from_millis(self.warp_ms) }

    pub fn press(&self) -> Duration { Duration::from_millis(self.press_ms) }

    pub fn drag(&self) -> Duration { Duration::from_millis(self.drag_ms) }

    pub fn switch_tap(&self) -> Duration { Duration::from_millis(self.switch_tap_ms) }

    pub fn switch(&self) -> Duration { Duration::from_millis(self.switch_ms) }

    pub fn release(&self) -> Duration { Duration::from_millis(self.release_ms) }

    #[cfg(test)]
    pub fn instant() -> Timings {
        Timings {
            grace_ms: 0,
            warp_ms: 0,
            press_ms: 0,
            drag_ms: 0,
            switch_tap_ms: 0,
            switch_ms: 0,
            release_ms: 0,
        }
    }
}

const MAX_SETTLE_MS: u64 = 5000;

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Config::parse(&buf)
    }

    fn parse(buf: &str) -> anyhow::Result<Config> {
        let config: Config = toml::from_str(buf)?;
        Ok(config)
    }

    /// Non-fatal configuration issues, reported as warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for (index, app) in self.settings.borderless_apps.iter().enumerate() {
            if app.trim().is_empty() {
                issues.push(format!("borderless_apps[{index}] is empty and matches nothing"));
            }
        }

        let settles = [
            ("warp_ms", self.timings.warp_ms),
            ("press_ms", self.timings.press_ms),
            ("drag_ms", self.timings.drag_ms),
            ("switch_tap_ms", self.timings.switch_tap_ms),
            ("switch_ms", self.timings.switch_ms),
            ("release_ms", self.timings.release_ms),
        ];
        for (name, ms) in settles {
            if ms > MAX_SETTLE_MS {
                issues.push(format!("{name} = {ms} makes the gesture sluggish (max {MAX_SETTLE_MS})"));
            }
        }
        if self.timings.switch_ms < 100 {
            issues.push(format!(
                "switch_ms = {} risks releasing the window before the space switch completes",
                self.timings.switch_ms
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_config_parses() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn overrides_parse() {
        let config = Config::parse(
            r#"
            [settings]
            borderless_apps = ["wezterm"]

            [timings]
            press_ms = 300
            "#,
        )
        .unwrap();
        assert_eq!(config.settings.borderless_apps, vec!["wezterm".to_string()]);
        assert_eq!(config.timings.press_ms, 300);
        // Unset fields keep their defaults.
        assert_eq!(config.timings.switch_ms, 400);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("[settings]\nborderles_apps = []\n").is_err());
        assert!(Config::parse("[smoothing]\n").is_err());
    }

    #[test]
    fn validate_flags_degenerate_values() {
        let mut config = Config::default();
        assert!(config.validate().is_empty());

        config.timings.switch_ms = 10;
        config.settings.borderless_apps.push("  ".to_string());
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|issue| issue.contains("switch_ms")));
        assert!(issues.iter().any(|issue| issue.contains("borderless_apps[3]")));
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shove.toml");
        std::fs::write(&path, "[timings]\ngrace_ms = 0\n").unwrap();

        let config = Config::read(&path).unwrap();
        assert_eq!(config.timings.grace_ms, 0);
        assert!(Config::read(&dir.path().join("missing.toml")).is_err());
    }
}
