use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Tunables of the motion controller. Defaults reproduce the stock pet.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MotionConfig {
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "tick_interval_ms")]
    pub tick_interval: Duration,
    pub base_width: f64,
    pub base_height: f64,
    /// Initial free-fly velocity, pixels per tick.
    pub fly_speed_x: f64,
    pub fly_speed_y: f64,
    /// Beyond this distance the pet glides towards the cursor, within it the pet orbits.
    pub follow_threshold: f64,
    pub follow_factor: f64,
    pub orbit_radius: f64,
    /// Radians per tick.
    pub orbit_step: f64,
    /// Gap between the pet and the right/bottom work-area edges at start-up.
    pub home_margin_x: f64,
    pub home_margin_y: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(16),
            base_width: 280.0,
            base_height: 380.0,
            fly_speed_x: 3.0,
            fly_speed_y: 2.0,
            follow_threshold: 80.0,
            follow_factor: 0.02,
            orbit_radius: 60.0,
            orbit_step: 0.026,
            home_margin_x: 20.0,
            home_margin_y: 80.0,
        }
    }
}

impl MotionConfig {
    /// Checks the ranges the motion code relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::Invalid { field, reason })
            }
        }
        let finite = |v: f64| v.is_finite();

        check(
            self.tick_interval >= Duration::from_millis(1),
            "tick_interval_ms",
            "must be at least 1",
        )?;
        check(
            finite(self.base_width) && self.base_width > 0.0,
            "base_width",
            "must be a positive number",
        )?;
        check(
            finite(self.base_height) && self.base_height > 0.0,
            "base_height",
            "must be a positive number",
        )?;
        check(
            finite(self.fly_speed_x) && finite(self.fly_speed_y),
            "fly_speed",
            "must be finite",
        )?;
        check(
            finite(self.follow_factor) && self.follow_factor > 0.0 && self.follow_factor <= 1.0,
            "follow_factor",
            "must be in (0, 1]",
        )?;
        check(
            finite(self.follow_threshold) && self.follow_threshold >= 0.0,
            "follow_threshold",
            "must not be negative",
        )?;
        check(
            finite(self.orbit_radius) && self.orbit_radius >= 0.0,
            "orbit_radius",
            "must not be negative",
        )?;
        check(finite(self.orbit_step), "orbit_step", "must be finite")?;
        check(
            finite(self.home_margin_x) && finite(self.home_margin_y),
            "home_margin",
            "must be finite",
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Image drawn as the pet. Without one a built-in character is painted.
    pub sprite: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub motion: MotionConfig,
    pub appearance: AppearanceConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "deskpet", "deskpet").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("DESKPET")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.motion.validate()?;
    Ok(config)
}

pub fn load_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        log::warn!("Using default configuration: {}", e);
        Config::default()
    })
}

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let Some(config_dir) = config_path.parent().map(|p| p.to_path_buf()) else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }
    log::debug!("Watching {}", config_dir.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let touches_config = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                ) && event.paths.iter().any(|p| p == &config_path);

                if touches_config && tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
