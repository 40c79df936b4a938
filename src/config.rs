use crate::direction::Direction;
use log::{info, warn};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub maze: MazeConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct MazeConfig {
    #[serde(default = "default_layout_path")]
    pub layout_path: String,
}

#[derive(Debug, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_start_x")]
    pub start_x: i32,
    #[serde(default = "default_start_y")]
    pub start_y: i32,
    #[serde(default = "default_direction")]
    pub direction: Direction,
}

#[derive(Debug, Deserialize)]
pub struct RunConfig {
    /// 0 picks four ticks per grid cell
    #[serde(default)]
    pub tick_budget: u64,
}

#[derive(Debug, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default = "default_steps_per_second")]
    pub steps_per_second: f32,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
    #[serde(default = "default_show_legend")]
    pub show_legend: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_enable_step_log")]
    pub enable_step_log: bool,
    #[serde(default = "default_step_log_path")]
    pub step_log_path: String,
    #[serde(default = "default_echo_render")]
    pub echo_render: bool,
}

// Default values
fn default_layout_path() -> String { "mazes/default.txt".to_string() }
fn default_start_x() -> i32 { 1 }
fn default_start_y() -> i32 { 0 }
fn default_direction() -> Direction { Direction::South }
fn default_window_title() -> String { "mazewalk - Wall Follower".to_string() }
fn default_cell_size() -> f32 { 32.0 }
fn default_steps_per_second() -> f32 { 4.0 }
fn default_bg_r() -> u8 { 30 }
fn default_bg_g() -> u8 { 30 }
fn default_bg_b() -> u8 { 30 }
fn default_show_legend() -> bool { true }
fn default_level() -> String { "info".to_string() }
fn default_enable_step_log() -> bool { true }
fn default_step_log_path() -> String { "step_log.json".to_string() }
fn default_echo_render() -> bool { true }

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            layout_path: default_layout_path(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            start_x: default_start_x(),
            start_y: default_start_y(),
            direction: default_direction(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { tick_budget: 0 }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            cell_size: default_cell_size(),
            steps_per_second: default_steps_per_second(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
            show_legend: default_show_legend(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            enable_step_log: default_enable_step_log(),
            step_log_path: default_step_log_path(),
            echo_render: default_echo_render(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            maze: MazeConfig::default(),
            agent: AgentConfig::default(),
            run: RunConfig::default(),
            visual: VisualConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Self {
        Self::load_from("config.toml")
    }

    pub fn load_from(path: &str) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", path, e);
                    warn!("Using default configuration");
                    Config::default()
                }
            },
            Err(_) => {
                info!("No {} found, using default configuration", path);
                Config::default()
            }
        }
    }

    /// `logging.level` as a filter, defaulting to Info
    pub fn log_level(&self) -> log::LevelFilter {
        self.logging.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
