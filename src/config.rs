use std::{env, path::PathBuf, time::Duration};

/// Fixed delays the controllers schedule work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub clock_period: Duration,
    pub quick_action_delay: Duration,
    pub notification_duration: Duration,
    pub notification_exit: Duration,
    pub section_fade_out: Duration,
    pub section_show: Duration,
    pub section_fade_in: Duration,
    pub focus_release: Duration,
    pub announcement: Duration,
    pub resize_debounce: Duration,
    pub orientation_settle: Duration,
    /// Widest viewport, in CSS pixels, that still uses the mobile menu.
    pub mobile_breakpoint: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            clock_period: Duration::from_secs(30),
            quick_action_delay: Duration::from_millis(1000),
            notification_duration: Duration::from_millis(5000),
            notification_exit: Duration::from_millis(300),
            section_fade_out: Duration::from_millis(150),
            section_show: Duration::from_millis(200),
            section_fade_in: Duration::from_millis(50),
            focus_release: Duration::from_millis(100),
            announcement: Duration::from_millis(1000),
            resize_debounce: Duration::from_millis(250),
            orientation_settle: Duration::from_millis(100),
            mobile_breakpoint: 767,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub sample_seed: Option<u64>,
    pub tick: Duration,
    pub viewport_width: u32,
    pub timings: Timings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            data_path: PathBuf::from("data/state.json"),
            sample_seed: None,
            tick: Duration::from_millis(100),
            viewport_width: 1280,
            timings: Timings::default(),
        }
    }
}

impl Config {
    /// Reads `PORT`, `APP_DATA_PATH`, `HOTEL_SAMPLE_SEED`, `HOTEL_TICK_MS` and
    /// `HOTEL_VIEWPORT_WIDTH`; unset or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: parse_var("PORT").unwrap_or(defaults.port),
            data_path: resolve_data_path(),
            sample_seed: parse_var("HOTEL_SAMPLE_SEED"),
            tick: parse_var("HOTEL_TICK_MS")
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.tick),
            viewport_width: parse_var("HOTEL_VIEWPORT_WIDTH").unwrap_or(defaults.viewport_width),
            timings: Timings::default(),
        }
    }
}

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/state.json")
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.trim().parse().ok())
}
