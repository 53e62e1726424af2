use std::env;
use std::time::Duration;

use crate::state::Screen;

pub const DEFAULT_API_URL: &str = "http://localhost:8001";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub request_timeout: Duration,
    pub fetch_parallelism: usize,
    pub tick_rate: Duration,
    pub start_screen: Screen,
}

impl Config {
    /// Reads `.env.local` and `.env` (if present) and then the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("FOOTBALL_API_URL")
            .map(|val| normalize_base_url(&val))
            .filter(|val| !val.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let timeout_secs = lookup("HTTP_TIMEOUT_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(10)
            .clamp(1, 120);
        let fetch_parallelism = lookup("FETCH_PARALLELISM")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(4)
            .clamp(2, 32);
        let tick_ms = lookup("TICK_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(250)
            .clamp(50, 2000);
        let start_screen = lookup("START_SCREEN")
            .and_then(|val| parse_screen(&val))
            .unwrap_or(Screen::Dashboard);

        Self {
            api_url,
            request_timeout: Duration::from_secs(timeout_secs),
            fetch_parallelism,
            tick_rate: Duration::from_millis(tick_ms),
            start_screen,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn parse_screen(raw: &str) -> Option<Screen> {
    match raw.trim().to_lowercase().as_str() {
        "dashboard" | "home" => Some(Screen::Dashboard),
        "competitions" => Some(Screen::Competitions),
        "teams" => Some(Screen::Teams),
        "insights" => Some(Screen::Insights),
        _ => None,
    }
}
