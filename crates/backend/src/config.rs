use std::path::PathBuf;
use std::time::Duration;

use pilot_shared::config::{
    ViewerConfig, CENTER_FIELD, MAP_TYPE_FIELD, POLL_INTERVAL_FIELD, POSITION_URL_FIELD,
    ZOOM_LEVEL_FIELD,
};
use pilot_shared::models::{STATUS_PATH, WAYPOINTS_PATH};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SIMULATION_RADIUS_M: f64 = 150.0;
const DEFAULT_SIMULATION_PERIOD_S: u64 = 120;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub radius_m: f64,
    pub period: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub dist_dir: PathBuf,
    pub waypoints_file: Option<PathBuf>,
    pub viewer: ViewerConfig,
    pub simulation: Option<SimulationConfig>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from a variable lookup. `VIEWER_CENTER`,
    /// `VIEWER_ZOOM` and `POLL_INTERVAL_MS` hold JSON; `VIEWER_MAP_TYPE` and
    /// `POSITION_URL` are plain strings.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| format!("PORT must be a port number: {}", e))?,
            None => DEFAULT_PORT,
        };
        let dist_dir = PathBuf::from(lookup("DIST_DIR").unwrap_or_else(|| "dist".to_string()));
        let waypoints_file = lookup("WAYPOINTS_FILE").map(PathBuf::from);

        let mut fields: Vec<(&str, String)> = Vec::new();
        if let Some(raw) = lookup("VIEWER_CENTER") {
            fields.push((CENTER_FIELD, raw));
        }
        if let Some(raw) = lookup("VIEWER_ZOOM") {
            fields.push((ZOOM_LEVEL_FIELD, raw));
        }
        if let Some(raw) = lookup("VIEWER_MAP_TYPE") {
            fields.push((MAP_TYPE_FIELD, json_string(&raw)));
        }
        if let Some(raw) = lookup("POSITION_URL") {
            fields.push((POSITION_URL_FIELD, json_string(&raw)));
        }
        if let Some(raw) = lookup("POLL_INTERVAL_MS") {
            fields.push((POLL_INTERVAL_FIELD, raw));
        }
        let (viewer, diagnostics) = ViewerConfig::from_fields(fields);
        if let Some(first) = diagnostics.first() {
            return Err(format!("Invalid viewer setting: {}", first));
        }
        check_position_url(&viewer.position_url)?;

        let simulation = if is_enabled(lookup("SIMULATE").as_deref()) {
            let radius_m = match lookup("SIMULATION_RADIUS_M") {
                Some(raw) => raw
                    .parse::<f64>()
                    .ok()
                    .filter(|r| r.is_finite() && *r > 0.0)
                    .ok_or_else(|| format!("SIMULATION_RADIUS_M must be positive, got {}", raw))?,
                None => DEFAULT_SIMULATION_RADIUS_M,
            };
            let period_s = match lookup("SIMULATION_PERIOD_S") {
                Some(raw) => raw
                    .parse::<u64>()
                    .ok()
                    .filter(|p| *p > 0)
                    .ok_or_else(|| format!("SIMULATION_PERIOD_S must be positive, got {}", raw))?,
                None => DEFAULT_SIMULATION_PERIOD_S,
            };
            Some(SimulationConfig {
                radius_m,
                period: Duration::from_secs(period_s),
            })
        } else {
            None
        };

        Ok(ServerConfig {
            port,
            dist_dir,
            waypoints_file,
            viewer,
            simulation,
        })
    }
}

/// Paths the router already claims for other purposes.
const RESERVED_PATHS: [&str; 4] = ["/", "/pilot", WAYPOINTS_PATH, STATUS_PATH];
const RESERVED_PREFIXES: [&str; 2] = ["/dist", "/assets"];

/// True when the position endpoint lives on this server.
pub fn is_local_path(url: &str) -> bool {
    url.starts_with('/')
}

/// A local position path gets its own route, so it must be a literal path
/// that does not shadow another route. Absolute URLs point at another host.
fn check_position_url(url: &str) -> Result<(), String> {
    if url.starts_with("http://") || url.starts_with("https://") {
        return Ok(());
    }
    if !is_local_path(url) {
        return Err(format!(
            "POSITION_URL must be an absolute URL or start with '/', got {}",
            url
        ));
    }
    if url.contains(['{', '}', '*', '?', '#']) {
        return Err(format!("POSITION_URL must be a literal path, got {}", url));
    }
    let reserved = RESERVED_PATHS.contains(&url)
        || RESERVED_PREFIXES
            .iter()
            .any(|p| url == *p || url.starts_with(&format!("{}/", p)));
    if reserved {
        return Err(format!("POSITION_URL {} collides with another route", url));
    }
    Ok(())
}

fn is_enabled(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

fn json_string(raw: &str) -> String {
    serde_json::Value::String(raw.to_string()).to_string()
}
