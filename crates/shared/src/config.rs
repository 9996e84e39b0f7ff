//! Viewer configuration carried by hidden `<input>` fields on the page.
//!
//! Each field value is a JSON document. The server renders the fields with
//! [`ViewerConfig::to_fields`] and the browser reads them back with
//! [`ViewerConfig::from_fields`]. Names match exactly; when a name appears more
//! than once the first occurrence wins.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    MapType, Position, DEFAULT_CENTER, DEFAULT_POLL_INTERVAL_MS, DEFAULT_POSITION_PATH,
    DEFAULT_ZOOM_LEVEL, MAX_ZOOM_LEVEL,
};

pub const CENTER_FIELD: &str = "center";
pub const ZOOM_LEVEL_FIELD: &str = "zoomLevel";
pub const MAP_TYPE_FIELD: &str = "mapType";
pub const POSITION_URL_FIELD: &str = "positionUrl";
pub const POLL_INTERVAL_FIELD: &str = "pollInterval";

pub const FIELD_NAMES: [&str; 5] = [
    CENTER_FIELD,
    ZOOM_LEVEL_FIELD,
    MAP_TYPE_FIELD,
    POSITION_URL_FIELD,
    POLL_INTERVAL_FIELD,
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("field `{field}` is not valid JSON: {message}")]
    InvalidJson { field: &'static str, message: String },
    #[error("field `{field}` has an unexpected value: {message}")]
    InvalidValue { field: &'static str, message: String },
    #[error("center ({latitude}, {longitude}) is not a valid coordinate")]
    CenterOutOfRange { latitude: f64, longitude: f64 },
    #[error("zoom level {zoom} exceeds the maximum of {max}")]
    ZoomOutOfRange { zoom: u64, max: u8 },
    #[error("unknown map type `{0}`")]
    UnknownMapType(String),
    #[error("poll interval must be at least one millisecond")]
    ZeroPollInterval,
}

impl ConfigError {
    /// The configuration field this diagnostic is about.
    pub fn field(&self) -> &'static str {
        match self {
            ConfigError::InvalidJson { field, .. } | ConfigError::InvalidValue { field, .. } => {
                field
            }
            ConfigError::CenterOutOfRange { .. } => CENTER_FIELD,
            ConfigError::ZoomOutOfRange { .. } => ZOOM_LEVEL_FIELD,
            ConfigError::UnknownMapType(_) => MAP_TYPE_FIELD,
            ConfigError::ZeroPollInterval => POLL_INTERVAL_FIELD,
        }
    }
}

/// The `center` field is encoded as `{"x": longitude, "y": latitude}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CenterField {
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub center: Position,
    pub zoom_level: u8,
    pub map_type: MapType,
    pub position_url: String,
    pub poll_interval_ms: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            center: DEFAULT_CENTER,
            zoom_level: DEFAULT_ZOOM_LEVEL,
            map_type: MapType::default(),
            position_url: DEFAULT_POSITION_PATH.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl ViewerConfig {
    /// Build a config from `(name, value)` pairs in document order.
    ///
    /// Unknown names are skipped. A field that fails to parse keeps its
    /// default and contributes a [`ConfigError`] to the returned list.
    pub fn from_fields<I, N, V>(fields: I) -> (ViewerConfig, Vec<ConfigError>)
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = ViewerConfig::default();
        let mut diagnostics = Vec::new();
        let mut seen: Vec<&'static str> = Vec::new();

        for (name, value) in fields {
            let Some(field) = FIELD_NAMES.iter().copied().find(|f| *f == name.as_ref()) else {
                continue;
            };
            if seen.contains(&field) {
                continue;
            }
            seen.push(field);

            if let Err(e) = config.apply_field(field, value.as_ref()) {
                diagnostics.push(e);
            }
        }

        (config, diagnostics)
    }

    fn apply_field(&mut self, field: &'static str, raw: &str) -> Result<(), ConfigError> {
        match field {
            CENTER_FIELD => {
                let c: CenterField = parse_field(field, raw)?;
                let center = Position::new(c.y, c.x);
                if !center.is_valid() {
                    return Err(ConfigError::CenterOutOfRange {
                        latitude: center.latitude,
                        longitude: center.longitude,
                    });
                }
                self.center = center;
            }
            ZOOM_LEVEL_FIELD => {
                let zoom: u64 = parse_field(field, raw)?;
                if zoom > MAX_ZOOM_LEVEL as u64 {
                    return Err(ConfigError::ZoomOutOfRange {
                        zoom,
                        max: MAX_ZOOM_LEVEL,
                    });
                }
                self.zoom_level = zoom as u8;
            }
            MAP_TYPE_FIELD => {
                let name: String = parse_field(field, raw)?;
                self.map_type = MapType::from_name(&name);
                if self.map_type.name() != name {
                    return Err(ConfigError::UnknownMapType(name));
                }
            }
            POSITION_URL_FIELD => {
                let url: String = parse_field(field, raw)?;
                if url.trim().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field,
                        message: "empty url".to_string(),
                    });
                }
                self.position_url = url;
            }
            POLL_INTERVAL_FIELD => {
                let interval: u32 = parse_field(field, raw)?;
                if interval == 0 {
                    return Err(ConfigError::ZeroPollInterval);
                }
                self.poll_interval_ms = interval;
            }
            _ => {}
        }
        Ok(())
    }

    /// Encode every field as `(name, json)` for rendering hidden inputs.
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        let center = CenterField {
            x: self.center.longitude,
            y: self.center.latitude,
        };
        vec![
            (CENTER_FIELD, to_json(&center)),
            (ZOOM_LEVEL_FIELD, self.zoom_level.to_string()),
            (MAP_TYPE_FIELD, to_json(self.map_type.name())),
            (POSITION_URL_FIELD, to_json(&self.position_url)),
            (POLL_INTERVAL_FIELD, self.poll_interval_ms.to_string()),
        ]
    }
}

fn parse_field<T: DeserializeOwned>(field: &'static str, raw: &str) -> Result<T, ConfigError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| ConfigError::InvalidJson {
            field,
            message: e.to_string(),
        })?;
    serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
        field,
        message: e.to_string(),
    })
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    // Plain structs, strings and numbers always serialize.
    serde_json::to_string(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_FIELDS: [(&str, &str); 0] = [];

    #[test]
    fn test_defaults_without_fields() {
        let (config, diagnostics) = ViewerConfig::from_fields(NO_FIELDS);
        assert!(diagnostics.is_empty());
        assert_eq!(config.center, Position::new(47.821881, 13.040328));
        assert_eq!(config.zoom_level, 17);
        assert_eq!(config.map_type, MapType::Hybrid);
        assert_eq!(config.position_url, "/pilot/json/position");
        assert_eq!(config.poll_interval_ms, 1000);
    }

    #[test]
    fn test_zoom_level_parsed_as_number() {
        let (config, diagnostics) = ViewerConfig::from_fields([("zoomLevel", "15")]);
        assert!(diagnostics.is_empty());
        assert_eq!(config.zoom_level, 15);
    }

    #[test]
    fn test_center_uses_x_as_longitude() {
        let (config, _) = ViewerConfig::from_fields([("center", r#"{"x":13.5,"y":48.0}"#)]);
        assert_eq!(config.center, Position::new(48.0, 13.5));
    }

    #[test]
    fn test_map_types_recognized() {
        for (raw, expected) in [
            (r#""Hybrid""#, MapType::Hybrid),
            (r#""Terrain""#, MapType::Terrain),
            (r#""Satellite""#, MapType::Satellite),
        ] {
            let (config, diagnostics) = ViewerConfig::from_fields([("mapType", raw)]);
            assert!(diagnostics.is_empty());
            assert_eq!(config.map_type, expected);
        }
    }

    #[test]
    fn test_unknown_map_type_falls_back_to_hybrid() {
        let (config, diagnostics) = ViewerConfig::from_fields([("mapType", r#""Normal""#)]);
        assert_eq!(config.map_type, MapType::Hybrid);
        assert_eq!(
            diagnostics,
            vec![ConfigError::UnknownMapType("Normal".to_string())]
        );
    }

    #[test]
    fn test_first_field_wins() {
        let (config, _) =
            ViewerConfig::from_fields([("zoomLevel", "12"), ("zoomLevel", "5")]);
        assert_eq!(config.zoom_level, 12);
    }

    #[test]
    fn test_names_match_exactly() {
        let (config, diagnostics) = ViewerConfig::from_fields([
            ("mapCenter", r#"{"x":0.0,"y":0.0}"#),
            ("zoomLevelMax", "3"),
            ("Center", r#"{"x":1.0,"y":1.0}"#),
        ]);
        assert!(diagnostics.is_empty());
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_malformed_json_keeps_default_and_reports() {
        let (config, diagnostics) = ViewerConfig::from_fields([("center", "{x:1}")]);
        assert_eq!(config.center, DEFAULT_CENTER);
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(diagnostics[0], ConfigError::InvalidJson { field: "center", .. }));
    }

    #[test]
    fn test_wrong_shape_reports_invalid_value() {
        let (config, diagnostics) = ViewerConfig::from_fields([("zoomLevel", r#""15""#)]);
        assert_eq!(config.zoom_level, 17);
        assert!(matches!(
            diagnostics[0],
            ConfigError::InvalidValue { field: "zoomLevel", .. }
        ));
    }

    #[test]
    fn test_zoom_out_of_range() {
        let (config, diagnostics) = ViewerConfig::from_fields([("zoomLevel", "40")]);
        assert_eq!(config.zoom_level, 17);
        assert_eq!(
            diagnostics,
            vec![ConfigError::ZoomOutOfRange { zoom: 40, max: 22 }]
        );
    }

    #[test]
    fn test_center_out_of_range() {
        let (config, diagnostics) =
            ViewerConfig::from_fields([("center", r#"{"x":13.0,"y":95.0}"#)]);
        assert_eq!(config.center, DEFAULT_CENTER);
        assert_eq!(diagnostics[0].field(), "center");
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let (config, diagnostics) = ViewerConfig::from_fields([("pollInterval", "0")]);
        assert_eq!(config.poll_interval_ms, 1000);
        assert_eq!(diagnostics, vec![ConfigError::ZeroPollInterval]);
    }

    #[test]
    fn test_bad_field_does_not_affect_others() {
        let (config, diagnostics) = ViewerConfig::from_fields([
            ("center", "not json"),
            ("zoomLevel", "9"),
            ("positionUrl", r#""/vehicle/json/position""#),
        ]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(config.zoom_level, 9);
        assert_eq!(config.position_url, "/vehicle/json/position");
    }

    #[test]
    fn test_fields_read_back_unchanged() {
        let config = ViewerConfig {
            center: Position::new(48.2, 16.37),
            zoom_level: 12,
            map_type: MapType::Terrain,
            position_url: "/other/position".to_string(),
            poll_interval_ms: 250,
        };
        let fields = config.to_fields();
        let (parsed, diagnostics) = ViewerConfig::from_fields(fields);
        assert!(diagnostics.is_empty());
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_to_fields_encoding() {
        let fields = ViewerConfig::default().to_fields();
        assert_eq!(fields[0], ("center", r#"{"x":13.040328,"y":47.821881}"#.to_string()));
        assert_eq!(fields[1], ("zoomLevel", "17".to_string()));
        assert_eq!(fields[2], ("mapType", r#""Hybrid""#.to_string()));
    }
}
