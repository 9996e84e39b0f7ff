use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Endpoint polled by the viewer unless the page configures another one.
pub const DEFAULT_POSITION_PATH: &str = "/pilot/json/position";
pub const WAYPOINTS_PATH: &str = "/pilot/json/waypoints";
pub const STATUS_PATH: &str = "/pilot/json/status";

/// DOM id of the element the map widget is bound to.
pub const MAP_CANVAS_ID: &str = "map_canvas";

pub const DEFAULT_CENTER: Position = Position {
    latitude: 47.821881,
    longitude: 13.040328,
};
pub const DEFAULT_ZOOM_LEVEL: u8 = 17;
pub const MAX_ZOOM_LEVEL: u8 = 22;
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 1000;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Position {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    fn validated(self) -> Result<Self, PositionError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(PositionError::OutOfRange {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

#[derive(Debug, Error)]
pub enum PositionError {
    #[error("malformed position body: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("position out of range: latitude {latitude}, longitude {longitude}")]
    OutOfRange { latitude: f64, longitude: f64 },
}

/// Body served by the position endpoint. Only latitude and longitude are
/// required; the vehicle-side fields are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionReport {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_over_ground: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_over_ground: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude_over_ground: Option<f64>,
    #[serde(default)]
    pub auto_pilot_flight: bool,
}

impl PositionReport {
    pub fn at(position: Position) -> Self {
        PositionReport {
            latitude: position.latitude,
            longitude: position.longitude,
            altitude: None,
            course_over_ground: None,
            speed_over_ground: None,
            altitude_over_ground: None,
            auto_pilot_flight: false,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.latitude, self.longitude)
    }
}

/// Parse a position endpoint body.
///
/// An empty body or a JSON `null` means no position is known yet and yields
/// `Ok(None)`. Extra fields in the body are ignored.
pub fn parse_position_body(body: &str) -> Result<Option<Position>, PositionError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let parsed: Option<Position> = serde_json::from_str(trimmed)?;
    parsed.map(Position::validated).transpose()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub precision: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f64>,
    #[serde(default)]
    pub current: bool,
}

/// Base map style requested by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MapType {
    #[default]
    Hybrid,
    Terrain,
    Satellite,
}

impl MapType {
    /// Resolve a configured name. Anything unrecognized maps to `Hybrid`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Terrain" => MapType::Terrain,
            "Satellite" => MapType::Satellite,
            _ => MapType::Hybrid,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MapType::Hybrid => "Hybrid",
            MapType::Terrain => "Terrain",
            MapType::Satellite => "Satellite",
        }
    }

    /// Tile layers stacked bottom to top for this map type.
    pub fn tile_layers(&self) -> &'static [TileLayerSpec] {
        match self {
            MapType::Hybrid => &[IMAGERY_LAYER, LABELS_LAYER],
            MapType::Terrain => &[TOPO_LAYER],
            MapType::Satellite => &[IMAGERY_LAYER],
        }
    }
}

impl std::fmt::Display for MapType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayerSpec {
    pub url: &'static str,
    pub attribution: &'static str,
    pub max_zoom: u8,
}

const IMAGERY_LAYER: TileLayerSpec = TileLayerSpec {
    url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
    attribution: "Tiles &copy; Esri",
    max_zoom: 19,
};

const LABELS_LAYER: TileLayerSpec = TileLayerSpec {
    url: "https://server.arcgisonline.com/ArcGIS/rest/services/Reference/World_Boundaries_and_Places/MapServer/tile/{z}/{y}/{x}",
    attribution: "Labels &copy; Esri",
    max_zoom: 19,
};

const TOPO_LAYER: TileLayerSpec = TileLayerSpec {
    url: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
    attribution: "&copy; OpenStreetMap contributors, SRTM | &copy; OpenTopoMap (CC-BY-SA)",
    max_zoom: 17,
};

/// Browser window size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}
