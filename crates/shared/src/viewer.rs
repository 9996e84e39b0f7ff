use crate::config::ViewerConfig;
use crate::models::{MapType, Position, ViewportSize};

/// Adapter over a concrete map widget.
///
/// Implementations only forward calls; single-marker bookkeeping lives in
/// [`MapController`].
pub trait MapRenderer: Sized {
    type Marker;
    type Error;

    /// Create the widget inside `container`, centered on `center`, with the
    /// default control set attached.
    fn initialize(
        container: &str,
        center: Position,
        zoom: u8,
        map_type: MapType,
    ) -> Result<Self, Self::Error>;

    fn add_marker(&mut self, at: Position) -> Self::Marker;

    fn move_marker(&mut self, marker: &Self::Marker, to: Position);

    fn remove_marker(&mut self, marker: Self::Marker);

    fn set_center(&mut self, center: Position, zoom: u8);

    fn resize(&mut self, size: ViewportSize);
}

/// Owns the map widget together with the single marker and the last known
/// position. There is at most one marker, and while a position is known the
/// map is centered on it.
pub struct MapController<R: MapRenderer> {
    renderer: R,
    marker: Option<R::Marker>,
    position: Option<Position>,
    zoom_level: u8,
    viewport: Option<ViewportSize>,
}

impl<R: MapRenderer> MapController<R> {
    pub fn initialize(container: &str, config: &ViewerConfig) -> Result<Self, R::Error> {
        let renderer = R::initialize(
            container,
            config.center,
            config.zoom_level,
            config.map_type,
        )?;
        Ok(MapController {
            renderer,
            marker: None,
            position: None,
            zoom_level: config.zoom_level,
            viewport: None,
        })
    }

    /// Apply the latest position. `None` removes the marker; `Some` creates
    /// it on first use, moves it afterwards, and re-centers the map.
    pub fn update_marker(&mut self, position: Option<Position>) {
        self.position = position;

        let Some(point) = position else {
            if let Some(marker) = self.marker.take() {
                self.renderer.remove_marker(marker);
            }
            return;
        };

        if let Some(marker) = &self.marker {
            self.renderer.move_marker(marker, point);
        } else {
            self.marker = Some(self.renderer.add_marker(point));
        }
        self.renderer.set_center(point, self.zoom_level);
    }

    /// Record the window size, forwarding it only when it changed.
    pub fn resize(&mut self, size: ViewportSize) {
        if self.viewport == Some(size) {
            return;
        }
        self.viewport = Some(size);
        self.renderer.resize(size);
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn has_marker(&self) -> bool {
        self.marker.is_some()
    }

    pub fn viewport(&self) -> Option<ViewportSize> {
        self.viewport
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// In-memory widget that records every overlay it has drawn.
    #[derive(Debug, Default)]
    pub struct RecordingRenderer {
        pub container: String,
        pub map_type: Option<MapType>,
        pub center: Option<(Position, u8)>,
        /// Live overlays keyed by marker id.
        pub overlays: Vec<(u32, Position)>,
        pub markers_created: u32,
        pub resizes: Vec<ViewportSize>,
    }

    impl RecordingRenderer {
        pub fn overlay(&self, id: u32) -> Option<Position> {
            self.overlays.iter().find(|(i, _)| *i == id).map(|(_, p)| *p)
        }
    }

    impl MapRenderer for RecordingRenderer {
        type Marker = u32;
        type Error = String;

        fn initialize(
            container: &str,
            center: Position,
            zoom: u8,
            map_type: MapType,
        ) -> Result<Self, String> {
            if container.is_empty() {
                return Err("missing container".to_string());
            }
            Ok(RecordingRenderer {
                container: container.to_string(),
                map_type: Some(map_type),
                center: Some((center, zoom)),
                ..Default::default()
            })
        }

        fn add_marker(&mut self, at: Position) -> u32 {
            self.markers_created += 1;
            let id = self.markers_created;
            self.overlays.push((id, at));
            id
        }

        fn move_marker(&mut self, marker: &u32, to: Position) {
            if let Some(entry) = self.overlays.iter_mut().find(|(i, _)| i == marker) {
                entry.1 = to;
            }
        }

        fn remove_marker(&mut self, marker: u32) {
            self.overlays.retain(|(i, _)| *i != marker);
        }

        fn set_center(&mut self, center: Position, zoom: u8) {
            self.center = Some((center, zoom));
        }

        fn resize(&mut self, size: ViewportSize) {
            self.resizes.push(size);
        }
    }
}
