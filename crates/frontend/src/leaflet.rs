//! Leaflet bindings and the [`MapRenderer`] implementation on top of them.
//!
//! Leaflet is loaded by the page as the global `L`; only the handful of calls
//! the viewer needs are bound here.

use dioxus::logger::tracing::warn;
use js_sys::{Array, Object, Reflect};
use pilot_shared::models::{MapType, Position, TileLayerSpec, ViewportSize};
use pilot_shared::viewer::MapRenderer;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::dom;

#[wasm_bindgen]
extern "C" {
    pub type LeafletMap;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn new_map(container_id: &str) -> Result<LeafletMap, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LeafletMap, center: &Array, zoom: f64);

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer(this: &LeafletMap, layer: &JsValue);

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &LeafletMap, layer: &JsValue);

    #[wasm_bindgen(method, js_name = addControl)]
    fn add_control(this: &LeafletMap, control: &JsValue);

    #[wasm_bindgen(method, js_name = invalidateSize)]
    fn invalidate_size(this: &LeafletMap);

    pub type LeafletMarker;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn new_marker(at: &Array) -> LeafletMarker;

    #[wasm_bindgen(method, js_name = setLatLng)]
    fn set_lat_lng(this: &LeafletMarker, at: &Array);

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn new_tile_layer(url_template: &str, options: &Object) -> JsValue;

    #[wasm_bindgen(js_namespace = ["L", "control"], js_name = scale)]
    fn new_scale_control() -> JsValue;
}

/// Leaflet takes `[lat, lng]` arrays wherever it expects a coordinate.
fn lat_lng(position: Position) -> Array {
    Array::of2(
        &JsValue::from_f64(position.latitude),
        &JsValue::from_f64(position.longitude),
    )
}

fn tile_options(spec: &TileLayerSpec) -> Object {
    let options = Object::new();
    let _ = Reflect::set(
        &options,
        &JsValue::from_str("attribution"),
        &JsValue::from_str(spec.attribution),
    );
    let _ = Reflect::set(
        &options,
        &JsValue::from_str("maxZoom"),
        &JsValue::from_f64(spec.max_zoom as f64),
    );
    options
}

pub struct LeafletRenderer {
    map: LeafletMap,
    container_id: String,
}

impl LeafletRenderer {
    fn container(&self) -> Option<HtmlElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id(&self.container_id)?
            .dyn_into::<HtmlElement>()
            .ok()
    }
}

impl MapRenderer for LeafletRenderer {
    type Marker = LeafletMarker;
    type Error = String;

    fn initialize(
        container: &str,
        center: Position,
        zoom: u8,
        map_type: MapType,
    ) -> Result<Self, String> {
        if !dom::leaflet_loaded() {
            return Err("this browser has not loaded the Leaflet map library".to_string());
        }
        let map = new_map(container)
            .map_err(|e| format!("could not create a map in #{}: {:?}", container, e))?;

        for spec in map_type.tile_layers() {
            map.add_layer(&new_tile_layer(spec.url, &tile_options(spec)));
        }
        // Leaflet attaches its zoom control by default.
        map.add_control(&new_scale_control());
        map.set_view(&lat_lng(center), zoom as f64);

        Ok(LeafletRenderer {
            map,
            container_id: container.to_string(),
        })
    }

    fn add_marker(&mut self, at: Position) -> LeafletMarker {
        let marker = new_marker(&lat_lng(at));
        self.map.add_layer(&marker);
        marker
    }

    fn move_marker(&mut self, marker: &LeafletMarker, to: Position) {
        marker.set_lat_lng(&lat_lng(to));
    }

    fn remove_marker(&mut self, marker: LeafletMarker) {
        self.map.remove_layer(&marker);
    }

    fn set_center(&mut self, center: Position, zoom: u8) {
        self.map.set_view(&lat_lng(center), zoom as f64);
    }

    fn resize(&mut self, size: ViewportSize) {
        if let Some(element) = self.container() {
            let style = element.style();
            for (property, px) in [("width", size.width), ("height", size.height)] {
                if let Err(e) = style.set_property(property, &format!("{}px", px)) {
                    warn!(property, error = ?e, "Could not resize map canvas");
                }
            }
        }
        self.map.invalidate_size();
    }
}
