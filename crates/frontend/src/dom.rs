use pilot_shared::models::ViewportSize;
use wasm_bindgen::JsValue;

/// Current browser window size in CSS pixels.
pub fn window_size() -> Option<ViewportSize> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some(ViewportSize { width, height })
}

/// Whether the Leaflet global `L` is present on the page.
pub fn leaflet_loaded() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    js_sys::Reflect::has(&window, &JsValue::from_str("L")).unwrap_or(false)
}
