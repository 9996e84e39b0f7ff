use dioxus::logger::tracing::{info, warn};
use pilot_shared::config::ViewerConfig;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement};

/// Read the viewer configuration from the page's hidden inputs.
///
/// Called once at startup. Fields that fail to parse keep their defaults and
/// are reported in the console.
pub fn read_page_config() -> ViewerConfig {
    let fields = web_sys::window()
        .and_then(|w| w.document())
        .map(|d| input_fields(&d))
        .unwrap_or_default();

    let (config, diagnostics) = ViewerConfig::from_fields(fields);
    for problem in &diagnostics {
        warn!(field = problem.field(), "{}; using the default", problem);
    }
    info!(
        latitude = config.center.latitude,
        longitude = config.center.longitude,
        zoom = config.zoom_level,
        map_type = %config.map_type,
        "Loaded viewer configuration"
    );
    config
}

/// `(name, value)` of every `<input>` in document order.
///
/// Needs a live DOM, so it only runs in the browser. The parsing it feeds is
/// tested in `pilot_shared::config`.
fn input_fields(document: &Document) -> Vec<(String, String)> {
    let inputs = document.get_elements_by_tag_name("input");
    (0..inputs.length())
        .filter_map(|i| inputs.item(i))
        .filter_map(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| (input.name(), input.value()))
        .collect()
}
