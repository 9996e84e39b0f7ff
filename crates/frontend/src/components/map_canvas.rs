use std::cell::RefCell;
use std::rc::Rc;

use dioxus::logger::tracing::error;
use dioxus::prelude::*;
use pilot_shared::config::ViewerConfig;
use pilot_shared::models::MAP_CANVAS_ID;
use pilot_shared::viewer::MapController;

use crate::dom;
use crate::leaflet::LeafletRenderer;
use crate::poller::{self, PollHandle};

/// Full-window map that follows the tracked position.
///
/// The map is created once the canvas element is mounted; polling runs until
/// the component is dropped.
#[component]
pub fn MapCanvas(config: ViewerConfig) -> Element {
    let poll_handle = use_hook(|| Rc::new(RefCell::new(None::<PollHandle>)));
    let mut unavailable = use_signal(|| None::<String>);

    {
        let poll_handle = poll_handle.clone();
        use_effect(move || {
            if poll_handle.borrow().is_some() {
                return;
            }
            match MapController::<LeafletRenderer>::initialize(MAP_CANVAS_ID, &config) {
                Ok(mut controller) => {
                    if let Some(size) = dom::window_size() {
                        controller.resize(size);
                    }
                    let handle = poller::start(
                        Rc::new(RefCell::new(controller)),
                        config.position_url.clone(),
                        config.poll_interval_ms,
                    );
                    *poll_handle.borrow_mut() = Some(handle);
                }
                Err(e) => {
                    error!(error = %e, "Map could not be initialized");
                    unavailable.set(Some(e));
                }
            }
        });
    }

    use_drop(move || {
        if let Some(handle) = poll_handle.borrow_mut().take() {
            handle.stop();
        }
    });

    rsx! {
        div { id: MAP_CANVAS_ID, class: "map-canvas" }
        if let Some(reason) = &*unavailable.read() {
            div { class: "map-unsupported", "Map unavailable: {reason}" }
        }
    }
}
