mod api;
mod components;
mod config;
mod dom;
mod leaflet;
mod poller;

use dioxus::prelude::*;

use components::map_canvas::MapCanvas;

const CSS: Asset = asset!("/assets/main.css");

#[allow(non_snake_case)]
fn App() -> Element {
    // The hidden inputs are read once; the config never changes afterwards.
    let config = use_hook(config::read_page_config);

    rsx! {
        document::Stylesheet { href: CSS }
        MapCanvas { config: config }
    }
}

fn main() {
    launch(App);
}
