use std::cell::RefCell;
use std::rc::Rc;

use dioxus::logger::tracing::{debug, info, warn};
use dioxus::core::Task;
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use pilot_shared::poll::{complete_tick, PollSequencer, TickOutcome};
use pilot_shared::viewer::MapController;

use crate::api;
use crate::dom;
use crate::leaflet::LeafletRenderer;

pub type SharedController = Rc<RefCell<MapController<LeafletRenderer>>>;

/// Running poll loop. Dropping the handle does not stop polling; call
/// [`PollHandle::stop`].
pub struct PollHandle {
    task: Task,
    sequencer: Rc<RefCell<PollSequencer>>,
}

impl PollHandle {
    /// Cancel the timer and discard any responses still in flight.
    pub fn stop(self) {
        self.sequencer.borrow_mut().stop();
        self.task.cancel();
        info!("Stopped position polling");
    }
}

/// Start polling `path` every `interval_ms`. Requests are not serialized: a
/// new tick fires even when the previous request is still pending.
///
/// Timers and fetches need the browser, so this loop has no native tests. Its
/// ordering and stop rules are `PollSequencer` and `complete_tick`, tested in
/// `pilot_shared::poll`.
pub fn start(controller: SharedController, path: String, interval_ms: u32) -> PollHandle {
    let sequencer = Rc::new(RefCell::new(PollSequencer::new()));
    let ticks = sequencer.clone();

    info!(path = %path, interval_ms, "Starting position polling");
    let task = spawn(async move {
        loop {
            let Some(ticket) = ticks.borrow_mut().begin() else {
                break;
            };

            let sequencer = ticks.clone();
            let controller = controller.clone();
            let path = path.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = api::fetch_position(&path).await;
                let outcome = complete_tick(
                    &mut sequencer.borrow_mut(),
                    &mut controller.borrow_mut(),
                    ticket,
                    result,
                    dom::window_size(),
                );
                match outcome {
                    TickOutcome::Applied(Some(p)) => {
                        debug!(seq = ticket.seq(), latitude = p.latitude, longitude = p.longitude, "Moved marker")
                    }
                    TickOutcome::Applied(None) => debug!(seq = ticket.seq(), "No position known"),
                    TickOutcome::Stale => debug!(seq = ticket.seq(), "Discarded stale response"),
                    TickOutcome::Failed(e) => warn!(seq = ticket.seq(), error = %e, "Position poll failed"),
                    TickOutcome::Stopped => {}
                }
            });

            TimeoutFuture::new(interval_ms).await;
        }
    });

    PollHandle { task, sequencer }
}
