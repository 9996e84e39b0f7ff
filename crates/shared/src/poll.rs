//! Sequencing for the position poll loop.
//!
//! Every tick takes a [`Ticket`] before its request goes out. Requests may
//! overlap, so completions can arrive out of order; a completion is applied
//! only when its ticket is newer than the last one applied. Once stopped, no
//! tickets are issued and late completions are dropped.

use crate::models::{Position, ViewportSize};
use crate::viewer::{MapController, MapRenderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct PollSequencer {
    issued: u64,
    applied: Option<u64>,
    stopped: bool,
}

impl PollSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the ticket for the next request, or `None` once stopped.
    pub fn begin(&mut self) -> Option<Ticket> {
        if self.stopped {
            return None;
        }
        self.issued += 1;
        Some(Ticket(self.issued))
    }

    /// Claim the right to apply a completed request. Returns false when the
    /// poller is stopped or a newer response was already applied.
    pub fn settle(&mut self, ticket: Ticket) -> bool {
        if self.stopped {
            return false;
        }
        if self.applied.is_some_and(|latest| ticket.0 <= latest) {
            return false;
        }
        self.applied = Some(ticket.0);
        true
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn last_applied(&self) -> Option<u64> {
        self.applied
    }
}

/// What happened to one completed request.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Applied(Option<Position>),
    /// A newer response was applied first.
    Stale,
    Stopped,
    Failed(String),
}

/// Finish a poll tick: check the ticket, then resize and redraw.
///
/// A failed request leaves the map untouched and does not consume the
/// ticket, so an older successful response may still be applied after it.
pub fn complete_tick<R: MapRenderer>(
    sequencer: &mut PollSequencer,
    controller: &mut MapController<R>,
    ticket: Ticket,
    result: Result<Option<Position>, String>,
    viewport: Option<ViewportSize>,
) -> TickOutcome {
    if sequencer.is_stopped() {
        return TickOutcome::Stopped;
    }
    let position = match result {
        Ok(position) => position,
        Err(e) => return TickOutcome::Failed(e),
    };
    if !sequencer.settle(ticket) {
        return TickOutcome::Stale;
    }
    if let Some(size) = viewport {
        controller.resize(size);
    }
    controller.update_marker(position);
    TickOutcome::Applied(position)
}
