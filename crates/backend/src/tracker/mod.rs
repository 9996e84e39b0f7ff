pub mod simulator;

use chrono::{DateTime, Utc};
use pilot_shared::models::PositionReport;
use std::sync::{Arc, RwLock};

/// A position report together with the time it was received.
#[derive(Debug, Clone, PartialEq)]
pub struct Fix {
    pub report: PositionReport,
    pub updated_at: DateTime<Utc>,
}

/// In-memory holder for the latest vehicle position.
#[derive(Debug, Default)]
pub struct PositionStore {
    current: RwLock<Option<Fix>>,
}

impl PositionStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn current(&self) -> Option<Fix> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the current position. Reports with coordinates outside the
    /// valid latitude/longitude range are rejected.
    pub fn update(&self, report: PositionReport) -> Result<(), String> {
        let position = report.position();
        if !position.is_valid() {
            return Err(format!(
                "Invalid coordinate: latitude {}, longitude {}",
                position.latitude, position.longitude
            ));
        }
        let fix = Fix {
            report,
            updated_at: Utc::now(),
        };
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(fix);
        Ok(())
    }

    /// Forget the current position. Returns whether one was set.
    pub fn clear(&self) -> bool {
        self.current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
            .is_some()
    }
}
