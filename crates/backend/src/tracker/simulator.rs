use std::f64::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

use pilot_shared::models::{Position, PositionReport};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::PositionStore;
use crate::config::SimulationConfig;

const METERS_PER_DEGREE_LAT: f64 = 111_320.0;
const SIMULATED_ALTITUDE_M: f64 = 450.0;
const SIMULATED_HEIGHT_M: f64 = 20.0;
const UPDATE_INTERVAL: Duration = Duration::from_secs(1);

/// Flies a counter-clockwise circle around a center point.
#[derive(Debug, Clone)]
pub struct FlightSimulator {
    center: Position,
    radius_m: f64,
    period: Duration,
}

impl FlightSimulator {
    pub fn new(center: Position, config: &SimulationConfig) -> Self {
        FlightSimulator {
            center,
            radius_m: config.radius_m,
            period: config.period,
        }
    }

    /// Report for a point in time. At zero elapsed time the vehicle is due
    /// east of the center, heading north.
    pub fn report_at(&self, elapsed: Duration) -> PositionReport {
        let period_s = self.period.as_secs_f64();
        let angle = TAU * (elapsed.as_secs_f64() % period_s) / period_s;

        let north_m = self.radius_m * angle.sin();
        let east_m = self.radius_m * angle.cos();
        let meters_per_degree_lon = METERS_PER_DEGREE_LAT * self.center.latitude.to_radians().cos();

        let course = (-angle.sin()).atan2(angle.cos()).to_degrees().rem_euclid(360.0);
        let speed = TAU * self.radius_m / period_s;

        PositionReport {
            latitude: self.center.latitude + north_m / METERS_PER_DEGREE_LAT,
            longitude: self.center.longitude + east_m / meters_per_degree_lon,
            altitude: Some(SIMULATED_ALTITUDE_M),
            course_over_ground: Some(course),
            speed_over_ground: Some(speed),
            altitude_over_ground: Some(SIMULATED_HEIGHT_M),
            auto_pilot_flight: true,
        }
    }

    /// Feed the store once per second until the task is aborted.
    pub fn spawn(self, store: Arc<PositionStore>) -> JoinHandle<()> {
        tracing::info!(
            latitude = self.center.latitude,
            longitude = self.center.longitude,
            radius_m = self.radius_m,
            period_s = self.period.as_secs(),
            "Starting flight simulator"
        );
        tokio::spawn(async move {
            let started = Instant::now();
            let mut ticker = time::interval(UPDATE_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let report = self.report_at(started.elapsed());
                if let Err(e) = store.update(report) {
                    tracing::warn!(error = %e, "Simulator produced an invalid position");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulator() -> FlightSimulator {
        FlightSimulator::new(
            Position::new(47.821881, 13.040328),
            &SimulationConfig {
                radius_m: 150.0,
                period: Duration::from_secs(120),
            },
        )
    }

    fn offset_m(center: Position, report: &PositionReport) -> (f64, f64) {
        let east = (report.longitude - center.longitude)
            * METERS_PER_DEGREE_LAT
            * center.latitude.to_radians().cos();
        let north = (report.latitude - center.latitude) * METERS_PER_DEGREE_LAT;
        (east, north)
    }

    #[test]
    fn test_starts_due_east() {
        let sim = simulator();
        let report = sim.report_at(Duration::ZERO);
        let (east, north) = offset_m(sim.center, &report);
        assert!((east - 150.0).abs() < 1e-6);
        assert!(north.abs() < 1e-6);
        assert!(report.course_over_ground.unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_quarter_period_is_due_north_heading_west() {
        let sim = simulator();
        let report = sim.report_at(Duration::from_secs(30));
        let (east, north) = offset_m(sim.center, &report);
        assert!(east.abs() < 1e-6);
        assert!((north - 150.0).abs() < 1e-6);
        assert!((report.course_over_ground.unwrap() - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_stays_on_circle() {
        let sim = simulator();
        for secs in [0, 7, 45, 61, 119, 250] {
            let report = sim.report_at(Duration::from_secs(secs));
            let (east, north) = offset_m(sim.center, &report);
            let r = (east * east + north * north).sqrt();
            assert!((r - 150.0).abs() < 1e-6, "radius {r} at {secs}s");
            assert!(report.position().is_valid());
        }
    }

    #[test]
    fn test_wraps_after_full_period() {
        let sim = simulator();
        let a = sim.report_at(Duration::from_secs(10));
        let b = sim.report_at(Duration::from_secs(130));
        assert!((a.latitude - b.latitude).abs() < 1e-12);
        assert!((a.longitude - b.longitude).abs() < 1e-12);
    }

    #[test]
    fn test_speed_matches_circumference() {
        let report = simulator().report_at(Duration::from_secs(3));
        let expected = TAU * 150.0 / 120.0;
        assert!((report.speed_over_ground.unwrap() - expected).abs() < 1e-9);
        assert!(report.auto_pilot_flight);
    }

    #[tokio::test]
    async fn test_spawn_feeds_store() {
        let store = PositionStore::new();
        let handle = simulator().spawn(store.clone());
        // The first interval tick fires immediately.
        for _ in 0..50 {
            if store.current().is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();
        assert!(store.current().is_some());
    }
}
