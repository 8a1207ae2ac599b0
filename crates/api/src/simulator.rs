//! Vehicle-position simulator for the live map.
//!
//! A handful of public-transport vehicles drive along straight segments
//! between intersections. Every tick the positions advance and a
//! `vehicle-updates` snapshot is broadcast over the WebSocket channel.
//! Nothing here is persisted; the snapshots are best-effort telemetry.

use std::sync::Arc;
use std::time::Duration;

use flower_core::types::DbId;
use flower_core::vehicle::VehicleClass;
use flower_db::models::vehicle::Vehicle;
use flower_db::repositories::{IntersectionRepo, VehicleRepo};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::config::SimulatorConfig;
use crate::ws::WsManager;

/// Degrees travelled per tick.
const STEP_DEGREES: f64 = 0.00015;
/// Segments shorter than this are treated as this long.
const MIN_SEGMENT_DEGREES: f64 = 0.001;
/// Displayed speed range in km/h.
const SPEED_RANGE: std::ops::Range<f64> = 20.0..50.0;

/// Simulated fleet: the first two buses and the first tram.
const FLEET: [(VehicleClass, i64); 2] = [(VehicleClass::Bus, 2), (VehicleClass::Tram, 1)];

pub const EVENT_VEHICLE_UPDATES: &str = "vehicle-updates";

/// A point vehicles travel between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
}

/// One entry of a `vehicle-updates` snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePosition {
    pub vehicle_id: DbId,
    pub kind: VehicleClass,
    pub line: Option<String>,
    pub reg_number: Option<String>,
    pub lat: f64,
    pub lng: f64,
    /// Marker rotation in degrees; 90 is due east.
    pub heading: f64,
    pub speed: f64,
}

#[derive(Serialize)]
struct VehicleUpdates<'a> {
    event: &'static str,
    data: &'a [VehiclePosition],
}

/// Serialize a snapshot into the push-channel envelope.
pub fn updates_message(positions: &[VehiclePosition]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&VehicleUpdates {
        event: EVENT_VEHICLE_UPDATES,
        data: positions,
    })
}

#[derive(Debug, Clone)]
struct SimVehicle {
    position: VehiclePosition,
    from: usize,
    to: usize,
    progress: f64,
}

/// In-memory fleet state advanced one tick at a time.
#[derive(Debug, Clone)]
pub struct VehicleSimulator {
    waypoints: Vec<Waypoint>,
    vehicles: Vec<SimVehicle>,
}

impl VehicleSimulator {
    /// Place each vehicle at a random waypoint heading to another one.
    ///
    /// With fewer than two waypoints there is nowhere to drive and the
    /// simulator stays empty. Vehicles of an unknown class are skipped.
    pub fn new<R: Rng>(waypoints: Vec<Waypoint>, vehicles: Vec<Vehicle>, rng: &mut R) -> Self {
        if waypoints.len() < 2 {
            return Self {
                waypoints,
                vehicles: Vec::new(),
            };
        }

        let vehicles = vehicles
            .into_iter()
            .filter_map(|v| {
                let kind = VehicleClass::parse(&v.vehicle_class)?;
                let from = rng.random_range(0..waypoints.len());
                let to = pick_destination(waypoints.len(), from, None, rng);
                let start = waypoints[from];
                Some(SimVehicle {
                    position: VehiclePosition {
                        vehicle_id: v.id,
                        kind,
                        line: v.line,
                        reg_number: v.reg_nr,
                        lat: start.lat,
                        lng: start.lng,
                        heading: heading(start, waypoints[to]),
                        speed: rng.random_range(SPEED_RANGE),
                    },
                    from,
                    to,
                    progress: 0.0,
                })
            })
            .collect();

        Self {
            waypoints,
            vehicles,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Current positions without advancing.
    pub fn positions(&self) -> Vec<VehiclePosition> {
        self.vehicles.iter().map(|v| v.position.clone()).collect()
    }

    /// Advance every vehicle by one tick and return the new positions.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> Vec<VehiclePosition> {
        let count = self.waypoints.len();
        for vehicle in &mut self.vehicles {
            let start = self.waypoints[vehicle.from];
            let end = self.waypoints[vehicle.to];
            let distance = (end.lat - start.lat).hypot(end.lng - start.lng);
            vehicle.progress += STEP_DEGREES / distance.max(MIN_SEGMENT_DEGREES);

            if vehicle.progress >= 1.0 {
                let previous = vehicle.from;
                vehicle.from = vehicle.to;
                vehicle.to = pick_destination(count, vehicle.from, Some(previous), rng);
                vehicle.progress = 0.0;

                let here = self.waypoints[vehicle.from];
                vehicle.position.lat = here.lat;
                vehicle.position.lng = here.lng;
                vehicle.position.heading = heading(here, self.waypoints[vehicle.to]);
                vehicle.position.speed = rng.random_range(SPEED_RANGE);
            } else {
                vehicle.position.lat = start.lat + (end.lat - start.lat) * vehicle.progress;
                vehicle.position.lng = start.lng + (end.lng - start.lng) * vehicle.progress;
                vehicle.position.heading = heading(start, end);
            }
        }
        self.positions()
    }
}

/// Pick a waypoint index other than `current`, avoiding `previous` when
/// there is any other choice. `count` must be at least 2.
fn pick_destination<R: Rng>(
    count: usize,
    current: usize,
    previous: Option<usize>,
    rng: &mut R,
) -> usize {
    let candidates: Vec<usize> = (0..count)
        .filter(|&i| i != current && Some(i) != previous)
        .collect();
    if candidates.is_empty() {
        return (0..count).find(|&i| i != current).unwrap_or(current);
    }
    candidates[rng.random_range(0..candidates.len())]
}

/// Marker rotation for travel from `a` to `b`, in degrees.
fn heading(a: Waypoint, b: Waypoint) -> f64 {
    (b.lat - a.lat).atan2(b.lng - a.lng).to_degrees() + 90.0
}

/// Load waypoints and the fleet from the database.
pub async fn load<R: Rng>(pool: &PgPool, rng: &mut R) -> Result<VehicleSimulator, sqlx::Error> {
    let waypoints = IntersectionRepo::list(pool)
        .await?
        .into_iter()
        .map(|i| Waypoint {
            lat: i.lat,
            lng: i.lng,
        })
        .collect();

    let mut vehicles = Vec::new();
    for (class, per_class) in FLEET {
        vehicles.extend(VehicleRepo::list_by_class(pool, class.as_str(), per_class).await?);
    }

    Ok(VehicleSimulator::new(waypoints, vehicles, rng))
}

/// Spawn the simulator loop. It exits immediately when disabled or when
/// there is nothing to simulate, otherwise runs until `cancel` fires.
pub fn start_simulator(
    pool: PgPool,
    ws_manager: Arc<WsManager>,
    config: SimulatorConfig,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(run(pool, ws_manager, config, cancel))
}

async fn run(
    pool: PgPool,
    ws_manager: Arc<WsManager>,
    config: SimulatorConfig,
    cancel: CancellationToken,
) {
    if !config.enabled {
        tracing::info!("Vehicle simulator disabled");
        return;
    }

    let mut rng = StdRng::from_os_rng();
    let mut simulator = match load(&pool, &mut rng).await {
        Ok(sim) if sim.is_empty() => {
            tracing::warn!("Vehicle simulator has no vehicles or waypoints, not starting");
            return;
        }
        Ok(sim) => sim,
        Err(e) => {
            tracing::error!(error = %e, "Vehicle simulator failed to load");
            return;
        }
    };

    tracing::info!(
        vehicles = simulator.vehicles.len(),
        interval_ms = config.interval_ms,
        "Vehicle simulator started"
    );

    let mut interval = tokio::time::interval(Duration::from_millis(config.interval_ms.max(1)));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Vehicle simulator stopping");
                break;
            }
            _ = interval.tick() => {
                let positions = simulator.step(&mut rng);
                match updates_message(&positions) {
                    Ok(text) => {
                        let sent = ws_manager.broadcast_text(text).await;
                        tracing::trace!(sent, "Vehicle updates broadcast");
                    }
                    Err(e) => tracing::error!(error = %e, "Failed to encode vehicle updates"),
                }
            }
        }
    }
}
