//! # Flight platform seams
//!
//! The aircraft itself is driven by a vendor flight stack: connection management,
//! telemetry pushes and the waypoint mission state machine all live on the other
//! side of these traits. This crate only wires them together, so the traits mirror
//! the surface the vendor exposes: a connection-change broadcast, a
//! flight-controller state stream and a mission operator with a small command set
//! plus an event stream.
//!
//! Platform callbacks arrive on whatever task the platform implementation runs
//! them on. Implementations only ever hand data over through channels; all session
//! state is mutated from the single session task (see [crate::session]).

use std::sync::Arc;

use async_trait::async_trait;

use crate::geo::Coordinate;
use crate::mission::WaypointMission;
use crate::Result;

/// Connection-change broadcast payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A product was connected. The flight-state stream should be (re-)resolved.
    Connected,
    /// The product went away.
    Disconnected,
}

/// One state push from the flight controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightState {
    /// Aircraft latitude in degrees.
    pub latitude: f64,
    /// Aircraft longitude in degrees.
    pub longitude: f64,
}

impl FlightState {
    /// The aircraft position carried by this push.
    pub fn position(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Upload/execution progress attached to mission events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionProgress {
    /// Index of the waypoint currently being transferred or flown.
    pub target_waypoint_index: usize,
    /// Total number of waypoints in the mission.
    pub total_waypoint_count: usize,
}

/// States of the platform's mission operator state machine.
///
/// The operator is the source of truth for mission state; this crate never tracks
/// its own copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorState {
    /// State cannot be determined.
    Unknown,
    /// No aircraft connected.
    Disconnected,
    /// Connected product has no waypoint mission support.
    NotSupported,
    /// A mission is loaded and can be uploaded.
    ReadyToUpload,
    /// Upload in progress.
    Uploading,
    /// Uploaded mission can be started.
    ReadyToExecute,
    /// Mission is flying.
    Executing,
    /// Execution paused from the remote controller.
    ExecutionPaused,
}

/// Events pushed by the mission operator.
///
/// This mirrors the vendor listener interface one-to-one. Most consumers only care
/// about [MissionEvent::ExecutionFinish]; see
/// [MissionControl](crate::subsystems::mission_control::MissionControl) which
/// narrows the stream down to that event.
#[derive(Debug, Clone, PartialEq)]
pub enum MissionEvent {
    /// Progress of a mission download from the aircraft.
    DownloadUpdate(MissionProgress),
    /// Progress of a mission upload to the aircraft.
    UploadUpdate(MissionProgress),
    /// Progress while the mission is flying.
    ExecutionUpdate(MissionProgress),
    /// The aircraft started executing the mission.
    ExecutionStart,
    /// Execution ended. Carries the platform error description, or None on success.
    ExecutionFinish(Option<String>),
    /// The operator state machine moved to a new state.
    StateChange(OperatorState),
}

/// The platform's waypoint mission operator.
///
/// Commands resolve once the platform reports completion; a failure resolves to
/// [Error::Sdk](crate::Error::Sdk) carrying the platform's error description.
#[async_trait]
pub trait MissionOperator: Send + Sync {
    /// Load a mission into the operator, replacing any previously loaded one.
    async fn load(&self, mission: WaypointMission) -> Result<()>;

    /// Upload the loaded mission to the aircraft.
    async fn upload(&self) -> Result<()>;

    /// Retry an upload that just failed.
    async fn retry_upload(&self) -> Result<()>;

    /// Start executing the uploaded mission.
    async fn start(&self) -> Result<()>;

    /// Stop the executing mission.
    async fn stop(&self) -> Result<()>;

    /// Current state of the operator state machine.
    fn state(&self) -> OperatorState;

    /// Subscribe to the operator's event pushes.
    fn events(&self) -> flume::Receiver<MissionEvent>;
}

/// Entry point into the vendor flight stack.
pub trait FlightPlatform: Send + Sync + 'static {
    /// Connection-change broadcasts. One event is delivered whenever a product
    /// connects or disconnects.
    fn connection_events(&self) -> flume::Receiver<ConnectionEvent>;

    /// State stream of the connected aircraft's flight controller.
    ///
    /// Returns None while no aircraft is connected; the caller is expected to try
    /// again on the next [ConnectionEvent].
    fn flight_state(&self) -> Option<flume::Receiver<FlightState>>;

    /// The platform's waypoint mission operator, or None when mission control is
    /// not available.
    fn mission_operator(&self) -> Option<Arc<dyn MissionOperator>>;
}
