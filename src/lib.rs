//! # Aircraft mission library
//!
//! This crate implements the waypoint-mission workflow of a GPS drone ground
//! station: track the aircraft's live position on a map, tap the map to build a
//! mission, configure mission-wide settings, and load/upload/start/stop the
//! mission on the aircraft.
//!
//! The heavy lifting (flight control, mission execution, map rendering) is done by
//! a vendor flight stack and a map SDK. Both stay behind trait seams:
//! [sdk::FlightPlatform] for the flight side and [map::MapCanvas] for the map
//! side. This crate owns the glue: the mission draft, the drawing invariants, the
//! upload retry policy and the single-task message pump that keeps all workflow
//! state on one task.
//!
//! ## Status
//!
//! | Component | Support |
//! |-----------|---------|
//! | Telemetry | Full (position only) |
//! | Mission draft | Full (add/remove/settings) |
//! | Mission control | Full (load, upload + retry, start, stop) |
//! | Map presenter | Full (aircraft symbol, waypoint markers, locate) |
//! | Mission download | None |
//!
//! ## Usage
//!
//! The basic procedure is:
//!  - Implement [sdk::FlightPlatform] over the vendor flight stack and
//!    [map::MapCanvas] over the map view.
//!  - Create an [Aircraft] from the platform; telemetry and mission control are
//!    available as public fields.
//!  - Create a [Session] per mission to edit, feed it [Input]s and render the
//!    [Notice]s it emits.
//!
//! For example:
//! ``` no_run
//! # use std::sync::Arc;
//! # async fn test(
//! #     platform: Arc<dyn aircraft_mission::sdk::FlightPlatform>,
//! #     canvas: Box<dyn aircraft_mission::map::MapCanvas>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! use aircraft_mission::{Aircraft, Input, Session};
//!
//! let aircraft = Arc::new(Aircraft::connect(platform)?);
//! let (session, notices) = Session::new(aircraft, canvas);
//!
//! let (inputs, input_rx) = flume::unbounded();
//! tokio::spawn(session.run(input_rx));
//!
//! inputs.send_async(Input::ToggleEditMode).await?;
//! inputs.send_async(Input::MapTap(aircraft_mission::Coordinate::new(1.0, 2.0))).await?;
//!
//! while let Ok(notice) = notices.recv_async().await {
//!     println!("{}", notice);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod aircraft;
mod error;
mod geo;
mod mission;
mod session;

pub mod map;
pub mod sdk;
pub mod subsystems;

pub use crate::aircraft::Aircraft;
pub use crate::error::{Error, Result};
pub use crate::geo::Coordinate;
pub use crate::mission::{
    FinishAction, FlightPathMode, HeadingMode, MissionDraft, MissionSettings, SpeedTier, Waypoint,
    WaypointAction, WaypointActionType, WaypointId, WaypointMission, MAX_WAYPOINT_COUNT,
    MIN_WAYPOINT_COUNT,
};
pub use crate::session::{EditMode, Input, Notice, Session, SettingsForm};
pub use crate::subsystems::mission_control::UploadOutcome;
