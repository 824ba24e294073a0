//! # Waypoint missions
//!
//! A mission is edited as a [MissionDraft]: an ordered list of waypoints plus
//! mission-wide settings. The draft is owned by the editing session and mutated in
//! place while the operator taps waypoints and confirms settings. Only when the
//! mission is handed to the platform for loading is the draft materialized into an
//! immutable [WaypointMission] value.
//!
//! Waypoints carry a stable [WaypointId] so that map symbols and other per-waypoint
//! state can be keyed on waypoint identity and survive removals.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::geo::Coordinate;
use crate::{Error, Result};

/// Minimum number of waypoints the platform accepts in a mission.
pub const MIN_WAYPOINT_COUNT: usize = 2;
/// Maximum number of waypoints the platform accepts in a mission.
pub const MAX_WAYPOINT_COUNT: usize = 99;

/// Action the aircraft executes when it reaches a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum WaypointActionType {
    /// Hover in place, the parameter is the stay time in milliseconds.
    Stay = 0,
    /// Trigger the camera shutter once.
    StartTakePhoto = 1,
    /// Start video recording.
    StartRecord = 2,
    /// Stop video recording.
    StopRecord = 3,
    /// Rotate to the heading given by the parameter, in degrees.
    RotateAircraft = 4,
}

/// A single action attached to a waypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaypointAction {
    /// What to do at the waypoint.
    pub action: WaypointActionType,
    /// Action parameter, meaning depends on the action type.
    pub param: i32,
}

impl Default for WaypointAction {
    fn default() -> Self {
        Self {
            action: WaypointActionType::StartTakePhoto,
            param: 0,
        }
    }
}

/// A target the aircraft should visit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Horizontal position.
    pub position: Coordinate,
    /// Altitude in meters above the take-off point.
    pub altitude: f32,
    /// Action executed on arrival.
    pub action: WaypointAction,
}

impl Waypoint {
    /// Create a waypoint at the given position and altitude with the default action.
    pub fn new(position: Coordinate, altitude: f32) -> Self {
        Self {
            position,
            altitude,
            action: WaypointAction::default(),
        }
    }
}

/// What the aircraft does after the last waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum FinishAction {
    /// Hover at the last waypoint.
    NoAction = 0,
    /// Return to the home point and land.
    GoHome = 1,
    /// Land at the last waypoint.
    AutoLand = 2,
    /// Fly back to the first waypoint and hover.
    GoFirstWaypoint = 3,
}

/// How the aircraft orients itself during the mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum HeadingMode {
    /// Nose points towards the next waypoint.
    Auto = 0,
    /// Keep the heading the aircraft had when the mission started.
    UsingInitialDirection = 1,
    /// Heading is controlled live from the remote controller.
    ControlByRemoteController = 2,
    /// Each waypoint specifies its own heading.
    UsingWaypointHeading = 3,
}

/// Shape of the flight path between waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum FlightPathMode {
    /// Straight lines between waypoints.
    Normal = 0,
    /// Curved corners, the aircraft does not stop at waypoints.
    Curved = 1,
}

/// Cruise speed preset offered by the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedTier {
    /// 3 m/s
    Low,
    /// 5 m/s
    Mid,
    /// 10 m/s
    High,
}

impl SpeedTier {
    /// The flight speed this tier stands for, in meters per second.
    pub fn meters_per_second(self) -> f32 {
        match self {
            SpeedTier::Low => 3.0,
            SpeedTier::Mid => 5.0,
            SpeedTier::High => 10.0,
        }
    }
}

/// Mission-wide execution settings.
///
/// The speed is applied to both the auto flight speed and the maximum flight speed
/// of the built mission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissionSettings {
    /// Behavior after the last waypoint.
    pub finish_action: FinishAction,
    /// Orientation of the aircraft during flight.
    pub heading_mode: HeadingMode,
    /// Flight speed in meters per second.
    pub speed: f32,
    /// Altitude in meters applied to newly added waypoints.
    pub altitude: f32,
    /// Path shape between waypoints.
    pub path_mode: FlightPathMode,
}

impl Default for MissionSettings {
    fn default() -> Self {
        Self {
            finish_action: FinishAction::NoAction,
            heading_mode: HeadingMode::Auto,
            speed: 10.0,
            altitude: 100.0,
            path_mode: FlightPathMode::Normal,
        }
    }
}

/// Stable identity of a waypoint within a draft.
///
/// Ids are never reused, even after the waypoint is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WaypointId(u32);

/// Mutable waypoint mission under construction.
///
/// One draft is created per editing session and owned by it. Waypoints keep their
/// insertion order; confirming new settings overwrites the altitude of every
/// waypoint already in the draft.
#[derive(Debug, Default)]
pub struct MissionDraft {
    waypoints: Vec<(WaypointId, Waypoint)>,
    settings: MissionSettings,
    next_id: u32,
}

impl MissionDraft {
    /// Create an empty draft with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mission settings.
    pub fn settings(&self) -> &MissionSettings {
        &self.settings
    }

    /// Append a waypoint at the given position, using the draft's current altitude
    /// and the default action. Returns the identity of the new waypoint.
    pub fn add_waypoint(&mut self, position: Coordinate) -> WaypointId {
        let id = WaypointId(self.next_id);
        self.next_id += 1;
        self.waypoints
            .push((id, Waypoint::new(position, self.settings.altitude)));
        id
    }

    /// Remove the waypoint with the given identity. Returns false if it was not in
    /// the draft.
    pub fn remove_waypoint(&mut self, id: WaypointId) -> bool {
        let before = self.waypoints.len();
        self.waypoints.retain(|(wp_id, _)| *wp_id != id);
        self.waypoints.len() != before
    }

    /// Number of waypoints in the draft.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the draft has no waypoints yet.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Iterate over the waypoints in insertion order.
    pub fn waypoints(&self) -> impl Iterator<Item = (WaypointId, &Waypoint)> {
        self.waypoints.iter().map(|(id, wp)| (*id, wp))
    }

    /// Replace the mission settings and propagate the new altitude to every
    /// waypoint already in the draft.
    pub fn apply_settings(&mut self, settings: MissionSettings) {
        self.settings = settings;
        for (_, waypoint) in &mut self.waypoints {
            waypoint.altitude = settings.altitude;
        }
    }

    /// Materialize the draft into an immutable mission.
    ///
    /// Fails when the waypoint count is outside the range the platform accepts
    /// ([MIN_WAYPOINT_COUNT]..=[MAX_WAYPOINT_COUNT]).
    pub fn build(&self) -> Result<WaypointMission> {
        if self.waypoints.len() < MIN_WAYPOINT_COUNT {
            return Err(Error::InvalidMission(format!(
                "mission needs at least {} waypoints, got {}",
                MIN_WAYPOINT_COUNT,
                self.waypoints.len()
            )));
        }
        if self.waypoints.len() > MAX_WAYPOINT_COUNT {
            return Err(Error::InvalidMission(format!(
                "mission is limited to {} waypoints, got {}",
                MAX_WAYPOINT_COUNT,
                self.waypoints.len()
            )));
        }

        Ok(WaypointMission {
            waypoints: self.waypoints.iter().map(|(_, wp)| *wp).collect(),
            settings: self.settings,
        })
    }
}

/// Immutable mission as handed to the platform for loading.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointMission {
    waypoints: Vec<Waypoint>,
    settings: MissionSettings,
}

impl WaypointMission {
    /// The waypoints in flight order.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// The mission-wide settings.
    pub fn settings(&self) -> &MissionSettings {
        &self.settings
    }

    /// Cruise speed in meters per second.
    pub fn auto_flight_speed(&self) -> f32 {
        self.settings.speed
    }

    /// Speed ceiling in meters per second. Same value as the cruise speed.
    pub fn max_flight_speed(&self) -> f32 {
        self.settings.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waypoints_keep_insertion_order() {
        let mut draft = MissionDraft::new();
        for i in 0..5 {
            draft.add_waypoint(Coordinate::new(f64::from(i), f64::from(i) * 2.0));
        }

        assert_eq!(draft.len(), 5);
        let latitudes: Vec<f64> = draft
            .waypoints()
            .map(|(_, wp)| wp.position.latitude)
            .collect();
        assert_eq!(latitudes, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn new_waypoints_use_current_altitude_and_default_action() {
        let mut draft = MissionDraft::new();
        let id = draft.add_waypoint(Coordinate::new(1.0, 2.0));

        let (found_id, waypoint) = draft.waypoints().next().unwrap();
        assert_eq!(found_id, id);
        assert_eq!(waypoint.altitude, 100.0);
        assert_eq!(waypoint.action.action, WaypointActionType::StartTakePhoto);
        assert_eq!(waypoint.action.param, 0);
    }

    #[test]
    fn apply_settings_overwrites_every_altitude() {
        let mut draft = MissionDraft::new();
        draft.add_waypoint(Coordinate::new(1.0, 2.0));
        draft.add_waypoint(Coordinate::new(3.0, 4.0));

        let settings = MissionSettings {
            altitude: 50.0,
            ..MissionSettings::default()
        };
        draft.apply_settings(settings);

        assert!(draft.waypoints().all(|(_, wp)| wp.altitude == 50.0));
    }

    #[test]
    fn tap_then_configure_scenario() {
        // Tap (1,2) and (3,4), then set altitude to 50 through the settings form.
        let mut draft = MissionDraft::new();
        draft.add_waypoint(Coordinate::new(1.0, 2.0));
        draft.add_waypoint(Coordinate::new(3.0, 4.0));

        let positions: Vec<(f64, f64, f32)> = draft
            .waypoints()
            .map(|(_, wp)| (wp.position.latitude, wp.position.longitude, wp.altitude))
            .collect();
        assert_eq!(positions, vec![(1.0, 2.0, 100.0), (3.0, 4.0, 100.0)]);

        draft.apply_settings(MissionSettings {
            altitude: 50.0,
            ..MissionSettings::default()
        });
        let altitudes: Vec<f32> = draft.waypoints().map(|(_, wp)| wp.altitude).collect();
        assert_eq!(altitudes, vec![50.0, 50.0]);
    }

    #[test]
    fn remove_waypoint_drops_only_that_waypoint() {
        let mut draft = MissionDraft::new();
        let first = draft.add_waypoint(Coordinate::new(1.0, 2.0));
        let second = draft.add_waypoint(Coordinate::new(3.0, 4.0));

        assert!(draft.remove_waypoint(first));
        assert!(!draft.remove_waypoint(first));
        assert_eq!(draft.len(), 1);
        assert_eq!(draft.waypoints().next().unwrap().0, second);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut draft = MissionDraft::new();
        let first = draft.add_waypoint(Coordinate::new(1.0, 2.0));
        draft.remove_waypoint(first);
        let second = draft.add_waypoint(Coordinate::new(3.0, 4.0));
        assert_ne!(first, second);
    }

    #[test]
    fn build_requires_two_waypoints() {
        let mut draft = MissionDraft::new();
        assert!(matches!(draft.build(), Err(Error::InvalidMission(_))));

        draft.add_waypoint(Coordinate::new(1.0, 2.0));
        assert!(matches!(draft.build(), Err(Error::InvalidMission(_))));

        draft.add_waypoint(Coordinate::new(3.0, 4.0));
        let mission = draft.build().unwrap();
        assert_eq!(mission.waypoints().len(), 2);
    }

    #[test]
    fn build_rejects_oversized_missions() {
        let mut draft = MissionDraft::new();
        for i in 0..=MAX_WAYPOINT_COUNT {
            draft.add_waypoint(Coordinate::new(1.0, f64::from(i as u32) * 0.001 + 0.001));
        }
        assert!(matches!(draft.build(), Err(Error::InvalidMission(_))));
    }

    #[test]
    fn built_mission_shares_one_speed() {
        let mut draft = MissionDraft::new();
        draft.add_waypoint(Coordinate::new(1.0, 2.0));
        draft.add_waypoint(Coordinate::new(3.0, 4.0));
        draft.apply_settings(MissionSettings {
            speed: SpeedTier::Mid.meters_per_second(),
            ..MissionSettings::default()
        });

        let mission = draft.build().unwrap();
        assert_eq!(mission.auto_flight_speed(), 5.0);
        assert_eq!(mission.max_flight_speed(), 5.0);
    }

    #[test]
    fn speed_tiers() {
        assert_eq!(SpeedTier::Low.meters_per_second(), 3.0);
        assert_eq!(SpeedTier::Mid.meters_per_second(), 5.0);
        assert_eq!(SpeedTier::High.meters_per_second(), 10.0);
    }
}
