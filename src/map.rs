//! # Map canvas seam and presenter
//!
//! Rendering is owned by a map SDK on the other side of the [MapCanvas] trait: a
//! symbol layer with create/delete-by-handle and an animated camera. The
//! [MapPresenter] sits on top of it and enforces the two drawing invariants of the
//! workflow: at most one aircraft symbol exists at a time, and every waypoint
//! symbol is keyed by the waypoint identity so it can be removed together with its
//! waypoint.

use std::collections::BTreeMap;
use std::time::Duration;

use log::debug;

use crate::geo::Coordinate;
use crate::mission::WaypointId;

/// Icon image id of the aircraft symbol.
pub const AIRCRAFT_ICON: &str = "airport";
/// Icon image id of waypoint symbols.
pub const WAYPOINT_ICON: &str = "castle-15";

const ICON_SIZE: f32 = 1.3;
const AIRCRAFT_SORT_KEY: f32 = 10.0;
const WAYPOINT_SORT_KEY: f32 = 5.0;
const WAYPOINT_COLOR: &str = "rgba(0, 0, 255, 1)";

const LOCATE_ZOOM: f64 = 18.0;
const LOCATE_TILT: f64 = 20.0;
const LOCATE_DURATION: Duration = Duration::from_millis(4000);

/// Handle of a symbol created on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(pub u64);

/// Appearance and behavior of a symbol to create.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolOptions {
    /// Where to draw the symbol.
    pub position: Coordinate,
    /// Icon image id, must be registered with the map style.
    pub icon: &'static str,
    /// Icon scale factor.
    pub icon_size: f32,
    /// Icon tint as an rgba string, or None for the icon's own colors.
    pub icon_color: Option<&'static str>,
    /// Z-ordering key, higher draws on top.
    pub sort_key: f32,
    /// Whether the user can drag the symbol.
    pub draggable: bool,
}

/// An animated camera move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMove {
    /// Point to center on.
    pub target: Coordinate,
    /// Target zoom level.
    pub zoom: f64,
    /// Target tilt in degrees.
    pub tilt: f64,
    /// Animation duration.
    pub duration: Duration,
}

/// Surface the map SDK exposes to this crate.
pub trait MapCanvas: Send + Sync {
    /// Create a symbol and return its handle.
    fn create_symbol(&mut self, options: SymbolOptions) -> SymbolId;

    /// Delete a symbol by handle. Unknown handles are ignored.
    fn delete_symbol(&mut self, id: SymbolId);

    /// Fly the camera to a new position.
    fn animate_camera(&mut self, movement: CameraMove);
}

/// Draws the aircraft and the waypoints of the editing session.
pub struct MapPresenter {
    canvas: Box<dyn MapCanvas>,
    aircraft_symbol: Option<SymbolId>,
    waypoint_symbols: BTreeMap<WaypointId, SymbolId>,
}

impl MapPresenter {
    /// Create a presenter drawing on the given canvas.
    pub fn new(canvas: Box<dyn MapCanvas>) -> Self {
        Self {
            canvas,
            aircraft_symbol: None,
            waypoint_symbols: BTreeMap::new(),
        }
    }

    /// Redraw the aircraft symbol at a new position.
    ///
    /// The previous aircraft symbol, if any, is deleted first. The new symbol is
    /// only drawn when the position passes the GPS validity check, so a stale or
    /// sentinel position clears the aircraft from the map.
    pub fn update_position(&mut self, position: Coordinate) {
        if let Some(symbol) = self.aircraft_symbol.take() {
            self.canvas.delete_symbol(symbol);
        }
        if position.is_valid() {
            let symbol = self.canvas.create_symbol(SymbolOptions {
                position,
                icon: AIRCRAFT_ICON,
                icon_size: ICON_SIZE,
                icon_color: None,
                sort_key: AIRCRAFT_SORT_KEY,
                draggable: false,
            });
            debug!("aircraft symbol {:?} at {}", symbol, position);
            self.aircraft_symbol = Some(symbol);
        }
    }

    /// Drop a draggable waypoint marker and register it under the waypoint id.
    pub fn mark_waypoint(&mut self, id: WaypointId, position: Coordinate) {
        let symbol = self.canvas.create_symbol(SymbolOptions {
            position,
            icon: WAYPOINT_ICON,
            icon_size: ICON_SIZE,
            icon_color: Some(WAYPOINT_COLOR),
            sort_key: WAYPOINT_SORT_KEY,
            draggable: true,
        });
        self.waypoint_symbols.insert(id, symbol);
    }

    /// Delete the marker of a removed waypoint. Returns false if no marker was
    /// registered for the id.
    pub fn remove_waypoint(&mut self, id: WaypointId) -> bool {
        match self.waypoint_symbols.remove(&id) {
            Some(symbol) => {
                self.canvas.delete_symbol(symbol);
                true
            }
            None => false,
        }
    }

    /// Fly the camera to the aircraft.
    pub fn locate(&mut self, position: Coordinate) {
        self.canvas.animate_camera(CameraMove {
            target: position,
            zoom: LOCATE_ZOOM,
            tilt: LOCATE_TILT,
            duration: LOCATE_DURATION,
        });
    }

    /// Number of waypoint markers currently on the map.
    pub fn waypoint_symbol_count(&self) -> usize {
        self.waypoint_symbols.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct CanvasLog {
        next_id: u64,
        alive: Vec<(SymbolId, SymbolOptions)>,
        camera_moves: Vec<CameraMove>,
    }

    #[derive(Clone, Default)]
    struct RecordingCanvas {
        log: Arc<Mutex<CanvasLog>>,
    }

    impl MapCanvas for RecordingCanvas {
        fn create_symbol(&mut self, options: SymbolOptions) -> SymbolId {
            let mut log = self.log.lock().unwrap();
            let id = SymbolId(log.next_id);
            log.next_id += 1;
            log.alive.push((id, options));
            id
        }

        fn delete_symbol(&mut self, id: SymbolId) {
            let mut log = self.log.lock().unwrap();
            log.alive.retain(|(alive_id, _)| *alive_id != id);
        }

        fn animate_camera(&mut self, movement: CameraMove) {
            self.log.lock().unwrap().camera_moves.push(movement);
        }
    }

    fn presenter() -> (MapPresenter, Arc<Mutex<CanvasLog>>) {
        let canvas = RecordingCanvas::default();
        let log = canvas.log.clone();
        (MapPresenter::new(Box::new(canvas)), log)
    }

    #[test]
    fn aircraft_symbol_is_replaced_not_duplicated() {
        let (mut presenter, log) = presenter();

        presenter.update_position(Coordinate::new(1.0, 2.0));
        presenter.update_position(Coordinate::new(1.1, 2.1));

        let log = log.lock().unwrap();
        let aircraft: Vec<_> = log
            .alive
            .iter()
            .filter(|(_, opts)| opts.icon == AIRCRAFT_ICON)
            .collect();
        assert_eq!(aircraft.len(), 1);
        assert_eq!(aircraft[0].1.position, Coordinate::new(1.1, 2.1));
    }

    #[test]
    fn invalid_position_clears_the_aircraft() {
        let (mut presenter, log) = presenter();

        presenter.update_position(Coordinate::new(1.0, 2.0));
        presenter.update_position(Coordinate::UNKNOWN);

        assert!(log.lock().unwrap().alive.is_empty());
    }

    #[test]
    fn invalid_position_draws_nothing() {
        let (mut presenter, log) = presenter();
        presenter.update_position(Coordinate::new(0.0, 0.0));
        assert!(log.lock().unwrap().alive.is_empty());
    }

    #[test]
    fn waypoint_markers_are_draggable_and_blue() {
        let (mut presenter, log) = presenter();
        let mut draft = crate::mission::MissionDraft::new();
        let id = draft.add_waypoint(Coordinate::new(1.0, 2.0));

        presenter.mark_waypoint(id, Coordinate::new(1.0, 2.0));

        let log = log.lock().unwrap();
        let (_, opts) = &log.alive[0];
        assert_eq!(opts.icon, WAYPOINT_ICON);
        assert!(opts.draggable);
        assert_eq!(opts.icon_color, Some(WAYPOINT_COLOR));
        assert_eq!(opts.sort_key, WAYPOINT_SORT_KEY);
    }

    #[test]
    fn removing_a_waypoint_deletes_its_marker() {
        let (mut presenter, log) = presenter();
        let mut draft = crate::mission::MissionDraft::new();
        let first = draft.add_waypoint(Coordinate::new(1.0, 2.0));
        let second = draft.add_waypoint(Coordinate::new(3.0, 4.0));

        presenter.mark_waypoint(first, Coordinate::new(1.0, 2.0));
        presenter.mark_waypoint(second, Coordinate::new(3.0, 4.0));
        assert!(presenter.remove_waypoint(first));
        assert!(!presenter.remove_waypoint(first));

        assert_eq!(presenter.waypoint_symbol_count(), 1);
        assert_eq!(log.lock().unwrap().alive.len(), 1);
    }

    #[test]
    fn locate_flies_the_camera() {
        let (mut presenter, log) = presenter();
        presenter.locate(Coordinate::new(1.0, 2.0));

        let log = log.lock().unwrap();
        assert_eq!(log.camera_moves.len(), 1);
        assert_eq!(log.camera_moves[0].zoom, 18.0);
        assert_eq!(log.camera_moves[0].tilt, 20.0);
        assert_eq!(log.camera_moves[0].duration, Duration::from_millis(4000));
    }
}
