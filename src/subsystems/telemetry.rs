//! # Telemetry subsystem
//!
//! The flight controller pushes its state periodically while an aircraft is
//! connected. This subsystem keeps the latest reported position and broadcasts
//! every push to any number of subscribers. The raw position is recorded as
//! reported, sentinel included; validation happens where the position is used
//! (see [MapPresenter](crate::map::MapPresenter)).

use std::sync::{Arc, Mutex};

use async_broadcast::{broadcast, InactiveReceiver, Sender};
use futures::Stream;

use crate::geo::Coordinate;
use crate::sdk::FlightState;

const POSITION_BACKLOG: usize = 64;

/// # Access to the telemetry subsystem
///
/// See the [telemetry module documentation](crate::subsystems::telemetry) for more
/// context and information.
#[derive(Clone)]
pub struct Telemetry {
    inner: Arc<TelemetryInner>,
}

struct TelemetryInner {
    last_position: Mutex<Coordinate>,
    position_broadcast: Sender<Coordinate>,
    position_subscribe: InactiveReceiver<Coordinate>,
}

impl Telemetry {
    pub(crate) fn new() -> Self {
        let (mut position_broadcast, position_receiver) = broadcast(POSITION_BACKLOG);
        // Slow subscribers lose the oldest positions instead of holding up the
        // connection task.
        position_broadcast.set_overflow(true);

        Self {
            inner: Arc::new(TelemetryInner {
                last_position: Mutex::new(Coordinate::UNKNOWN),
                position_broadcast,
                position_subscribe: position_receiver.deactivate(),
            }),
        }
    }

    /// Record one state push from the flight controller.
    pub(crate) fn push_state(&self, state: FlightState) {
        let position = state.position();
        *self.inner.last_position.lock().unwrap() = position;
        let _ = self.inner.position_broadcast.try_broadcast(position);
    }

    /// The most recently reported position.
    ///
    /// Returns [Coordinate::UNKNOWN] until the first state push arrives. The value
    /// is reported as-is and may fail [Coordinate::is_valid].
    pub fn last_position(&self) -> Coordinate {
        *self.inner.last_position.lock().unwrap()
    }

    /// Subscribe to position pushes.
    ///
    /// Each subscriber gets every position reported after the moment of
    /// subscription.
    pub fn position_stream(&self) -> impl Stream<Item = Coordinate> {
        self.inner.position_subscribe.activate_cloned()
    }
}
