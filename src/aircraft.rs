use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::Arc;
use std::time::Duration;

use futures::lock::Mutex;
use log::debug;
use tokio::task::JoinHandle;

use crate::sdk::{ConnectionEvent, FlightPlatform, FlightState};
use crate::subsystems::mission_control::MissionControl;
use crate::subsystems::telemetry::Telemetry;
use crate::{Error, Result};

// How often the connection task re-checks the disconnect flag while idle.
const DISCONNECT_POLL: Duration = Duration::from_millis(100);

/// # The Aircraft
///
/// Top-level handle to a connected aircraft. Creating it hooks into the platform's
/// connection-change broadcast and starts forwarding flight-controller state to the
/// [telemetry](Telemetry) subsystem; the waypoint mission operator is reachable
/// through the [mission](MissionControl) subsystem.
///
/// The struct is one-time use: once [Aircraft::disconnect()] has been called the
/// object cannot be reattached, a new one needs to be created.
///
/// All subsystem methods take `&self`, the intention is for the Aircraft object to
/// be shared between tasks using `Arc<>`.
pub struct Aircraft {
    /// Telemetry subsystem access
    pub telemetry: Telemetry,
    /// Mission control subsystem access
    pub mission: MissionControl,
    disconnect: Arc<AtomicBool>,
    connection_task: Mutex<Option<JoinHandle<()>>>,
}

impl Aircraft {
    /// Attach to a flight platform.
    ///
    /// Spawns the connection listener task: on every connection-change event the
    /// flight-state stream is re-resolved, and while one is available each state
    /// push is forwarded to the telemetry subsystem. When no stream is available
    /// the update is simply skipped until the next connection-change event; there
    /// is no retry or backoff.
    ///
    /// Returns an error if the platform has no waypoint mission operator.
    pub fn connect(platform: Arc<dyn FlightPlatform>) -> Result<Self> {
        let operator = platform
            .mission_operator()
            .ok_or_else(|| Error::Sdk("waypoint mission operator unavailable".to_owned()))?;

        let telemetry = Telemetry::new();
        let mission = MissionControl::new(operator);
        let disconnect = Arc::new(AtomicBool::new(false));

        let connection_task = tokio::spawn(Self::connection_loop(
            platform,
            telemetry.clone(),
            disconnect.clone(),
        ));

        Ok(Aircraft {
            telemetry,
            mission,
            disconnect,
            connection_task: Mutex::new(Some(connection_task)),
        })
    }

    async fn connection_loop(
        platform: Arc<dyn FlightPlatform>,
        telemetry: Telemetry,
        disconnect: Arc<AtomicBool>,
    ) {
        let events = platform.connection_events();
        // No state stream until the first connection-change event resolves one.
        let mut states: Option<flume::Receiver<FlightState>> = None;

        while !disconnect.load(Relaxed) {
            match states.clone() {
                Some(state_rx) => {
                    tokio::select! {
                        state = state_rx.recv_async() => match state {
                            Ok(state) => telemetry.push_state(state),
                            Err(_) => states = None,
                        },
                        event = events.recv_async() => match event {
                            Ok(event) => states = Self::resolve_states(&*platform, event),
                            Err(_) => return,
                        },
                        _ = tokio::time::sleep(DISCONNECT_POLL) => (),
                    }
                }
                None => {
                    match tokio::time::timeout(DISCONNECT_POLL, events.recv_async()).await {
                        Ok(Ok(event)) => states = Self::resolve_states(&*platform, event),
                        Ok(Err(_)) => return,
                        Err(_) => (),
                    }
                }
            }
        }
    }

    fn resolve_states(
        platform: &dyn FlightPlatform,
        event: ConnectionEvent,
    ) -> Option<flume::Receiver<FlightState>> {
        match event {
            ConnectionEvent::Connected => {
                let states = platform.flight_state();
                if states.is_none() {
                    debug!("product connected but no flight controller available");
                }
                states
            }
            ConnectionEvent::Disconnected => None,
        }
    }

    /// Detach from the platform.
    ///
    /// Stops the connection listener task. Once this function returns no further
    /// telemetry is forwarded; mission commands return whatever the platform
    /// reports for a disconnected product.
    pub async fn disconnect(&self) {
        self.disconnect.store(true, Relaxed);

        if let Some(connection_task) = self.connection_task.lock().await.take() {
            let _ = connection_task.await;
        }
    }
}

impl Drop for Aircraft {
    fn drop(&mut self) {
        self.disconnect.store(true, Relaxed);
    }
}
