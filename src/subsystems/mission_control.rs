//! # Mission control subsystem
//!
//! Thin proxy in front of the platform's waypoint mission operator. Commands are
//! forwarded as-is; the operator's own state machine is the source of truth and no
//! mission state is tracked here.
//!
//! The one piece of policy this subsystem owns is the upload retry: a failed
//! upload is retried exactly once, and both outcomes are reported to the caller
//! through [UploadOutcome].
//!
//! The operator pushes a full event stream ([MissionEvent]); of those events the
//! workflow only ever acts on the execution-finished one, so it is re-exposed here
//! as a dedicated broadcast stream instead of a listener interface full of no-op
//! handlers.

use std::sync::Arc;

use async_broadcast::{broadcast, InactiveReceiver};
use futures::Stream;
use log::{debug, warn};

use crate::mission::WaypointMission;
use crate::sdk::{MissionEvent, MissionOperator, OperatorState};
use crate::Result;

const FINISH_BACKLOG: usize = 16;

/// Outcome of an upload request, including the automatic retry.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// The first attempt succeeded.
    Uploaded,
    /// The first attempt failed, the retry succeeded.
    RetrySucceeded {
        /// Description of the first attempt's failure.
        first_error: String,
    },
    /// Both attempts failed.
    RetryFailed {
        /// Description of the first attempt's failure.
        first_error: String,
        /// Description of the retry's failure.
        retry_error: String,
    },
}

/// # Access to the mission control subsystem
///
/// See the [mission control module documentation](crate::subsystems::mission_control)
/// for more context and information.
pub struct MissionControl {
    operator: Arc<dyn MissionOperator>,
    finished_subscribe: InactiveReceiver<Option<String>>,
    _event_task: tokio::task::JoinHandle<()>,
}

impl MissionControl {
    pub(crate) fn new(operator: Arc<dyn MissionOperator>) -> Self {
        let (mut finished_broadcast, finished_receiver) = broadcast(FINISH_BACKLOG);
        finished_broadcast.set_overflow(true);

        let events = operator.events();
        let event_task = tokio::spawn(async move {
            while let Ok(event) = events.recv_async().await {
                debug!("mission event: {:?}", event);
                if let MissionEvent::ExecutionFinish(error) = event {
                    let _ = finished_broadcast.try_broadcast(error);
                }
            }
        });

        Self {
            operator,
            finished_subscribe: finished_receiver.deactivate(),
            _event_task: event_task,
        }
    }

    /// Load a mission into the operator, replacing any previously loaded one.
    pub async fn load(&self, mission: WaypointMission) -> Result<()> {
        self.operator.load(mission).await
    }

    /// Upload the loaded mission to the aircraft.
    ///
    /// A failed upload is retried once. Both results are captured in the returned
    /// [UploadOutcome]; a second failure ends the attempt, there is no backoff or
    /// further retry.
    pub async fn upload(&self) -> UploadOutcome {
        match self.operator.upload().await {
            Ok(()) => UploadOutcome::Uploaded,
            Err(first) => {
                warn!("mission upload failed, retrying: {}", first);
                match self.operator.retry_upload().await {
                    Ok(()) => UploadOutcome::RetrySucceeded {
                        first_error: first.to_string(),
                    },
                    Err(retry) => UploadOutcome::RetryFailed {
                        first_error: first.to_string(),
                        retry_error: retry.to_string(),
                    },
                }
            }
        }
    }

    /// Start executing the uploaded mission.
    pub async fn start(&self) -> Result<()> {
        self.operator.start().await
    }

    /// Stop the executing mission.
    pub async fn stop(&self) -> Result<()> {
        self.operator.stop().await
    }

    /// Current state of the operator state machine.
    pub fn state(&self) -> OperatorState {
        self.operator.state()
    }

    /// Subscribe to execution-finished events.
    ///
    /// Yields the platform error description of the finished execution, or None
    /// when the mission completed successfully.
    pub fn execution_finished(&self) -> impl Stream<Item = Option<String>> {
        self.finished_subscribe.activate_cloned()
    }
}
