//! # Mission editing session
//!
//! The operator-facing workflow: six buttons (locate, add/exit, config, upload,
//! start, stop) plus map taps, with every asynchronous result reported as a
//! [Notice].
//!
//! All session state (draft, presenter, edit mode) is owned by the [Session] and
//! mutated from a single task: [Session::run] pumps inputs, telemetry positions
//! and execution-finished events out of channels and is the only code that touches
//! the state. Platform tasks never reach into the session, they only send
//! messages. This replaces the "marshal every callback onto the UI thread"
//! discipline of a GUI toolkit with a plain message loop.

use std::sync::Arc;

use futures::StreamExt;
use log::{debug, warn};

use crate::aircraft::Aircraft;
use crate::geo::Coordinate;
use crate::map::{MapCanvas, MapPresenter};
use crate::mission::{FinishAction, HeadingMode, MissionDraft, MissionSettings, SpeedTier};
use crate::subsystems::mission_control::UploadOutcome;

/// Whether map taps create waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Taps are rejected.
    Browse,
    /// Each tap appends a waypoint.
    AddWaypoints,
}

impl EditMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            EditMode::Browse => EditMode::AddWaypoints,
            EditMode::AddWaypoints => EditMode::Browse,
        }
    }

    /// Label of the add/exit toggle button in this mode.
    pub fn button_label(self) -> &'static str {
        match self {
            EditMode::Browse => "Add",
            EditMode::AddWaypoints => "Exit",
        }
    }
}

/// Contents of the mission settings dialog at confirm time.
///
/// Three exclusive-choice groups plus the free-text altitude field.
#[derive(Debug, Clone)]
pub struct SettingsForm {
    /// Altitude text field, parsed as an integer number of meters.
    pub altitude: String,
    /// Selected speed tier.
    pub speed: SpeedTier,
    /// Selected finish action.
    pub finish_action: FinishAction,
    /// Selected heading mode.
    pub heading_mode: HeadingMode,
}

impl SettingsForm {
    /// Convert the form into mission settings.
    ///
    /// An altitude that does not parse as an integer coerces to 0; the rejected
    /// raw text is returned alongside so the caller can warn the operator instead
    /// of silently flying at ground level.
    pub fn into_settings(self) -> (MissionSettings, Option<String>) {
        let (altitude, rejected) = match self.altitude.replace(' ', "").parse::<i32>() {
            Ok(meters) => (meters as f32, None),
            Err(_) => (0.0, Some(self.altitude)),
        };

        let settings = MissionSettings {
            finish_action: self.finish_action,
            heading_mode: self.heading_mode,
            speed: self.speed.meters_per_second(),
            altitude,
            ..MissionSettings::default()
        };
        (settings, rejected)
    }
}

/// Operator inputs driving the session.
#[derive(Debug, Clone)]
pub enum Input {
    /// Redraw the aircraft and fly the camera to it.
    Locate,
    /// Flip between browse and add mode.
    ToggleEditMode,
    /// The settings dialog was confirmed.
    Configure(SettingsForm),
    /// Upload the loaded mission.
    Upload,
    /// Start the uploaded mission.
    Start,
    /// Stop the executing mission.
    Stop,
    /// The map was tapped.
    MapTap(Coordinate),
}

/// User-facing result messages, one per asynchronous outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The mission was loaded into the operator.
    MissionLoaded,
    /// Loading failed. Carries the reason.
    MissionLoadFailed(String),
    /// Altitudes of the existing waypoints were overwritten.
    WaypointAltitudesUpdated,
    /// The altitude field did not parse and was coerced to 0.
    AltitudeDefaulted(String),
    /// A tap was rejected because add mode is off.
    WaypointRejected,
    /// Upload succeeded (possibly on the retry).
    UploadSucceeded,
    /// Upload failed and is being retried. Carries the first error.
    UploadRetrying(String),
    /// The retry failed too. Carries the retry error.
    UploadRetryFailed(String),
    /// Mission start result, None on success.
    MissionStart(Option<String>),
    /// Mission stop result, None on success.
    MissionStop(Option<String>),
    /// The platform reported the end of execution, None on success.
    ExecutionFinished(Option<String>),
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::MissionLoaded => write!(f, "loadWaypoint succeeded"),
            Notice::MissionLoadFailed(reason) => write!(f, "loadWaypoint failed {}", reason),
            Notice::WaypointAltitudesUpdated => write!(f, "Set Waypoint altitude successfully"),
            Notice::AltitudeDefaulted(raw) => {
                write!(f, "Invalid altitude '{}', defaulting to 0", raw)
            }
            Notice::WaypointRejected => write!(f, "Cannot add waypoint"),
            Notice::UploadSucceeded => write!(f, "Mission upload successful!"),
            Notice::UploadRetrying(reason) => {
                write!(f, "Mission upload failed, error: {} retrying ...", reason)
            }
            Notice::UploadRetryFailed(reason) => {
                write!(f, "Mission upload retry failed, error: {}", reason)
            }
            Notice::MissionStart(None) => write!(f, "Mission Start: Successful"),
            Notice::MissionStart(Some(reason)) => write!(f, "Mission Start: {}", reason),
            Notice::MissionStop(None) => write!(f, "Mission Stop: Successful"),
            Notice::MissionStop(Some(reason)) => write!(f, "Mission Stop: {}", reason),
            Notice::ExecutionFinished(None) => write!(f, "Execution finished: Success!"),
            Notice::ExecutionFinished(Some(reason)) => {
                write!(f, "Execution finished: {}", reason)
            }
        }
    }
}

/// One mission-editing session.
///
/// Owns the mission draft, the map presenter and the edit mode. Created per
/// mission; a new mission means a new session.
pub struct Session {
    aircraft: Arc<Aircraft>,
    presenter: MapPresenter,
    draft: MissionDraft,
    mode: EditMode,
    notices: flume::Sender<Notice>,
}

impl Session {
    /// Create a session for the given aircraft, drawing on the given canvas.
    ///
    /// Returns the session and the receiving end of its notice channel.
    pub fn new(aircraft: Arc<Aircraft>, canvas: Box<dyn MapCanvas>) -> (Self, flume::Receiver<Notice>) {
        let (notices, notice_rx) = flume::unbounded();
        (
            Self {
                aircraft,
                presenter: MapPresenter::new(canvas),
                draft: MissionDraft::new(),
                mode: EditMode::Browse,
                notices,
            },
            notice_rx,
        )
    }

    /// Current edit mode.
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// The mission draft being edited.
    pub fn draft(&self) -> &MissionDraft {
        &self.draft
    }

    /// Handle one operator input.
    pub async fn handle(&mut self, input: Input) {
        match input {
            Input::Locate => {
                let position = self.aircraft.telemetry.last_position();
                self.presenter.update_position(position);
                self.presenter.locate(position);
            }
            Input::ToggleEditMode => {
                self.mode = self.mode.toggled();
                debug!("edit mode: {:?}", self.mode);
            }
            Input::MapTap(position) => self.handle_tap(position).await,
            Input::Configure(form) => self.configure(form).await,
            Input::Upload => self.upload().await,
            Input::Start => {
                let result = self.aircraft.mission.start().await;
                self.notify(Notice::MissionStart(result.err().map(|e| e.to_string())))
                    .await;
            }
            Input::Stop => {
                let result = self.aircraft.mission.stop().await;
                self.notify(Notice::MissionStop(result.err().map(|e| e.to_string())))
                    .await;
            }
        }
    }

    async fn handle_tap(&mut self, position: Coordinate) {
        if self.mode != EditMode::AddWaypoints {
            self.notify(Notice::WaypointRejected).await;
            return;
        }
        let id = self.draft.add_waypoint(position);
        self.presenter.mark_waypoint(id, position);
    }

    async fn configure(&mut self, form: SettingsForm) {
        let (settings, rejected_altitude) = form.into_settings();
        if let Some(raw) = rejected_altitude {
            warn!("altitude field '{}' did not parse, using 0", raw);
            self.notify(Notice::AltitudeDefaulted(raw)).await;
        }
        debug!(
            "configure: speed {} finish {:?} heading {:?} altitude {}",
            settings.speed, settings.finish_action, settings.heading_mode, settings.altitude
        );

        let had_waypoints = !self.draft.is_empty();
        self.draft.apply_settings(settings);
        if had_waypoints {
            self.notify(Notice::WaypointAltitudesUpdated).await;
        }

        let load_result = match self.draft.build() {
            Ok(mission) => self.aircraft.mission.load(mission).await,
            Err(error) => Err(error),
        };
        match load_result {
            Ok(()) => self.notify(Notice::MissionLoaded).await,
            Err(error) => {
                self.notify(Notice::MissionLoadFailed(error.to_string()))
                    .await
            }
        }
    }

    async fn upload(&mut self) {
        match self.aircraft.mission.upload().await {
            UploadOutcome::Uploaded => self.notify(Notice::UploadSucceeded).await,
            UploadOutcome::RetrySucceeded { first_error } => {
                self.notify(Notice::UploadRetrying(first_error)).await;
                self.notify(Notice::UploadSucceeded).await;
            }
            UploadOutcome::RetryFailed {
                first_error,
                retry_error,
            } => {
                self.notify(Notice::UploadRetrying(first_error)).await;
                self.notify(Notice::UploadRetryFailed(retry_error)).await;
            }
        }
    }

    async fn notify(&self, notice: Notice) {
        let _ = self.notices.send_async(notice).await;
    }

    /// Run the session until the input channel closes.
    ///
    /// Consumes inputs, telemetry positions and execution-finished events; every
    /// state mutation of the session happens inside this loop.
    pub async fn run(mut self, inputs: flume::Receiver<Input>) {
        let mut positions = Box::pin(self.aircraft.telemetry.position_stream());
        let mut finished = Box::pin(self.aircraft.mission.execution_finished());

        loop {
            tokio::select! {
                input = inputs.recv_async() => match input {
                    Ok(input) => self.handle(input).await,
                    Err(_) => break,
                },
                position = positions.next() => match position {
                    Some(position) => self.presenter.update_position(position),
                    None => break,
                },
                error = finished.next() => match error {
                    Some(error) => self.notify(Notice::ExecutionFinished(error)).await,
                    None => break,
                },
            }
        }
    }
}
