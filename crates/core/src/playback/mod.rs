use std::fmt;

use serde::Serialize;

use crate::{
    config::{AppConfig, PlaybackConfig},
    render::{render_frame, render_idle, FrameStyle, Surface},
    scene::{parse_payload, Scene, SceneDescription},
    timeline::{Clock, FrameScheduler, QueueScheduler, TickToken},
    Result, ScenePlayError,
};

/// ```text
///  Idle --load--> Stopped --play--> Playing --pause/complete--> Paused
///                    ^                 |                          |
///                    +------reset------+--------------------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No scene loaded; the placeholder frame is shown.
    Idle,
    Stopped,
    Playing,
    Paused,
}

/// "elapsed / total" pair for a control bar, e.g. `1.5s / 4s`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeReadout {
    pub elapsed_ms: f64,
    pub total_ms: f64,
}

impl fmt::Display for TimeReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elapsed = (self.elapsed_ms / 100.0).round() / 10.0;
        write!(f, "{}s / {}s", elapsed, self.total_ms / 1000.0)
    }
}

pub struct PlaybackController<S, K, C> {
    surface: S,
    scheduler: K,
    clock: C,
    style: FrameStyle,
    config: PlaybackConfig,
    scene: Option<Scene>,
    state: PlaybackState,
    virtual_time: f64,
    /// Wall-clock reading that corresponds to virtual time 0.
    reference_ms: f64,
    pending: Option<TickToken>,
    frames_rendered: u64,
}

impl<S, K, C> PlaybackController<S, K, C>
where
    S: Surface,
    K: FrameScheduler,
    C: Clock,
{
    pub fn new(surface: S, scheduler: K, clock: C, config: &AppConfig) -> Self {
        Self {
            surface,
            scheduler,
            clock,
            style: FrameStyle::from(&config.canvas),
            config: config.playback.clone(),
            scene: None,
            state: PlaybackState::Idle,
            virtual_time: 0.0,
            reference_ms: 0.0,
            pending: None,
            frames_rendered: 0,
        }
    }

    /// Replaces the current scene with one built from `description`.
    pub fn load_scene(&mut self, description: SceneDescription) -> Result<()> {
        self.load(Scene::from_description(description))
    }

    /// Loads whatever the upstream delivered; `null` payloads clear the scene.
    pub fn load_payload(&mut self, raw: &str) -> Result<()> {
        match parse_payload(raw)? {
            Some(description) => self.load_scene(description),
            None => self.clear_scene(),
        }
    }

    /// Installs an already-built scene, renders its first frame and, when
    /// configured, starts playing.
    pub fn load(&mut self, scene: Scene) -> Result<()> {
        self.cancel_pending();
        tracing::info!(
            scene = scene.id.as_deref().unwrap_or("<unnamed>"),
            layers = scene.layers.len(),
            duration_ms = scene.duration,
            "scene loaded"
        );
        self.scene = Some(scene);
        self.state = PlaybackState::Stopped;
        self.virtual_time = 0.0;
        self.paint(0.0)?;

        if self.config.autoplay {
            self.play();
        }
        Ok(())
    }

    /// Drops the scene and shows the idle placeholder.
    pub fn clear_scene(&mut self) -> Result<()> {
        self.cancel_pending();
        self.scene = None;
        self.state = PlaybackState::Idle;
        self.virtual_time = 0.0;
        self.paint(0.0)
    }

    /// Starts or resumes playback from the current virtual time.
    ///
    /// A scene paused on its final frame restarts from the beginning.
    pub fn play(&mut self) {
        let Some(duration) = self.duration() else {
            tracing::warn!("play requested without a scene");
            return;
        };
        if self.state == PlaybackState::Playing {
            return;
        }
        if self.virtual_time >= duration {
            self.virtual_time = 0.0;
        }

        self.reference_ms = self.clock.now_ms() - self.virtual_time;
        self.state = PlaybackState::Playing;
        self.pending = Some(self.scheduler.schedule());
        tracing::info!(from_ms = self.virtual_time, "playing");
    }

    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.cancel_pending();
        self.state = PlaybackState::Paused;
        tracing::info!(at_ms = self.virtual_time, "paused");
    }

    /// Back to the start: cancels playback and renders exactly one frame at 0.
    pub fn reset(&mut self) -> Result<()> {
        self.cancel_pending();
        self.virtual_time = 0.0;
        if self.scene.is_some() {
            self.state = PlaybackState::Stopped;
        }
        tracing::info!("reset");
        self.paint(0.0)
    }

    /// Jumps to `ms` (clamped to the scene) and renders it once.
    ///
    /// Only allowed while paused or stopped.
    pub fn set_time(&mut self, ms: f64) -> Result<()> {
        if self.state == PlaybackState::Playing {
            return Err(ScenePlayError::InvalidState("cannot seek while playing"));
        }
        let Some(duration) = self.duration() else {
            return Ok(());
        };

        let t = if ms.is_finite() {
            ms.clamp(0.0, duration)
        } else {
            0.0
        };
        self.virtual_time = t;
        self.paint(t)
    }

    /// Scheduler callback for `token`.
    ///
    /// Advances the virtual clock from the wall clock, renders, and either
    /// requests the next tick or parks on the final frame. A render failure
    /// pauses playback without committing the new time.
    pub fn on_frame(&mut self, token: TickToken) -> Result<()> {
        if self.state != PlaybackState::Playing || self.pending != Some(token) {
            tracing::trace!(token = token.id(), "ignoring stale tick");
            return Ok(());
        }
        self.pending = None;

        let Some(duration) = self.duration() else {
            return Ok(());
        };
        let elapsed = self.clock.now_ms() - self.reference_ms;
        let t = elapsed.clamp(0.0, duration).max(self.virtual_time);

        if let Err(err) = self.paint(t) {
            self.state = PlaybackState::Paused;
            tracing::warn!(error = %err, at_ms = self.virtual_time, "frame failed, pausing playback");
            return Err(err);
        }
        self.virtual_time = t;

        if t >= duration {
            self.state = PlaybackState::Paused;
            tracing::info!(duration_ms = duration, "playback complete");
        } else {
            self.pending = Some(self.scheduler.schedule());
        }
        Ok(())
    }

    pub fn current_time(&self) -> f64 {
        self.virtual_time
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn duration(&self) -> Option<f64> {
        self.scene.as_ref().map(|scene| scene.duration)
    }

    pub fn readout(&self) -> TimeReadout {
        TimeReadout {
            elapsed_ms: self.virtual_time,
            total_ms: self.duration().unwrap_or(0.0),
        }
    }

    /// Total frames painted since construction, including seeks and resets.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn pending_tick(&self) -> Option<TickToken> {
        self.pending
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &K {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut K {
        &mut self.scheduler
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel(token);
        }
    }

    fn paint(&mut self, t: f64) -> Result<()> {
        match &self.scene {
            Some(scene) => render_frame(&mut self.surface, scene, t, &self.style)?,
            None => render_idle(&mut self.surface, &self.style)?,
        }
        self.frames_rendered += 1;
        Ok(())
    }
}

impl<S, C> PlaybackController<S, QueueScheduler, C>
where
    S: Surface,
    C: Clock,
{
    /// Runs the oldest due tick. Returns `false` when nothing was scheduled.
    pub fn pump(&mut self) -> Result<bool> {
        match self.scheduler.next_due() {
            Some(token) => {
                self.on_frame(token)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl<S, K, C> fmt::Debug for PlaybackController<S, K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state)
            .field("virtual_time", &self.virtual_time)
            .field("scene", &self.scene.as_ref().map(|scene| scene.id.clone()))
            .field("pending", &self.pending)
            .field("frames_rendered", &self.frames_rendered)
            .finish()
    }
}
