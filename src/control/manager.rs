use tracing::{debug, info, warn};

use super::errors::ControlError;
use super::types::{Mode, TickReport, TriggerOutcome, TriggerSource};
use crate::geometry::{RoomGeometry, RoomTransform};
use crate::math::{Vec2, Vec3, ground, rotate_degrees};
use crate::strategy::{
    NullRedirector, NullResetter, PoseAdjustment, Redirector, Resetter, Steering, TickContext,
};
use crate::tracking::{Delta, FrameState, PoseTracker, RawPose};

/// The per-tick redirection loop.
///
/// Owns the room, the current and previous frame, and exactly one redirector and
/// one resetter. Every tick drives one of the two, never both: the resetter
/// while a reset is in progress, the redirector otherwise.
///
/// Writers: [`tick`](Self::tick) captures `current` before dispatch and
/// `previous` after it, from the head pose with the tick's adjustment applied,
/// so the next delta sees everything this tick did.
pub struct RedirectionManager {
    geometry: RoomGeometry,
    room: RoomTransform,
    tracker: PoseTracker,
    current: FrameState,
    previous: FrameState,
    delta: Delta,
    dt: f32,
    in_reset: bool,
    redirector: Box<dyn Redirector>,
    resetter: Box<dyn Resetter>,
}

impl std::fmt::Debug for RedirectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedirectionManager")
            .field("geometry", &self.geometry)
            .field("room", &self.room)
            .field("current", &self.current)
            .field("in_reset", &self.in_reset)
            .field("redirector", &self.redirector.name())
            .field("resetter", &self.resetter.name())
            .finish()
    }
}

// Context for strategy calls, built from disjoint fields so the strategies
// themselves can still be borrowed mutably.
macro_rules! tick_context {
    ($self:ident) => {
        TickContext {
            current: &$self.current,
            previous: &$self.previous,
            delta: $self.delta,
            geometry: &$self.geometry,
            dt: $self.dt,
        }
    };
}

impl RedirectionManager {
    pub fn new(
        geometry: RoomGeometry,
        mut redirector: Box<dyn Redirector>,
        mut resetter: Box<dyn Resetter>,
    ) -> Self {
        redirector.initialize(&geometry);
        resetter.initialize(&geometry);
        Self {
            geometry,
            room: RoomTransform::default(),
            tracker: PoseTracker::new(),
            current: FrameState::default(),
            previous: FrameState::default(),
            delta: Delta::default(),
            dt: 0.0,
            in_reset: false,
            redirector,
            resetter,
        }
    }

    /// No redirection and no resets.
    pub fn with_null_strategies(geometry: RoomGeometry) -> Self {
        Self::new(geometry, Box::new(NullRedirector), Box::new(NullResetter))
    }

    pub fn geometry(&self) -> &RoomGeometry {
        &self.geometry
    }

    pub fn room_transform(&self) -> &RoomTransform {
        &self.room
    }

    pub fn current(&self) -> &FrameState {
        &self.current
    }

    pub fn previous(&self) -> &FrameState {
        &self.previous
    }

    pub fn delta(&self) -> Delta {
        self.delta
    }

    pub fn in_reset(&self) -> bool {
        self.in_reset
    }

    pub fn mode(&self) -> Mode {
        if self.in_reset {
            Mode::Resetting
        } else {
            Mode::Redirecting
        }
    }

    pub fn redirector(&self) -> &dyn Redirector {
        self.redirector.as_ref()
    }

    pub fn resetter(&self) -> &dyn Resetter {
        self.resetter.as_ref()
    }

    /// Capture `raw` as both current and previous frame, zeroing the delta.
    ///
    /// Use at startup and whenever the user is teleported.
    pub fn resync(&mut self, raw: &RawPose) {
        self.current = self.tracker.capture(raw, &self.room);
        self.previous = self.current;
        self.delta = Delta::default();
    }

    /// Advance one tick with the head pose `raw` (world frame) and `dt` seconds
    /// since the last tick.
    pub fn tick(&mut self, raw: &RawPose, dt: f32) -> TickReport {
        self.dt = dt;
        self.current = self.tracker.capture(raw, &self.room);
        self.delta = Delta::between(&self.previous, &self.current);

        let mut report = TickReport {
            delta: self.delta,
            ..TickReport::default()
        };

        // Backup for a missed external trigger.
        if !self.in_reset {
            let out = {
                let ctx = tick_context!(self);
                self.resetter.is_user_out_of_bounds(&ctx)
            };
            if out {
                warn!(
                    position = ?self.current.real_pose.position,
                    "user out of bounds without a reset trigger, safety net firing"
                );
                report.safety_net = Some(self.on_reset_trigger(TriggerSource::SafetyNet));
            }
        }

        let adjustment = if self.in_reset {
            report.mode = Mode::Resetting;
            let ctx = tick_context!(self);
            self.resetter.apply_resetting(&ctx)
        } else {
            report.mode = Mode::Redirecting;
            let ctx = tick_context!(self);
            self.redirector.apply_redirection(&ctx)
        };
        report.adjustment = adjustment;

        let adjusted = self.apply_adjustment(raw, adjustment);

        if self.in_reset && self.resetter.reset_finished() {
            report.reset_ended = self.on_reset_end();
        }

        self.previous = self.tracker.capture(&adjusted, &self.room);
        report
    }

    /// Move the room and return the head pose as it is after the move.
    fn apply_adjustment(&mut self, raw: &RawPose, adjustment: PoseAdjustment) -> RawPose {
        if adjustment.is_none() {
            return *raw;
        }
        let head = ground(raw.position);
        self.room.rotate_around(head, adjustment.rotation);
        self.room.translate(adjustment.translation);

        let forward = rotate_degrees(ground(raw.forward), adjustment.rotation);
        RawPose {
            position: raw.position
                + Vec3::new(adjustment.translation.x, 0.0, adjustment.translation.y),
            forward: Vec3::new(forward.x, raw.forward.y, forward.y),
        }
    }

    /// Ask to enter a reset. Requires the resetter's approval; ignored while
    /// already resetting.
    pub fn on_reset_trigger(&mut self, source: TriggerSource) -> TriggerOutcome {
        if self.in_reset {
            debug!(?source, "reset trigger ignored, already resetting");
            return TriggerOutcome::AlreadyResetting;
        }

        let required = {
            let ctx = tick_context!(self);
            self.resetter.is_reset_required(&ctx)
        };
        if !required {
            debug!(?source, resetter = self.resetter.name(), "reset not required");
            return TriggerOutcome::Declined;
        }

        {
            let ctx = tick_context!(self);
            self.resetter.initialize_reset(&ctx);
        }
        self.in_reset = true;

        self.redirector.pause();
        if self.redirector.is_paused() {
            warn!(redirector = self.redirector.name(), "planning is paused");
        }
        info!(?source, resetter = self.resetter.name(), "reset started");
        TriggerOutcome::Entered
    }

    /// End the reset in progress. Returns false if there was none.
    pub fn on_reset_end(&mut self) -> bool {
        if !self.in_reset {
            debug!("reset end ignored, not resetting");
            return false;
        }
        self.resetter.finalize_reset();
        self.in_reset = false;

        let was_paused = self.redirector.is_paused();
        self.redirector.resume();
        if was_paused {
            warn!(redirector = self.redirector.name(), "planning is resumed");
        }
        info!(resetter = self.resetter.name(), "reset ended");
        true
    }

    /// Forward a steering command to the active redirector.
    pub fn set_steering(&mut self, steering: Steering) {
        self.redirector.set_steering(steering);
    }

    /// Swap the redirector; `None` installs the null redirector.
    pub fn update_redirector(&mut self, redirector: Option<Box<dyn Redirector>>) {
        let mut next: Box<dyn Redirector> = redirector.unwrap_or_else(|| Box::new(NullRedirector));
        self.redirector.release();
        info!(old = self.redirector.name(), new = next.name(), "redirector replaced");

        next.initialize(&self.geometry);
        if self.in_reset {
            next.pause();
        }
        self.redirector = next;
    }

    /// Swap the resetter; `None` installs the null resetter.
    ///
    /// A reset in progress is abandoned, since its progress lives in the
    /// instance being released.
    pub fn update_resetter(&mut self, resetter: Option<Box<dyn Resetter>>) {
        let mut next: Box<dyn Resetter> = resetter.unwrap_or_else(|| Box::new(NullResetter));
        if self.in_reset {
            warn!(resetter = self.resetter.name(), "resetter replaced mid-reset, abandoning reset");
            self.on_reset_end();
        }
        self.resetter.release();
        info!(old = self.resetter.name(), new = next.name(), "resetter replaced");

        next.initialize(&self.geometry);
        self.resetter = next;
    }

    /// Change the room size and rebind both strategies, redirector first.
    pub fn resize_room(&mut self, width: f32, depth: f32) -> Result<(), ControlError> {
        let geometry =
            RoomGeometry::new(width, depth).ok_or(ControlError::InvalidDimensions { width, depth })?;
        self.geometry = geometry;
        self.redirector.initialize(&self.geometry);
        self.resetter.initialize(&self.geometry);
        info!(width, depth, "room resized");
        Ok(())
    }
}
