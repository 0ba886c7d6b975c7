//! Rotation controller: composes the frame store, gesture tracking and
//! inertia into the public viewer.
//!
//! The engine is sans-IO. It never calls a clock or arms a timer; every
//! time-dependent entry point takes `now`, interval timers are deadlines
//! surfaced through [`SpinViewer::next_deadline`], and the host drives
//! them by calling [`SpinViewer::tick`]. Side effects on the host's
//! resources (frame visibility, cursor, loading indicator) are queued as
//! [`Effect`] values and drained with [`SpinViewer::take_effects`].
//!
//! Exactly one of the auto-rotate schedule, the decel schedule, or an
//! active drag may drive index changes at a time; every transition into
//! `Dragging` or a fresh deceleration cancels whichever schedule was
//! previously running.

use std::mem;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::config::SpinConfig;
use crate::error::Result;
use crate::frames::FrameSet;
use crate::gesture::{DragOutcome, DragSession, Point, PointerInput};
use crate::inertia::Inertia;
use crate::source::{FrameRequest, SourceTemplate};

/// Side effect for the host to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Hide `previous` and show `next`.
    Focus {
        previous: Option<usize>,
        next: usize,
    },
    /// Show or hide the loading indicator.
    LoadingVisible(bool),
    /// Switch the cursor in or out of its grabbing shape.
    CursorGrabbing(bool),
    /// Effectively every frame has loaded; emitted once.
    FullyLoaded,
}

/// What is currently driving index changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drive {
    Idle,
    AutoRotating,
    Dragging,
    Decelerating,
}

enum Mode {
    Idle { auto_start_at: Option<Instant> },
    AutoRotating { next_tick: Instant },
    Dragging { session: DragSession },
    Decelerating {
        session: DragSession,
        inertia: Inertia,
        next_tick: Instant,
    },
}

/// Construction input for a viewer.
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    /// Total number of frames in the rotation
    pub frame_count: usize,
    /// Locator template for fetching frames
    pub source_template: SourceTemplate,
    /// Viewport width in pixels, used to derive the rotate threshold
    pub viewport_width: f64,
    /// Host capability flag: true selects the full-fidelity frame set,
    /// false falls back to the reduced step pattern
    pub smooth: bool,
    pub config: SpinConfig,
}

/// The 360° spin viewer engine.
pub struct SpinViewer {
    frames: FrameSet,
    config: SpinConfig,
    mode: Mode,
    viewport_width: f64,
    /// Rejected goto target, replayed when its frame loads
    deferred: Option<usize>,
    loading_visible: bool,
    fully_loaded_reported: bool,
    effects: Vec<Effect>,
}

impl SpinViewer {
    /// Build a viewer and the fetch plan for the host.
    ///
    /// Frame 0 is displayed immediately; the returned requests cover the
    /// remaining step-sequence frames. Auto-rotation arms itself after
    /// the configured start delay.
    pub fn new(options: ViewerOptions, now: Instant) -> Result<(Self, Vec<FrameRequest>)> {
        let step_size = if options.smooth {
            1
        } else {
            options.config.reduced_step_size.max(1) as usize
        };

        let frames = FrameSet::new(options.frame_count, step_size)?;
        let requests = options.source_template.requests(frames.fetch_indices());

        debug!(
            frame_count = frames.frame_count(),
            step_size,
            pending = requests.len(),
            "viewer constructed"
        );

        let viewer = Self {
            frames,
            mode: Mode::Idle {
                auto_start_at: Some(now + options.config.auto_rotate_start_delay()),
            },
            viewport_width: options.viewport_width,
            deferred: None,
            loading_visible: false,
            fully_loaded_reported: false,
            effects: vec![Effect::Focus {
                previous: None,
                next: 0,
            }],
            config: options.config,
        };

        Ok((viewer, requests))
    }

    /// Jump to a frame. Any integer is accepted and wrapped into
    /// `[0, frame_count)` by floored modulo.
    ///
    /// If the target frame has not loaded yet, nothing moves: the
    /// current frame stays focused, the loading indicator shows, and the
    /// jump is replayed when the frame arrives.
    pub fn goto(&mut self, raw: i64) {
        let index = self.frames.normalize(raw);

        if !self.frames.is_loaded(index) {
            trace!(index, "goto deferred, frame not loaded");
            self.deferred = Some(index);
            self.set_loading_visible(true);
            return;
        }

        self.deferred = None;
        let previous = self.frames.focused();
        if index != previous {
            self.frames.set_focused(index);
            self.effects.push(Effect::Focus {
                previous: Some(previous),
                next: index,
            });
        }
        self.set_loading_visible(false);
    }

    /// Move by a signed number of frames.
    pub fn change(&mut self, delta: i64) {
        self.goto(self.frames.focused() as i64 + delta);
    }

    /// A frame finished loading. Completions may arrive in any order;
    /// duplicates are ignored.
    pub fn frame_loaded(&mut self, index: usize) {
        if !self.frames.mark_loaded(index) {
            return;
        }

        if self.deferred == Some(index) {
            self.deferred = None;
            self.goto(index as i64);
        }

        if self.frames.fully_loaded() && !self.fully_loaded_reported {
            self.fully_loaded_reported = true;
            debug!(loaded = self.frames.loaded_count(), "frame set fully loaded");
            self.effects.push(Effect::FullyLoaded);
            self.set_loading_visible(false);
        }
    }

    /// Pointer pressed. Ignored while a drag is already tracking; any
    /// auto-rotation or inertia run is cancelled first, since new user
    /// input always wins over residual motion.
    pub fn pointer_down(&mut self, input: PointerInput, _now: Instant) {
        let Some(point) = input.point() else { return };

        if matches!(self.mode, Mode::Dragging { .. }) {
            return;
        }
        self.cancel_motion();

        let session = DragSession::begin(
            point,
            self.frames.focused(),
            self.viewport_width,
            self.frames.frame_count(),
            self.config.vertical_scroll_ratio,
        );
        self.mode = Mode::Dragging { session };
        self.effects.push(Effect::CursorGrabbing(true));
        debug!("dragging");
    }

    /// Pointer moved. Returns whether the sample was consumed by the
    /// gesture; an unconsumed sample means the host must not suppress
    /// its default scroll behavior.
    ///
    /// A move with no active drag session is a no-op: listener
    /// unregistration can lag the event queue.
    pub fn pointer_move(&mut self, input: PointerInput, now: Instant) -> bool {
        let Some(point) = input.point() else {
            return false;
        };
        let outcome = match &mut self.mode {
            Mode::Dragging { session } => session.track(point, now),
            _ => return false,
        };

        if let DragOutcome::Rotate(target) = outcome {
            self.goto(target);
        }
        outcome.consumed()
    }

    /// Pointer released. Hands the drag's motion path to the inertia
    /// controller; with too short a path the interaction simply ends.
    pub fn pointer_up(&mut self, _input: PointerInput, now: Instant) {
        if !matches!(self.mode, Mode::Dragging { .. }) {
            trace!("release with no active drag");
            return;
        }
        self.effects.push(Effect::CursorGrabbing(false));

        let released = mem::replace(&mut self.mode, Mode::Idle { auto_start_at: None });
        if let Mode::Dragging { session } = released {
            let inertia = Inertia::begin(
                session.path(),
                self.config.decel_time_step(),
                self.config.max_velocity,
            );
            match inertia {
                Some(inertia) => {
                    self.mode = Mode::Decelerating {
                        session,
                        inertia,
                        next_tick: now + self.config.decel_time_step(),
                    };
                    debug!("decelerating");
                }
                None if self.config.resume_auto_rotate => {
                    self.mode = Mode::Idle {
                        auto_start_at: Some(now + self.config.auto_rotate_start_delay()),
                    };
                }
                None => {}
            }
        }
    }

    /// Process every deadline that has come due. A late host drains all
    /// owed ticks in one call.
    pub fn tick(&mut self, now: Instant) {
        while self.tick_once(now) {}
    }

    fn tick_once(&mut self, now: Instant) -> bool {
        match self.mode {
            Mode::Idle {
                auto_start_at: Some(at),
            } if at <= now => {
                self.mode = Mode::AutoRotating {
                    next_tick: at + self.auto_interval(),
                };
                debug!("auto-rotation started");
                true
            }
            Mode::AutoRotating { next_tick } if next_tick <= now => {
                self.mode = Mode::AutoRotating {
                    next_tick: next_tick + self.auto_interval(),
                };
                let stride = self.frames.step_size() as i64;
                self.change(stride);
                true
            }
            Mode::Decelerating { next_tick, .. } if next_tick <= now => {
                self.decel_tick(now);
                true
            }
            _ => false,
        }
    }

    /// One deceleration step: replay the last path point, projected
    /// forward by the current velocity, through the drag math, then shed
    /// velocity and stop at the zero crossing.
    fn decel_tick(&mut self, now: Instant) {
        let decel = self.config.decel;
        let time_step = self.config.decel_time_step();

        let mode = mem::replace(&mut self.mode, Mode::Idle { auto_start_at: None });
        match mode {
            Mode::Decelerating {
                mut session,
                mut inertia,
                next_tick,
            } => {
                // if the path gets broken during the decel just stop
                if !session.path().is_sufficient() {
                    debug!("deceleration stopped, path insufficient");
                    return;
                }
                let Ok(last) = session.path().last() else {
                    return;
                };

                let projected = Point::new(last.x + inertia.velocity(), last.y);
                if let DragOutcome::Rotate(target) = session.track(projected, now) {
                    self.goto(target);
                }

                if inertia.decay(decel) {
                    debug!("deceleration finished");
                } else {
                    self.mode = Mode::Decelerating {
                        session,
                        inertia,
                        next_tick: next_tick + time_step,
                    };
                }
            }
            other => self.mode = other,
        }
    }

    /// When the host should call [`tick`](Self::tick) next. `None`
    /// while dragging or fully idle.
    pub fn next_deadline(&self) -> Option<Instant> {
        match &self.mode {
            Mode::Idle { auto_start_at } => *auto_start_at,
            Mode::AutoRotating { next_tick } => Some(*next_tick),
            Mode::Dragging { .. } => None,
            Mode::Decelerating { next_tick, .. } => Some(*next_tick),
        }
    }

    /// Drain queued side effects, in emission order.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        mem::take(&mut self.effects)
    }

    /// The viewport width feeds the rotate threshold of the next drag
    /// session; an in-flight session keeps the width it started with.
    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    #[inline]
    pub fn focused_index(&self) -> usize {
        self.frames.focused()
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.frame_count()
    }

    #[inline]
    pub fn step_size(&self) -> usize {
        self.frames.step_size()
    }

    #[inline]
    pub fn loaded_count(&self) -> usize {
        self.frames.loaded_count()
    }

    #[inline]
    pub fn is_fully_loaded(&self) -> bool {
        self.frames.fully_loaded()
    }

    pub fn drive(&self) -> Drive {
        match self.mode {
            Mode::Idle { .. } => Drive::Idle,
            Mode::AutoRotating { .. } => Drive::AutoRotating,
            Mode::Dragging { .. } => Drive::Dragging,
            Mode::Decelerating { .. } => Drive::Decelerating,
        }
    }

    fn auto_interval(&self) -> Duration {
        self.config
            .auto_rotate_interval(self.frames.step_size() as u32)
    }

    fn set_loading_visible(&mut self, visible: bool) {
        if self.loading_visible != visible {
            self.loading_visible = visible;
            self.effects.push(Effect::LoadingVisible(visible));
        }
    }

    fn cancel_motion(&mut self) {
        match self.mode {
            Mode::AutoRotating { .. } => debug!("auto-rotation cancelled"),
            Mode::Decelerating { .. } => debug!("deceleration cancelled"),
            _ => {}
        }
        self.mode = Mode::Idle {
            auto_start_at: None,
        };
    }
}
