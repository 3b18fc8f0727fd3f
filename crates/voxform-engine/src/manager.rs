//! Frame queue and per-sample parameter interpolation.
//!
//! The [`FrameManager`] sits between a frame producer (any thread) and the
//! wave generator (the DSP thread). The producer enqueues target frames with
//! a minimum sustain and a fade-in length; the generator calls
//! [`FrameManager::current_frame`] once per output sample and receives the
//! interpolated articulation state for that instant.
//!
//! Each request passes through three stages: queued, fading in (`new`), and
//! sustained (`old`). During a fade, every non-step parameter moves from the
//! old frame to the new one along a quintic smoothstep; during sustain, only
//! the pitch glides (linearly, or in two segments for contour tones).

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use log::{debug, trace};

use crate::frame::Frame;

/// A queued articulation target with its timing and precomputed pitch slope.
#[derive(Debug, Clone)]
struct FrameRequest {
    min_samples: u32,
    fade_samples: u32,
    /// Null requests reuse the tail of the prior frame with a muted source.
    is_null: bool,
    frame: Frame,
    /// Per-sample pitch increment over the frame (first half for contours).
    pitch_inc: f64,
    /// Per-sample pitch increment for the second half of a contour.
    pitch_inc2: f64,
    has_contour: bool,
    user_index: i32,
}

impl FrameRequest {
    fn null() -> Self {
        FrameRequest {
            min_samples: 0,
            fade_samples: 0,
            is_null: true,
            frame: Frame::default(),
            pitch_inc: 0.0,
            pitch_inc2: 0.0,
            has_contour: false,
            user_index: -1,
        }
    }
}

/// Interpolation state. Owned exclusively by the manager and mutated only
/// under its lock.
#[derive(Debug)]
struct ManagerState {
    queue: VecDeque<FrameRequest>,
    old: FrameRequest,
    new: Option<FrameRequest>,
    cur: Frame,
    cur_is_null: bool,
    sample_counter: u32,
    last_user_index: i32,
}

impl ManagerState {
    /// Advances the interpolation state by one sample.
    fn advance(&mut self) {
        self.sample_counter += 1;

        if let Some(new) = self.new.take() {
            if self.sample_counter > new.fade_samples {
                // Fade complete: the incoming frame becomes the sustained one.
                self.old = new;
            } else {
                let ratio = self.sample_counter as f64 / new.fade_samples as f64;
                self.cur.set_faded(&self.old.frame, &new.frame, ratio);
                self.new = Some(new);
            }
        } else if self.sample_counter > self.old.min_samples {
            if let Some(mut next) = self.queue.pop_front() {
                self.cur_is_null = false;
                if next.is_null {
                    // Hold the previous articulation with a muted source and
                    // a frozen pitch.
                    next.frame = self.old.frame;
                    next.frame.pre_formant_gain = 0.0;
                    next.frame.voice_pitch = self.cur.voice_pitch;
                    next.pitch_inc = 0.0;
                } else if self.old.is_null {
                    // Never fade in from stale silent content.
                    self.old.frame = next.frame;
                    self.old.frame.pre_formant_gain = 0.0;
                }
                if next.user_index != -1 {
                    self.last_user_index = next.user_index;
                }
                self.sample_counter = 0;
                // Pre-bias the target pitch so the glide during the fade
                // lands on the frame's intended starting pitch.
                next.frame.voice_pitch += next.pitch_inc * next.fade_samples as f64;
                self.new = Some(next);
            } else {
                self.cur_is_null = true;
            }
        } else {
            // Sustain: glide the pitch toward the end (or mid) target.
            let inc = if self.old.has_contour && self.sample_counter > self.old.min_samples / 2 {
                self.old.pitch_inc2
            } else {
                self.old.pitch_inc
            };
            self.cur.voice_pitch += inc;
            // Persist so a following fade interpolates from the glided pitch.
            self.old.frame.voice_pitch = self.cur.voice_pitch;
        }
    }
}

/// Thread-safe frame queue with sample-accurate interpolation.
///
/// Shared between the producer and the DSP thread behind an `Arc`; all state
/// lives under a single mutex whose critical sections are bounded by the
/// parameter count and never allocate on the generation side.
#[derive(Debug)]
pub struct FrameManager {
    state: Mutex<ManagerState>,
}

impl Default for FrameManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameManager {
    /// Creates a manager holding a synthetic silent frame.
    pub fn new() -> Self {
        FrameManager {
            state: Mutex::new(ManagerState {
                queue: VecDeque::new(),
                old: FrameRequest::null(),
                new: None,
                cur: Frame::default(),
                cur_is_null: true,
                sample_counter: 0,
                last_user_index: -1,
            }),
        }
    }

    /// Enqueues an articulation target.
    ///
    /// `frame = None` queues a null frame: the previous articulation is held
    /// with a muted source, which releases the tract into silence without a
    /// parameter jump. `min_samples` is the sustain length, `fade_samples`
    /// the fade-in length; both are floored to 1. `user_index` is an opaque
    /// marker reported by [`FrameManager::last_user_index`] once the frame
    /// is promoted (pass −1 for none). With `purge_queue`, all queued
    /// requests are dropped first and any in-progress fade is collapsed by
    /// snapshotting the currently interpolated frame.
    pub fn enqueue(
        &self,
        frame: Option<&Frame>,
        min_samples: u32,
        fade_samples: u32,
        user_index: i32,
        purge_queue: bool,
    ) {
        let mut request = FrameRequest {
            min_samples: min_samples.max(1),
            fade_samples: fade_samples.max(1),
            is_null: frame.is_none(),
            frame: frame.copied().unwrap_or_default(),
            pitch_inc: 0.0,
            pitch_inc2: 0.0,
            has_contour: false,
            user_index,
        };
        if let Some(frame) = frame {
            if frame.voice_pitch_mid > 0.0 {
                // Contour tone: rise to the midpoint, then back down (or up).
                request.has_contour = true;
                let half_samples = request.min_samples / 2;
                if half_samples > 0 {
                    request.pitch_inc =
                        (frame.voice_pitch_mid - frame.voice_pitch) / half_samples as f64;
                    request.pitch_inc2 = (frame.voice_pitch_end - frame.voice_pitch_mid)
                        / (request.min_samples - half_samples) as f64;
                }
            } else {
                request.pitch_inc =
                    (frame.voice_pitch_end - frame.voice_pitch) / request.min_samples as f64;
            }
        }

        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if purge_queue {
            debug!(
                "purging frame queue ({} pending request(s))",
                state.queue.len()
            );
            state.queue.clear();
            state.sample_counter = state.old.min_samples;
            if let Some(new) = state.new.take() {
                // Collapse the in-progress fade: the interpolated snapshot
                // becomes the frame the replacement fades from.
                let snapshot = state.cur;
                state.old.is_null = new.is_null;
                state.old.frame = snapshot;
            }
        }
        trace!(
            "enqueue: min={} fade={} null={} user_index={}",
            request.min_samples,
            request.fade_samples,
            request.is_null,
            request.user_index
        );
        state.queue.push_back(request);
    }

    /// Advances one sample and returns the interpolated frame, or `None`
    /// when the sustain has elapsed and the queue is empty (silence).
    pub fn current_frame(&self) -> Option<Frame> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        state.advance();
        if state.cur_is_null {
            None
        } else {
            Some(state.cur)
        }
    }

    /// The `user_index` of the most recently promoted frame, or −1 if no
    /// indexed frame has been promoted yet.
    pub fn last_user_index(&self) -> i32 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last_user_index
    }
}
