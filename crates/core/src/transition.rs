//! Entrance and exit transition state machine for a mounted toast.
//!
//! ```text
//! entering --(enter animation done)--> entered --(dismiss)--> exiting --(exit animation done)--> exited
//! ```
//!
//! Completion is driven either by the host (`complete_animation`, e.g. from
//! a transition-end event) or by ticking (`advance`), which accumulates
//! progress over the configured duration.

use std::time::Duration;

use crate::placement::{Placement, Translate};

/// Vertical space reserved below each toast, in pixels.
pub const GUTTER: u32 = 8;
/// Scale applied to exiting toasts.
pub const EXIT_SCALE: f32 = 0.66;
/// Delay before the height collapse starts, so the fade leads the collapse.
pub const HEIGHT_TRANSITION_DELAY: Duration = Duration::from_millis(100);

/// Visual lifecycle phase of a mounted toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransitionState {
	#[default]
	Entering,
	Entered,
	Exiting,
	/// Terminal; the instance may be unmounted.
	Exited,
}

/// Transform and opacity for one transition state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionStyle {
	pub translate: Translate,
	pub scale: f32,
	pub opacity: f32,
}

impl TransitionStyle {
	/// Neutral, fully visible style.
	pub const IDENTITY: Self = Self {
		translate: Translate::ZERO,
		scale: 1.0,
		opacity: 1.0,
	};

	/// Shrunk and invisible style used while exiting.
	pub const HIDDEN: Self = Self {
		translate: Translate::ZERO,
		scale: EXIT_SCALE,
		opacity: 0.0,
	};

	/// Deterministic style for `state` at `placement`.
	pub const fn for_state(state: TransitionState, placement: Placement) -> Self {
		match state {
			TransitionState::Entering => Self {
				translate: placement.entering_offset(),
				scale: 1.0,
				opacity: 1.0,
			},
			TransitionState::Entered => Self::IDENTITY,
			TransitionState::Exiting | TransitionState::Exited => Self::HIDDEN,
		}
	}

	/// Linear blend from `self` to `to` at `t` in `0.0..=1.0`.
	pub fn lerp(self, to: Self, t: f32) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			translate: Translate::new(lerp(self.translate.x_pct, to.translate.x_pct, t), lerp(self.translate.y_pct, to.translate.y_pct, t)),
			scale: lerp(self.scale, to.scale, t),
			opacity: lerp(self.opacity, to.opacity, t),
		}
	}
}

#[inline]
fn lerp(start: f32, end: f32, t: f32) -> f32 {
	start + t * (end - start)
}

/// Layout height of the wrapper around a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Height {
	/// Let the content size itself.
	Auto,
	/// Fixed height in pixels, animated by the renderer.
	Fixed(u32),
}

/// Timing of the wrapper height animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightTransition {
	pub delay: Duration,
	pub duration: Duration,
}

/// Transition state machine for one mounted toast.
#[derive(Debug, Clone)]
pub struct Transition {
	state: TransitionState,
	placement: Placement,
	duration: Duration,
	/// Time spent in the current animated state.
	elapsed: Duration,
	/// Content height reported by the renderer, without gutter.
	measured: Option<u32>,
}

impl Transition {
	/// Starts a transition in `Entering`.
	pub fn new(placement: Placement, duration: Duration) -> Self {
		Self {
			state: TransitionState::Entering,
			placement,
			duration,
			elapsed: Duration::ZERO,
			measured: None,
		}
	}

	pub fn state(&self) -> TransitionState {
		self.state
	}

	pub fn placement(&self) -> Placement {
		self.placement
	}

	pub fn duration(&self) -> Duration {
		self.duration
	}

	/// Returns true once the exit animation has completed.
	pub fn is_exited(&self) -> bool {
		self.state == TransitionState::Exited
	}

	/// Returns true while entering or entered.
	pub fn is_visible(&self) -> bool {
		matches!(self.state, TransitionState::Entering | TransitionState::Entered)
	}

	/// Progress through the current animated state, `0.0..=1.0`. Settled
	/// states report `1.0`.
	pub fn progress(&self) -> f32 {
		match self.state {
			TransitionState::Entering | TransitionState::Exiting if !self.duration.is_zero() => {
				(self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
			}
			_ => 1.0,
		}
	}

	/// Style for the current state.
	pub fn style(&self) -> TransitionStyle {
		TransitionStyle::for_state(self.state, self.placement)
	}

	/// Style blended by progress, for renderers that interpolate themselves
	/// instead of relying on host-side CSS-like transitions.
	pub fn animated_style(&self) -> TransitionStyle {
		match self.state {
			TransitionState::Entering => self.style().lerp(TransitionStyle::IDENTITY, self.progress()),
			TransitionState::Exiting => TransitionStyle::IDENTITY.lerp(TransitionStyle::HIDDEN, self.progress()),
			TransitionState::Entered | TransitionState::Exited => self.style(),
		}
	}

	/// Records the rendered content height. Only takes effect once entered.
	pub fn measure(&mut self, height: u32) {
		self.measured = Some(height);
	}

	/// Wrapper height: auto while entering, the measured height plus gutter
	/// once entered, and zero while exiting so siblings close the gap.
	pub fn height(&self) -> Height {
		match self.state {
			TransitionState::Entering => Height::Auto,
			TransitionState::Entered => self.measured.map_or(Height::Auto, |h| Height::Fixed(h.saturating_add(GUTTER))),
			TransitionState::Exiting | TransitionState::Exited => Height::Fixed(0),
		}
	}

	/// Height animation timing: starts after a short delay and finishes
	/// within the transition duration.
	pub fn height_transition(&self) -> HeightTransition {
		HeightTransition {
			delay: HEIGHT_TRANSITION_DELAY,
			duration: self.duration.saturating_sub(HEIGHT_TRANSITION_DELAY),
		}
	}

	/// Marks the current animation as finished: `Entering` becomes `Entered`
	/// and `Exiting` becomes `Exited`. No-op in settled states.
	pub fn complete_animation(&mut self) {
		let next = match self.state {
			TransitionState::Entering => TransitionState::Entered,
			TransitionState::Exiting => TransitionState::Exited,
			TransitionState::Entered | TransitionState::Exited => return,
		};
		tracing::trace!(from = ?self.state, to = ?next, "transition.complete");
		self.state = next;
		self.elapsed = Duration::ZERO;
	}

	/// Begins the exit animation. A toast dismissed while still entering
	/// exits directly. No-op once exiting or exited.
	pub fn exit(&mut self) {
		if !self.is_visible() {
			return;
		}
		tracing::trace!(from = ?self.state, "transition.exit");
		self.state = TransitionState::Exiting;
		self.elapsed = Duration::ZERO;
	}

	/// Advances the running animation by `delta`, completing it when the
	/// duration is reached.
	pub fn advance(&mut self, delta: Duration) {
		if !matches!(self.state, TransitionState::Entering | TransitionState::Exiting) {
			return;
		}
		self.elapsed = self.elapsed.saturating_add(delta);
		if self.elapsed >= self.duration {
			self.complete_animation();
		}
	}
}
