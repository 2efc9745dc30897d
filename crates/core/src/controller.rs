//! Per-toast controller: the mounted instance's timer and transition.

use std::sync::Arc;
use std::time::Duration;

use crate::placement::Placement;
use crate::scheduler::Scheduler;
use crate::timer::{DismissTimer, TimerState};
use crate::transition::Transition;

/// Countdown indicator data for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
	/// Full countdown length; the indicator animates over this span.
	pub duration: Duration,
	/// Play state of the indicator.
	pub running: bool,
}

/// Owns the dismiss timer and transition of one mounted toast.
///
/// Dropping the controller cancels its timer.
#[derive(Debug)]
pub struct ToastController {
	timer: Option<DismissTimer>,
	transition: Transition,
}

impl ToastController {
	/// Mounts a controller in `Entering`. When `auto_dismiss` is set and
	/// `timeout` is nonzero, a timer counting down `timeout` starts
	/// immediately and calls `on_expire`.
	pub fn mount(
		scheduler: Arc<dyn Scheduler>,
		placement: Placement,
		transition_duration: Duration,
		auto_dismiss: bool,
		timeout: Duration,
		on_expire: impl Fn() + Send + Sync + 'static,
	) -> Self {
		let timer = (auto_dismiss && !timeout.is_zero()).then(|| DismissTimer::for_toast(scheduler, true, timeout, on_expire));
		Self {
			timer,
			transition: Transition::new(placement, transition_duration),
		}
	}

	pub fn transition(&self) -> &Transition {
		&self.transition
	}

	pub fn transition_mut(&mut self) -> &mut Transition {
		&mut self.transition
	}

	pub fn timer_state(&self) -> TimerState {
		self.timer.as_ref().map_or(TimerState::Idle, DismissTimer::state)
	}

	/// Countdown indicator, present only for auto-dismissing toasts.
	pub fn countdown(&self) -> Option<Countdown> {
		self.timer.as_ref().map(|timer| Countdown {
			duration: timer.duration(),
			running: timer.is_running(),
		})
	}

	/// Pointer entered the toast: pause the countdown.
	pub fn pointer_enter(&mut self) {
		if let Some(timer) = &mut self.timer {
			timer.pause();
		}
	}

	/// Pointer left the toast: resume the countdown with the time remaining.
	pub fn pointer_leave(&mut self) {
		if let Some(timer) = &mut self.timer
			&& self.transition.is_visible()
		{
			timer.resume();
		}
	}

	/// Starts the exit transition and stops the countdown.
	pub fn dismiss(&mut self) {
		if let Some(timer) = &mut self.timer {
			timer.cancel();
		}
		self.transition.exit();
	}

	pub fn advance(&mut self, delta: Duration) {
		self.transition.advance(delta);
	}

	pub fn is_exited(&self) -> bool {
		self.transition.is_exited()
	}
}
