//! Per-toast auto-dismiss countdown with pause and resume.
//!
//! Pausing keeps the *remaining* time, so a brief hover neither restarts the
//! full countdown nor cuts it short.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::scheduler::{ScheduleHandle, Scheduler};

/// Callback run when a timer expires. Invoked from the scheduler's context.
pub type FireCallback = Arc<dyn Fn() + Send + Sync>;

/// Observable timer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
	/// Not counting down; never fires from here.
	Idle,
	/// Counting down toward a fire.
	Running,
	/// Countdown suspended with time remaining.
	Paused,
}

enum Phase {
	Idle,
	Running { started_at: Instant, handle: ScheduleHandle },
	Paused,
}

/// State shared with the scheduled task.
#[derive(Default)]
struct Shared {
	generation: AtomicU64,
	fired: AtomicBool,
}

/// Countdown that fires a callback once after its duration elapses.
pub struct DismissTimer {
	scheduler: Arc<dyn Scheduler>,
	on_fire: Option<FireCallback>,
	duration: Duration,
	remaining: Duration,
	phase: Phase,
	shared: Arc<Shared>,
}

impl fmt::Debug for DismissTimer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DismissTimer")
			.field("state", &self.state())
			.field("duration", &self.duration)
			.field("remaining", &self.remaining)
			.finish()
	}
}

impl DismissTimer {
	/// Creates an idle timer.
	pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
		Self {
			scheduler,
			on_fire: None,
			duration: Duration::ZERO,
			remaining: Duration::ZERO,
			phase: Phase::Idle,
			shared: Arc::new(Shared::default()),
		}
	}

	/// Creates a timer for a toast: running when auto-dismiss is enabled with
	/// a nonzero timeout, idle otherwise.
	pub fn for_toast(
		scheduler: Arc<dyn Scheduler>,
		auto_dismiss: bool,
		timeout: Duration,
		on_fire: impl Fn() + Send + Sync + 'static,
	) -> Self {
		let mut timer = Self::new(scheduler);
		if auto_dismiss && !timeout.is_zero() {
			timer.start(timeout, on_fire);
		}
		timer
	}

	/// Schedules `on_fire` after `duration`, replacing any pending fire.
	pub fn start(&mut self, duration: Duration, on_fire: impl Fn() + Send + Sync + 'static) {
		self.clear_pending();
		self.on_fire = Some(Arc::new(on_fire));
		self.duration = duration;
		self.remaining = duration;
		self.shared.fired.store(false, Ordering::Release);
		self.schedule();
	}

	/// Suspends a running countdown. No-op unless running.
	pub fn pause(&mut self) {
		self.settle();
		let Phase::Running { started_at, handle } = &self.phase else {
			tracing::trace!(state = ?self.state(), "timer.pause.ignored");
			return;
		};
		handle.cancel();
		let elapsed = self.scheduler.now().saturating_duration_since(*started_at);
		self.remaining = self.remaining.saturating_sub(elapsed);
		self.bump_generation();
		self.phase = Phase::Paused;
		tracing::trace!(remaining = ?self.remaining, "timer.pause");
	}

	/// Continues a paused countdown for the remaining time. No-op unless
	/// paused.
	pub fn resume(&mut self) {
		if !matches!(self.phase, Phase::Paused) {
			tracing::trace!(state = ?self.state(), "timer.resume.ignored");
			return;
		}
		tracing::trace!(remaining = ?self.remaining, "timer.resume");
		self.schedule();
	}

	/// Clears any pending fire and returns to idle. Valid from any state.
	pub fn cancel(&mut self) {
		self.clear_pending();
		self.phase = Phase::Idle;
	}

	pub fn state(&self) -> TimerState {
		match self.phase {
			Phase::Idle => TimerState::Idle,
			Phase::Running { .. } if self.shared.fired.load(Ordering::Acquire) => TimerState::Idle,
			Phase::Running { .. } => TimerState::Running,
			Phase::Paused => TimerState::Paused,
		}
	}

	/// Returns true while counting down. Renderers use this to play or
	/// pause their countdown indicator.
	pub fn is_running(&self) -> bool {
		self.state() == TimerState::Running
	}

	/// Returns true once the callback has run for the current countdown.
	pub fn has_fired(&self) -> bool {
		self.shared.fired.load(Ordering::Acquire)
	}

	/// Full countdown length as last started.
	pub fn duration(&self) -> Duration {
		self.duration
	}

	/// Time left before firing, as of now.
	pub fn remaining(&self) -> Duration {
		match (&self.phase, self.state()) {
			(Phase::Running { started_at, .. }, TimerState::Running) => {
				let elapsed = self.scheduler.now().saturating_duration_since(*started_at);
				self.remaining.saturating_sub(elapsed)
			}
			(_, TimerState::Paused) => self.remaining,
			_ => Duration::ZERO,
		}
	}

	fn schedule(&mut self) {
		let Some(on_fire) = self.on_fire.clone() else {
			return;
		};
		let generation = self.bump_generation();
		let shared = Arc::clone(&self.shared);
		let handle = self.scheduler.schedule_once(
			self.remaining,
			Box::new(move || {
				if shared.generation.load(Ordering::Acquire) != generation {
					tracing::trace!(generation, "timer.fire.stale");
					return;
				}
				if shared.fired.swap(true, Ordering::AcqRel) {
					return;
				}
				tracing::trace!(generation, "timer.fire");
				on_fire();
			}),
		);
		self.phase = Phase::Running {
			started_at: self.scheduler.now(),
			handle,
		};
	}

	/// Folds an observed fire back into the phase.
	fn settle(&mut self) {
		if matches!(self.phase, Phase::Running { .. }) && self.has_fired() {
			self.phase = Phase::Idle;
			self.remaining = Duration::ZERO;
		}
	}

	fn clear_pending(&mut self) {
		if let Phase::Running { handle, .. } = &self.phase {
			handle.cancel();
		}
		self.bump_generation();
	}

	fn bump_generation(&self) -> u64 {
		self.shared.generation.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}
}

impl Drop for DismissTimer {
	fn drop(&mut self) {
		self.clear_pending();
	}
}
