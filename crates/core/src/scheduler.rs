//! One-shot scheduling capability used by dismiss timers.
//!
//! Hosts provide a [`Scheduler`]: "run this once after a delay, give me a
//! handle to cancel it". [`ManualScheduler`] keeps a virtual clock that the
//! host advances explicitly, which suits tick-driven UIs and tests. A
//! real-time implementation lives in the runtime crate.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// Deferred work handed to a scheduler.
pub type Task = Box<dyn FnOnce() + Send>;

/// Schedules one-shot tasks and reports the current time on the same clock.
pub trait Scheduler: Send + Sync {
	/// Current instant on this scheduler's clock.
	fn now(&self) -> Instant;

	/// Runs `task` once after `delay`, unless the returned handle is
	/// cancelled first.
	fn schedule_once(&self, delay: Duration, task: Task) -> ScheduleHandle;
}

/// Cancellation handle for a scheduled task.
///
/// Dropping the handle does not cancel the task; call [`Self::cancel`].
#[derive(Debug, Clone, Default)]
pub struct ScheduleHandle {
	token: CancellationToken,
}

impl ScheduleHandle {
	pub fn new(token: CancellationToken) -> Self {
		Self { token }
	}

	/// Prevents the task from running if it has not run yet.
	pub fn cancel(&self) {
		self.token.cancel();
	}

	pub fn is_cancelled(&self) -> bool {
		self.token.is_cancelled()
	}

	/// Token observed by the scheduler implementation.
	pub fn token(&self) -> &CancellationToken {
		&self.token
	}
}

struct Pending {
	deadline: Duration,
	seq: u64,
	token: CancellationToken,
	task: Task,
}

struct ManualState {
	elapsed: Duration,
	next_seq: u64,
	pending: Vec<Pending>,
}

/// Scheduler driven by explicit [`advance`](Self::advance) calls.
///
/// Clones share one clock and one task list.
#[derive(Clone)]
pub struct ManualScheduler {
	origin: Instant,
	state: Arc<Mutex<ManualState>>,
}

impl fmt::Debug for ManualScheduler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.state.lock();
		f.debug_struct("ManualScheduler")
			.field("elapsed", &state.elapsed)
			.field("pending", &state.pending.len())
			.finish()
	}
}

impl Default for ManualScheduler {
	fn default() -> Self {
		Self::new()
	}
}

impl ManualScheduler {
	pub fn new() -> Self {
		Self {
			origin: Instant::now(),
			state: Arc::new(Mutex::new(ManualState {
				elapsed: Duration::ZERO,
				next_seq: 0,
				pending: Vec::new(),
			})),
		}
	}

	/// Time advanced since creation.
	pub fn elapsed(&self) -> Duration {
		self.state.lock().elapsed
	}

	/// Number of scheduled tasks that are neither run nor cancelled.
	pub fn pending(&self) -> usize {
		self.state
			.lock()
			.pending
			.iter()
			.filter(|p| !p.token.is_cancelled())
			.count()
	}

	/// Moves the clock forward by `delta`, running every task that comes due
	/// in deadline order.
	///
	/// Tasks run without the internal lock held, so they may schedule further
	/// tasks; those run too if they fall inside the window.
	pub fn advance(&self, delta: Duration) {
		let target = self.state.lock().elapsed.saturating_add(delta);
		loop {
			let due = {
				let mut state = self.state.lock();
				state.pending.retain(|p| !p.token.is_cancelled());
				let next = state
					.pending
					.iter()
					.enumerate()
					.filter(|(_, p)| p.deadline <= target)
					.min_by_key(|(_, p)| (p.deadline, p.seq))
					.map(|(idx, _)| idx);
				match next {
					Some(idx) => {
						let due = state.pending.swap_remove(idx);
						state.elapsed = state.elapsed.max(due.deadline);
						due
					}
					None => {
						state.elapsed = target;
						return;
					}
				}
			};
			if due.token.is_cancelled() {
				continue;
			}
			(due.task)();
		}
	}
}

impl Scheduler for ManualScheduler {
	fn now(&self) -> Instant {
		self.origin + self.state.lock().elapsed
	}

	fn schedule_once(&self, delay: Duration, task: Task) -> ScheduleHandle {
		let token = CancellationToken::new();
		let mut state = self.state.lock();
		let seq = state.next_seq;
		state.next_seq = state.next_seq.wrapping_add(1);
		let deadline = state.elapsed.saturating_add(delay);
		state.pending.push(Pending {
			deadline,
			seq,
			token: token.clone(),
			task,
		});
		tracing::trace!(?delay, seq, "scheduler.manual.schedule");
		ScheduleHandle::new(token)
	}
}
