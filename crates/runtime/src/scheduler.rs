use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use toastline_core::{ScheduleHandle, Scheduler, Task};

/// Real-time [`Scheduler`] backed by tokio timers.
///
/// Each scheduled task is a spawned sleep raced against its cancellation
/// token. Time is read from tokio's clock, so paused test runtimes control
/// it as well.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
	handle: Handle,
}

impl TokioScheduler {
	pub fn new(handle: Handle) -> Self {
		Self { handle }
	}

	/// Scheduler on the runtime of the calling context, if any.
	pub fn try_current() -> Option<Self> {
		Handle::try_current().ok().map(Self::new)
	}
}

impl Scheduler for TokioScheduler {
	fn now(&self) -> Instant {
		tokio::time::Instant::now().into_std()
	}

	fn schedule_once(&self, delay: Duration, task: Task) -> ScheduleHandle {
		let token = CancellationToken::new();
		let cancelled = token.clone();
		tracing::trace!(?delay, "scheduler.tokio.schedule");
		self.handle.spawn(async move {
			tokio::select! {
				biased;
				() = cancelled.cancelled() => tracing::trace!("scheduler.tokio.cancelled"),
				() = tokio::time::sleep(delay) => task(),
			}
		});
		ScheduleHandle::new(token)
	}
}
