use std::ops::ControlFlow;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use toastline_core::{SurfaceView, ToastId, ToastSurface};

/// Default frame interval, roughly 60 frames per second.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Output of one driven frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<C> {
	/// Sequence number, starting at 0.
	pub index: u64,
	/// Time since the previous frame.
	pub delta: Duration,
	/// Toasts auto-dismissed during this frame.
	pub dismissed: Vec<ToastId>,
	pub view: SurfaceView<C>,
}

/// Drives a [`ToastSurface`] on a fixed interval: applies timer events,
/// advances transitions, and hands each resulting view to a render
/// callback.
///
/// The surface is not `Send`, so the driver runs on the task that owns it.
#[derive(Debug, Clone, Copy)]
pub struct FrameDriver {
	interval: Duration,
}

impl Default for FrameDriver {
	fn default() -> Self {
		Self::new(DEFAULT_FRAME_INTERVAL)
	}
}

impl FrameDriver {
	pub fn new(interval: Duration) -> Self {
		Self { interval }
	}

	pub fn interval(&self) -> Duration {
		self.interval
	}

	/// Runs a single frame without waiting.
	pub fn step<C: Clone>(surface: &mut ToastSurface<C>, index: u64, delta: Duration) -> Frame<C> {
		let dismissed = surface.pump();
		surface.advance(delta);
		Frame {
			index,
			delta,
			dismissed,
			view: surface.view(),
		}
	}

	/// Runs frames until `cancel` fires or `on_frame` breaks. Returns the
	/// number of frames rendered.
	///
	/// `on_frame` receives the surface mutably so it can feed input (adds,
	/// pointer events, measured heights) back before the next frame.
	pub async fn run<C: Clone>(
		&self,
		surface: &mut ToastSurface<C>,
		cancel: CancellationToken,
		mut on_frame: impl FnMut(&mut ToastSurface<C>, Frame<C>) -> ControlFlow<()>,
	) -> u64 {
		let mut ticker = tokio::time::interval(self.interval);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
		let mut last = Instant::now();
		let mut frames = 0;

		loop {
			tokio::select! {
				biased;
				() = cancel.cancelled() => {
					tracing::debug!(frames, "driver.cancelled");
					break;
				}
				_ = ticker.tick() => {}
			}

			let now = Instant::now();
			let frame = Self::step(surface, frames, now.saturating_duration_since(last));
			last = now;
			frames += 1;

			if !frame.dismissed.is_empty() {
				tracing::debug!(frame = frame.index, dismissed = frame.dismissed.len(), "driver.auto_dismiss");
			}
			if on_frame(surface, frame).is_break() {
				tracing::debug!(frames, "driver.stop");
				break;
			}
		}
		frames
	}
}
