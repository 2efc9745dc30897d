//! Tokio integration for toastline: a real-time [`TokioScheduler`] and a
//! [`FrameDriver`] that ticks a surface at a fixed rate.

mod driver;
mod scheduler;

pub use driver::{DEFAULT_FRAME_INTERVAL, Frame, FrameDriver};
pub use scheduler::TokioScheduler;
