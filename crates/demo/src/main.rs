//! Toastline demo binary.
//!
//! Pushes a handful of toasts onto a surface, hovers the first one for a
//! while, and prints every frame in which the visible state changes.

mod render;

use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use toastline_core::{Appearance, Height, MountKey, Placement, SurfaceConfig, ToastOptions, ToastSurface, TransitionState};
use toastline_runtime::{FrameDriver, TokioScheduler};

const APPEARANCES: [Appearance; 4] = [Appearance::Info, Appearance::Success, Appearance::Warning, Appearance::Error];

/// Scripted pointer over the first toast.
#[derive(Debug, Clone, Copy)]
enum Hover {
	Pending,
	Active(MountKey),
	Done,
}

/// Demo command line arguments.
#[derive(Parser, Debug)]
#[command(name = "toastline-demo")]
#[command(about = "Walk a toast surface through add, hover, auto-dismiss, and exit")]
#[command(version)]
struct Args {
	/// TOML file with surface defaults
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Screen placement, e.g. top-right or bottom-center
	#[arg(short, long)]
	placement: Option<Placement>,

	/// Number of toasts to show
	#[arg(short = 'n', long, default_value_t = 3)]
	count: usize,

	/// Auto-dismiss timeout in milliseconds
	#[arg(long, value_name = "MS")]
	timeout_ms: Option<u64>,

	/// How long the pointer rests on the first toast, in milliseconds
	#[arg(long, value_name = "MS", default_value_t = 1500)]
	hover_ms: u64,

	/// Keep toasts until the demo times out instead of auto-dismissing
	#[arg(long)]
	sticky: bool,

	/// Give up after this many seconds
	#[arg(long, value_name = "SECS", default_value_t = 30)]
	max_secs: u64,

	/// Log level for the tracing subscriber
	#[arg(long, default_value = "info")]
	log_level: tracing::Level,
}

impl Args {
	fn surface_config(&self) -> anyhow::Result<SurfaceConfig> {
		let mut config = match &self.config {
			Some(path) => SurfaceConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
			None => SurfaceConfig::default(),
		};
		if let Some(placement) = self.placement {
			config = config.placement(placement);
		}
		if let Some(ms) = self.timeout_ms.filter(|ms| *ms > 0) {
			config = config.auto_dismiss_timeout(Duration::from_millis(ms));
		}
		Ok(config.auto_dismiss(!self.sticky))
	}
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let subscriber = tracing_subscriber::fmt().with_max_level(args.log_level).with_target(false).finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let config = args.surface_config()?;
	tracing::info!(?config, count = args.count, "demo.start");

	let scheduler = TokioScheduler::try_current().context("no tokio runtime")?;
	let mut surface: ToastSurface<String> = ToastSurface::new(config, Arc::new(scheduler));
	surface.subscribe(|event| tracing::debug!(?event, "demo.queue"));

	for (n, appearance) in APPEARANCES.iter().cycle().take(args.count).enumerate() {
		let options = ToastOptions::new()
			.appearance(*appearance)
			.on_dismiss(|id| tracing::info!(id = %id, "demo.dismissed"));
		// Every other toast gets a longer countdown.
		let options = if n % 2 == 1 {
			options.auto_dismiss_timeout(config.auto_dismiss_timeout * 2)
		} else {
			options
		};
		surface.add(format!("notice #{}", n + 1), options);
	}

	let cancel = CancellationToken::new();
	let deadline = cancel.clone();
	let max = Duration::from_secs(args.max_secs);
	tokio::spawn(async move {
		tokio::time::sleep(max).await;
		deadline.cancel();
	});

	let driver = FrameDriver::default();
	let hover_for = Duration::from_millis(args.hover_ms);
	let mut hover = Hover::Pending;
	let mut elapsed = Duration::ZERO;
	let mut last = Vec::new();

	let frames = driver
		.run(&mut surface, cancel, |surface, frame| {
			elapsed += frame.delta;

			// Pretend every toast renders 48px tall once it has settled.
			for toast in &frame.view.toasts {
				if toast.height == Height::Auto && toast.state == TransitionState::Entered {
					surface.report_height(toast.key, 48);
				}
			}

			hover = match hover {
				Hover::Pending if hover_for.is_zero() => Hover::Done,
				Hover::Pending => match frame.view.toasts.first() {
					Some(first) => {
						surface.pointer_enter(first.key);
						Hover::Active(first.key)
					}
					None => Hover::Pending,
				},
				Hover::Active(key) if elapsed >= hover_for => {
					surface.pointer_leave(key);
					tracing::info!(elapsed_ms = elapsed.as_millis(), "demo.pointer_leave");
					Hover::Done
				}
				other => other,
			};

			let signature = render::signature(&frame.view);
			if signature != last {
				print!("{}", render::render(&frame.view, elapsed.as_millis()));
				last = signature;
			}

			if frame.view.toasts.is_empty() && frame.index > 0 {
				ControlFlow::Break(())
			} else {
				ControlFlow::Continue(())
			}
		})
		.await;

	tracing::info!(frames, elapsed_ms = elapsed.as_millis(), "demo.done");
	Ok(())
}
