use std::fmt::Write;

use toastline_core::{Height, MountKey, SurfaceView, TransitionState};

/// Compact signature of a view; frames are only printed when it changes.
pub fn signature<C>(view: &SurfaceView<C>) -> Vec<(MountKey, TransitionState, bool)> {
	view.toasts
		.iter()
		.map(|t| (t.key, t.state, t.countdown.is_some_and(|c| c.running)))
		.collect()
}

/// Renders a view as text, one toast per line in stacking order.
pub fn render(view: &SurfaceView<String>, elapsed_ms: u128) -> String {
	let container = &view.container;
	let mut out = String::new();
	let _ = writeln!(
		out,
		"[{:>6}ms] {} portal={} interactive={} toasts={}",
		elapsed_ms,
		container.placement,
		container.portal,
		container.interactive,
		view.toasts.len()
	);

	let mut toasts: Vec<_> = view.toasts.iter().collect();
	if container.placement.stacks_up() {
		toasts.reverse();
	}
	for toast in toasts {
		let height = match toast.height {
			Height::Auto => "auto".to_string(),
			Height::Fixed(px) => format!("{px}px"),
		};
		let countdown = match toast.countdown {
			Some(c) if c.running => format!("{}ms running", c.duration.as_millis()),
			Some(c) => format!("{}ms paused", c.duration.as_millis()),
			None => "sticky".to_string(),
		};
		let _ = writeln!(
			out,
			"    {:<8} {:<9} {:<8} h={:<6} opacity={:.2} scale={:.2} translate=({:+.0}%, {:+.0}%) {:<16} {}",
			toast.toast.appearance,
			format!("{:?}", toast.state).to_lowercase(),
			toast.toast.id,
			height,
			toast.animated_style.opacity,
			toast.animated_style.scale,
			toast.animated_style.translate.x_pct,
			toast.animated_style.translate.y_pct,
			countdown,
			toast.toast.content,
		);
	}
	out
}
