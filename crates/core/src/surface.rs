//! Toast surface: the per-UI-root context that ties the queue to mounted
//! instances.
//!
//! A surface is constructed explicitly and handed to whatever needs it;
//! several surfaces can coexist in one process. It owns:
//!
//! - the [`ToastQueue`] (what is logically shown),
//! - one [`ToastController`] per mounted instance (what is visually shown,
//!   including toasts still animating out after removal),
//! - a channel through which dismiss timers report expiry.
//!
//! Timers never mutate the surface directly. They post an event that the UI
//! thread applies in [`ToastSurface::pump`], so every mutation happens on one
//! thread and late events are absorbed as no-ops.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::config::SurfaceConfig;
use crate::controller::{Countdown, ToastController};
use crate::id::ToastId;
use crate::placement::{Placement, PlacementRules};
use crate::queue::{QueueEvent, SubscriptionId, ToastQueue};
use crate::scheduler::Scheduler;
use crate::toast::{Toast, ToastOptions, ToastSnapshot};
use crate::transition::{GUTTER, Height, HeightTransition, TransitionState, TransitionStyle};

/// Whether the host UI tree offers an insertion point for the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostMount {
	/// The container renders into the host's overlay/portal.
	#[default]
	Attached,
	/// No insertion point; the container renders inline and inert.
	Missing,
}

/// Identity of one mounted instance, stable for its whole lifetime.
///
/// A toast id can be reused after removal while the old instance is still
/// animating out; mount keys tell the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountKey(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
enum SurfaceEvent {
	AutoDismiss { id: ToastId, key: MountKey },
}

struct Mounted<C> {
	key: MountKey,
	snapshot: ToastSnapshot<C>,
	controller: ToastController,
	/// Set once the toast has left the queue.
	removed: bool,
}

/// Container-level data for renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerView {
	pub placement: Placement,
	pub rules: PlacementRules,
	pub padding: u32,
	/// Rendered through the host's portal rather than inline.
	pub portal: bool,
	/// Accepts pointer events. False when empty or when the host mount is
	/// missing.
	pub interactive: bool,
	pub has_toasts: bool,
}

/// Everything a renderer needs to draw one mounted toast.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastView<C> {
	pub key: MountKey,
	pub toast: ToastSnapshot<C>,
	pub state: TransitionState,
	/// Target style for the current state.
	pub style: TransitionStyle,
	/// Style interpolated by transition progress.
	pub animated_style: TransitionStyle,
	pub height: Height,
	pub height_transition: HeightTransition,
	pub transition_duration: Duration,
	pub countdown: Option<Countdown>,
	/// The toast has left the queue and is animating out.
	pub dismissed: bool,
}

/// Read-only frame snapshot handed to renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceView<C> {
	pub container: ContainerView,
	pub toasts: Vec<ToastView<C>>,
}

/// Toast context for one UI root.
pub struct ToastSurface<C> {
	config: SurfaceConfig,
	scheduler: Arc<dyn Scheduler>,
	queue: ToastQueue<C>,
	mounted: Vec<Mounted<C>>,
	next_key: u64,
	host: HostMount,
	events_tx: UnboundedSender<SurfaceEvent>,
	events_rx: UnboundedReceiver<SurfaceEvent>,
}

impl<C> fmt::Debug for ToastSurface<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ToastSurface")
			.field("config", &self.config)
			.field("queue", &self.queue)
			.field("mounted", &self.mounted.len())
			.field("host", &self.host)
			.finish()
	}
}

impl<C: Clone> ToastSurface<C> {
	pub fn new(config: SurfaceConfig, scheduler: Arc<dyn Scheduler>) -> Self {
		let (events_tx, events_rx) = unbounded_channel();
		Self {
			config,
			scheduler,
			queue: ToastQueue::new(),
			mounted: Vec::new(),
			next_key: 0,
			host: HostMount::default(),
			events_tx,
			events_rx,
		}
	}

	/// Sets the host mount status at construction.
	#[must_use]
	pub fn with_mount(mut self, host: HostMount) -> Self {
		self.host = host;
		self
	}

	pub fn config(&self) -> &SurfaceConfig {
		&self.config
	}

	/// The underlying queue, read-only.
	pub fn queue(&self) -> &ToastQueue<C> {
		&self.queue
	}

	pub fn host_mount(&self) -> HostMount {
		self.host
	}

	/// Updates the host mount status, e.g. when the overlay appears late.
	pub fn set_mount(&mut self, host: HostMount) {
		if self.host != host {
			tracing::debug!(?host, "surface.mount_point");
		}
		self.host = host;
	}

	pub fn has(&self, id: &str) -> bool {
		self.queue.has(id)
	}

	/// Number of mounted instances, including those animating out.
	pub fn mounted_len(&self) -> usize {
		self.mounted.len()
	}

	pub fn add(&mut self, content: C, options: ToastOptions) -> ToastId {
		self.add_then(content, options, |_| {})
	}

	/// Adds a toast and mounts it. A duplicate explicit id is a no-op.
	///
	/// Options without `auto_dismiss` inherit the surface default.
	pub fn add_then(&mut self, content: C, mut options: ToastOptions, on_added: impl FnOnce(&ToastId)) -> ToastId {
		options.auto_dismiss.get_or_insert(self.config.auto_dismiss);
		let mut added = false;
		let id = self.queue.add_then(content, options, |id| {
			added = true;
			on_added(id);
		});
		if added {
			self.mount(&id);
		}
		id
	}

	pub fn update(&mut self, id: &str, options: ToastOptions) -> bool {
		self.update_then(id, options, |_| {})
	}

	/// Merges options into a queued toast and refreshes its rendered copy.
	///
	/// A running countdown is not restarted.
	pub fn update_then(&mut self, id: &str, options: ToastOptions, on_updated: impl FnOnce(&ToastId)) -> bool {
		if !self.queue.update_then(id, options, on_updated) {
			return false;
		}
		let snapshot = self.queue.get(id).map(Toast::snapshot);
		if let (Some(snapshot), Some(mounted)) = (snapshot, self.live_mut(id)) {
			mounted.snapshot = snapshot;
		}
		true
	}

	pub fn remove(&mut self, id: &str) -> bool {
		self.remove_then(id, |_| {})
	}

	/// Removes a toast from the queue and starts its exit animation. The
	/// instance stays mounted until the animation completes.
	pub fn remove_then(&mut self, id: &str, on_removed: impl FnOnce(&ToastId)) -> bool {
		if !self.queue.remove_then(id, on_removed) {
			return false;
		}
		self.begin_exit(id);
		true
	}

	pub fn remove_all(&mut self) -> usize {
		self.remove_all_then(|_| {})
	}

	/// Removes every toast; each instance animates out.
	pub fn remove_all_then(&mut self, mut on_each_removed: impl FnMut(&ToastId)) -> usize {
		let mut removed = Vec::new();
		let count = self.queue.remove_all_then(|id| {
			on_each_removed(id);
			removed.push(id.clone());
		});
		for id in &removed {
			self.begin_exit(id.as_str());
		}
		count
	}

	/// Registers a queue observer.
	pub fn subscribe(&mut self, observer: impl FnMut(&QueueEvent) + 'static) -> SubscriptionId {
		self.queue.subscribe(observer)
	}

	pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
		self.queue.unsubscribe(subscription)
	}

	/// Applies pending timer events. Returns the ids that were
	/// auto-dismissed.
	pub fn pump(&mut self) -> Vec<ToastId> {
		let mut dismissed = Vec::new();
		while let Ok(event) = self.events_rx.try_recv() {
			match event {
				SurfaceEvent::AutoDismiss { id, key } => {
					let current = self.live(id.as_str()).map(|m| m.key);
					if current != Some(key) {
						tracing::trace!(id = %id, ?key, "surface.auto_dismiss.stale");
						continue;
					}
					tracing::debug!(id = %id, "surface.auto_dismiss");
					if self.remove(id.as_str()) {
						dismissed.push(id);
					}
				}
			}
		}
		dismissed
	}

	/// Advances every transition by `delta` and unmounts instances whose
	/// exit animation has finished.
	pub fn advance(&mut self, delta: Duration) {
		for mounted in &mut self.mounted {
			mounted.controller.advance(delta);
		}
		self.unmount_exited();
	}

	/// Host-driven completion of the current animation of one instance.
	pub fn complete_animation(&mut self, key: MountKey) {
		if let Some(mounted) = self.by_key_mut(key) {
			mounted.controller.transition_mut().complete_animation();
		}
		self.unmount_exited();
	}

	/// Pointer entered an instance: pause its countdown.
	pub fn pointer_enter(&mut self, key: MountKey) {
		if !self.accepts_pointer() {
			tracing::trace!(?key, "surface.pointer.inert");
			return;
		}
		if let Some(mounted) = self.by_key_mut(key) {
			mounted.controller.pointer_enter();
		}
	}

	/// Pointer left an instance: resume its countdown.
	pub fn pointer_leave(&mut self, key: MountKey) {
		if !self.accepts_pointer() {
			tracing::trace!(?key, "surface.pointer.inert");
			return;
		}
		if let Some(mounted) = self.by_key_mut(key) {
			mounted.controller.pointer_leave();
		}
	}

	/// Records the rendered content height of an instance.
	pub fn report_height(&mut self, key: MountKey, height: u32) {
		if let Some(mounted) = self.by_key_mut(key) {
			mounted.controller.transition_mut().measure(height);
		}
	}

	/// Builds a read-only frame for renderers, in mount order.
	pub fn view(&self) -> SurfaceView<C> {
		let has_toasts = !self.queue.is_empty();
		let portal = self.host == HostMount::Attached;
		let container = ContainerView {
			placement: self.config.placement,
			rules: self.config.placement.rules(),
			padding: GUTTER,
			portal,
			interactive: portal && has_toasts,
			has_toasts,
		};
		let toasts = self
			.mounted
			.iter()
			.map(|m| {
				let transition = m.controller.transition();
				ToastView {
					key: m.key,
					toast: m.snapshot.clone(),
					state: transition.state(),
					style: transition.style(),
					animated_style: transition.animated_style(),
					height: transition.height(),
					height_transition: transition.height_transition(),
					transition_duration: transition.duration(),
					countdown: m.controller.countdown(),
					dismissed: m.removed,
				}
			})
			.collect();
		SurfaceView { container, toasts }
	}

	fn mount(&mut self, id: &ToastId) {
		let Some(toast) = self.queue.get(id.as_str()) else {
			return;
		};
		let key = MountKey(self.next_key);
		self.next_key = self.next_key.wrapping_add(1);

		let timeout = self.config.timeout_for(toast.auto_dismiss_timeout);
		let tx = self.events_tx.clone();
		let expired = id.clone();
		let controller = ToastController::mount(
			Arc::clone(&self.scheduler),
			self.config.placement,
			self.config.transition_duration,
			toast.auto_dismiss,
			timeout,
			move || {
				let event = SurfaceEvent::AutoDismiss {
					id: expired.clone(),
					key,
				};
				if tx.send(event).is_err() {
					tracing::trace!(id = %expired, "surface.closed");
				}
			},
		);
		tracing::debug!(id = %id, ?key, auto_dismiss = toast.auto_dismiss, ?timeout, "surface.mount");
		self.mounted.push(Mounted {
			key,
			snapshot: toast.snapshot(),
			controller,
			removed: false,
		});
	}

	fn begin_exit(&mut self, id: &str) {
		if let Some(mounted) = self.live_mut(id) {
			mounted.removed = true;
			mounted.controller.dismiss();
		}
	}

	fn unmount_exited(&mut self) {
		self.mounted.retain(|m| {
			let keep = !(m.removed && m.controller.is_exited());
			if !keep {
				tracing::debug!(id = %m.snapshot.id, key = ?m.key, "surface.unmount");
			}
			keep
		});
	}

	fn accepts_pointer(&self) -> bool {
		self.host == HostMount::Attached
	}

	fn live(&self, id: &str) -> Option<&Mounted<C>> {
		self.mounted.iter().find(|m| !m.removed && m.snapshot.id.as_str() == id)
	}

	fn live_mut(&mut self, id: &str) -> Option<&mut Mounted<C>> {
		self.mounted.iter_mut().find(|m| !m.removed && m.snapshot.id.as_str() == id)
	}

	fn by_key_mut(&mut self, key: MountKey) -> Option<&mut Mounted<C>> {
		self.mounted.iter_mut().find(|m| m.key == key)
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;
	use std::rc::Rc;

	use pretty_assertions::assert_eq;

	use super::*;
	use crate::scheduler::ManualScheduler;
	use crate::toast::Appearance;

	fn ms(n: u64) -> Duration {
		Duration::from_millis(n)
	}

	fn surface(config: SurfaceConfig) -> (ToastSurface<&'static str>, ManualScheduler) {
		let scheduler = ManualScheduler::new();
		(ToastSurface::new(config, Arc::new(scheduler.clone())), scheduler)
	}

	fn states(surface: &ToastSurface<&'static str>) -> Vec<(String, TransitionState)> {
		surface
			.view()
			.toasts
			.into_iter()
			.map(|t| (t.toast.id.to_string(), t.state))
			.collect()
	}

	#[test]
	fn add_mounts_in_entering() {
		let (mut surface, _) = surface(SurfaceConfig::default());
		surface.add("hello", ToastOptions::new().id("a"));
		assert_eq!(states(&surface), vec![("a".to_string(), TransitionState::Entering)]);
		surface.advance(ms(220));
		assert_eq!(states(&surface), vec![("a".to_string(), TransitionState::Entered)]);
	}

	#[test]
	fn duplicate_add_does_not_mount_twice() {
		let (mut surface, _) = surface(SurfaceConfig::default());
		surface.add("one", ToastOptions::new().id("a"));
		surface.add("two", ToastOptions::new().id("a"));
		assert_eq!(surface.mounted_len(), 1);
		assert_eq!(surface.view().toasts[0].toast.content, "one");
	}

	#[test]
	fn removed_toast_animates_out_before_unmount() {
		let (mut surface, _) = surface(SurfaceConfig::default());
		surface.add("hello", ToastOptions::new().id("a"));
		surface.advance(ms(220));

		assert!(surface.remove("a"));
		assert!(!surface.has("a"));
		let view = surface.view();
		assert_eq!(view.toasts.len(), 1);
		assert!(view.toasts[0].dismissed);
		assert_eq!(view.toasts[0].state, TransitionState::Exiting);
		assert_eq!(view.toasts[0].height, Height::Fixed(0));

		surface.advance(ms(219));
		assert_eq!(surface.mounted_len(), 1);
		surface.advance(ms(1));
		assert_eq!(surface.mounted_len(), 0);
	}

	#[test]
	fn auto_dismiss_flows_through_pump() {
		let dismissed = Rc::new(Cell::new(0));
		let counter = Rc::clone(&dismissed);
		let config = SurfaceConfig::default().auto_dismiss(true).auto_dismiss_timeout(ms(1000));
		let (mut surface, scheduler) = surface(config);
		surface.add("bye", ToastOptions::new().id("a").on_dismiss(move |_| counter.set(counter.get() + 1)));

		scheduler.advance(ms(999));
		assert!(surface.pump().is_empty());
		scheduler.advance(ms(1));
		assert_eq!(surface.pump(), vec![ToastId::from("a")]);
		assert_eq!(dismissed.get(), 1);

		assert!(surface.pump().is_empty());
		assert!(!surface.remove("a"));
		assert_eq!(dismissed.get(), 1);
	}

	#[test]
	fn per_toast_option_overrides_surface_default() {
		let config = SurfaceConfig::default().auto_dismiss(true);
		let (mut surface, scheduler) = surface(config);
		surface.add("sticky", ToastOptions::new().id("a").auto_dismiss(false));
		surface.add("quick", ToastOptions::new().id("b").auto_dismiss_timeout(ms(100)));

		scheduler.advance(ms(100));
		assert_eq!(surface.pump(), vec![ToastId::from("b")]);
		scheduler.advance(ms(60_000));
		assert!(surface.pump().is_empty());
		assert!(surface.has("a"));
	}

	#[test]
	fn hover_pauses_only_when_host_attached() {
		let config = SurfaceConfig::default().auto_dismiss(true).auto_dismiss_timeout(ms(1000));
		let (mut surface, scheduler) = surface(config);
		surface.set_mount(HostMount::Missing);
		surface.add("x", ToastOptions::new().id("a"));
		let key = surface.view().toasts[0].key;

		let container = surface.view().container;
		assert!(!container.portal);
		assert!(!container.interactive);

		surface.pointer_enter(key);
		assert_eq!(surface.view().toasts[0].countdown.map(|c| c.running), Some(true));
		scheduler.advance(ms(1000));
		assert_eq!(surface.pump(), vec![ToastId::from("a")]);

		surface.set_mount(HostMount::Attached);
		surface.add("y", ToastOptions::new().id("b"));
		let key = surface.view().toasts.iter().find(|t| t.toast.id.as_str() == "b").unwrap().key;
		surface.pointer_enter(key);
		scheduler.advance(ms(5000));
		assert!(surface.pump().is_empty());
		surface.pointer_leave(key);
		scheduler.advance(ms(1000));
		assert_eq!(surface.pump(), vec![ToastId::from("b")]);
	}

	#[test]
	fn stale_expiry_does_not_remove_a_readded_toast() {
		let dismissed = Rc::new(Cell::new(0));
		let counter = Rc::clone(&dismissed);
		let config = SurfaceConfig::default().auto_dismiss(true).auto_dismiss_timeout(ms(100));
		let (mut surface, scheduler) = surface(config);
		surface.add("first", ToastOptions::new().id("a").on_dismiss(move |_| counter.set(counter.get() + 1)));
		scheduler.advance(ms(100));

		// Expiry is queued but not yet pumped when the toast is replaced.
		assert!(surface.remove("a"));
		assert_eq!(dismissed.get(), 1);
		surface.add("second", ToastOptions::new().id("a").auto_dismiss(false));
		assert!(surface.pump().is_empty());
		assert_eq!(dismissed.get(), 1);
		assert_eq!(surface.queue().get("a").map(|t| t.content), Some("second"));
	}

	#[test]
	fn late_expiry_after_manual_remove_is_silent() {
		let dismissed = Rc::new(Cell::new(0));
		let counter = Rc::clone(&dismissed);
		let config = SurfaceConfig::default().auto_dismiss(true).auto_dismiss_timeout(ms(100));
		let (mut surface, scheduler) = surface(config);
		surface.add("x", ToastOptions::new().id("a").on_dismiss(move |_| counter.set(counter.get() + 1)));
		scheduler.advance(ms(100));

		assert!(surface.remove("a"));
		assert!(surface.pump().is_empty());
		assert_eq!(dismissed.get(), 1);
		assert_eq!(surface.view().toasts[0].state, TransitionState::Exiting);
	}

	#[test]
	fn zero_default_timeout_still_dismisses() {
		let config = SurfaceConfig::default().auto_dismiss(true).auto_dismiss_timeout(Duration::ZERO);
		let (mut surface, scheduler) = surface(config);
		surface.add("x", ToastOptions::new().id("a"));
		assert_eq!(
			surface.view().toasts[0].countdown.map(|c| c.duration),
			Some(crate::config::DEFAULT_AUTO_DISMISS_TIMEOUT)
		);
		scheduler.advance(crate::config::DEFAULT_AUTO_DISMISS_TIMEOUT);
		assert_eq!(surface.pump(), vec![ToastId::from("a")]);
	}

	#[test]
	fn update_refreshes_rendered_snapshot() {
		let (mut surface, _) = surface(SurfaceConfig::default());
		surface.add("x", ToastOptions::new().id("a"));
		surface.update("a", ToastOptions::new().appearance(Appearance::Error));
		assert_eq!(surface.view().toasts[0].toast.appearance, Appearance::Error);
	}

	#[test]
	fn remove_all_exits_every_instance() {
		let (mut surface, _) = surface(SurfaceConfig::default());
		surface.add("a", ToastOptions::new());
		surface.add("b", ToastOptions::new());
		assert_eq!(surface.remove_all(), 2);
		assert!(surface.view().toasts.iter().all(|t| t.dismissed && t.state == TransitionState::Exiting));
		assert!(!surface.view().container.has_toasts);
		surface.advance(ms(220));
		assert_eq!(surface.mounted_len(), 0);
		assert_eq!(surface.remove_all(), 0);
	}

	#[test]
	fn host_completion_drives_transitions() {
		let (mut surface, _) = surface(SurfaceConfig::default());
		surface.add("x", ToastOptions::new().id("a"));
		let key = surface.view().toasts[0].key;
		surface.complete_animation(key);
		surface.report_height(key, 40);
		assert_eq!(surface.view().toasts[0].height, Height::Fixed(48));

		surface.remove("a");
		surface.complete_animation(key);
		assert_eq!(surface.mounted_len(), 0);
	}

	#[test]
	fn unmount_cancels_timer() {
		let config = SurfaceConfig::default().auto_dismiss(true).auto_dismiss_timeout(ms(500));
		let (mut surface, scheduler) = surface(config);
		surface.add("x", ToastOptions::new().id("a"));
		assert_eq!(scheduler.pending(), 1);
		surface.remove("a");
		assert_eq!(scheduler.pending(), 0);
		assert_eq!(surface.view().toasts[0].countdown.map(|c| c.running), Some(false));
	}
}
