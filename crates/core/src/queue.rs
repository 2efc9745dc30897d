//! Ordered toast queue with idempotent mutations and an observer list.
//!
//! Every mutating operation is a silent no-op when its guard fails: adding a
//! duplicate explicit id, updating or removing an unknown id, and clearing an
//! empty queue. Dismiss events racing with timers and animations therefore
//! never surface as errors.

use crate::id::{IdGenerator, ToastId};
use crate::toast::{Toast, ToastOptions, ToastSnapshot};

/// Change notification delivered to queue observers after a mutation commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
	Added(ToastId),
	Updated(ToastId),
	Removed(ToastId),
	/// Emitted once after `remove_all` has removed every toast.
	Cleared,
}

/// Handle returned by [`ToastQueue::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&QueueEvent)>;

/// Ordered collection of active toasts, oldest first.
pub struct ToastQueue<C> {
	toasts: Vec<Toast<C>>,
	id_gen: IdGenerator,
	observers: Vec<(SubscriptionId, Observer)>,
	next_subscription: u64,
}

impl<C> Default for ToastQueue<C> {
	fn default() -> Self {
		Self::new()
	}
}

impl<C> std::fmt::Debug for ToastQueue<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ToastQueue")
			.field("ids", &self.ids().collect::<Vec<_>>())
			.field("observers", &self.observers.len())
			.finish()
	}
}

impl<C> ToastQueue<C> {
	pub fn new() -> Self {
		Self {
			toasts: Vec::new(),
			id_gen: IdGenerator::new(),
			observers: Vec::new(),
			next_subscription: 0,
		}
	}

	/// Returns true iff a toast with `id` is present.
	pub fn has(&self, id: &str) -> bool {
		self.position(id).is_some()
	}

	pub fn get(&self, id: &str) -> Option<&Toast<C>> {
		self.position(id).map(|idx| &self.toasts[idx])
	}

	/// Iterates toasts in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &Toast<C>> {
		self.toasts.iter()
	}

	/// Iterates ids in insertion order.
	pub fn ids(&self) -> impl Iterator<Item = &ToastId> {
		self.toasts.iter().map(Toast::id)
	}

	pub fn len(&self) -> usize {
		self.toasts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.toasts.is_empty()
	}

	/// Adds a toast and returns its id. See [`Self::add_then`].
	pub fn add(&mut self, content: C, options: ToastOptions) -> ToastId {
		self.add_then(content, options, |_| {})
	}

	/// Adds a toast, then calls `on_added` with its id.
	///
	/// If `options.id` names a toast already in the queue, nothing changes:
	/// the existing entry is left as is, `on_added` is not called, and the
	/// supplied id is returned.
	pub fn add_then(&mut self, content: C, options: ToastOptions, on_added: impl FnOnce(&ToastId)) -> ToastId {
		let id = match &options.id {
			Some(id) if self.has(id.as_str()) => {
				tracing::debug!(id = %id, "toast.add.duplicate");
				return id.clone();
			}
			Some(id) => id.clone(),
			None => self.id_gen.generate_unused(|candidate| self.has(candidate.as_str())),
		};

		self.toasts.push(Toast::new(id.clone(), content, options));
		tracing::debug!(id = %id, len = self.toasts.len(), "toast.add");
		on_added(&id);
		self.notify(&QueueEvent::Added(id.clone()));
		id
	}

	/// Merges `options` into an existing toast. See [`Self::update_then`].
	pub fn update(&mut self, id: &str, options: ToastOptions) -> bool {
		self.update_then(id, options, |_| {})
	}

	/// Shallow-merges `options` into the toast with `id`, keeping its
	/// position, then calls `on_updated`. Returns false for unknown ids.
	pub fn update_then(&mut self, id: &str, options: ToastOptions, on_updated: impl FnOnce(&ToastId)) -> bool {
		let Some(idx) = self.position(id) else {
			tracing::debug!(id, "toast.update.unknown");
			return false;
		};
		let toast = &mut self.toasts[idx];
		toast.merge(options);
		let id = toast.id().clone();
		tracing::debug!(id = %id, "toast.update");
		on_updated(&id);
		self.notify(&QueueEvent::Updated(id));
		true
	}

	/// Removes a toast. See [`Self::remove_then`].
	pub fn remove(&mut self, id: &str) -> bool {
		self.remove_then(id, |_| {})
	}

	/// Removes the toast with `id`, fires its dismiss callback, then calls
	/// `on_removed`. Returns false for unknown ids.
	pub fn remove_then(&mut self, id: &str, on_removed: impl FnOnce(&ToastId)) -> bool {
		let Some(idx) = self.position(id) else {
			tracing::debug!(id, "toast.remove.unknown");
			return false;
		};
		let mut toast = self.toasts.remove(idx);
		tracing::debug!(id = %toast.id(), len = self.toasts.len(), "toast.remove");
		toast.fire_dismiss();
		on_removed(toast.id());
		self.notify(&QueueEvent::Removed(toast.id().clone()));
		true
	}

	/// Removes every toast. See [`Self::remove_all_then`].
	pub fn remove_all(&mut self) -> usize {
		self.remove_all_then(|_| {})
	}

	/// Removes every toast in insertion order and returns how many were
	/// removed.
	///
	/// Each toast's dismiss callback fires, followed by `on_each_removed`.
	/// Observers see one [`QueueEvent::Removed`] per toast and a final
	/// [`QueueEvent::Cleared`].
	pub fn remove_all_then(&mut self, mut on_each_removed: impl FnMut(&ToastId)) -> usize {
		if self.toasts.is_empty() {
			tracing::debug!("toast.remove_all.empty");
			return 0;
		}
		let removed = std::mem::take(&mut self.toasts);
		let count = removed.len();
		tracing::debug!(count, "toast.remove_all");
		for mut toast in removed {
			toast.fire_dismiss();
			on_each_removed(toast.id());
			self.notify(&QueueEvent::Removed(toast.id().clone()));
		}
		self.notify(&QueueEvent::Cleared);
		count
	}

	/// Registers an observer called after every committed mutation.
	pub fn subscribe(&mut self, observer: impl FnMut(&QueueEvent) + 'static) -> SubscriptionId {
		let id = SubscriptionId(self.next_subscription);
		self.next_subscription = self.next_subscription.wrapping_add(1);
		self.observers.push((id, Box::new(observer)));
		id
	}

	/// Drops an observer. Returns false if it was not registered.
	pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
		let before = self.observers.len();
		self.observers.retain(|(id, _)| *id != subscription);
		self.observers.len() != before
	}

	fn position(&self, id: &str) -> Option<usize> {
		self.toasts.iter().position(|t| t.id().as_str() == id)
	}

	fn notify(&mut self, event: &QueueEvent) {
		for (_, observer) in &mut self.observers {
			observer(event);
		}
	}
}

impl<C: Clone> ToastQueue<C> {
	/// Copies every toast out, in insertion order.
	pub fn snapshot(&self) -> Vec<ToastSnapshot<C>> {
		self.toasts.iter().map(Toast::snapshot).collect()
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use pretty_assertions::assert_eq;
	use proptest::prelude::*;

	use super::*;
	use crate::toast::Appearance;

	fn ids_of<C>(queue: &ToastQueue<C>) -> Vec<String> {
		queue.ids().map(|id| id.to_string()).collect()
	}

	fn counting_dismiss(log: &Rc<RefCell<Vec<String>>>) -> impl FnOnce(&ToastId) + 'static {
		let log = Rc::clone(log);
		move |id| log.borrow_mut().push(id.to_string())
	}

	#[test]
	fn add_without_id_generates_one() {
		let mut queue = ToastQueue::new();
		let id = queue.add("hello", ToastOptions::new());
		assert!(queue.has(id.as_str()));
		assert_eq!(queue.len(), 1);
		assert_eq!(queue.get(id.as_str()).map(|t| t.content), Some("hello"));
	}

	#[test]
	fn add_calls_on_added_after_commit() {
		let mut queue = ToastQueue::new();
		let seen = RefCell::new(None);
		let id = queue.add_then("x", ToastOptions::new().id("a"), |id| *seen.borrow_mut() = Some(id.clone()));
		assert_eq!(seen.into_inner(), Some(id));
	}

	#[test]
	fn duplicate_explicit_id_is_a_noop() {
		let dismissed = Rc::new(RefCell::new(Vec::new()));
		let mut queue = ToastQueue::new();
		queue.add("first", ToastOptions::new().id("a").appearance(Appearance::Success));

		let mut called = false;
		let returned = queue.add_then(
			"second",
			ToastOptions::new().id("a").appearance(Appearance::Error).on_dismiss(counting_dismiss(&dismissed)),
			|_| called = true,
		);

		assert_eq!(returned.as_str(), "a");
		assert!(!called);
		assert_eq!(queue.len(), 1);
		let toast = queue.get("a").unwrap();
		assert_eq!(toast.content, "first");
		assert_eq!(toast.appearance, Appearance::Success);
		assert!(dismissed.borrow().is_empty(), "rejected on_dismiss must not fire");
	}

	#[test]
	fn update_changes_only_given_fields_and_keeps_position() {
		let mut queue = ToastQueue::new();
		queue.add("one", ToastOptions::new().id("a"));
		queue.add("two", ToastOptions::new().id("b").appearance(Appearance::Success));
		queue.add("three", ToastOptions::new().id("c"));

		let mut updated = None;
		assert!(queue.update_then("b", ToastOptions::new().appearance(Appearance::Error), |id| updated = Some(id.clone())));

		assert_eq!(updated, Some(ToastId::from("b")));
		assert_eq!(ids_of(&queue), vec!["a", "b", "c"]);
		let toast = queue.get("b").unwrap();
		assert_eq!(toast.content, "two");
		assert_eq!(toast.appearance, Appearance::Error);
	}

	#[test]
	fn update_unknown_id_is_a_noop() {
		let mut queue: ToastQueue<&str> = ToastQueue::new();
		let mut called = false;
		assert!(!queue.update_then("ghost", ToastOptions::new(), |_| called = true));
		assert!(!called);
	}

	#[test]
	fn remove_twice_fires_dismiss_once() {
		let dismissed = Rc::new(RefCell::new(Vec::new()));
		let mut queue = ToastQueue::new();
		queue.add("x", ToastOptions::new().id("a").on_dismiss(counting_dismiss(&dismissed)));

		let mut removed = Vec::new();
		assert!(queue.remove_then("a", |id| removed.push(id.clone())));
		assert!(!queue.remove_then("a", |id| removed.push(id.clone())));

		assert_eq!(*dismissed.borrow(), vec!["a".to_string()]);
		assert_eq!(removed, vec![ToastId::from("a")]);
		assert!(queue.is_empty());
	}

	#[test]
	fn remove_preserves_order_of_remaining() {
		let mut queue = ToastQueue::new();
		for id in ["a", "b", "c", "d"] {
			queue.add(id, ToastOptions::new().id(id));
		}
		queue.remove("b");
		assert_eq!(ids_of(&queue), vec!["a", "c", "d"]);
	}

	#[test]
	fn remove_all_fires_every_dismiss_and_is_idempotent() {
		let dismissed = Rc::new(RefCell::new(Vec::new()));
		let mut queue = ToastQueue::new();
		queue.add("hello", ToastOptions::new().id("a").on_dismiss(counting_dismiss(&dismissed)));
		queue.add("world", ToastOptions::new().id("b").on_dismiss(counting_dismiss(&dismissed)));
		queue.add("plain", ToastOptions::new().id("c"));

		let mut each = Vec::new();
		assert_eq!(queue.remove_all_then(|id| each.push(id.to_string())), 3);
		assert!(queue.is_empty());
		assert_eq!(each, vec!["a", "b", "c"]);
		assert_eq!(*dismissed.borrow(), vec!["a".to_string(), "b".to_string()]);

		assert_eq!(queue.remove_all(), 0);
		assert_eq!(dismissed.borrow().len(), 2);
	}

	#[test]
	fn observers_see_committed_events() {
		let events = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&events);
		let mut queue = ToastQueue::new();
		let sub = queue.subscribe(move |event| sink.borrow_mut().push(event.clone()));

		queue.add("x", ToastOptions::new().id("a"));
		queue.add("dup", ToastOptions::new().id("a"));
		queue.update("a", ToastOptions::new().auto_dismiss(true));
		queue.remove("missing");
		queue.add("y", ToastOptions::new().id("b"));
		queue.remove_all();

		assert_eq!(
			*events.borrow(),
			vec![
				QueueEvent::Added("a".into()),
				QueueEvent::Updated("a".into()),
				QueueEvent::Added("b".into()),
				QueueEvent::Removed("a".into()),
				QueueEvent::Removed("b".into()),
				QueueEvent::Cleared,
			]
		);

		assert!(queue.unsubscribe(sub));
		assert!(!queue.unsubscribe(sub));
		queue.add("z", ToastOptions::new());
		assert_eq!(events.borrow().len(), 6);
	}

	#[test]
	fn snapshot_is_a_detached_copy() {
		let mut queue = ToastQueue::new();
		queue.add(String::from("body"), ToastOptions::new().id("a"));
		let mut snapshot = queue.snapshot();
		snapshot[0].content.push_str(" edited");
		assert_eq!(queue.get("a").unwrap().content, "body");
	}

	proptest! {
		#[test]
		fn distinct_explicit_ids_keep_call_order(ids in proptest::collection::btree_set("[a-z]{1,6}", 0..24)) {
			let mut ordered: Vec<String> = ids.into_iter().collect();
			ordered.reverse();
			let mut queue = ToastQueue::new();
			for id in &ordered {
				queue.add((), ToastOptions::new().id(id.as_str()));
			}
			prop_assert_eq!(ids_of(&queue), ordered);
		}

		#[test]
		fn repeated_ids_never_duplicate(ids in proptest::collection::vec("[a-c]", 0..32)) {
			let mut queue = ToastQueue::new();
			let mut expected: Vec<String> = Vec::new();
			for (n, id) in ids.iter().enumerate() {
				queue.add(n, ToastOptions::new().id(id.as_str()));
				if !expected.contains(id) {
					expected.push(id.clone());
				}
			}
			prop_assert_eq!(ids_of(&queue), expected.clone());
			for id in &expected {
				let first = ids.iter().position(|x| x == id).unwrap();
				prop_assert_eq!(queue.get(id).map(|t| t.content), Some(first));
			}
		}
	}
}
