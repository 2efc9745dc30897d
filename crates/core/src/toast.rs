//! Toast entries and the options accepted when creating or updating them.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::id::ToastId;

/// Callback invoked once when a toast leaves the queue.
pub type DismissCallback = Box<dyn FnOnce(&ToastId)>;

/// Descriptive appearance of a toast. Renderers pick colors and icons from
/// it; the engine never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
	Success,
	Error,
	Warning,
	/// Neutral information (default).
	#[default]
	Info,
}

/// Options accepted by `add` and `update`.
///
/// Every field is optional. On `add`, absent fields take defaults; on
/// `update`, absent fields leave the existing value untouched.
#[derive(Default)]
pub struct ToastOptions {
	pub id: Option<ToastId>,
	pub appearance: Option<Appearance>,
	pub auto_dismiss: Option<bool>,
	/// Per-toast timeout. Zero is treated as absent.
	pub auto_dismiss_timeout: Option<Duration>,
	pub on_dismiss: Option<DismissCallback>,
	/// Keys the engine does not recognize, carried through untouched.
	pub extra: BTreeMap<String, serde_json::Value>,
}

impl fmt::Debug for ToastOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ToastOptions")
			.field("id", &self.id)
			.field("appearance", &self.appearance)
			.field("auto_dismiss", &self.auto_dismiss)
			.field("auto_dismiss_timeout", &self.auto_dismiss_timeout)
			.field("on_dismiss", &self.on_dismiss.as_ref().map(|_| ".."))
			.field("extra", &self.extra)
			.finish()
	}
}

impl ToastOptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Uses an explicit identifier instead of a generated one.
	#[must_use]
	pub fn id(mut self, id: impl Into<ToastId>) -> Self {
		self.id = Some(id.into());
		self
	}

	#[must_use]
	pub fn appearance(mut self, appearance: Appearance) -> Self {
		self.appearance = Some(appearance);
		self
	}

	#[must_use]
	pub fn auto_dismiss(mut self, enabled: bool) -> Self {
		self.auto_dismiss = Some(enabled);
		self
	}

	#[must_use]
	pub fn auto_dismiss_timeout(mut self, timeout: Duration) -> Self {
		self.auto_dismiss_timeout = Some(timeout);
		self
	}

	/// Registers a callback fired exactly once when the toast is removed.
	#[must_use]
	pub fn on_dismiss(mut self, callback: impl FnOnce(&ToastId) + 'static) -> Self {
		self.on_dismiss = Some(Box::new(callback));
		self
	}

	/// Attaches an opaque key the engine passes through untouched.
	#[must_use]
	pub fn extra(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.extra.insert(key.into(), value.into());
		self
	}

	fn timeout(&self) -> Option<Duration> {
		self.auto_dismiss_timeout.filter(|t| !t.is_zero())
	}
}

/// One entry in the toast queue.
pub struct Toast<C> {
	id: ToastId,
	pub content: C,
	pub appearance: Appearance,
	pub auto_dismiss: bool,
	/// Per-toast timeout; `None` falls back to the surface default.
	pub auto_dismiss_timeout: Option<Duration>,
	pub extra: BTreeMap<String, serde_json::Value>,
	on_dismiss: Option<DismissCallback>,
}

impl<C: fmt::Debug> fmt::Debug for Toast<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Toast")
			.field("id", &self.id)
			.field("content", &self.content)
			.field("appearance", &self.appearance)
			.field("auto_dismiss", &self.auto_dismiss)
			.field("auto_dismiss_timeout", &self.auto_dismiss_timeout)
			.field("extra", &self.extra)
			.field("on_dismiss", &self.on_dismiss.as_ref().map(|_| ".."))
			.finish()
	}
}

impl<C> Toast<C> {
	/// Builds a toast from options, ignoring `options.id` in favor of the
	/// already-resolved `id`.
	pub(crate) fn new(id: ToastId, content: C, options: ToastOptions) -> Self {
		let auto_dismiss_timeout = options.timeout();
		Self {
			id,
			content,
			appearance: options.appearance.unwrap_or_default(),
			auto_dismiss: options.auto_dismiss.unwrap_or(false),
			auto_dismiss_timeout,
			extra: options.extra,
			on_dismiss: options.on_dismiss,
		}
	}

	pub fn id(&self) -> &ToastId {
		&self.id
	}

	/// Returns true while a dismiss callback is registered and unfired.
	pub fn has_on_dismiss(&self) -> bool {
		self.on_dismiss.is_some()
	}

	/// Shallow-merges `options` into this toast. The id never changes.
	pub(crate) fn merge(&mut self, options: ToastOptions) {
		if let Some(requested) = &options.id
			&& requested != &self.id
		{
			tracing::debug!(id = %self.id, requested = %requested, "toast.update.id_ignored");
		}
		let timeout = options.timeout();
		if let Some(appearance) = options.appearance {
			self.appearance = appearance;
		}
		if let Some(auto_dismiss) = options.auto_dismiss {
			self.auto_dismiss = auto_dismiss;
		}
		if timeout.is_some() {
			self.auto_dismiss_timeout = timeout;
		}
		if options.on_dismiss.is_some() {
			self.on_dismiss = options.on_dismiss;
		}
		self.extra.extend(options.extra);
	}

	/// Fires the dismiss callback if it has not fired yet.
	pub(crate) fn fire_dismiss(&mut self) {
		if let Some(callback) = self.on_dismiss.take() {
			tracing::trace!(id = %self.id, "toast.on_dismiss");
			callback(&self.id);
		}
	}
}

impl<C: Clone> Toast<C> {
	/// Copies the renderable fields out of this toast.
	pub fn snapshot(&self) -> ToastSnapshot<C> {
		ToastSnapshot {
			id: self.id.clone(),
			content: self.content.clone(),
			appearance: self.appearance,
			auto_dismiss: self.auto_dismiss,
			auto_dismiss_timeout: self.auto_dismiss_timeout,
			extra: self.extra.clone(),
		}
	}
}

/// Read-only copy of a toast handed to renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastSnapshot<C> {
	pub id: ToastId,
	pub content: C,
	pub appearance: Appearance,
	pub auto_dismiss: bool,
	pub auto_dismiss_timeout: Option<Duration>,
	pub extra: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;
	use std::rc::Rc;

	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn defaults_when_options_are_empty() {
		let toast = Toast::new(ToastId::from("a"), "hello", ToastOptions::new());
		assert_eq!(toast.appearance, Appearance::Info);
		assert!(!toast.auto_dismiss);
		assert_eq!(toast.auto_dismiss_timeout, None);
		assert!(!toast.has_on_dismiss());
	}

	#[test]
	fn zero_timeout_is_treated_as_absent() {
		let options = ToastOptions::new().auto_dismiss(true).auto_dismiss_timeout(Duration::ZERO);
		let toast = Toast::new(ToastId::from("a"), (), options);
		assert_eq!(toast.auto_dismiss_timeout, None);
	}

	#[test]
	fn merge_only_touches_present_fields() {
		let mut toast = Toast::new(
			ToastId::from("a"),
			"body",
			ToastOptions::new()
				.appearance(Appearance::Success)
				.auto_dismiss(true)
				.auto_dismiss_timeout(Duration::from_secs(3))
				.extra("source", "upload"),
		);
		toast.merge(ToastOptions::new().id("other").appearance(Appearance::Error).extra("retry", 2));

		assert_eq!(toast.id().as_str(), "a");
		assert_eq!(toast.content, "body");
		assert_eq!(toast.appearance, Appearance::Error);
		assert!(toast.auto_dismiss);
		assert_eq!(toast.auto_dismiss_timeout, Some(Duration::from_secs(3)));
		assert_eq!(toast.extra.get("source"), Some(&serde_json::json!("upload")));
		assert_eq!(toast.extra.get("retry"), Some(&serde_json::json!(2)));
	}

	#[test]
	fn dismiss_callback_fires_once() {
		let fired = Rc::new(Cell::new(0));
		let counter = Rc::clone(&fired);
		let mut toast = Toast::new(
			ToastId::from("a"),
			(),
			ToastOptions::new().on_dismiss(move |_| counter.set(counter.get() + 1)),
		);
		toast.fire_dismiss();
		toast.fire_dismiss();
		assert_eq!(fired.get(), 1);
		assert!(!toast.has_on_dismiss());
	}

	#[test]
	fn appearance_names() {
		assert_eq!(Appearance::Warning.to_string(), "warning");
		assert_eq!("ERROR".parse::<Appearance>(), Ok(Appearance::Error));
	}
}
