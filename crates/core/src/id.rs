//! Toast identifiers and the generator used when callers do not supply one.

use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Process-wide counter shared by every generator.
static NEXT_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifier of a toast, unique within its queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToastId(String);

impl ToastId {
	/// Wraps a caller-supplied identifier verbatim.
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// Returns the identifier as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ToastId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ToastId {
	fn from(id: &str) -> Self {
		Self(id.to_owned())
	}
}

impl From<String> for ToastId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

impl Borrow<str> for ToastId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for ToastId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

/// Generates collision-resistant toast identifiers.
///
/// Each id combines a monotonic process-wide counter with 32 random bits, so
/// two generators (or two surfaces) never hand out the same value in one
/// process, and values from different runs are unlikely to collide.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdGenerator;

impl IdGenerator {
	/// Creates a generator.
	pub const fn new() -> Self {
		Self
	}

	/// Produces a fresh identifier.
	pub fn generate(&self) -> ToastId {
		let counter = NEXT_COUNTER.fetch_add(1, Ordering::Relaxed);
		let entropy = uuid::Uuid::new_v4().as_u128() as u32;
		ToastId(format!("{counter:x}-{entropy:08x}"))
	}

	/// Produces an identifier that `is_taken` reports as free.
	///
	/// Caller-supplied ids share the namespace with generated ones, so the
	/// active set is consulted before an id is handed out.
	pub fn generate_unused(&self, mut is_taken: impl FnMut(&ToastId) -> bool) -> ToastId {
		loop {
			let id = self.generate();
			if !is_taken(&id) {
				return id;
			}
			tracing::trace!(id = %id, "toast.id.collision");
		}
	}
}
