//! Toast notification lifecycle engine: an ordered queue of transient
//! notices, per-toast dismiss countdowns with hover pause, enter/exit
//! transitions, and placement geometry.
//!
//! The engine is renderer-agnostic. A [`ToastSurface`] owns the state for
//! one UI root and produces a [`SurfaceView`] that any frontend can draw.

/// Surface defaults and TOML loading.
pub mod config;
/// Per-toast controller combining countdown and transition.
pub mod controller;
/// Error types for configuration and parsing.
pub mod error;
/// Toast identifiers and their generator.
pub mod id;
/// Screen placements and their geometry rules.
pub mod placement;
/// Ordered toast queue with observers.
pub mod queue;
/// Clock and one-shot scheduling abstraction.
pub mod scheduler;
/// Per-UI-root context tying the queue to mounted instances.
pub mod surface;
/// Dismiss countdown with pause and resume.
pub mod timer;
/// Toast entries and options.
pub mod toast;
/// Enter/exit transition state machine.
pub mod transition;

pub use config::{DEFAULT_AUTO_DISMISS_TIMEOUT, DEFAULT_TRANSITION_DURATION, SurfaceConfig};
pub use controller::{Countdown, ToastController};
pub use error::{ConfigError, PlacementParseError};
pub use id::{IdGenerator, ToastId};
pub use placement::{Edge, HorizontalAnchor, Placement, PlacementRules, Translate, VerticalAnchor};
pub use queue::{QueueEvent, SubscriptionId, ToastQueue};
pub use scheduler::{ManualScheduler, ScheduleHandle, Scheduler, Task};
pub use surface::{ContainerView, HostMount, MountKey, SurfaceView, ToastSurface, ToastView};
pub use timer::{DismissTimer, TimerState};
pub use toast::{Appearance, DismissCallback, Toast, ToastOptions, ToastSnapshot};
pub use transition::{Height, HeightTransition, Transition, TransitionState, TransitionStyle};
