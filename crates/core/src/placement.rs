//! Screen placements and the layout rules each one implies.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::error::PlacementParseError;

/// Distance, in percent of the toast's own size, that an entering toast
/// starts away from its resting position.
pub const ENTER_OFFSET_PCT: f32 = 120.0;

/// Named screen anchor for the toast stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, IntoStaticStr, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
	/// Top-left corner of the screen.
	TopLeft,
	/// Top edge, horizontally centered.
	TopCenter,
	/// Top-right corner of the screen (default).
	#[default]
	TopRight,
	/// Bottom-left corner of the screen.
	BottomLeft,
	/// Bottom edge, horizontally centered.
	BottomCenter,
	/// Bottom-right corner of the screen.
	BottomRight,
}

/// Edge a container is pinned to vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalAnchor {
	Top,
	Bottom,
}

/// Edge (or center line) a container is pinned to horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalAnchor {
	Left,
	Center,
	Right,
}

/// Screen edge a toast slides in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
	Top,
	Bottom,
	Left,
	Right,
}

/// Translation in percent of the element's own width and height.
///
/// Positive `x_pct` moves right, positive `y_pct` moves down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Translate {
	pub x_pct: f32,
	pub y_pct: f32,
}

impl Translate {
	/// The neutral, on-screen translation.
	pub const ZERO: Self = Self { x_pct: 0.0, y_pct: 0.0 };

	pub const fn new(x_pct: f32, y_pct: f32) -> Self {
		Self { x_pct, y_pct }
	}
}

/// Layout anchoring rules for a toast container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRules {
	pub vertical: VerticalAnchor,
	pub horizontal: HorizontalAnchor,
	/// Extra horizontal shift applied to the container itself; `-50%` for
	/// centered placements so the stack straddles the center line.
	pub shift_x_pct: f32,
}

impl Placement {
	/// Returns the container anchoring rules for this placement.
	pub const fn rules(self) -> PlacementRules {
		let (vertical, horizontal) = match self {
			Self::TopLeft => (VerticalAnchor::Top, HorizontalAnchor::Left),
			Self::TopCenter => (VerticalAnchor::Top, HorizontalAnchor::Center),
			Self::TopRight => (VerticalAnchor::Top, HorizontalAnchor::Right),
			Self::BottomLeft => (VerticalAnchor::Bottom, HorizontalAnchor::Left),
			Self::BottomCenter => (VerticalAnchor::Bottom, HorizontalAnchor::Center),
			Self::BottomRight => (VerticalAnchor::Bottom, HorizontalAnchor::Right),
		};
		let shift_x_pct = match horizontal {
			HorizontalAnchor::Center => -50.0,
			_ => 0.0,
		};
		PlacementRules {
			vertical,
			horizontal,
			shift_x_pct,
		}
	}

	/// Returns the edge toasts slide in from.
	///
	/// Corner placements slide horizontally from their side; centered
	/// placements slide vertically from their edge.
	pub const fn slide_edge(self) -> Edge {
		match self {
			Self::TopLeft | Self::BottomLeft => Edge::Left,
			Self::TopRight | Self::BottomRight => Edge::Right,
			Self::TopCenter => Edge::Top,
			Self::BottomCenter => Edge::Bottom,
		}
	}

	/// Returns the off-screen translation of an entering toast.
	pub const fn entering_offset(self) -> Translate {
		match self.slide_edge() {
			Edge::Right => Translate::new(ENTER_OFFSET_PCT, 0.0),
			Edge::Left => Translate::new(-ENTER_OFFSET_PCT, 0.0),
			Edge::Bottom => Translate::new(0.0, ENTER_OFFSET_PCT),
			Edge::Top => Translate::new(0.0, -ENTER_OFFSET_PCT),
		}
	}

	/// Returns true if newer toasts stack upward from the bottom edge.
	pub const fn stacks_up(self) -> bool {
		matches!(self.rules().vertical, VerticalAnchor::Bottom)
	}

	/// Returns the kebab-case name, e.g. `"bottom-center"`.
	pub fn as_str(self) -> &'static str {
		self.into()
	}
}

impl FromStr for Placement {
	type Err = PlacementParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let wanted = s.trim();
		Self::iter()
			.find(|p| p.as_str().eq_ignore_ascii_case(wanted))
			.ok_or_else(|| PlacementParseError(s.to_owned()))
	}
}
