#![forbid(unsafe_code)]

//! Computed-style facts the core consults.
//!
//! Only the properties the timeline actually reads are modeled: writing
//! mode and direction (axis resolution), display (activity checks),
//! overflow (scroll-container checks), and scroll padding (carried in the
//! measurement snapshot for consumers that align effects to snap padding).
//! Hosts translate their own style representation into these enums once,
//! at query time.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// CSS `writing-mode` values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum WritingMode {
    /// Horizontal lines, top to bottom. The only horizontal mode.
    #[default]
    HorizontalTb,
    /// Vertical lines, right to left.
    VerticalRl,
    /// Vertical lines, left to right.
    VerticalLr,
    /// Like `vertical-rl` with glyphs rotated.
    SidewaysRl,
    /// Like `vertical-lr` with glyphs rotated.
    SidewaysLr,
}

impl WritingMode {
    /// Whether lines flow horizontally (block axis is vertical).
    #[inline]
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::HorizontalTb)
    }
}

/// CSS `direction` values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// CSS `display` values, collapsed to the distinctions the core checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Display {
    #[default]
    Block,
    Inline,
    Flex,
    Grid,
    /// `display: none` — the element generates no box.
    None,
}

impl Display {
    /// Whether the element generates no box at all.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Whether the element is inline-level (cannot be a scroll container).
    #[inline]
    #[must_use]
    pub const fn is_inline_level(self) -> bool {
        matches!(self, Self::Inline)
    }
}

/// CSS `overflow` values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Overflow {
    #[default]
    Visible,
    Clip,
    Hidden,
    Scroll,
    Auto,
}

impl Overflow {
    /// Whether this overflow value establishes a scroll container.
    ///
    /// `visible` and `clip` do not; an element with either (other than the
    /// document's scrolling root) can never drive a timeline.
    #[inline]
    #[must_use]
    pub const fn creates_scroll_container(self) -> bool {
        matches!(self, Self::Hidden | Self::Scroll | Self::Auto)
    }
}

/// Resolved `scroll-padding-*` lengths, in px.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScrollPadding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// The computed-style facts for one element, as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComputedStyle {
    pub writing_mode: WritingMode,
    pub direction: Direction,
    pub display: Display,
    pub overflow: Overflow,
    pub scroll_padding: ScrollPadding,
}
