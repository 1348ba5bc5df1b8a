#![forbid(unsafe_code)]

//! Axis normalization: logical (`block`/`inline`) to physical (`x`/`y`).
//!
//! # Invariants
//!
//! 1. Physical axes pass through resolution unchanged, with or without
//!    style context.
//! 2. A logical axis resolves against the writing mode: `block` is `y` in
//!    horizontal writing modes and `x` otherwise; `inline` is the opposite.
//! 3. The scroll-offset reader and the max-extent computation share this
//!    one resolution rule, so offset and extent are always measured along
//!    the same physical axis.
//!
//! # Failure Modes
//!
//! - Unrecognized axis name: [`TimelineError::InvalidAxis`] from parsing.
//! - Logical axis with no style available:
//!   [`TimelineError::MissingStyleContext`] from [`Axis::try_resolve`].

use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::TimelineError;
use crate::style::{ComputedStyle, WritingMode};

/// The scroll direction a timeline tracks.
///
/// `Block` and `Inline` are logical and resolve against the source's
/// writing mode at read time; `X` and `Y` are already physical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    X,
    Y,
    #[default]
    Block,
    Inline,
}

/// A concrete scroll axis after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PhysicalAxis {
    X,
    Y,
}

impl Axis {
    /// The canonical name of this axis.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Block => "block",
            Self::Inline => "inline",
        }
    }

    /// Whether this axis is logical and needs a writing mode to resolve.
    #[inline]
    #[must_use]
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::Block | Self::Inline)
    }

    /// Resolve to a physical axis under the given writing mode.
    #[must_use]
    pub const fn resolve(self, writing_mode: WritingMode) -> PhysicalAxis {
        match self {
            Self::X => PhysicalAxis::X,
            Self::Y => PhysicalAxis::Y,
            Self::Block => {
                if writing_mode.is_horizontal() {
                    PhysicalAxis::Y
                } else {
                    PhysicalAxis::X
                }
            }
            Self::Inline => {
                if writing_mode.is_horizontal() {
                    PhysicalAxis::X
                } else {
                    PhysicalAxis::Y
                }
            }
        }
    }

    /// Resolve to a physical axis, requiring style context only when the
    /// axis is logical.
    ///
    /// # Errors
    ///
    /// [`TimelineError::MissingStyleContext`] if the axis is logical and
    /// `style` is `None`.
    pub fn try_resolve(self, style: Option<&ComputedStyle>) -> Result<PhysicalAxis, TimelineError> {
        match (self, style) {
            (Self::X, _) => Ok(PhysicalAxis::X),
            (Self::Y, _) => Ok(PhysicalAxis::Y),
            (logical, Some(style)) => Ok(logical.resolve(style.writing_mode)),
            (_, None) => Err(TimelineError::MissingStyleContext),
        }
    }
}

impl FromStr for Axis {
    type Err = TimelineError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "block" => Ok(Self::Block),
            "inline" => Ok(Self::Inline),
            other => Err(TimelineError::InvalidAxis(other.to_string())),
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for PhysicalAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
        })
    }
}
