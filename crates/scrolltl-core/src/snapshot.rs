#![forbid(unsafe_code)]

//! Cached measurement snapshots.
//!
//! Timeline reads never query the rendering engine for layout; they read
//! the [`SourceSnapshot`] the observation bridge keeps fresh. A snapshot
//! is replaced wholesale on a full re-measure. The one exception is the
//! scroll-offset pair, which is overwritten in place on every scroll
//! event — the cheap, high-frequency path stays synchronous so progress
//! reads lag the scroll position by at most one event dispatch.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::axis::PhysicalAxis;
use crate::host::{ElementId, Host};
use crate::style::{Direction, ScrollPadding, WritingMode};

/// Scroll offsets and scroll/client extents of one element, in px.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScrollMetrics {
    /// Horizontal scroll offset. Negative under rtl direction in engines
    /// that report rtl offsets as negative.
    pub scroll_left: f64,
    /// Vertical scroll offset.
    pub scroll_top: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
    pub client_width: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    /// Maximum scroll offset along a physical axis: scroll extent minus
    /// client extent, clamped at zero.
    #[must_use]
    pub fn max_scroll_offset(&self, axis: PhysicalAxis) -> f64 {
        match axis {
            PhysicalAxis::X => (self.scroll_width - self.client_width).max(0.0),
            PhysicalAxis::Y => (self.scroll_height - self.client_height).max(0.0),
        }
    }

    /// Whether there is any scrollable overflow along the axis.
    #[inline]
    #[must_use]
    pub fn has_overflow(&self, axis: PhysicalAxis) -> bool {
        self.max_scroll_offset(axis) > 0.0
    }
}

/// One source element's cached measurements plus the style-derived facts
/// captured alongside them.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SourceSnapshot {
    pub metrics: ScrollMetrics,
    pub writing_mode: WritingMode,
    pub direction: Direction,
    pub scroll_padding: ScrollPadding,
}

impl SourceSnapshot {
    /// Measure an element against the host: one metrics query plus one
    /// style query. Returns `None` when the host no longer knows the
    /// element.
    #[must_use]
    pub fn measure(host: &dyn Host, source: ElementId) -> Option<Self> {
        let metrics = host.scroll_metrics(source)?;
        let style = host.computed_style(source)?;
        Some(Self {
            metrics,
            writing_mode: style.writing_mode,
            direction: style.direction,
            scroll_padding: style.scroll_padding,
        })
    }

    /// The direction-aware scroll offset along a physical axis.
    ///
    /// Engines report rtl horizontal offsets as negative values growing
    /// away from zero; the magnitude is what progress is computed from.
    #[must_use]
    pub fn direction_aware_offset(&self, axis: PhysicalAxis) -> f64 {
        match axis {
            PhysicalAxis::X => self.metrics.scroll_left.abs(),
            PhysicalAxis::Y => self.metrics.scroll_top,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> ScrollMetrics {
        ScrollMetrics {
            scroll_left: 0.0,
            scroll_top: 150.0,
            scroll_width: 300.0,
            scroll_height: 500.0,
            client_width: 300.0,
            client_height: 200.0,
        }
    }

    #[test]
    fn max_offset_is_extent_minus_client() {
        let m = metrics();
        assert_eq!(m.max_scroll_offset(PhysicalAxis::Y), 300.0);
        assert_eq!(m.max_scroll_offset(PhysicalAxis::X), 0.0);
    }

    #[test]
    fn max_offset_clamps_at_zero() {
        let m = ScrollMetrics {
            scroll_width: 100.0,
            client_width: 120.0,
            ..ScrollMetrics::default()
        };
        assert_eq!(m.max_scroll_offset(PhysicalAxis::X), 0.0);
        assert!(!m.has_overflow(PhysicalAxis::X));
    }

    #[test]
    fn overflow_requires_positive_max() {
        let m = metrics();
        assert!(m.has_overflow(PhysicalAxis::Y));
        assert!(!m.has_overflow(PhysicalAxis::X));
    }

    #[test]
    fn rtl_offset_uses_magnitude_on_x() {
        let snapshot = SourceSnapshot {
            metrics: ScrollMetrics {
                scroll_left: -120.0,
                ..metrics()
            },
            ..SourceSnapshot::default()
        };
        assert_eq!(snapshot.direction_aware_offset(PhysicalAxis::X), 120.0);
        // y offsets are passed through untouched.
        assert_eq!(snapshot.direction_aware_offset(PhysicalAxis::Y), 150.0);
    }
}
