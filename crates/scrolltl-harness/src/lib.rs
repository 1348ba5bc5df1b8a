#![forbid(unsafe_code)]

//! Scenario builders for exercising scrolltl end to end.
//!
//! A [`World`] bundles a [`FakeHost`] with a [`SourceRegistry`] over it
//! and offers shorthand constructors for the element shapes the test
//! suites need over and over: vertical/horizontal scrollers, writing-mode
//! variants, and timelines pointed at them. The suites themselves live in
//! this crate's `tests/` directory.

use std::rc::Rc;

pub use scrolltl_core::harness::{ElementSpec, FakeHost};
pub use scrolltl_core::{
    Axis, ComputedStyle, Direction, Display, ElementId, Host, Overflow, ScrollMetrics,
    ScrollTimeline, SourceOption, SourceRegistry, TimelineOptions, TimelinePhase, WritingMode,
};

/// A fake host plus a registry over it.
pub struct World {
    pub host: Rc<FakeHost>,
    pub registry: Rc<SourceRegistry>,
}

impl World {
    #[must_use]
    pub fn new() -> Self {
        let host = FakeHost::new();
        let registry = SourceRegistry::new(host.clone());
        Self { host, registry }
    }

    /// A connected scroll container overflowing vertically.
    pub fn vertical_scroller(&self, scroll_height: f64, client_height: f64) -> ElementId {
        self.host
            .create_element(ElementSpec::scroller().metrics(ScrollMetrics {
                scroll_width: 300.0,
                client_width: 300.0,
                scroll_height,
                client_height,
                ..ScrollMetrics::default()
            }))
    }

    /// A connected scroll container overflowing horizontally.
    pub fn horizontal_scroller(&self, scroll_width: f64, client_width: f64) -> ElementId {
        self.host
            .create_element(ElementSpec::scroller().metrics(ScrollMetrics {
                scroll_width,
                client_width,
                scroll_height: 200.0,
                client_height: 200.0,
                ..ScrollMetrics::default()
            }))
    }

    /// A vertical scroller restyled with the given writing mode and
    /// direction.
    pub fn writing_mode_scroller(
        &self,
        writing_mode: WritingMode,
        direction: Direction,
        metrics: ScrollMetrics,
    ) -> ElementId {
        self.host
            .create_element(ElementSpec::scroller().metrics(metrics).style(ComputedStyle {
                writing_mode,
                direction,
                overflow: Overflow::Auto,
                ..ComputedStyle::default()
            }))
    }

    /// A timeline on `source` tracking the given axis.
    #[must_use]
    pub fn timeline(&self, source: ElementId, axis: Axis) -> ScrollTimeline {
        ScrollTimeline::new(
            &self.registry,
            TimelineOptions::new().source(source).axis(axis),
        )
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
