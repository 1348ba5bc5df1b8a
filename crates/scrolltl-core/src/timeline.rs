#![forbid(unsafe_code)]

//! The scroll-progress timeline entity.
//!
//! A [`ScrollTimeline`] tracks one source element through a shared
//! [`SourceRegistry`] and reports how far that source has scrolled along
//! its axis as a normalized 0–100 progress value.
//!
//! # Reads
//!
//! `phase()` and `current_time()` are recomputed on every call from two
//! kinds of facts with different freshness:
//!
//! - **Style facts** (connectivity, display, overflow, writing mode) are
//!   queried live from the host, because style can change without
//!   tripping the attribute-mutation filter.
//! - **Extent and offset facts** come from the registry's cached
//!   snapshot, so reads never force a layout pass.
//!
//! # Lifecycle
//!
//! Construction attaches the timeline to its source, creating the shared
//! tracking record on first use. [`cancel()`](ScrollTimeline::cancel) or
//! dropping the timeline detaches it; the source's observers are released
//! when the last timeline leaves. A `ScrollTimeline` is deliberately not
//! `Clone`: exactly one owner drives attach and detach.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::axis::Axis;
use crate::error::TimelineError;
use crate::host::ElementId;
use crate::registry::SourceRegistry;

/// Upper bound of the progress scale.
pub const DURATION: f64 = 100.0;

static NEXT_TIMELINE_ID: AtomicU64 = AtomicU64::new(1);

fn next_timeline_id() -> u64 {
    NEXT_TIMELINE_ID.fetch_add(1, Ordering::Relaxed)
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Whether a timeline's source is currently scrollable and connected.
///
/// Re-evaluated from live host facts on every read; never cached and
/// never event-driven. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimelinePhase {
    Active,
    Inactive,
}

impl TimelinePhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for TimelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source selection at construction time.
///
/// Omitting a source in the original API meant "use the document's
/// scrolling root" while an explicit null meant "no source"; the two are
/// distinct variants here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceOption {
    /// Track the host's default scrolling root.
    #[default]
    Auto,
    /// Start without a source (the timeline is inactive until one is set).
    None,
    /// Track a specific element.
    Element(ElementId),
}

impl From<ElementId> for SourceOption {
    fn from(element: ElementId) -> Self {
        Self::Element(element)
    }
}

/// Construction options for [`ScrollTimeline`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineOptions {
    pub source: SourceOption,
    pub axis: Axis,
}

impl TimelineOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn source(mut self, source: impl Into<SourceOption>) -> Self {
        self.source = source.into();
        self
    }

    #[must_use]
    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }
}

/// Shared timeline state the registry's tracking records point at weakly.
pub(crate) struct TimelineInner {
    pub(crate) id: u64,
    pub(crate) source: Cell<Option<ElementId>>,
    pub(crate) axis: Cell<Axis>,
    pub(crate) revision: Cell<u64>,
}

impl TimelineInner {
    pub(crate) fn new(axis: Axis) -> Rc<Self> {
        Rc::new(Self {
            id: next_timeline_id(),
            source: Cell::new(None),
            axis: Cell::new(axis),
            revision: Cell::new(0),
        })
    }

    pub(crate) fn bump_revision(&self) {
        self.revision.set(self.revision.get() + 1);
    }
}

// ---------------------------------------------------------------------------
// ScrollTimeline
// ---------------------------------------------------------------------------

/// A timeline driven by the scroll position of a source element.
pub struct ScrollTimeline {
    registry: Rc<SourceRegistry>,
    inner: Rc<TimelineInner>,
}

impl ScrollTimeline {
    /// Create a timeline and attach it to its source.
    #[must_use]
    pub fn new(registry: &Rc<SourceRegistry>, options: TimelineOptions) -> Self {
        let inner = TimelineInner::new(options.axis);
        let source = match options.source {
            SourceOption::Auto => registry.host().scrolling_root(),
            SourceOption::None => None,
            SourceOption::Element(element) => Some(element),
        };
        registry.attach(&inner, source);
        Self {
            registry: Rc::clone(registry),
            inner,
        }
    }

    /// Create a timeline on a specific source with the default axis.
    #[must_use]
    pub fn with_source(registry: &Rc<SourceRegistry>, source: ElementId) -> Self {
        Self::new(registry, TimelineOptions::new().source(source))
    }

    // ── Source ───────────────────────────────────────────────────────

    /// The currently attached source, if any.
    #[must_use]
    pub fn source(&self) -> Option<ElementId> {
        self.inner.source.get()
    }

    /// Re-attach to a new source (or detach with `None`). Setting the
    /// current source again is a no-op with no observer churn.
    pub fn set_source(&self, source: Option<ElementId>) {
        self.registry.attach(&self.inner, source);
    }

    // ── Axis ─────────────────────────────────────────────────────────

    /// The axis this timeline tracks.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.inner.axis.get()
    }

    /// Set the axis. `Axis` is a closed enum, so this cannot fail.
    pub fn set_axis(&self, axis: Axis) {
        self.inner.axis.set(axis);
    }

    /// Set the axis from its name (`"x"`, `"y"`, `"block"`, `"inline"`).
    ///
    /// # Errors
    ///
    /// [`TimelineError::InvalidAxis`] for any other name; the previous
    /// axis is left unchanged.
    pub fn set_axis_name(&self, name: &str) -> Result<(), TimelineError> {
        self.inner.axis.set(name.parse()?);
        Ok(())
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Whether the source is currently able to drive this timeline.
    ///
    /// Inactive when there is no source, when no style can be obtained,
    /// when display is `none`, or when the source is not the document's
    /// scrolling root and its overflow (`visible`/`clip`) never creates a
    /// scroll container.
    #[must_use]
    pub fn phase(&self) -> TimelinePhase {
        let Some(source) = self.inner.source.get() else {
            return TimelinePhase::Inactive;
        };
        let host = self.registry.host();
        let Some(style) = host.computed_style(source) else {
            return TimelinePhase::Inactive;
        };
        if style.display.is_none() {
            return TimelinePhase::Inactive;
        }
        let is_root = host.scrolling_root() == Some(source);
        if !is_root && !style.overflow.creates_scroll_container() {
            return TimelinePhase::Inactive;
        }
        TimelinePhase::Active
    }

    /// Scroll progress along the normalized axis, 0–100.
    ///
    /// Unresolved (`None`) when there is no source, the source is not
    /// connected to the document, the phase is inactive, or the display
    /// is `inline`/`none`. With no scrollable overflow the progress is
    /// exactly `100.0`.
    #[must_use]
    pub fn current_time(&self) -> Option<f64> {
        let source = self.inner.source.get()?;
        let host = self.registry.host();
        if !host.is_connected(source) {
            return None;
        }
        if self.phase() == TimelinePhase::Inactive {
            return None;
        }
        let style = host.computed_style(source)?;
        if style.display.is_none() || style.display.is_inline_level() {
            return None;
        }

        // One normalization for both offset and extent, so they are
        // measured along the same physical axis.
        let axis = self.inner.axis.get().resolve(style.writing_mode);
        let snapshot = self.registry.snapshot_for(source)?;
        let offset = snapshot.direction_aware_offset(axis);
        let max_offset = snapshot.metrics.max_scroll_offset(axis);

        if max_offset > 0.0 {
            Some(DURATION * offset / max_offset)
        } else {
            Some(DURATION)
        }
    }

    /// The progress scale's upper bound, a constant `100.0`.
    #[inline]
    #[must_use]
    pub const fn duration(&self) -> f64 {
        DURATION
    }

    /// Change counter bumped by the observation bridge whenever this
    /// timeline's source updates. Consumers poll it to detect that a
    /// fresh `current_time()` read is worthwhile; correctness never
    /// depends on it.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.inner.revision.get()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Detach from the source, releasing the shared observers if this was
    /// the last attached timeline. Safe to call repeatedly, and safe on a
    /// timeline that never had a source.
    pub fn cancel(&self) {
        self.registry.detach(&self.inner);
    }
}

impl Drop for ScrollTimeline {
    fn drop(&mut self) {
        self.registry.detach(&self.inner);
    }
}

impl std::fmt::Debug for ScrollTimeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollTimeline")
            .field("source", &self.inner.source.get())
            .field("axis", &self.inner.axis.get())
            .field("phase", &self.phase())
            .field("revision", &self.inner.revision.get())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::{ElementSpec, FakeHost};
    use crate::host::Host;
    use crate::snapshot::ScrollMetrics;
    use crate::style::{ComputedStyle, Display, Overflow, WritingMode};

    fn vertical_scroller() -> ScrollMetrics {
        ScrollMetrics {
            scroll_left: 0.0,
            scroll_top: 0.0,
            scroll_width: 300.0,
            scroll_height: 500.0,
            client_width: 300.0,
            client_height: 200.0,
        }
    }

    fn setup() -> (Rc<FakeHost>, Rc<SourceRegistry>, ElementId) {
        let host = FakeHost::new();
        let source = host.create_element(ElementSpec::scroller().metrics(vertical_scroller()));
        let registry = SourceRegistry::new(host.clone());
        (host, registry, source)
    }

    #[test]
    fn auto_source_resolves_the_scrolling_root() {
        let (host, registry, source) = setup();
        host.set_scrolling_root(source);
        let timeline = ScrollTimeline::new(&registry, TimelineOptions::new());
        assert_eq!(timeline.source(), Some(source));
        assert_eq!(timeline.axis(), Axis::Block);
    }

    #[test]
    fn auto_source_without_a_root_means_no_source() {
        let (_host, registry, _source) = setup();
        let timeline = ScrollTimeline::new(&registry, TimelineOptions::new());
        assert_eq!(timeline.source(), None);
        assert_eq!(timeline.phase(), TimelinePhase::Inactive);
        assert_eq!(timeline.current_time(), None);
    }

    #[test]
    fn explicit_none_source_is_inactive() {
        let (_host, registry, _source) = setup();
        let timeline = ScrollTimeline::new(
            &registry,
            TimelineOptions::new().source(SourceOption::None),
        );
        assert_eq!(timeline.source(), None);
        assert_eq!(timeline.phase(), TimelinePhase::Inactive);
        assert_eq!(timeline.current_time(), None);
    }

    #[test]
    fn axis_set_get_round_trips() {
        let (_host, registry, source) = setup();
        let timeline = ScrollTimeline::with_source(&registry, source);
        for axis in [Axis::X, Axis::Y, Axis::Block, Axis::Inline] {
            timeline.set_axis(axis);
            assert_eq!(timeline.axis(), axis);
        }
    }

    #[test]
    fn invalid_axis_name_preserves_the_previous_axis() {
        let (_host, registry, source) = setup();
        let timeline = ScrollTimeline::with_source(&registry, source);
        timeline.set_axis(Axis::Inline);

        let err = timeline.set_axis_name("sideways").unwrap_err();
        assert_eq!(err, TimelineError::InvalidAxis("sideways".to_string()));
        assert_eq!(timeline.axis(), Axis::Inline);

        timeline.set_axis_name("y").unwrap();
        assert_eq!(timeline.axis(), Axis::Y);
    }

    #[test]
    fn progress_reads_from_the_cached_snapshot() {
        let (host, registry, source) = setup();
        let timeline = ScrollTimeline::new(
            &registry,
            TimelineOptions::new().source(source).axis(Axis::Y),
        );

        host.set_scroll_position(source, 0.0, 150.0);
        // 100 * 150 / (500 - 200)
        assert_eq!(timeline.current_time(), Some(50.0));
    }

    #[test]
    fn no_overflow_pins_progress_to_the_end() {
        let host = FakeHost::new();
        let source = host.create_element(ElementSpec::scroller().metrics(ScrollMetrics {
            scroll_top: 40.0,
            scroll_height: 200.0,
            client_height: 200.0,
            scroll_width: 300.0,
            client_width: 300.0,
            ..ScrollMetrics::default()
        }));
        let registry = SourceRegistry::new(host.clone());
        let timeline = ScrollTimeline::new(
            &registry,
            TimelineOptions::new().source(source).axis(Axis::Y),
        );
        assert_eq!(timeline.current_time(), Some(100.0));
    }

    #[test]
    fn display_none_is_inactive_and_unresolved() {
        let (host, registry, source) = setup();
        let timeline = ScrollTimeline::with_source(&registry, source);

        let mut style = host.computed_style(source).unwrap();
        style.display = Display::None;
        host.set_style(source, style);

        assert_eq!(timeline.phase(), TimelinePhase::Inactive);
        assert_eq!(timeline.current_time(), None);
    }

    #[test]
    fn non_root_visible_overflow_is_inactive() {
        let host = FakeHost::new();
        let source = host.create_element(
            ElementSpec::new().metrics(vertical_scroller()).style(ComputedStyle {
                overflow: Overflow::Visible,
                ..ComputedStyle::default()
            }),
        );
        let registry = SourceRegistry::new(host.clone());
        let timeline = ScrollTimeline::with_source(&registry, source);
        assert_eq!(timeline.phase(), TimelinePhase::Inactive);

        // The scrolling root is exempt from the overflow check.
        host.set_scrolling_root(source);
        assert_eq!(timeline.phase(), TimelinePhase::Active);
    }

    #[test]
    fn clip_overflow_is_inactive_too() {
        let (host, registry, source) = setup();
        let timeline = ScrollTimeline::with_source(&registry, source);
        let mut style = host.computed_style(source).unwrap();
        style.overflow = Overflow::Clip;
        host.set_style(source, style);
        assert_eq!(timeline.phase(), TimelinePhase::Inactive);
    }

    #[test]
    fn disconnected_source_is_unresolved_despite_cached_values() {
        let (host, registry, source) = setup();
        let timeline = ScrollTimeline::with_source(&registry, source);
        host.set_scroll_position(source, 0.0, 150.0);
        assert_eq!(timeline.current_time(), Some(50.0));

        host.set_connected(source, false);
        assert_eq!(timeline.current_time(), None);
        // The snapshot still holds the stale offsets; connectivity wins.
        assert_eq!(
            registry.snapshot_for(source).unwrap().metrics.scroll_top,
            150.0
        );
    }

    #[test]
    fn inline_display_is_unresolved_even_when_phase_checks_pass() {
        let host = FakeHost::new();
        let source = host.create_element(ElementSpec::new().metrics(vertical_scroller()).style(
            ComputedStyle {
                display: Display::Inline,
                overflow: Overflow::Auto,
                ..ComputedStyle::default()
            },
        ));
        let registry = SourceRegistry::new(host.clone());
        let timeline = ScrollTimeline::with_source(&registry, source);
        assert_eq!(timeline.phase(), TimelinePhase::Active);
        assert_eq!(timeline.current_time(), None);
    }

    #[test]
    fn block_axis_follows_the_writing_mode() {
        let host = FakeHost::new();
        let source = host.create_element(
            ElementSpec::new()
                .metrics(ScrollMetrics {
                    scroll_left: 60.0,
                    scroll_top: 0.0,
                    scroll_width: 500.0,
                    scroll_height: 200.0,
                    client_width: 300.0,
                    client_height: 200.0,
                })
                .style(ComputedStyle {
                    writing_mode: WritingMode::VerticalRl,
                    overflow: Overflow::Auto,
                    ..ComputedStyle::default()
                }),
        );
        let registry = SourceRegistry::new(host.clone());
        let timeline = ScrollTimeline::new(
            &registry,
            TimelineOptions::new().source(source).axis(Axis::Block),
        );
        // Vertical writing mode: block is the x axis. 100 * 60 / 200.
        assert_eq!(timeline.current_time(), Some(30.0));
    }

    #[test]
    fn rtl_negative_offsets_report_positive_progress() {
        let host = FakeHost::new();
        let source = host.create_element(ElementSpec::scroller().metrics(ScrollMetrics {
            scroll_left: -100.0,
            scroll_top: 0.0,
            scroll_width: 500.0,
            scroll_height: 200.0,
            client_width: 300.0,
            client_height: 200.0,
        }));
        let registry = SourceRegistry::new(host.clone());
        let timeline = ScrollTimeline::new(
            &registry,
            TimelineOptions::new().source(source).axis(Axis::X),
        );
        assert_eq!(timeline.current_time(), Some(50.0));
    }

    #[test]
    fn duration_is_the_constant_scale_bound() {
        let (_host, registry, source) = setup();
        let timeline = ScrollTimeline::with_source(&registry, source);
        assert_eq!(timeline.duration(), 100.0);
    }

    #[test]
    fn revision_bumps_on_scroll() {
        let (host, registry, source) = setup();
        let timeline = ScrollTimeline::with_source(&registry, source);
        let before = timeline.revision();
        host.set_scroll_position(source, 0.0, 10.0);
        assert_eq!(timeline.revision(), before + 1);
    }

    #[test]
    fn cancel_releases_shared_observers_when_last() {
        let (host, registry, source) = setup();
        let a = ScrollTimeline::with_source(&registry, source);
        let b = ScrollTimeline::with_source(&registry, source);

        a.cancel();
        assert!(registry.is_tracking(source));
        assert_eq!(host.unobserve_count(), 0);

        b.cancel();
        assert!(!registry.is_tracking(source));
        assert_eq!(host.live_observer_count(), 0);

        // Cancelling again, or a never-attached timeline, is safe.
        b.cancel();
        let detached = ScrollTimeline::new(
            &registry,
            TimelineOptions::new().source(SourceOption::None),
        );
        detached.cancel();
    }

    #[test]
    fn drop_detaches_like_cancel() {
        let (host, registry, source) = setup();
        {
            let _timeline = ScrollTimeline::with_source(&registry, source);
            assert!(registry.is_tracking(source));
        }
        assert!(!registry.is_tracking(source));
        assert_eq!(host.live_observer_count(), 0);
    }

    #[test]
    fn cancelled_timeline_reads_as_sourceless() {
        let (_host, registry, source) = setup();
        let timeline = ScrollTimeline::with_source(&registry, source);
        timeline.cancel();
        assert_eq!(timeline.source(), None);
        assert_eq!(timeline.phase(), TimelinePhase::Inactive);
        assert_eq!(timeline.current_time(), None);
    }

    #[test]
    fn phase_display_names() {
        assert_eq!(TimelinePhase::Active.to_string(), "active");
        assert_eq!(TimelinePhase::Inactive.to_string(), "inactive");
    }
}
