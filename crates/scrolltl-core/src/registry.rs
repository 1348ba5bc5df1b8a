#![forbid(unsafe_code)]

//! Source registry: one shared tracking record per distinct source.
//!
//! # Design
//!
//! The registry maps each tracked source element to a [`SourceRecord`]
//! holding the cached [`SourceSnapshot`], the observer subscriptions that
//! keep it fresh, and weak references to every timeline attached to that
//! source. However many timelines attach, a source carries exactly one
//! observer set; the record is created when the first timeline attaches
//! and torn down when the last one leaves.
//!
//! Records hold timelines weakly: attachment is an observation
//! subscription, not ownership. Bridge callbacks likewise hold only weak
//! references back to their record and registry, so dropping the last
//! timeline releases everything even while callbacks remain registered
//! with the host.
//!
//! # Invariants
//!
//! 1. A record exists iff at least one live timeline references its
//!    source.
//! 2. `attach` with the timeline's current source is a no-op (no observer
//!    churn).
//! 3. Teardown disconnects each subscription with the identity used to
//!    subscribe, exactly once; repeated teardown is a no-op.
//! 4. A full re-measure schedules at most one deferred notification pass
//!    per task; the single-flight flag clears only after the pass runs.
//! 5. The weak set is never mutated while being iterated; notification
//!    walks a stable copy and prunes afterwards.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::host::{ElementId, Host, ObserverCallback, ObserverId};
use crate::snapshot::SourceSnapshot;
use crate::timeline::TimelineInner;

// ---------------------------------------------------------------------------
// SourceRecord
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct TimelineRef {
    id: u64,
    handle: Weak<TimelineInner>,
}

/// Shared per-source tracking state: cached snapshot, attached timelines,
/// observer subscriptions, and the notification single-flight flag.
pub(crate) struct SourceRecord {
    source: ElementId,
    snapshot: RefCell<SourceSnapshot>,
    timelines: RefCell<Vec<TimelineRef>>,
    update_scheduled: Cell<bool>,
    observers: RefCell<Vec<ObserverId>>,
}

impl SourceRecord {
    fn new(source: ElementId, snapshot: SourceSnapshot) -> Rc<Self> {
        Rc::new(Self {
            source,
            snapshot: RefCell::new(snapshot),
            timelines: RefCell::new(Vec::new()),
            update_scheduled: Cell::new(false),
            observers: RefCell::new(Vec::new()),
        })
    }

    /// Full re-measure: replace the snapshot wholesale, then coalesce a
    /// deferred notification pass.
    fn remeasure(self: &Rc<Self>, host: &Rc<dyn Host>) {
        let Some(snapshot) = SourceSnapshot::measure(host.as_ref(), self.source) else {
            trace!(source = self.source.as_raw(), "re-measure skipped, element gone");
            return;
        };
        *self.snapshot.borrow_mut() = snapshot;
        self.schedule_notify(host);
    }

    /// Eager scroll path: overwrite only the offset pair, in place.
    fn refresh_scroll_offsets(&self, host: &dyn Host) {
        let Some(metrics) = host.scroll_metrics(self.source) else {
            return;
        };
        let mut snapshot = self.snapshot.borrow_mut();
        snapshot.metrics.scroll_left = metrics.scroll_left;
        snapshot.metrics.scroll_top = metrics.scroll_top;
    }

    fn schedule_notify(self: &Rc<Self>, host: &Rc<dyn Host>) {
        if self.update_scheduled.replace(true) {
            return;
        }
        trace!(source = self.source.as_raw(), "notification pass scheduled");
        let weak = Rc::downgrade(self);
        host.defer(Box::new(move || {
            if let Some(record) = weak.upgrade() {
                record.notify_timelines();
                // Cleared only after the pass runs, so re-triggers while
                // pending stay collapsed into this one.
                record.update_scheduled.set(false);
            }
        }));
    }

    /// Resolve every attached timeline so dependent computation refreshes,
    /// pruning references whose timeline is gone. Walks a stable copy; the
    /// live set is only touched afterwards.
    fn notify_timelines(&self) {
        let refs: Vec<TimelineRef> = self.timelines.borrow().clone();
        for timeline_ref in &refs {
            if let Some(timeline) = timeline_ref.handle.upgrade() {
                timeline.bump_revision();
            }
        }
        self.timelines
            .borrow_mut()
            .retain(|r| r.handle.strong_count() > 0);
    }

    /// Disconnect all observation subscriptions. Draining makes repeats a
    /// no-op, and the host ignores unknown ids.
    fn teardown(&self, host: &dyn Host) {
        for observer in self.observers.borrow_mut().drain(..) {
            host.unobserve(observer);
        }
    }
}

// ---------------------------------------------------------------------------
// SourceRegistry
// ---------------------------------------------------------------------------

/// Process-wide (per host) store of source tracking records.
///
/// Shared by timelines via `Rc`; all mutation happens on the single host
/// event loop, so attach/detach for one timeline runs to completion with
/// no interleaving.
pub struct SourceRegistry {
    host: Rc<dyn Host>,
    records: RefCell<FxHashMap<ElementId, Rc<SourceRecord>>>,
}

impl SourceRegistry {
    /// Create a registry over the given host.
    #[must_use]
    pub fn new(host: Rc<dyn Host>) -> Rc<Self> {
        Rc::new(Self {
            host,
            records: RefCell::new(FxHashMap::default()),
        })
    }

    /// The host this registry observes through.
    #[must_use]
    pub fn host(&self) -> &Rc<dyn Host> {
        &self.host
    }

    /// Number of sources currently carrying a tracking record.
    #[must_use]
    pub fn tracked_source_count(&self) -> usize {
        self.records.borrow().len()
    }

    /// Whether a tracking record exists for this source.
    #[must_use]
    pub fn is_tracking(&self, source: ElementId) -> bool {
        self.records.borrow().contains_key(&source)
    }

    /// Clone of the cached snapshot for a tracked source.
    #[must_use]
    pub fn snapshot_for(&self, source: ElementId) -> Option<SourceSnapshot> {
        self.records
            .borrow()
            .get(&source)
            .map(|record| record.snapshot.borrow().clone())
    }

    /// Point a timeline at `source`, creating the tracking record if this
    /// is the first attachment and releasing the previous one if this was
    /// its last. `None` detaches without re-attaching.
    pub(crate) fn attach(self: &Rc<Self>, timeline: &Rc<TimelineInner>, source: Option<ElementId>) {
        if timeline.source.get() == source {
            return;
        }
        self.detach(timeline);
        timeline.source.set(source);
        let Some(source) = source else { return };

        let record = self.ensure_record(source);
        record.timelines.borrow_mut().push(TimelineRef {
            id: timeline.id,
            handle: Rc::downgrade(timeline),
        });
    }

    /// Remove a timeline from its current source's record, pruning dead
    /// references and tearing the record down when the set empties.
    /// A no-op for timelines that were never attached.
    pub(crate) fn detach(&self, timeline: &TimelineInner) {
        let Some(source) = timeline.source.take() else {
            return;
        };
        let record = self.records.borrow().get(&source).cloned();
        let Some(record) = record else { return };

        record
            .timelines
            .borrow_mut()
            .retain(|r| r.id != timeline.id && r.handle.strong_count() > 0);

        if record.timelines.borrow().is_empty() {
            record.teardown(self.host.as_ref());
            self.records.borrow_mut().remove(&source);
            debug!(source = source.as_raw(), "tracking record released");
        }
    }

    fn ensure_record(self: &Rc<Self>, source: ElementId) -> Rc<SourceRecord> {
        if let Some(record) = self.records.borrow().get(&source) {
            return Rc::clone(record);
        }

        let snapshot =
            SourceSnapshot::measure(self.host.as_ref(), source).unwrap_or_default();
        let record = SourceRecord::new(source, snapshot);
        self.install_observers(&record);
        self.records.borrow_mut().insert(source, Rc::clone(&record));
        debug!(source = source.as_raw(), "tracking record created");
        record
    }

    /// Install the change-observation bridge for one record: resize on the
    /// source and each direct child, attribute mutation on the source, and
    /// scroll. Callbacks hold weak references only.
    fn install_observers(self: &Rc<Self>, record: &Rc<SourceRecord>) {
        let source = record.source;
        let mut observers = Vec::new();

        // Size/layout changes: full re-measure of the source.
        let resize_host = Rc::clone(&self.host);
        let resize_record = Rc::downgrade(record);
        let on_resize: ObserverCallback = Rc::new(move |_changed| {
            if let Some(record) = resize_record.upgrade() {
                record.remeasure(&resize_host);
            }
        });
        observers.push(self.host.observe_resize(source, Rc::clone(&on_resize)));
        for child in self.host.children(source) {
            observers.push(self.host.observe_resize(child, Rc::clone(&on_resize)));
        }

        // style/class mutations: full re-measure of the mutated element,
        // if it is tracked.
        let attr_registry = Rc::downgrade(self);
        let on_attributes: ObserverCallback = Rc::new(move |mutated| {
            if let Some(registry) = attr_registry.upgrade() {
                let record = registry.records.borrow().get(&mutated).cloned();
                if let Some(record) = record {
                    record.remeasure(&registry.host);
                }
            }
        });
        observers.push(self.host.observe_attributes(source, on_attributes));

        // Scroll: update only the offsets, synchronously, then notify.
        let scroll_host = Rc::clone(&self.host);
        let scroll_record = Rc::downgrade(record);
        let on_scroll: ObserverCallback = Rc::new(move |_scrolled| {
            if let Some(record) = scroll_record.upgrade() {
                record.refresh_scroll_offsets(scroll_host.as_ref());
                record.notify_timelines();
            }
        });
        observers.push(self.host.observe_scroll(source, on_scroll));

        *record.observers.borrow_mut() = observers;
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("tracked_sources", &self.tracked_source_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
