#![forbid(unsafe_code)]

//! Deterministic in-memory [`Host`] for tests.
//!
//! `FakeHost` models just enough of a document to exercise the core:
//! elements with metrics, style, children, and a connected flag; a
//! designated scrolling root; the three observation kinds; and an explicit
//! deferred-task queue drained by [`FakeHost::run_deferred`]. Mutation
//! helpers fire the matching observers synchronously, the way a real
//! engine would dispatch them on its event loop.
//!
//! Every subscription and teardown is counted, so tests can assert
//! observer-sharing invariants ("two timelines, one observer set")
//! directly against the collaborator.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::host::{DeferredTask, ElementId, Host, ObserverCallback, ObserverId};
use crate::snapshot::ScrollMetrics;
use crate::style::{ComputedStyle, Overflow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObserverKind {
    Resize,
    Attributes,
    Scroll,
}

struct ObserverEntry {
    kind: ObserverKind,
    element: ElementId,
    callback: ObserverCallback,
}

struct ElementState {
    metrics: ScrollMetrics,
    style: ComputedStyle,
    children: Vec<ElementId>,
    connected: bool,
}

/// Blueprint for one fake element.
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    metrics: ScrollMetrics,
    style: ComputedStyle,
    children: Vec<ElementId>,
    connected: bool,
}

impl ElementSpec {
    /// A connected element with default (non-scrolling) style and zeroed
    /// metrics.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    /// A connected element whose overflow establishes a scroll container.
    #[must_use]
    pub fn scroller() -> Self {
        let mut spec = Self::new();
        spec.style.overflow = Overflow::Auto;
        spec
    }

    #[must_use]
    pub fn metrics(mut self, metrics: ScrollMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    #[must_use]
    pub fn style(mut self, style: ComputedStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn child(mut self, child: ElementId) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn connected(mut self, connected: bool) -> Self {
        self.connected = connected;
        self
    }
}

/// In-memory host with synchronous observer dispatch and an explicit
/// deferred-task queue.
#[derive(Default)]
pub struct FakeHost {
    elements: RefCell<FxHashMap<ElementId, ElementState>>,
    observers: RefCell<FxHashMap<u64, ObserverEntry>>,
    deferred: RefCell<VecDeque<DeferredTask>>,
    scrolling_root: Cell<Option<ElementId>>,
    next_element: Cell<u64>,
    next_observer: Cell<u64>,
    resize_observed: Cell<u64>,
    attributes_observed: Cell<u64>,
    scroll_observed: Cell<u64>,
    unobserved: Cell<u64>,
}

impl FakeHost {
    /// Create an empty host.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    // ── Document manipulation ────────────────────────────────────────

    /// Add an element and return its handle.
    pub fn create_element(&self, spec: ElementSpec) -> ElementId {
        let raw = self.next_element.get() + 1;
        self.next_element.set(raw);
        let id = ElementId::from_raw(raw);
        self.elements.borrow_mut().insert(
            id,
            ElementState {
                metrics: spec.metrics,
                style: spec.style,
                children: spec.children,
                connected: spec.connected,
            },
        );
        id
    }

    /// Designate the document's default scrolling root.
    pub fn set_scrolling_root(&self, element: ElementId) {
        self.scrolling_root.set(Some(element));
    }

    /// Move the scroll position and fire scroll observers, like a scroll
    /// event dispatch.
    pub fn set_scroll_position(&self, element: ElementId, left: f64, top: f64) {
        {
            let mut elements = self.elements.borrow_mut();
            let Some(state) = elements.get_mut(&element) else {
                return;
            };
            state.metrics.scroll_left = left;
            state.metrics.scroll_top = top;
        }
        self.fire(ObserverKind::Scroll, element);
    }

    /// Replace an element's metrics and fire resize observers.
    pub fn set_metrics(&self, element: ElementId, metrics: ScrollMetrics) {
        {
            let mut elements = self.elements.borrow_mut();
            let Some(state) = elements.get_mut(&element) else {
                return;
            };
            state.metrics = metrics;
        }
        self.fire(ObserverKind::Resize, element);
    }

    /// Replace an element's computed style and fire attribute observers,
    /// like a `style`/`class` mutation.
    pub fn set_style(&self, element: ElementId, style: ComputedStyle) {
        {
            let mut elements = self.elements.borrow_mut();
            let Some(state) = elements.get_mut(&element) else {
                return;
            };
            state.style = style;
        }
        self.fire(ObserverKind::Attributes, element);
    }

    /// Attach or detach an element from the document.
    pub fn set_connected(&self, element: ElementId, connected: bool) {
        if let Some(state) = self.elements.borrow_mut().get_mut(&element) {
            state.connected = connected;
        }
    }

    /// Forget an element entirely; subsequent queries return `None`.
    pub fn remove_element(&self, element: ElementId) {
        self.elements.borrow_mut().remove(&element);
    }

    // ── Deferred queue ───────────────────────────────────────────────

    /// Drain the deferred-task queue, running tasks in FIFO order. Tasks
    /// scheduled while draining run in the same drain. Returns the number
    /// of tasks run.
    pub fn run_deferred(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.deferred.borrow_mut().pop_front();
            let Some(task) = task else { break };
            task();
            ran += 1;
        }
        ran
    }

    /// Number of deferred tasks currently queued.
    #[must_use]
    pub fn pending_deferred(&self) -> usize {
        self.deferred.borrow().len()
    }

    // ── Counters ─────────────────────────────────────────────────────

    /// Total `observe_resize` calls.
    #[must_use]
    pub fn resize_observe_count(&self) -> u64 {
        self.resize_observed.get()
    }

    /// Total `observe_attributes` calls.
    #[must_use]
    pub fn attribute_observe_count(&self) -> u64 {
        self.attributes_observed.get()
    }

    /// Total `observe_scroll` calls.
    #[must_use]
    pub fn scroll_observe_count(&self) -> u64 {
        self.scroll_observed.get()
    }

    /// Total subscriptions ever installed, across all kinds.
    #[must_use]
    pub fn observe_count(&self) -> u64 {
        self.resize_observed.get() + self.attributes_observed.get() + self.scroll_observed.get()
    }

    /// Total subscriptions actually removed (idempotent repeats excluded).
    #[must_use]
    pub fn unobserve_count(&self) -> u64 {
        self.unobserved.get()
    }

    /// Subscriptions currently installed.
    #[must_use]
    pub fn live_observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    fn fire(&self, kind: ObserverKind, element: ElementId) {
        // Snapshot the matching callbacks first: a callback may subscribe
        // or unsubscribe while running.
        let callbacks: Vec<ObserverCallback> = self
            .observers
            .borrow()
            .values()
            .filter(|entry| entry.kind == kind && entry.element == element)
            .map(|entry| Rc::clone(&entry.callback))
            .collect();
        for callback in callbacks {
            callback(element);
        }
    }

    fn insert_observer(
        &self,
        kind: ObserverKind,
        element: ElementId,
        callback: ObserverCallback,
    ) -> ObserverId {
        let raw = self.next_observer.get() + 1;
        self.next_observer.set(raw);
        self.observers.borrow_mut().insert(
            raw,
            ObserverEntry {
                kind,
                element,
                callback,
            },
        );
        ObserverId::from_raw(raw)
    }
}

impl Host for FakeHost {
    fn scrolling_root(&self) -> Option<ElementId> {
        self.scrolling_root.get()
    }

    fn is_connected(&self, element: ElementId) -> bool {
        self.elements
            .borrow()
            .get(&element)
            .is_some_and(|state| state.connected)
    }

    fn scroll_metrics(&self, element: ElementId) -> Option<ScrollMetrics> {
        self.elements.borrow().get(&element).map(|state| state.metrics)
    }

    fn computed_style(&self, element: ElementId) -> Option<ComputedStyle> {
        self.elements.borrow().get(&element).map(|state| state.style)
    }

    fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.elements
            .borrow()
            .get(&element)
            .map(|state| state.children.clone())
            .unwrap_or_default()
    }

    fn observe_resize(&self, element: ElementId, callback: ObserverCallback) -> ObserverId {
        self.resize_observed.set(self.resize_observed.get() + 1);
        self.insert_observer(ObserverKind::Resize, element, callback)
    }

    fn observe_attributes(&self, element: ElementId, callback: ObserverCallback) -> ObserverId {
        self.attributes_observed
            .set(self.attributes_observed.get() + 1);
        self.insert_observer(ObserverKind::Attributes, element, callback)
    }

    fn observe_scroll(&self, element: ElementId, callback: ObserverCallback) -> ObserverId {
        self.scroll_observed.set(self.scroll_observed.get() + 1);
        self.insert_observer(ObserverKind::Scroll, element, callback)
    }

    fn unobserve(&self, observer: ObserverId) {
        if self
            .observers
            .borrow_mut()
            .remove(&observer.as_raw())
            .is_some()
        {
            self.unobserved.set(self.unobserved.get() + 1);
        }
    }

    fn defer(&self, task: DeferredTask) {
        self.deferred.borrow_mut().push_back(task);
    }
}
