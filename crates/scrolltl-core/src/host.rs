#![forbid(unsafe_code)]

//! The host-environment seam.
//!
//! The core never talks to a rendering engine directly. Everything it
//! needs — scroll/layout measurements, computed style, change
//! subscriptions, task-queue deferral — comes through the [`Host`] trait,
//! supplied by the embedding environment. Elements are identified by
//! opaque [`ElementId`] handles issued by the host, never by host-object
//! identity.
//!
//! # Model
//!
//! Single-threaded and cooperative: the trait is shared as
//! `Rc<dyn Host>`, observer callbacks are `Rc<dyn Fn(ElementId)>`, and
//! the host invokes them on the same event loop the core runs on.
//! Observation subscriptions are torn down through [`Host::unobserve`]
//! with the [`ObserverId`] returned at subscription time; unobserving an
//! unknown or already-removed id must be a no-op so teardown can be
//! repeated safely.

use std::rc::Rc;

use crate::snapshot::ScrollMetrics;
use crate::style::ComputedStyle;

/// Opaque handle to a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementId(u64);

impl ElementId {
    /// Wrap a raw host-issued id.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id, for host-side lookup and logging.
    #[inline]
    #[must_use]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// Opaque handle to one observation subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// Callback invoked when an observed element changes. The argument is the
/// element the change was reported against.
pub type ObserverCallback = Rc<dyn Fn(ElementId)>;

/// One-shot task run by [`Host::defer`] after the current execution unit.
pub type DeferredTask = Box<dyn FnOnce()>;

/// Everything the embedding environment supplies to the core.
pub trait Host {
    /// The document's default scrolling root, if the host has one.
    fn scrolling_root(&self) -> Option<ElementId>;

    /// Whether the element is currently attached to the document.
    fn is_connected(&self, element: ElementId) -> bool;

    /// Current scroll offsets and scroll/client extents for an element.
    fn scroll_metrics(&self, element: ElementId) -> Option<ScrollMetrics>;

    /// Current computed-style facts for an element.
    fn computed_style(&self, element: ElementId) -> Option<ComputedStyle>;

    /// Direct children of an element, for child-resize observation.
    fn children(&self, element: ElementId) -> Vec<ElementId>;

    /// Subscribe to size/layout changes of an element.
    fn observe_resize(&self, element: ElementId, callback: ObserverCallback) -> ObserverId;

    /// Subscribe to attribute mutations (at minimum `style` and `class`)
    /// on an element. The callback receives the mutated element.
    fn observe_attributes(&self, element: ElementId, callback: ObserverCallback) -> ObserverId;

    /// Subscribe to scroll events on an element. For the document's
    /// scrolling root the host is expected to listen at the document
    /// level, the way engines dispatch root scrolls.
    fn observe_scroll(&self, element: ElementId, callback: ObserverCallback) -> ObserverId;

    /// Tear down one subscription. Must be idempotent: unknown ids are
    /// ignored.
    fn unobserve(&self, observer: ObserverId);

    /// Run `task` once after the current execution unit finishes
    /// (task-queue deferral, not a timer).
    fn defer(&self, task: DeferredTask);
}
