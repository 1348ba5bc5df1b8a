#![forbid(unsafe_code)]

//! Scroll-progress timelines for hosts without native scroll-driven
//! animations.
//!
//! The crate tracks designated scrollable elements ("sources"), keeps a
//! cached snapshot of their scroll and layout measurements fresh through
//! shared observers, and exposes a normalized 0–100 progress value per
//! [`ScrollTimeline`]. An animation layer external to this crate reads
//! [`ScrollTimeline::current_time`] and [`ScrollTimeline::phase`] to
//! drive effects synchronized to scroll.
//!
//! # Architecture
//!
//! - [`host`]: the seam to the embedding environment — measurements,
//!   computed style, change subscriptions, task-queue deferral.
//! - [`snapshot`]: the cached per-source measurement record.
//! - [`axis`]: logical→physical axis normalization.
//! - [`registry`]: one shared tracking record (snapshot + observers +
//!   weakly-held timelines) per distinct source.
//! - [`timeline`]: the public entity computing phase and progress on
//!   demand.
//!
//! Everything runs single-threaded on the host's event loop: `Rc`,
//! `RefCell`, and `Weak`, no locks.

pub mod axis;
pub mod error;
pub mod host;
pub mod registry;
pub mod snapshot;
pub mod style;
pub mod timeline;

#[cfg(any(test, feature = "test-helpers"))]
pub mod harness;

pub use axis::{Axis, PhysicalAxis};
pub use error::TimelineError;
pub use host::{DeferredTask, ElementId, Host, ObserverCallback, ObserverId};
pub use registry::SourceRegistry;
pub use snapshot::{ScrollMetrics, SourceSnapshot};
pub use style::{ComputedStyle, Direction, Display, Overflow, ScrollPadding, WritingMode};
pub use timeline::{DURATION, ScrollTimeline, SourceOption, TimelineOptions, TimelinePhase};
