//! The in-process metrics aggregation core.
//!
//! # Overview
//!
//! Recording threads write raw measurements into
//! [`aggregators::AggregatorHandle`]s, one handle per (instrument, label set)
//! pair. A single collector thread periodically drains every handle with
//! [`aggregators::AggregatorHandle::accumulate_then_reset`] and feeds the
//! resulting accumulations into the owning [`InstrumentProcessor`] via
//! [`InstrumentProcessor::batch`]. Ending the cycle with
//! [`InstrumentProcessor::complete_collection_cycle`] yields at most one
//! exportable [`data::Metric`] for the instrument.
//!
//! ```
//! use telemetry_sdk::metrics::aggregators::{self, Aggregation, AggregatorHandle};
//! use telemetry_sdk::metrics::{
//!     AttributeSet, InstrumentDescriptor, InstrumentKind, InstrumentProcessor,
//! };
//! use telemetry_sdk::{InstrumentationScope, KeyValue, Resource};
//!
//! let aggregation = aggregators::min_max_sum_count();
//! let descriptor = InstrumentDescriptor::new("http.request.duration", InstrumentKind::Histogram);
//! let mut processor = InstrumentProcessor::delta(
//!     descriptor,
//!     aggregation,
//!     Resource::empty(),
//!     InstrumentationScope::new("example"),
//! )
//! .unwrap();
//!
//! let handle = aggregation.create_handle();
//! handle.record(42.0);
//!
//! let labels = AttributeSet::from(&[KeyValue::new("route", "/health")][..]);
//! if let Some(accumulation) = handle.accumulate_then_reset() {
//!     processor.batch(labels, accumulation);
//! }
//! let metric = processor.complete_collection_cycle();
//! assert!(metric.is_some());
//! ```

pub mod aggregators;
pub mod data;

mod accumulation;
mod attribute_set;
mod descriptor;
mod error;
mod processor;

pub use accumulation::{
    CountAccumulation, LastValueAccumulation, MinMaxSumCountAccumulation, SumAccumulation,
};
pub use attribute_set::AttributeSet;
pub use descriptor::{InstrumentDescriptor, InstrumentKind};
pub use error::{MetricError, MetricResult};
pub use processor::InstrumentProcessor;

/// Defines the window that an aggregation was calculated over.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Temporality {
    /// A measurement interval that continues to expand forward in time from a
    /// starting point.
    ///
    /// New measurements are added to all previous measurements since a start time.
    #[default]
    Cumulative,

    /// A measurement interval that resets each cycle.
    ///
    /// Measurements from one cycle are recorded independently, measurements from
    /// other cycles do not affect them.
    Delta,
}
