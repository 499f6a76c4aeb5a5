//! # Telemetry SDK metrics core
//!
//! This crate is the in-process aggregation core of a metrics SDK. It turns a
//! stream of raw measurements, recorded against named instruments from any
//! number of application threads, into periodic exportable summary records.
//!
//! The pieces compose bottom-up:
//!
//! * An [`AggregatorHandle`] is the live accumulator for one
//!   (instrument, label set) pair. Recording threads write into it
//!   concurrently; the collector drains it with
//!   [`accumulate_then_reset`], which atomically snapshots and clears the
//!   pending state.
//! * The snapshot is an immutable accumulation value
//!   ([`SumAccumulation`], [`CountAccumulation`],
//!   [`MinMaxSumCountAccumulation`] or [`LastValueAccumulation`]) that can be
//!   merged with others of the same kind in any order and grouping.
//! * An [`Aggregation`] strategy owns the merge rule and knows how to render
//!   a set of per-label accumulations into exportable
//!   [`data`] for one collection interval.
//! * An [`InstrumentProcessor`] batches accumulations by label set across one
//!   collection cycle and applies delta or cumulative temporality at the
//!   cycle boundary.
//!
//! Instrument registration, the public recording API, the collection loop and
//! the export encoding are deliberately not part of this crate; they drive it
//! from the outside.
//!
//! [`AggregatorHandle`]: metrics::aggregators::AggregatorHandle
//! [`accumulate_then_reset`]: metrics::aggregators::AggregatorHandle::accumulate_then_reset
//! [`Aggregation`]: metrics::aggregators::Aggregation
//! [`SumAccumulation`]: metrics::SumAccumulation
//! [`CountAccumulation`]: metrics::CountAccumulation
//! [`MinMaxSumCountAccumulation`]: metrics::MinMaxSumCountAccumulation
//! [`LastValueAccumulation`]: metrics::LastValueAccumulation
//! [`InstrumentProcessor`]: metrics::InstrumentProcessor
//! [`data`]: metrics::data
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]
#![cfg_attr(docsrs, feature(doc_cfg), deny(rustdoc::broken_intra_doc_links))]

mod common;
mod internal_logging;
mod resource;

pub mod metrics;

pub use common::{InstrumentationScope, Key, KeyValue, Value};
pub use resource::Resource;

#[doc(hidden)]
pub mod time {
    //! Wall-clock access used for interval and observation timestamps.
    use std::time::SystemTime;

    #[doc(hidden)]
    pub fn now() -> SystemTime {
        SystemTime::now()
    }
}

#[doc(hidden)]
#[cfg(feature = "internal-logs")]
pub mod _private {
    pub use tracing::{debug, warn};
}
