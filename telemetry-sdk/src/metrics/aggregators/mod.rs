//! Aggregation strategies and their concurrent aggregator handles.
//!
//! Each aggregation kind comes in two pieces. The *strategy*
//! ([`Aggregation`]) is a stateless, zero-sized value selected once at
//! instrument construction; it owns the merge rule for its accumulation type
//! and renders a cycle's accumulations into exportable data. The *handle*
//! ([`AggregatorHandle`]) is the one mutable, concurrently-written entity in
//! the core: recording threads update its pending state while the collector
//! atomically drains it.
//!
//! The strategies are selected through the free constructors [`sum`],
//! [`count`], [`min_max_sum_count`] and [`last_value`]. The long/double
//! specialization of the source design is the [`Number`] type parameter here:
//! an `i64` instrument and an `f64` instrument get distinct handle
//! instantiations of the same generic implementation, and mixing the two
//! within one aggregation is a compile error rather than a runtime fault.

use core::fmt;
use std::collections::HashMap;
use std::ops::{Add, AddAssign};
use std::time::SystemTime;

use crate::metrics::data::{AggregatedMetrics, MetricData};
use crate::metrics::{AttributeSet, InstrumentDescriptor, InstrumentKind, Temporality};

mod count;
mod last_value;
mod min_max_sum_count;
mod sum;

pub use count::{count, CountAggregation, CountHandle};
pub use last_value::{last_value, LastValueAggregation, LastValueHandle};
pub use min_max_sum_count::{min_max_sum_count, MinMaxSumCountAggregation, MinMaxSumCountHandle};
pub use sum::{sum, SumAggregation, SumHandle};

/// The numeric types measurements can be recorded as.
///
/// Implemented for `i64` and `f64`; instruments declare one of the two and
/// every aggregation is instantiated for exactly that type.
pub trait Number:
    Add<Output = Self>
    + AddAssign
    + PartialOrd
    + fmt::Debug
    + Clone
    + Copy
    + PartialEq
    + Default
    + Send
    + Sync
    + 'static
{
    /// The smaller of `self` and `other`.
    fn min(self, other: Self) -> Self;

    /// The larger of `self` and `other`.
    fn max(self, other: Self) -> Self;

    /// Wraps rendered data in the variant matching this value type.
    fn into_aggregated(data: MetricData<Self>) -> AggregatedMetrics;
}

impl Number for i64 {
    fn min(self, other: Self) -> Self {
        Ord::min(self, other)
    }

    fn max(self, other: Self) -> Self {
        Ord::max(self, other)
    }

    fn into_aggregated(data: MetricData<Self>) -> AggregatedMetrics {
        AggregatedMetrics::I64(data)
    }
}

impl Number for f64 {
    fn min(self, other: Self) -> Self {
        if other < self {
            other
        } else {
            self
        }
    }

    fn max(self, other: Self) -> Self {
        if other > self {
            other
        } else {
            self
        }
    }

    fn into_aggregated(data: MetricData<Self>) -> AggregatedMetrics {
        AggregatedMetrics::F64(data)
    }
}

/// The live accumulator bound to one (instrument, label set) pair.
///
/// [`record`] may be called concurrently from unboundedly many threads.
/// [`accumulate_then_reset`] is called by at most one thread at a time (the
/// collector) but races with recorders; every recording is accounted in
/// exactly one returned accumulation over the handle's lifetime — never
/// both, never neither. Critical sections cover a handful of field updates
/// only, so neither call blocks for longer than O(1).
///
/// [`record`]: AggregatorHandle::record
/// [`accumulate_then_reset`]: AggregatorHandle::accumulate_then_reset
pub trait AggregatorHandle<N: Number>: Send + Sync {
    /// The accumulation this handle produces.
    type Acc;

    /// Records one measurement.
    fn record(&self, value: N);

    /// Atomically captures the pending state as an immutable accumulation
    /// and resets the pending state to empty.
    ///
    /// Returns `None` if nothing was recorded since the previous reset,
    /// including at creation time.
    fn accumulate_then_reset(&self) -> Option<Self::Acc>;
}

/// A stateless aggregation strategy for one aggregation kind.
///
/// Strategy values are zero-sized and `Copy`; sharing one across all
/// instruments of a kind and value type carries no state and no cost.
pub trait Aggregation<N: Number>: fmt::Debug + Copy + Send + Sync + 'static {
    /// The accumulation type this aggregation merges and renders.
    type Acc: fmt::Debug + Clone + PartialEq + Send + Sync + 'static;

    /// The handle type this aggregation drains accumulations from.
    type Handle: AggregatorHandle<N, Acc = Self::Acc>;

    /// Creates a new handle with empty pending state.
    fn create_handle(&self) -> Self::Handle;

    /// Combines two accumulations into one.
    ///
    /// For every kind except last-value the merge is associative and
    /// commutative, so accumulations may be merged in any order and
    /// grouping. Last-value returns the second operand unconditionally;
    /// its callers must feed merges in temporal order.
    fn merge(&self, a1: Self::Acc, a2: Self::Acc) -> Self::Acc;

    /// Whether this aggregation is defined for the given instrument kind.
    ///
    /// Incompatible pairings are rejected at processor construction.
    fn compatible_with(&self, kind: InstrumentKind) -> bool {
        let _ = kind;
        true
    }

    /// Renders one cycle's accumulations into exportable data.
    ///
    /// Returns `None` when the accumulation map is empty, and `None` for
    /// instrument kinds the aggregation is not defined for.
    fn to_metric_data(
        &self,
        descriptor: &InstrumentDescriptor,
        accumulations: &HashMap<AttributeSet, Self::Acc>,
        temporality: Temporality,
        start_time: SystemTime,
        time: SystemTime,
    ) -> Option<AggregatedMetrics>;
}
