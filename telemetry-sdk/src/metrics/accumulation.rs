//! Immutable summary values produced by draining an aggregator handle.
//!
//! An accumulation covers one label set over one collection interval. It is
//! created once, by [`accumulate_then_reset`] or by a merge, and never
//! mutated afterwards, so it is safe to hand across threads without copying
//! or locking.
//!
//! [`accumulate_then_reset`]: crate::metrics::aggregators::AggregatorHandle::accumulate_then_reset

use std::time::SystemTime;

/// The arithmetic sum of recorded measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SumAccumulation<N> {
    value: N,
}

impl<N: Copy> SumAccumulation<N> {
    /// Create a new accumulation holding the given sum.
    pub fn new(value: N) -> Self {
        SumAccumulation { value }
    }

    /// The summed value.
    pub fn value(&self) -> N {
        self.value
    }
}

/// The number of recorded measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountAccumulation {
    count: u64,
}

impl CountAccumulation {
    /// Create a new accumulation holding the given count.
    pub fn new(count: u64) -> Self {
        CountAccumulation { count }
    }

    /// The number of measurements.
    pub fn count(&self) -> u64 {
        self.count
    }
}

/// The count, sum and extrema of recorded measurements.
///
/// `min <= max` always holds; a value with `count == 0` is never produced
/// (handles report "no data" instead of a zero record).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxSumCountAccumulation<N> {
    count: u64,
    sum: N,
    min: N,
    max: N,
}

impl<N: Copy> MinMaxSumCountAccumulation<N> {
    /// Create a new accumulation from the given summary fields.
    pub fn new(count: u64, sum: N, min: N, max: N) -> Self {
        MinMaxSumCountAccumulation {
            count,
            sum,
            min,
            max,
        }
    }

    /// The number of measurements.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// The arithmetic sum of the measurements.
    pub fn sum(&self) -> N {
        self.sum
    }

    /// The smallest measurement.
    pub fn min(&self) -> N {
        self.min
    }

    /// The largest measurement.
    pub fn max(&self) -> N {
        self.max
    }
}

/// The last recorded measurement together with its observation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LastValueAccumulation<N> {
    value: N,
    timestamp: SystemTime,
}

impl<N: Copy> LastValueAccumulation<N> {
    /// Create a new accumulation holding the given value and observation time.
    pub fn new(value: N, timestamp: SystemTime) -> Self {
        LastValueAccumulation { value, timestamp }
    }

    /// The last recorded value.
    pub fn value(&self) -> N {
        self.value
    }

    /// The instant the value was recorded.
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}
