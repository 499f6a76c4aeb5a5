use std::collections::HashMap;
use std::sync::Mutex;
use std::time::SystemTime;

use super::{Aggregation, AggregatorHandle, Number};
use crate::metrics::data::{self, AggregatedMetrics, MetricData, SumDataPoint};
use crate::metrics::{AttributeSet, CountAccumulation, InstrumentDescriptor, Temporality};

/// Create a new count aggregation.
pub fn count() -> CountAggregation {
    CountAggregation
}

/// Summarizes a set of measurements as their count, discarding the values.
///
/// One aggregation serves both value types; the recorded values never enter
/// the accumulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountAggregation;

impl<N: Number> Aggregation<N> for CountAggregation {
    type Acc = CountAccumulation;
    type Handle = CountHandle;

    fn create_handle(&self) -> Self::Handle {
        CountHandle::default()
    }

    fn merge(&self, a1: Self::Acc, a2: Self::Acc) -> Self::Acc {
        CountAccumulation::new(a1.count() + a2.count())
    }

    fn to_metric_data(
        &self,
        _descriptor: &InstrumentDescriptor,
        accumulations: &HashMap<AttributeSet, Self::Acc>,
        temporality: Temporality,
        start_time: SystemTime,
        time: SystemTime,
    ) -> Option<AggregatedMetrics> {
        if accumulations.is_empty() {
            return None;
        }

        let data_points = accumulations
            .iter()
            .map(|(attrs, accumulation)| SumDataPoint {
                attributes: attrs.to_vec(),
                value: accumulation.count(),
            })
            .collect();

        Some(AggregatedMetrics::U64(MetricData::Sum(data::Sum {
            data_points,
            start_time,
            time,
            temporality,
            is_monotonic: true,
        })))
    }
}

/// The concurrent accumulator for [`CountAggregation`].
///
/// A zero pending count means nothing has been recorded since the last
/// reset; every record increments, so zero is unambiguous.
#[derive(Debug, Default)]
pub struct CountHandle {
    pending: Mutex<u64>,
}

impl<N: Number> AggregatorHandle<N> for CountHandle {
    type Acc = CountAccumulation;

    fn record(&self, _value: N) {
        let _ = self.pending.lock().map(|mut pending| *pending += 1);
    }

    fn accumulate_then_reset(&self) -> Option<Self::Acc> {
        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(_) => return None,
        };
        match std::mem::take(&mut *pending) {
            0 => None,
            n => Some(CountAccumulation::new(n)),
        }
    }
}
