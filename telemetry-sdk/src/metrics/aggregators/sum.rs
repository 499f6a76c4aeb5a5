use std::collections::HashMap;
use std::sync::Mutex;
use std::time::SystemTime;

use super::{Aggregation, AggregatorHandle, Number};
use crate::metrics::data::{self, AggregatedMetrics, MetricData, SumDataPoint};
use crate::metrics::{AttributeSet, InstrumentDescriptor, SumAccumulation, Temporality};

/// Create a new sum aggregation.
pub fn sum() -> SumAggregation {
    SumAggregation
}

/// Summarizes a set of measurements as their arithmetic sum.
#[derive(Debug, Clone, Copy, Default)]
pub struct SumAggregation;

impl<N: Number> Aggregation<N> for SumAggregation {
    type Acc = SumAccumulation<N>;
    type Handle = SumHandle<N>;

    fn create_handle(&self) -> Self::Handle {
        SumHandle::default()
    }

    fn merge(&self, a1: Self::Acc, a2: Self::Acc) -> Self::Acc {
        SumAccumulation::new(a1.value() + a2.value())
    }

    fn to_metric_data(
        &self,
        descriptor: &InstrumentDescriptor,
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
                value: accumulation.value(),
            })
            .collect();

        Some(N::into_aggregated(MetricData::Sum(data::Sum {
            data_points,
            start_time,
            time,
            temporality,
            is_monotonic: descriptor.instrument_kind().monotonic(),
        })))
    }
}

/// The concurrent accumulator for [`SumAggregation`].
///
/// The pending sum doubles as the dirty flag: `None` means nothing has been
/// recorded since the last reset.
#[derive(Debug, Default)]
pub struct SumHandle<N> {
    pending: Mutex<Option<N>>,
}

impl<N: Number> AggregatorHandle<N> for SumHandle<N> {
    type Acc = SumAccumulation<N>;

    fn record(&self, value: N) {
        let _ = self.pending.lock().map(|mut pending| {
            *pending = Some(match *pending {
                Some(current) => current + value,
                None => value,
            });
        });
    }

    fn accumulate_then_reset(&self) -> Option<Self::Acc> {
        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(_) => return None,
        };
        pending.take().map(SumAccumulation::new)
    }
}
