use std::collections::HashMap;
use std::sync::Mutex;
use std::time::SystemTime;

use super::{Aggregation, AggregatorHandle, Number};
use crate::metrics::data::{
    self, AggregatedMetrics, GaugeDataPoint, MetricData, SumDataPoint,
};
use crate::metrics::{
    AttributeSet, InstrumentDescriptor, InstrumentKind, LastValueAccumulation, Temporality,
};

/// Create a new last-value aggregation.
pub fn last_value() -> LastValueAggregation {
    LastValueAggregation
}

/// Summarizes a set of measurements as the last one made.
///
/// Only defined for asynchronous (observer) instruments; the observers
/// report a complete value per interval, and the last report wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastValueAggregation;

impl<N: Number> Aggregation<N> for LastValueAggregation {
    type Acc = LastValueAccumulation<N>;
    type Handle = LastValueHandle<N>;

    fn create_handle(&self) -> Self::Handle {
        LastValueHandle::default()
    }

    /// Prefers the accumulation merged in last, not the one recorded last.
    ///
    /// The ordering between two accumulations of one cycle is undefined, so
    /// callers must feed merges in temporal order. Timestamps are carried
    /// through but deliberately not consulted as a tie-break.
    fn merge(&self, _a1: Self::Acc, a2: Self::Acc) -> Self::Acc {
        a2
    }

    fn compatible_with(&self, kind: InstrumentKind) -> bool {
        kind.asynchronous()
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

        match descriptor.instrument_kind() {
            kind @ (InstrumentKind::CounterObserver | InstrumentKind::UpDownCounterObserver) => {
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
                    is_monotonic: kind.monotonic(),
                })))
            }
            InstrumentKind::GaugeObserver => {
                let data_points = accumulations
                    .iter()
                    .map(|(attrs, accumulation)| GaugeDataPoint {
                        attributes: attrs.to_vec(),
                        value: accumulation.value(),
                        time: accumulation.timestamp(),
                    })
                    .collect();
                Some(N::into_aggregated(MetricData::Gauge(data::Gauge {
                    data_points,
                    start_time: Some(start_time),
                    time,
                })))
            }
            kind => {
                crate::sdk_warn!(
                    name: "last_value_unsupported_instrument_kind",
                    instrument = descriptor.name().as_ref(),
                    kind = format!("{kind:?}")
                );
                None
            }
        }
    }
}

/// The concurrent accumulator for [`LastValueAggregation`].
///
/// Each record overwrites the pending value and captures the observation
/// time; a drain takes both.
#[derive(Debug, Default)]
pub struct LastValueHandle<N> {
    pending: Mutex<Option<(N, SystemTime)>>,
}

impl<N: Number> AggregatorHandle<N> for LastValueHandle<N> {
    type Acc = LastValueAccumulation<N>;

    fn record(&self, value: N) {
        let timestamp = crate::time::now();
        let _ = self
            .pending
            .lock()
            .map(|mut pending| *pending = Some((value, timestamp)));
    }

    fn accumulate_then_reset(&self) -> Option<Self::Acc> {
        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(_) => return None,
        };
        pending
            .take()
            .map(|(value, timestamp)| LastValueAccumulation::new(value, timestamp))
    }
}
