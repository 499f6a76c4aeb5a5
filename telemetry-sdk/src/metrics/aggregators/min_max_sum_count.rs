use std::collections::HashMap;
use std::sync::Mutex;
use std::time::SystemTime;

use super::{Aggregation, AggregatorHandle, Number};
use crate::metrics::data::{self, AggregatedMetrics, MetricData, MinMaxSumCountDataPoint};
use crate::metrics::{
    AttributeSet, InstrumentDescriptor, MinMaxSumCountAccumulation, Temporality,
};

/// Create a new min-max-sum-count aggregation.
pub fn min_max_sum_count() -> MinMaxSumCountAggregation {
    MinMaxSumCountAggregation
}

/// Summarizes a set of measurements as their count, sum and extrema.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMaxSumCountAggregation;

impl<N: Number> Aggregation<N> for MinMaxSumCountAggregation {
    type Acc = MinMaxSumCountAccumulation<N>;
    type Handle = MinMaxSumCountHandle<N>;

    fn create_handle(&self) -> Self::Handle {
        MinMaxSumCountHandle::default()
    }

    fn merge(&self, a1: Self::Acc, a2: Self::Acc) -> Self::Acc {
        MinMaxSumCountAccumulation::new(
            a1.count() + a2.count(),
            a1.sum() + a2.sum(),
            a1.min().min(a2.min()),
            a1.max().max(a2.max()),
        )
    }

    fn to_metric_data(
        &self,
        _descriptor: &InstrumentDescriptor,
        accumulations: &HashMap<AttributeSet, Self::Acc>,
        _temporality: Temporality,
        start_time: SystemTime,
        time: SystemTime,
    ) -> Option<AggregatedMetrics> {
        if accumulations.is_empty() {
            return None;
        }

        let data_points = accumulations
            .iter()
            .map(|(attrs, accumulation)| MinMaxSumCountDataPoint {
                attributes: attrs.to_vec(),
                count: accumulation.count(),
                sum: accumulation.sum(),
                min: accumulation.min(),
                max: accumulation.max(),
            })
            .collect();

        Some(N::into_aggregated(MetricData::MinMaxSumCount(
            data::MinMaxSumCount {
                data_points,
                start_time,
                time,
            },
        )))
    }
}

#[derive(Debug)]
struct PendingState<N> {
    count: u64,
    sum: N,
    min: N,
    max: N,
}

/// The concurrent accumulator for [`MinMaxSumCountAggregation`].
///
/// All four summary fields update under one lock, so a drain observes either
/// all of a racing recording or none of it. The extrema start unset rather
/// than at infinity sentinels; the first recording in a cycle initializes
/// them.
#[derive(Debug, Default)]
pub struct MinMaxSumCountHandle<N> {
    pending: Mutex<Option<PendingState<N>>>,
}

impl<N: Number> AggregatorHandle<N> for MinMaxSumCountHandle<N> {
    type Acc = MinMaxSumCountAccumulation<N>;

    fn record(&self, value: N) {
        let _ = self.pending.lock().map(|mut pending| {
            *pending = Some(match pending.take() {
                Some(state) => PendingState {
                    count: state.count + 1,
                    sum: state.sum + value,
                    min: state.min.min(value),
                    max: state.max.max(value),
                },
                None => PendingState {
                    count: 1,
                    sum: value,
                    min: value,
                    max: value,
                },
            });
        });
    }

    fn accumulate_then_reset(&self) -> Option<Self::Acc> {
        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(_) => return None,
        };
        pending.take().map(|state| {
            MinMaxSumCountAccumulation::new(state.count, state.sum, state.min, state.max)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::InstrumentKind;
    use crate::KeyValue;
    use rand::Rng;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn recordings_summarize_exactly() {
        let handle = min_max_sum_count().create_handle();

        handle.record(100.0);
        assert_eq!(
            handle.accumulate_then_reset(),
            Some(MinMaxSumCountAccumulation::new(1, 100.0, 100.0, 100.0))
        );

        handle.record(200.0);
        assert_eq!(
            handle.accumulate_then_reset(),
            Some(MinMaxSumCountAccumulation::new(1, 200.0, 200.0, 200.0))
        );

        handle.record(-75.0);
        assert_eq!(
            handle.accumulate_then_reset(),
            Some(MinMaxSumCountAccumulation::new(1, -75.0, -75.0, -75.0))
        );
    }

    #[test]
    fn snapshot_covers_all_recordings_since_reset() {
        let handle = min_max_sum_count().create_handle();
        for value in [3_i64, -1, 8, 0] {
            handle.record(value);
        }
        assert_eq!(
            handle.accumulate_then_reset(),
            Some(MinMaxSumCountAccumulation::new(4, 10, -1, 8))
        );
    }

    #[test]
    fn accumulate_then_reset_drains() {
        let handle = min_max_sum_count().create_handle();
        assert_eq!(handle.accumulate_then_reset(), None);

        handle.record(100.0);
        assert_eq!(
            handle.accumulate_then_reset(),
            Some(MinMaxSumCountAccumulation::new(1, 100.0, 100.0, 100.0))
        );
        assert_eq!(handle.accumulate_then_reset(), None);

        handle.record(100.0);
        assert_eq!(
            handle.accumulate_then_reset(),
            Some(MinMaxSumCountAccumulation::new(1, 100.0, 100.0, 100.0))
        );
        assert_eq!(handle.accumulate_then_reset(), None);
    }

    #[test]
    fn merge_is_commutative_and_associative() {
        let aggregation = min_max_sum_count();
        let a = MinMaxSumCountAccumulation::new(2, 10.0, 1.0, 9.0);
        let b = MinMaxSumCountAccumulation::new(1, -5.0, -5.0, -5.0);
        let c = MinMaxSumCountAccumulation::new(3, 30.0, 4.0, 20.0);

        assert_eq!(aggregation.merge(a, b), aggregation.merge(b, a));
        assert_eq!(
            aggregation.merge(aggregation.merge(a, b), c),
            aggregation.merge(a, aggregation.merge(b, c))
        );
        assert_eq!(
            aggregation.merge(a, b),
            MinMaxSumCountAccumulation::new(3, 5.0, -5.0, 9.0)
        );
    }

    fn process(
        summary: &Mutex<Option<MinMaxSumCountAccumulation<f64>>>,
        other: Option<MinMaxSumCountAccumulation<f64>>,
    ) {
        let Some(other) = other else { return };
        let mut guard = summary.lock().unwrap();
        *guard = Some(match guard.take() {
            Some(accumulation) => min_max_sum_count().merge(accumulation, other),
            None => other,
        });
    }

    #[test]
    fn multithreaded_updates_lose_nothing() {
        let handle = Arc::new(min_max_sum_count().create_handle());
        let summary = Arc::new(Mutex::new(None::<MinMaxSumCountAccumulation<f64>>));
        let updates = [1.0, 2.0, 3.0, 5.0, 7.0, 11.0, 13.0, 17.0, 19.0, 23.0];
        const UPDATES_PER_THREAD: usize = 1000;

        let workers: Vec<_> = updates
            .into_iter()
            .map(|update| {
                let handle = Arc::clone(&handle);
                let summary = Arc::clone(&summary);
                thread::spawn(move || {
                    let mut rng = rand::rng();
                    for _ in 0..UPDATES_PER_THREAD {
                        handle.record(update);
                        if rng.random_range(0..10) == 0 {
                            process(&summary, handle.accumulate_then_reset());
                        }
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }
        // make sure everything gets merged when all the aggregation is done.
        process(&summary, handle.accumulate_then_reset());

        let total = summary.lock().unwrap().expect("recordings were made");
        assert_eq!(
            total,
            MinMaxSumCountAccumulation::new(
                (updates.len() * UPDATES_PER_THREAD) as u64,
                101_000.0,
                1.0,
                23.0
            )
        );
    }

    #[test]
    fn renders_one_point_per_label_set() {
        let aggregation = min_max_sum_count();
        let descriptor = InstrumentDescriptor::new("latency", InstrumentKind::Histogram);
        let mut accumulations = HashMap::new();
        accumulations.insert(
            AttributeSet::from(&[KeyValue::new("route", "/a")][..]),
            MinMaxSumCountAccumulation::new(2, 30.0, 10.0, 20.0),
        );
        accumulations.insert(
            AttributeSet::from(&[KeyValue::new("route", "/b")][..]),
            MinMaxSumCountAccumulation::new(1, 5.0, 5.0, 5.0),
        );

        let data = aggregation
            .to_metric_data(
                &descriptor,
                &accumulations,
                Temporality::Delta,
                crate::time::now(),
                crate::time::now(),
            )
            .expect("non-empty accumulations render");

        match data {
            AggregatedMetrics::F64(MetricData::MinMaxSumCount(mmsc)) => {
                assert_eq!(mmsc.data_points.len(), 2);
                let point = mmsc
                    .data_points
                    .iter()
                    .find(|p| p.attributes == vec![KeyValue::new("route", "/a")])
                    .expect("point for /a");
                assert_eq!(point.count, 2);
                assert_eq!(point.sum, 30.0);
                assert_eq!(point.min, 10.0);
                assert_eq!(point.max, 20.0);
            }
            other => panic!("unexpected data shape: {other:?}"),
        }
    }
}
