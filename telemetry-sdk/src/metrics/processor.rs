use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::time::SystemTime;

use crate::common::InstrumentationScope;
use crate::metrics::aggregators::{Aggregation, Number};
use crate::metrics::data::Metric;
use crate::metrics::{AttributeSet, InstrumentDescriptor, MetricError, MetricResult, Temporality};
use crate::Resource;

/// Batches one instrument's accumulations across a collection cycle.
///
/// A collection cycle is multiple calls to [`batch`], one per drained
/// aggregator handle, followed by one [`complete_collection_cycle`]. The
/// collector driving the cycle must serialize calls to one processor; the
/// processor itself never locks, recording threads only ever touch handles.
///
/// Under delta temporality the processor forgets its state at every cycle
/// boundary, so label sets that go quiet disappear from the output until
/// recorded again. Under cumulative temporality the state is retained and
/// quiescent label sets keep reporting their last known accumulation.
///
/// [`batch`]: InstrumentProcessor::batch
/// [`complete_collection_cycle`]: InstrumentProcessor::complete_collection_cycle
#[derive(Debug)]
pub struct InstrumentProcessor<N: Number, A: Aggregation<N>> {
    descriptor: InstrumentDescriptor,
    aggregation: A,
    resource: Resource,
    scope: InstrumentationScope,
    accumulations: HashMap<AttributeSet, A::Acc>,
    start_time: SystemTime,
    temporality: Temporality,
    _number: PhantomData<N>,
}

impl<N: Number, A: Aggregation<N>> InstrumentProcessor<N, A> {
    /// Create a processor that reports all activity since instrument
    /// creation on every cycle.
    pub fn cumulative(
        descriptor: InstrumentDescriptor,
        aggregation: A,
        resource: Resource,
        scope: InstrumentationScope,
    ) -> MetricResult<Self> {
        Self::new(
            descriptor,
            aggregation,
            resource,
            scope,
            Temporality::Cumulative,
        )
    }

    /// Create a processor that reports only the activity of the most recent
    /// collection interval on every cycle.
    pub fn delta(
        descriptor: InstrumentDescriptor,
        aggregation: A,
        resource: Resource,
        scope: InstrumentationScope,
    ) -> MetricResult<Self> {
        Self::new(descriptor, aggregation, resource, scope, Temporality::Delta)
    }

    fn new(
        descriptor: InstrumentDescriptor,
        aggregation: A,
        resource: Resource,
        scope: InstrumentationScope,
        temporality: Temporality,
    ) -> MetricResult<Self> {
        if !aggregation.compatible_with(descriptor.instrument_kind()) {
            return Err(MetricError::Config(format!(
                "{:?} is not defined for {:?} instrument {}",
                aggregation,
                descriptor.instrument_kind(),
                descriptor.name(),
            )));
        }

        Ok(InstrumentProcessor {
            descriptor,
            aggregation,
            resource,
            scope,
            accumulations: HashMap::new(),
            start_time: crate::time::now(),
            temporality,
            _number: PhantomData,
        })
    }

    /// Folds one handle's accumulation for `attrs` into the current cycle.
    ///
    /// The first accumulation for a label set is stored as-is; later ones
    /// for the same label set are merged in. Call order across label sets
    /// does not matter.
    pub fn batch(&mut self, attrs: AttributeSet, accumulation: A::Acc) {
        match self.accumulations.entry(attrs) {
            Entry::Vacant(entry) => {
                entry.insert(accumulation);
            }
            Entry::Occupied(mut entry) => {
                let merged = self.aggregation.merge(entry.get().clone(), accumulation);
                *entry.get_mut() = merged;
            }
        }
    }

    /// Ends the current collection cycle and renders the batched
    /// accumulations into at most one exportable metric.
    ///
    /// Returns `None` when nothing was batched this cycle; a silent
    /// instrument produces no record at all rather than a record with zero
    /// points. A cycle that produced no record does not advance the interval
    /// start, so the next delta interval covers the quiet period as well.
    pub fn complete_collection_cycle(&mut self) -> Option<Metric> {
        let time = crate::time::now();
        if self.accumulations.is_empty() {
            return None;
        }

        let data = self.aggregation.to_metric_data(
            &self.descriptor,
            &self.accumulations,
            self.temporality,
            self.start_time,
            time,
        );

        if self.temporality == Temporality::Delta {
            self.start_time = time;
            self.accumulations = HashMap::new();
        }

        data.map(|data| Metric {
            resource: self.resource.clone(),
            scope: self.scope.clone(),
            name: self.descriptor.name().clone(),
            description: self.descriptor.description().clone(),
            unit: self.descriptor.unit().clone(),
            data,
        })
    }

    /// The aggregation strategy this processor batches with.
    pub fn aggregation(&self) -> &A {
        &self.aggregation
    }

    /// Whether this processor generates "delta" style metrics. The
    /// alternative is "cumulative".
    pub fn generates_deltas(&self) -> bool {
        self.temporality == Temporality::Delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::aggregators::{self, AggregatorHandle};
    use crate::metrics::data::{AggregatedMetrics, MetricData};
    use crate::metrics::{InstrumentKind, MinMaxSumCountAccumulation, SumAccumulation};
    use crate::KeyValue;
    use rstest::rstest;

    fn sum_processor(
        temporality: Temporality,
    ) -> InstrumentProcessor<i64, aggregators::SumAggregation> {
        let descriptor = InstrumentDescriptor::new("requests", InstrumentKind::Counter)
            .with_description("number of requests")
            .with_unit("{request}");
        InstrumentProcessor::new(
            descriptor,
            aggregators::sum(),
            Resource::new([KeyValue::new("service.name", "api")]),
            InstrumentationScope::new("test-library").with_version("0.1.0"),
            temporality,
        )
        .expect("sum works for counters")
    }

    fn point_value(metric: &Metric, labels: &AttributeSet) -> Option<i64> {
        match &metric.data {
            AggregatedMetrics::I64(MetricData::Sum(sum_data)) => sum_data
                .data_points
                .iter()
                .find(|point| point.attributes == labels.to_vec())
                .map(|point| point.value),
            other => panic!("unexpected data shape: {other:?}"),
        }
    }

    #[test]
    fn empty_cycle_produces_no_record() {
        let mut processor = sum_processor(Temporality::Delta);
        assert!(processor.complete_collection_cycle().is_none());
        assert!(processor.complete_collection_cycle().is_none());
    }

    #[test]
    fn batch_merges_duplicate_label_sets() {
        let mut processor = sum_processor(Temporality::Delta);
        let labels = AttributeSet::from(&[KeyValue::new("route", "/")][..]);

        processor.batch(labels.clone(), SumAccumulation::new(3));
        processor.batch(labels.clone(), SumAccumulation::new(4));

        let metric = processor.complete_collection_cycle().expect("one record");
        assert_eq!(point_value(&metric, &labels), Some(7));
    }

    #[test]
    fn metadata_is_passed_through() {
        let mut processor = sum_processor(Temporality::Cumulative);
        let labels = AttributeSet::from(&[][..]);
        processor.batch(labels, SumAccumulation::new(1));

        let metric = processor.complete_collection_cycle().expect("one record");
        assert_eq!(metric.name, "requests");
        assert_eq!(metric.description, "number of requests");
        assert_eq!(metric.unit, "{request}");
        assert_eq!(metric.scope.name(), "test-library");
        assert_eq!(
            metric.resource,
            Resource::new([KeyValue::new("service.name", "api")])
        );
    }

    #[rstest]
    #[case::delta(Temporality::Delta, None)]
    #[case::cumulative(Temporality::Cumulative, Some(5))]
    fn quiescent_label_sets_follow_temporality(
        #[case] temporality: Temporality,
        #[case] expected_in_cycle_two: Option<i64>,
    ) {
        let mut processor = sum_processor(temporality);
        let quiet = AttributeSet::from(&[KeyValue::new("route", "/quiet")][..]);
        let busy = AttributeSet::from(&[KeyValue::new("route", "/busy")][..]);

        // Cycle 1: both label sets report.
        processor.batch(quiet.clone(), SumAccumulation::new(5));
        processor.batch(busy.clone(), SumAccumulation::new(1));
        let metric = processor.complete_collection_cycle().expect("one record");
        assert_eq!(point_value(&metric, &quiet), Some(5));

        // Cycle 2: only the busy label set reports.
        processor.batch(busy.clone(), SumAccumulation::new(2));
        let metric = processor.complete_collection_cycle().expect("one record");
        assert_eq!(point_value(&metric, &quiet), expected_in_cycle_two);
        let expected_busy = match temporality {
            Temporality::Delta => 2,
            _ => 3,
        };
        assert_eq!(point_value(&metric, &busy), Some(expected_busy));
    }

    #[test]
    fn delta_advances_the_interval_start() {
        let mut processor = sum_processor(Temporality::Delta);
        let labels = AttributeSet::from(&[][..]);

        processor.batch(labels.clone(), SumAccumulation::new(1));
        let first = processor.complete_collection_cycle().expect("one record");
        processor.batch(labels.clone(), SumAccumulation::new(1));
        let second = processor.complete_collection_cycle().expect("one record");

        let bounds = |metric: &Metric| match &metric.data {
            AggregatedMetrics::I64(MetricData::Sum(sum_data)) => {
                (sum_data.start_time, sum_data.time)
            }
            other => panic!("unexpected data shape: {other:?}"),
        };
        let (first_start, first_end) = bounds(&first);
        let (second_start, second_end) = bounds(&second);
        assert!(first_start <= first_end);
        assert_eq!(second_start, first_end);
        assert!(second_start <= second_end);
    }

    #[test]
    fn cumulative_keeps_the_interval_start() {
        let mut processor = sum_processor(Temporality::Cumulative);
        let labels = AttributeSet::from(&[][..]);

        processor.batch(labels.clone(), SumAccumulation::new(1));
        let first = processor.complete_collection_cycle().expect("one record");
        let second = processor.complete_collection_cycle().expect("one record");

        let start = |metric: &Metric| match &metric.data {
            AggregatedMetrics::I64(MetricData::Sum(sum_data)) => sum_data.start_time,
            other => panic!("unexpected data shape: {other:?}"),
        };
        assert_eq!(start(&first), start(&second));
    }

    #[test]
    fn incompatible_aggregation_is_rejected_at_construction() {
        let descriptor = InstrumentDescriptor::new("requests", InstrumentKind::Counter);
        let result: MetricResult<InstrumentProcessor<i64, _>> = InstrumentProcessor::delta(
            descriptor,
            aggregators::last_value(),
            Resource::empty(),
            InstrumentationScope::new("test-library"),
        );
        assert!(matches!(result, Err(MetricError::Config(_))));
    }

    #[test]
    fn handle_to_metric_round_trip() {
        let aggregation = aggregators::min_max_sum_count();
        let descriptor = InstrumentDescriptor::new("latency", InstrumentKind::Histogram);
        let mut processor = InstrumentProcessor::delta(
            descriptor,
            aggregation,
            Resource::empty(),
            InstrumentationScope::new("test-library"),
        )
        .expect("min-max-sum-count works for histograms");

        let handle = aggregation.create_handle();
        let labels = AttributeSet::from(&[KeyValue::new("route", "/")][..]);

        handle.record(100.0);
        processor.batch(labels.clone(), handle.accumulate_then_reset().unwrap());
        let metric = processor.complete_collection_cycle().expect("one record");
        match &metric.data {
            AggregatedMetrics::F64(MetricData::MinMaxSumCount(mmsc)) => {
                let point = &mmsc.data_points[0];
                assert_eq!(
                    (point.count, point.sum, point.min, point.max),
                    (1, 100.0, 100.0, 100.0)
                );
            }
            other => panic!("unexpected data shape: {other:?}"),
        }

        handle.record(-75.0);
        processor.batch(labels.clone(), handle.accumulate_then_reset().unwrap());
        let metric = processor.complete_collection_cycle().expect("one record");
        match &metric.data {
            AggregatedMetrics::F64(MetricData::MinMaxSumCount(mmsc)) => {
                let point = &mmsc.data_points[0];
                assert_eq!(
                    (point.count, point.sum, point.min, point.max),
                    (1, -75.0, -75.0, -75.0)
                );
            }
            other => panic!("unexpected data shape: {other:?}"),
        }

        assert_eq!(handle.accumulate_then_reset(), None);
        assert!(processor.complete_collection_cycle().is_none());
    }

    #[test]
    fn batching_order_does_not_change_the_summary() {
        let aggregation = aggregators::min_max_sum_count();
        let descriptor = InstrumentDescriptor::new("latency", InstrumentKind::Histogram);
        let labels = AttributeSet::from(&[][..]);
        let accumulations = [
            MinMaxSumCountAccumulation::new(1, 4.0, 4.0, 4.0),
            MinMaxSumCountAccumulation::new(2, 9.0, 2.0, 7.0),
            MinMaxSumCountAccumulation::new(1, -1.0, -1.0, -1.0),
        ];

        let summarize = |order: &[usize]| {
            let mut processor = InstrumentProcessor::delta(
                descriptor.clone(),
                aggregation,
                Resource::empty(),
                InstrumentationScope::new("test-library"),
            )
            .unwrap();
            for &i in order {
                processor.batch(labels.clone(), accumulations[i]);
            }
            match processor.complete_collection_cycle().unwrap().data {
                AggregatedMetrics::F64(MetricData::MinMaxSumCount(mmsc)) => {
                    let point = &mmsc.data_points[0];
                    (point.count, point.sum, point.min, point.max)
                }
                other => panic!("unexpected data shape: {other:?}"),
            }
        };

        let expected = (4, 12.0, -1.0, 7.0);
        assert_eq!(summarize(&[0, 1, 2]), expected);
        assert_eq!(summarize(&[2, 0, 1]), expected);
        assert_eq!(summarize(&[1, 2, 0]), expected);
    }
}
