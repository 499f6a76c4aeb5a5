//! Types for delivery of pre-aggregated metric time series data.

use std::borrow::Cow;
use std::time::SystemTime;

use crate::common::{InstrumentationScope, KeyValue};
use crate::metrics::Temporality;
use crate::Resource;

/// An aggregated time series summary from one instrument over one collection
/// interval.
///
/// This is the record handed to an exporter; everything besides `data` is
/// opaque pass-through metadata captured at processor construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    /// The entity that collected the metric.
    pub resource: Resource,
    /// The library that produced the measurements.
    pub scope: InstrumentationScope,
    /// The name of the instrument that created this data.
    pub name: Cow<'static, str>,
    /// The description of the instrument, which can be used in documentation.
    pub description: Cow<'static, str>,
    /// The unit in which the instrument reports.
    pub unit: Cow<'static, str>,
    /// The aggregated data from the instrument.
    pub data: AggregatedMetrics,
}

/// Aggregated metrics data from an instrument, tagged by value type.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregatedMetrics {
    /// All metric data with `f64` value type
    F64(MetricData<f64>),
    /// All metric data with `i64` value type
    I64(MetricData<i64>),
    /// All metric data with `u64` value type
    U64(MetricData<u64>),
}

/// Metric data for all aggregation kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricData<T> {
    /// Metric data for Gauge
    Gauge(Gauge<T>),
    /// Metric data for Sum
    Sum(Sum<T>),
    /// Metric data for MinMaxSumCount
    MinMaxSumCount(MinMaxSumCount<T>),
}

impl From<MetricData<f64>> for AggregatedMetrics {
    fn from(value: MetricData<f64>) -> Self {
        AggregatedMetrics::F64(value)
    }
}

impl From<MetricData<i64>> for AggregatedMetrics {
    fn from(value: MetricData<i64>) -> Self {
        AggregatedMetrics::I64(value)
    }
}

impl From<MetricData<u64>> for AggregatedMetrics {
    fn from(value: MetricData<u64>) -> Self {
        AggregatedMetrics::U64(value)
    }
}

impl<T> From<Gauge<T>> for MetricData<T> {
    fn from(value: Gauge<T>) -> Self {
        MetricData::Gauge(value)
    }
}

impl<T> From<Sum<T>> for MetricData<T> {
    fn from(value: Sum<T>) -> Self {
        MetricData::Sum(value)
    }
}

impl<T> From<MinMaxSumCount<T>> for MetricData<T> {
    fn from(value: MinMaxSumCount<T>) -> Self {
        MetricData::MinMaxSumCount(value)
    }
}

/// A measurement of the current value of an instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct Gauge<T> {
    /// Represents individual aggregated measurements with unique attributes.
    pub data_points: Vec<GaugeDataPoint<T>>,
    /// The time when the timeseries was started.
    pub start_time: Option<SystemTime>,
    /// The time when the timeseries was recorded.
    pub time: SystemTime,
}

/// A single data point in a gauge time series.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeDataPoint<T> {
    /// Attributes is the set of key value pairs that uniquely identify the
    /// time series.
    pub attributes: Vec<KeyValue>,
    /// The value of this data point.
    pub value: T,
    /// The instant the value was observed.
    pub time: SystemTime,
}

/// Represents the sum of all measurements of values from an instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct Sum<T> {
    /// Represents individual aggregated measurements with unique attributes.
    pub data_points: Vec<SumDataPoint<T>>,
    /// The time when the timeseries was started.
    pub start_time: SystemTime,
    /// The time when the timeseries was recorded.
    pub time: SystemTime,
    /// Describes if the aggregation is reported as the change from the last report
    /// time, or the cumulative changes since a fixed start time.
    pub temporality: Temporality,
    /// Whether this aggregation only increases or decreases.
    pub is_monotonic: bool,
}

/// A single data point in a sum time series.
#[derive(Debug, Clone, PartialEq)]
pub struct SumDataPoint<T> {
    /// Attributes is the set of key value pairs that uniquely identify the
    /// time series.
    pub attributes: Vec<KeyValue>,
    /// The value of this data point.
    pub value: T,
}

/// The count, sum and extrema of all measurements from an instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxSumCount<T> {
    /// Represents individual aggregated measurements with unique attributes.
    pub data_points: Vec<MinMaxSumCountDataPoint<T>>,
    /// The time when the timeseries was started.
    pub start_time: SystemTime,
    /// The time when the timeseries was recorded.
    pub time: SystemTime,
}

/// A single data point in a min-max-sum-count time series.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxSumCountDataPoint<T> {
    /// Attributes is the set of key value pairs that uniquely identify the
    /// time series.
    pub attributes: Vec<KeyValue>,
    /// The number of recorded measurements.
    pub count: u64,
    /// The arithmetic sum of the recorded measurements.
    pub sum: T,
    /// The smallest recorded measurement.
    pub min: T,
    /// The largest recorded measurement.
    pub max: T,
}
