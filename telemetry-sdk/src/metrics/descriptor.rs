use std::borrow::Cow;

/// Kinds of metric instruments measurements are recorded against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum InstrumentKind {
    /// A synchronous per-request part of a monotonic sum.
    Counter,
    /// A synchronous per-request part of a non-monotonic sum.
    UpDownCounter,
    /// A synchronous recorder of a distribution of values.
    Histogram,
    /// An asynchronous per-interval recorder of a monotonic sum.
    CounterObserver,
    /// An asynchronous per-interval recorder of a non-monotonic sum.
    UpDownCounterObserver,
    /// An asynchronous per-interval recorder of the current value.
    GaugeObserver,
}

impl InstrumentKind {
    /// Whether this is a synchronous kind of instrument.
    pub fn synchronous(&self) -> bool {
        matches!(
            self,
            InstrumentKind::Counter | InstrumentKind::UpDownCounter | InstrumentKind::Histogram
        )
    }

    /// Whether this is an asynchronous kind of instrument.
    pub fn asynchronous(&self) -> bool {
        !self.synchronous()
    }

    /// Whether this kind of instrument exposes a non-decreasing sum.
    pub fn monotonic(&self) -> bool {
        matches!(
            self,
            InstrumentKind::Counter | InstrumentKind::CounterObserver
        )
    }
}

/// Describes an instrument, including its name, kind and the configurable
/// options.
///
/// The descriptor is supplied by the instrument registry at processor
/// construction and carried unmodified into every summary record.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstrumentDescriptor {
    name: Cow<'static, str>,
    instrument_kind: InstrumentKind,
    description: Cow<'static, str>,
    unit: Cow<'static, str>,
}

impl InstrumentDescriptor {
    /// Create a new descriptor with an empty description and unit.
    pub fn new(name: impl Into<Cow<'static, str>>, instrument_kind: InstrumentKind) -> Self {
        InstrumentDescriptor {
            name: name.into(),
            instrument_kind,
            description: Cow::Borrowed(""),
            unit: Cow::Borrowed(""),
        }
    }

    /// Sets the human-readable description of the instrument.
    pub fn with_description(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the unit the instrument reports in.
    pub fn with_unit(mut self, unit: impl Into<Cow<'static, str>>) -> Self {
        self.unit = unit.into();
        self
    }

    /// The instrument's name.
    pub fn name(&self) -> &Cow<'static, str> {
        &self.name
    }

    /// The specific kind of instrument.
    pub fn instrument_kind(&self) -> InstrumentKind {
        self.instrument_kind
    }

    /// A human-readable description of the instrument.
    pub fn description(&self) -> &Cow<'static, str> {
        &self.description
    }

    /// The unit the instrument reports in.
    pub fn unit(&self) -> &Cow<'static, str> {
        &self.unit
    }
}
