//! Typed metric instruments.
//!
//! Each instrument owns a name, a help string, a fixed ordered list of label
//! names, and a mapping from label-value tuples to accumulated state. Label
//! names are immutable after construction; every update supplies one label
//! value per declared name, and each distinct value tuple is its own time
//! series.
//!
//! # Concurrency
//!
//! Instruments are shared across request handlers. Every mutating operation
//! takes the instrument's series mutex, so concurrent updates to the same
//! label tuple never lose increments. Reads for exposition take the same
//! lock and see a point-in-time view of that instrument.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Errors produced by the instrumentation layer.
///
/// `DuplicateMetricName` is fatal at startup; the remaining kinds are
/// downgraded to log entries at recorder call sites so instrumentation can
/// never fail a business operation.
#[derive(Debug, Error)]
pub enum MetricError {
    #[error("metric '{0}' is already registered")]
    DuplicateMetricName(String),

    #[error("metric '{metric}' expects {expected} label value(s), got {got}")]
    InvalidLabelArity {
        metric: String,
        expected: usize,
        got: usize,
    },

    #[error("metric '{metric}' rejected negative increment {amount}")]
    NegativeIncrement { metric: String, amount: f64 },

    #[error("failed to serialize metrics snapshot: {0}")]
    SnapshotSerializationFailure(String),
}

/// The accumulation semantics of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    /// The `# TYPE` keyword for this kind in the text exposition format.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

/// Shared identity of an instrument: name, help text, and label schema.
#[derive(Debug, Clone)]
pub struct MetricDesc {
    name: String,
    help: String,
    label_names: &'static [&'static str],
}

impl MetricDesc {
    fn new(name: &str, help: &str, label_names: &'static [&'static str]) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            label_names,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn label_names(&self) -> &'static [&'static str] {
        self.label_names
    }

    /// Every update must supply exactly one value per declared label name.
    fn check_arity(&self, label_values: &[&str]) -> Result<(), MetricError> {
        if label_values.len() != self.label_names.len() {
            return Err(MetricError::InvalidLabelArity {
                metric: self.name.clone(),
                expected: self.label_names.len(),
                got: label_values.len(),
            });
        }
        Ok(())
    }

    fn key(&self, label_values: &[&str]) -> Vec<String> {
        label_values.iter().map(|v| (*v).to_string()).collect()
    }

    /// Writes `name` or `name{l1="v1",l2="v2"}`, with an optional extra
    /// trailing pair (used for histogram `le` labels).
    fn write_series_name(
        &self,
        buf: &mut String,
        suffix: &str,
        label_values: &[String],
        extra: Option<(&str, &str)>,
    ) -> fmt::Result {
        write!(buf, "{}{}", self.name, suffix)?;
        if self.label_names.is_empty() && extra.is_none() {
            return Ok(());
        }
        buf.push('{');
        let mut first = true;
        for (name, value) in self.label_names.iter().zip(label_values.iter()) {
            if !first {
                buf.push(',');
            }
            first = false;
            write!(buf, "{}=\"{}\"", name, escape_label_value(value))?;
        }
        if let Some((name, value)) = extra {
            if !first {
                buf.push(',');
            }
            write!(buf, "{}=\"{}\"", name, value)?;
        }
        buf.push('}');
        Ok(())
    }
}

/// Escape a label value for the text exposition format: backslash, double
/// quote, and newline must not appear raw inside the quoted value.
pub(crate) fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A registrable instrument, as seen by the registry.
///
/// `render_series` appends this instrument's sample lines (everything below
/// the `# HELP`/`# TYPE` header) to the snapshot buffer.
pub trait Instrument: Send + Sync {
    fn desc(&self) -> &MetricDesc;

    fn kind(&self) -> MetricKind;

    fn render_series(&self, buf: &mut String) -> fmt::Result;
}

/// A monotonically non-decreasing accumulator.
///
/// Each label tuple starts at zero on first use and only ever grows; there
/// is no reset operation for the lifetime of the process.
pub struct Counter {
    desc: MetricDesc,
    series: Mutex<BTreeMap<Vec<String>, f64>>,
}

impl Counter {
    pub fn new(name: &str, help: &str, label_names: &'static [&'static str]) -> Self {
        Self {
            desc: MetricDesc::new(name, help, label_names),
            series: Mutex::new(BTreeMap::new()),
        }
    }

    /// Add 1 to the series identified by `label_values`.
    pub fn increment(&self, label_values: &[&str]) -> Result<(), MetricError> {
        self.increment_by(label_values, 1.0)
    }

    /// Add `amount` to the series identified by `label_values`.
    ///
    /// # Errors
    ///
    /// `NegativeIncrement` if `amount < 0`; `InvalidLabelArity` if the
    /// value count does not match the declared label names.
    pub fn increment_by(&self, label_values: &[&str], amount: f64) -> Result<(), MetricError> {
        self.desc.check_arity(label_values)?;
        if amount < 0.0 {
            return Err(MetricError::NegativeIncrement {
                metric: self.desc.name.clone(),
                amount,
            });
        }
        let mut series = self.lock_series();
        *series.entry(self.desc.key(label_values)).or_insert(0.0) += amount;
        Ok(())
    }

    /// Current value for a label tuple, if that series exists.
    pub fn value(&self, label_values: &[&str]) -> Option<f64> {
        let key = self.desc.key(label_values);
        self.lock_series().get(&key).copied()
    }

    fn lock_series(&self) -> MutexGuard<'_, BTreeMap<Vec<String>, f64>> {
        // A thread that panicked mid-update cannot leave the map in a
        // torn state (single-assignment updates), so poison is recoverable.
        self.series.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Instrument for Counter {
    fn desc(&self) -> &MetricDesc {
        &self.desc
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Counter
    }

    fn render_series(&self, buf: &mut String) -> fmt::Result {
        for (labels, value) in self.lock_series().iter() {
            self.desc.write_series_name(buf, "", labels, None)?;
            writeln!(buf, " {}", value)?;
        }
        Ok(())
    }
}

/// A point-in-time value that can move in either direction.
pub struct Gauge {
    desc: MetricDesc,
    series: Mutex<BTreeMap<Vec<String>, f64>>,
}

impl Gauge {
    pub fn new(name: &str, help: &str, label_names: &'static [&'static str]) -> Self {
        Self {
            desc: MetricDesc::new(name, help, label_names),
            series: Mutex::new(BTreeMap::new()),
        }
    }

    /// Overwrite the stored value for the series identified by
    /// `label_values`.
    pub fn set(&self, label_values: &[&str], value: f64) -> Result<(), MetricError> {
        self.desc.check_arity(label_values)?;
        self.lock_series().insert(self.desc.key(label_values), value);
        Ok(())
    }

    /// Current value for a label tuple, if that series exists.
    pub fn value(&self, label_values: &[&str]) -> Option<f64> {
        let key = self.desc.key(label_values);
        self.lock_series().get(&key).copied()
    }

    fn lock_series(&self) -> MutexGuard<'_, BTreeMap<Vec<String>, f64>> {
        self.series.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Instrument for Gauge {
    fn desc(&self) -> &MetricDesc {
        &self.desc
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Gauge
    }

    fn render_series(&self, buf: &mut String) -> fmt::Result {
        for (labels, value) in self.lock_series().iter() {
            self.desc.write_series_name(buf, "", labels, None)?;
            writeln!(buf, " {}", value)?;
        }
        Ok(())
    }
}

/// Accumulated state for one histogram time series.
#[derive(Debug, Clone)]
struct HistogramSeries {
    /// Cumulative count per bucket upper bound (same order as `buckets`).
    bucket_counts: Vec<u64>,
    sum: f64,
    count: u64,
}

impl HistogramSeries {
    fn new(bucket_len: usize) -> Self {
        Self {
            bucket_counts: vec![0; bucket_len],
            sum: 0.0,
            count: 0,
        }
    }
}

/// A distribution accumulator over fixed, ascending bucket upper bounds.
///
/// Buckets are cumulative: an observation increments every bucket whose
/// upper bound is `>=` the observed value, plus the running sum and total
/// count. Bounds are fixed at construction; there is no re-bucketing.
pub struct Histogram {
    desc: MetricDesc,
    buckets: Vec<f64>,
    series: Mutex<BTreeMap<Vec<String>, HistogramSeries>>,
}

impl Histogram {
    pub fn new(
        name: &str,
        help: &str,
        label_names: &'static [&'static str],
        buckets: &[f64],
    ) -> Self {
        let mut buckets: Vec<f64> = buckets.iter().copied().filter(|b| b.is_finite()).collect();
        buckets.sort_by(f64::total_cmp);
        buckets.dedup();
        Self {
            desc: MetricDesc::new(name, help, label_names),
            buckets,
            series: Mutex::new(BTreeMap::new()),
        }
    }

    /// Record one observation for the series identified by `label_values`.
    pub fn observe(&self, label_values: &[&str], value: f64) -> Result<(), MetricError> {
        self.desc.check_arity(label_values)?;
        let mut series = self.lock_series();
        let entry = series
            .entry(self.desc.key(label_values))
            .or_insert_with(|| HistogramSeries::new(self.buckets.len()));
        for (bound, slot) in self.buckets.iter().zip(entry.bucket_counts.iter_mut()) {
            if value <= *bound {
                *slot += 1;
            }
        }
        entry.sum += value;
        entry.count += 1;
        Ok(())
    }

    /// Bucket upper bounds, ascending.
    pub fn bucket_bounds(&self) -> &[f64] {
        &self.buckets
    }

    /// `(cumulative bucket counts, sum, count)` for a label tuple, if that
    /// series exists.
    pub fn sample(&self, label_values: &[&str]) -> Option<(Vec<u64>, f64, u64)> {
        let key = self.desc.key(label_values);
        self.lock_series()
            .get(&key)
            .map(|s| (s.bucket_counts.clone(), s.sum, s.count))
    }

    fn lock_series(&self) -> MutexGuard<'_, BTreeMap<Vec<String>, HistogramSeries>> {
        self.series.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Instrument for Histogram {
    fn desc(&self) -> &MetricDesc {
        &self.desc
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Histogram
    }

    fn render_series(&self, buf: &mut String) -> fmt::Result {
        for (labels, series) in self.lock_series().iter() {
            for (bound, count) in self.buckets.iter().zip(series.bucket_counts.iter()) {
                let le = format!("{}", bound);
                self.desc
                    .write_series_name(buf, "_bucket", labels, Some(("le", &le)))?;
                writeln!(buf, " {}", count)?;
            }
            self.desc
                .write_series_name(buf, "_bucket", labels, Some(("le", "+Inf")))?;
            writeln!(buf, " {}", series.count)?;

            self.desc.write_series_name(buf, "_sum", labels, None)?;
            writeln!(buf, " {}", series.sum)?;

            self.desc.write_series_name(buf, "_count", labels, None)?;
            writeln!(buf, " {}", series.count)?;
        }
        Ok(())
    }
}
