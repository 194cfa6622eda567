//! Metric registry and text exposition snapshot.
//!
//! The registry owns every instrument the process exposes. It is created
//! once in `main`, populated before the server starts accepting traffic,
//! and shared as `Arc<MetricRegistry>` for the lifetime of the process.
//! No instrument is ever removed.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::observability::instrument::{Instrument, MetricError};

/// Content type of the text exposition format served at `/metrics`.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

#[derive(Default)]
struct RegistryInner {
    /// Instruments in registration order. Snapshot output follows this
    /// order, which keeps it deterministic for snapshot-equality tests.
    instruments: Vec<Arc<dyn Instrument>>,
    names: HashSet<String>,
}

/// Owns the set of registered instruments and serializes snapshots.
#[derive(Default)]
pub struct MetricRegistry {
    inner: Mutex<RegistryInner>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instrument under its unique name.
    ///
    /// # Errors
    ///
    /// `DuplicateMetricName` if an instrument with the same name is already
    /// registered; the registry is left unchanged.
    pub fn register(&self, instrument: Arc<dyn Instrument>) -> Result<(), MetricError> {
        let name = instrument.desc().name().to_string();
        let mut inner = self.lock_inner();
        if inner.names.contains(&name) {
            return Err(MetricError::DuplicateMetricName(name));
        }
        inner.names.insert(name);
        inner.instruments.push(instrument);
        Ok(())
    }

    /// Serialize every registered instrument into the text exposition
    /// format.
    ///
    /// For each instrument, in registration order: a `# HELP` line, a
    /// `# TYPE` line, then one line per live time series. Output for
    /// identical internal state is byte-identical.
    ///
    /// # Errors
    ///
    /// `SnapshotSerializationFailure` if rendering fails.
    pub fn snapshot(&self) -> Result<String, MetricError> {
        let instruments: Vec<Arc<dyn Instrument>> = self.lock_inner().instruments.clone();

        let mut buf = String::new();
        for instrument in &instruments {
            let desc = instrument.desc();
            writeln!(buf, "# HELP {} {}", desc.name(), escape_help(desc.help()))
                .map_err(|e| MetricError::SnapshotSerializationFailure(e.to_string()))?;
            writeln!(buf, "# TYPE {} {}", desc.name(), instrument.kind().as_str())
                .map_err(|e| MetricError::SnapshotSerializationFailure(e.to_string()))?;
            instrument
                .render_series(&mut buf)
                .map_err(|e| MetricError::SnapshotSerializationFailure(e.to_string()))?;
        }
        Ok(buf)
    }

    fn lock_inner(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Escape a help string for the exposition format (backslash and newline).
fn escape_help(help: &str) -> String {
    let mut escaped = String::with_capacity(help.len());
    for c in help.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
