//! Structured warning channel for geometric anomalies.
//!
//! Interpolation weights outside `[0,1]` mean the donor assignment is not a
//! convex combination. Assembly proceeds anyway; the anomaly is reported as a
//! typed event so callers can escalate, count, or ignore it. The default sink
//! forwards to the `log` facade.

use std::fmt;

/// How bad an event is. Nothing in this channel is fatal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
}

/// Which interpolation list an event refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ListKind {
    /// Generic unstructured donor list.
    Generic,
    /// Cartesian-background donor list.
    Cartesian,
}

/// A reportable anomaly observed during list building or packing.
#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticEvent {
    /// A gather touched a weight outside `[0,1]`.
    NonConvexWeight {
        list: ListKind,
        record: usize,
        weight: f64,
    },
}

impl DiagnosticEvent {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticEvent::NonConvexWeight { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticEvent::NonConvexWeight {
                list,
                record,
                weight,
            } => write!(
                f,
                "non-convex interpolation weight {weight} in {list:?} record {record}"
            ),
        }
    }
}

/// Receiver for diagnostic events.
pub trait DiagnosticSink {
    fn report(&mut self, event: DiagnosticEvent);
}

/// Default sink: forwards events to the `log` facade.
#[derive(Clone, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, event: DiagnosticEvent) {
        match event.severity() {
            Severity::Warning => log::warn!("{event}"),
            Severity::Info => log::info!("{event}"),
        }
    }
}

/// Collecting sink for tests and callers that want to inspect events.
#[derive(Clone, Debug, Default)]
pub struct CollectSink {
    pub events: Vec<DiagnosticEvent>,
}

impl DiagnosticSink for CollectSink {
    fn report(&mut self, event: DiagnosticEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_sink_keeps_order() {
        let mut sink = CollectSink::default();
        for (i, w) in [(0usize, -0.25), (3usize, 1.5)] {
            sink.report(DiagnosticEvent::NonConvexWeight {
                list: ListKind::Cartesian,
                record: i,
                weight: w,
            });
        }
        assert_eq!(sink.events.len(), 2);
        assert!(matches!(
            sink.events[0],
            DiagnosticEvent::NonConvexWeight { record: 0, .. }
        ));
        assert_eq!(sink.events[1].severity(), Severity::Warning);
    }
}
