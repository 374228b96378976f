//! Trace document parser.
//!
//! Parses raw JSON trace captures into structured events.
//! Handles both the object envelope (`{"traceEvents": [...]}`) and
//! the bare array form emitted by some capture tools.

use crate::utils::config::TRACE_EVENT_FIELD_NAMES;
use crate::utils::error::TraceError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// A single trace event
///
/// Only `name` and `args` are interpreted; everything else the
/// capture emits (timestamps, pids, categories) is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TraceEvent {
    /// Event name (e.g. "LayoutShift")
    pub name: String,

    /// Opaque event payload
    #[serde(default)]
    pub args: serde_json::Value,
}

impl TraceEvent {
    pub fn new(name: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// The `args.data` object, if present
    pub fn data(&self) -> Option<&serde_json::Value> {
        self.args.get("data").filter(|d| !d.is_null())
    }
}

/// A captured page-load trace
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    pub events: Vec<TraceEvent>,
}

impl Trace {
    pub fn new(events: Vec<TraceEvent>) -> Self {
        Self { events }
    }
}

/// Parse raw trace JSON
///
/// **Public** - main entry point for parsing
///
/// Events that fail to deserialize are skipped with a warning.
///
/// # Errors
/// * `TraceError::InvalidFormat` - Not an object/array, or every event was malformed
pub fn parse_trace(raw_trace: &serde_json::Value) -> Result<Trace, TraceError> {
    let raw_events = extract_event_array(raw_trace)?;
    let events = parse_events_array(raw_events)?;

    debug!("Parsed {} trace events", events.len());

    Ok(Trace { events })
}

/// Parse trace JSON text
pub fn parse_trace_str(text: &str) -> Result<Trace, TraceError> {
    let raw: serde_json::Value = serde_json::from_str(text)?;
    parse_trace(&raw)
}

/// Locate the event array inside the trace envelope
///
/// **Private** - internal helper for parse_trace
fn extract_event_array(raw_trace: &serde_json::Value) -> Result<&[serde_json::Value], TraceError> {
    match raw_trace {
        serde_json::Value::Array(events) => {
            debug!("Trace is bare array format");
            Ok(events)
        }

        serde_json::Value::Object(obj) => {
            for field in TRACE_EVENT_FIELD_NAMES {
                if let Some(events) = obj.get(*field).and_then(|v| v.as_array()) {
                    return Ok(events);
                }
            }

            // A trace object without events is valid, just empty
            warn!("No trace events found in trace object");
            Ok(&[])
        }

        _ => Err(TraceError::InvalidFormat(
            "Trace must be a JSON object or array".to_string(),
        )),
    }
}

/// Parse array of trace events
///
/// **Private** - internal parsing logic
fn parse_events_array(raw_events: &[serde_json::Value]) -> Result<Vec<TraceEvent>, TraceError> {
    let mut events = Vec::with_capacity(raw_events.len());

    for (index, raw) in raw_events.iter().enumerate() {
        match TraceEvent::deserialize(raw) {
            Ok(event) => events.push(event),
            Err(e) => {
                // Log but don't fail - some events may be malformed
                warn!("Failed to parse trace event {}: {}", index, e);
            }
        }
    }

    if events.is_empty() && !raw_events.is_empty() {
        return Err(TraceError::InvalidFormat(
            "All trace events failed to parse".to_string(),
        ));
    }

    Ok(events)
}
