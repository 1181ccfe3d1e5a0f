//! Observability setup for Luma: tracing subscriber and optional
//! OpenTelemetry export.

pub mod tracing_setup;
