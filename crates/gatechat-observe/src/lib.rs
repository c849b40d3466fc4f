//! Observability setup for gatechat: the tracing subscriber and the GenAI
//! semantic-convention names used on gateway spans.

pub mod genai_attrs;
pub mod tracing_setup;
