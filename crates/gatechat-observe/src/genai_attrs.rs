//! OpenTelemetry GenAI Semantic Convention attribute names.
//!
//! Gateway spans are named `gen_ai.{operation}` and carry these fields.
//! `tracing` macros need field names as literal tokens, so the constants
//! document the names and supply the values that go into them.

/// The name of the operation being performed (e.g., "chat").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The model ID requested.
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

/// Whether the response was requested as a stream.
pub const GEN_AI_REQUEST_STREAM: &str = "gen_ai.request.stream";

// --- Operation name values ---

/// Chat completion, streamed or buffered.
pub const OP_CHAT: &str = "chat";
