//! Conversion of a raw streaming response body into [`StreamChunk`]s.
//!
//! Bytes arrive in arbitrary chunks; [`LineSplitter`] reassembles them into
//! complete lines and [`FrameParser`] turns each `data:` line into a chunk.
//!
//! [`StreamChunk`]: gatechat_types::protocol::StreamChunk

pub mod frame;
pub mod lines;

pub use frame::{FrameParser, parse_lines};
pub use lines::LineSplitter;
