//! Adapter implementations of the port traits.
//!
//! - `live`: real disk I/O.
//! - `memory`: in-memory trees for tests and embedding.
//! - `recording`: wraps another adapter and captures every call to a cassette.
//! - `replaying`: serves calls from a previously recorded cassette.

pub mod live;
pub mod memory;
pub mod recording;
pub mod replaying;
