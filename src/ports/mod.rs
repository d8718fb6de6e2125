//! Port traits defining external boundaries.
//!
//! The pipeline touches exactly one external system, the filesystem.
//! Implementations live in `src/adapters/`.

pub mod filesystem;

pub use filesystem::FileSystem;
