//! In-memory adapters for tests and embedding.

pub mod filesystem;

pub use filesystem::MemoryFileSystem;
