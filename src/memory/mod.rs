//! Memory engine: pointer-chain resolution and pattern scanning

pub mod resolver;
pub mod scanner;

pub use resolver::{read_value, resolve, POINTER_WIDTH};
pub use scanner::{scan, DEFAULT_CHUNK_SIZE};
