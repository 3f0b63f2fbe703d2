//! Utilities shared by the Tsudoi binaries: clocks, timestamps and logging.

pub mod logger;
pub mod time;
