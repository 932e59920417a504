//! I/O utilities for docqa-rs.
//!
//! Size-checked file reading for uploaded media and writing of extracted
//! text side files.

pub mod reader;

pub use reader::{DEFAULT_MAX_FILE_SIZE, FileReader, IoResult, read_bytes, write_file};
