// X-Bows custom layer driver - shared library
// Config loading and packet dump files on top of the program builders

pub mod config;
pub mod dump;

pub use config::{ConfigError, ProgramConfig};
pub use dump::{read_dump, write_dump, DumpError};
