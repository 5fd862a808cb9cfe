//! Persisted session documents for voltaic networks.
//!
//! A session is a JSON document holding the environment and a flat list of
//! component records. [`get_data`] writes one from a network and
//! [`load`] rebuilds a network from one.

pub mod error;
pub mod format;
mod load;
mod save;

pub use error::{Error, Result};
pub use format::{ComponentRecord, ConnectionRecord, Session};
pub use load::{from_str, load, read_file, to_string, write_file};
pub use save::get_data;
