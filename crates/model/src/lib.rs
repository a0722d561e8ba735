pub mod env;
pub mod record;

pub use record::{Record, RecordError};

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Partition key attribute shared by every record in the table.
pub const ID: &str = "id";
