//! Knowledge base ingestion

mod csv_loader;

pub use csv_loader::{load_csv, parse_csv};
