//! Local record loading for Planear.
//!
//! Desired records live in a directory tree of `.csv` files. Each file has a
//! header row naming the columns; rows are decoded into the record type by
//! column name through serde.

mod csv_file;
mod directory;
mod error;

pub use csv_file::{decode_csv_file, read_csv_rows};
pub use directory::load_csv_directory;
pub use error::{InputError, InputResult};
