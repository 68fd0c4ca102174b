pub mod batch;
pub mod delimited;
pub mod error;
pub mod extractor;
pub mod fixed;
pub mod xml;

pub use batch::find_and_rip_files;
pub use error::{ExtractError, Result};
pub use extractor::{extract_records, rip_file, rip_files};
