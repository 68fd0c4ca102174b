pub mod definition;
pub mod error;
pub mod instance;

pub use definition::{FieldDefinition, FieldRule, FileDefinition, FileFormat, FileType};
pub use error::{DefinitionError, Result};
pub use instance::{FieldValue, FileInstance, FileRow};
