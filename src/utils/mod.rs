pub mod extractor;
pub mod parameter_error_handler;
pub mod upload;
pub mod validate;

pub use extractor::{SafeEntityId, SafeImportTarget, SafeRowIndex, SafeSectionId, SafeSessionId};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
