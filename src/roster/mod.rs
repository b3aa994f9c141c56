//! 名册读侧

pub mod aggregate;
pub mod directory;

pub use aggregate::{course_detail, section_detail, visible};
pub use directory::{Directory, existing_keys};
