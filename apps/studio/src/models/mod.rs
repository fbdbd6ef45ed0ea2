pub mod options;
pub mod resume;
