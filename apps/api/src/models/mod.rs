pub mod profile;
pub mod resume;
