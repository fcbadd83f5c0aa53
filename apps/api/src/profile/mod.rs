// Profile Store: one session's resume content, its edits and its persistence.

pub mod autosave;
pub mod handlers;
pub mod model;
pub mod repository;
pub mod store;
