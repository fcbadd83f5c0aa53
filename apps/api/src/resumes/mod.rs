// Generated resumes: a profile snapshot stored together with the job it was
// generated for and its match score.

pub mod handlers;
pub mod repository;

pub use repository::{PgResumeRepository, ResumeRepository};
