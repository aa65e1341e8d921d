//! Integration tests grouped by feature.

mod anonymous_epic;
mod documents;
mod errors;
mod job_epic;
mod permissions;
mod resources;
