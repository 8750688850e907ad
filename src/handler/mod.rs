//! Request handler module
//!
//! Responsible for request routing dispatch and the behavior behind each
//! route: fixed pages, assets, the message listing and form submissions.

pub mod listing;
pub mod router;
pub mod static_files;
pub mod submit;

// Re-export main entry point
pub use router::{handle_request, Route};
