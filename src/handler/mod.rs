//! Request handler module
//!
//! Routing dispatch and the URL-shortener endpoints: form submission,
//! redirect following, link details, and static assets.

pub mod forms;
pub mod pages;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
