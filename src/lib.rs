//! Guestbook web service
//!
//! Serves a handful of fixed pages, stores submitted forms in a JSON file
//! keyed by submission time, and renders the stored messages as HTML.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod render;
pub mod server;
pub mod store;
