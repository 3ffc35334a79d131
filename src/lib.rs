//! Warden - static file server with redirects
//!
//! Core library: HTTP/1.1 parsing, path policy and response framing.

pub mod config;
pub mod http;
pub mod server;
pub mod site;
