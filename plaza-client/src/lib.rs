//! Plaza profile client
//!
//! Library surfaces behind the `plaza` binary: the HTTP client and service
//! adapters in [`infra`], and the profile editing domains (form state,
//! enhanced sections, visibility, status, and the debounced username
//! availability checker) in [`domains`].

pub mod app;
pub mod domains;
pub mod infra;
