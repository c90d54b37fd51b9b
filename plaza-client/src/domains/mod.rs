//! Domain modules for the Plaza client

pub mod profile;
