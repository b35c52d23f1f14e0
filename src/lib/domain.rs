//! Domain types and the traits at the host/provider seams

pub mod config;
pub mod mail;
