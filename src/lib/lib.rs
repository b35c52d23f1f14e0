#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Mail transport that delivers host application emails through the Lettermint API

pub mod domain;
pub mod infrastructure;
