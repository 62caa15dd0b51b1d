//! Top-level facade crate for Rheumera.
//!
//! Re-exports the data model and the dispatch engine so users can depend on a single crate.

pub mod core {
    pub use rheumera_core::*;
}

pub mod engine {
    pub use rheumera_engine::*;
}
