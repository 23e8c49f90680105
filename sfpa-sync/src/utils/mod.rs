//! Utility modules for sfpa-sync

pub mod batch;

pub use batch::batch;
