//! Derive macros shared by the masked_input modules.

pub use derive_more::{Display, From};
