//! Prelude module for common imports
//!
//! Consolidates the alloy primitive types the rest of the crate and its
//! callers handle constantly, so call sites need a single import.

pub use alloy::primitives::{
    aliases::{U160, U24},
    Address, B256, I256, U256,
};

pub use crate::core::{FlowError, FlowResult};
