//! Domain logic for the workshop backend: error kinds, block gating,
//! allocation normalization, typed step payloads, and the classification
//! capability. No I/O lives here.

pub mod allocation;
pub mod blocks;
pub mod classify;
pub mod error;
pub mod roles;
pub mod steps;
pub mod types;
