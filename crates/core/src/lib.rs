//! Domain logic for the SeedSync API.
//!
//! Request types, advice prompt templates and response parsers, the yield
//! fallback heuristic, the scheme catalogue and the profile store. Nothing
//! here touches the network or model artifacts.

pub mod crop;
pub mod crop_yield;
pub mod disease;
pub mod error;
pub mod extraction;
pub mod fertilizer;
pub mod pest;
pub mod profile;
pub mod rotation;
pub mod schemes;
