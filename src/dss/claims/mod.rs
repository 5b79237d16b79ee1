pub mod dataset;
pub mod domain;

pub use dataset::{generate_claims, ClaimAggregates, LandUseInsight};
pub use domain::{Claim, ClaimStatus, LandUseKind};
