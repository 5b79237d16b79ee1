use crate::dss::claims::domain::Claim;

/// Width of the classifier feature vector.
pub const FEATURE_COUNT: usize = 5;

/// Encode a claim into the fixed feature order the classifier was trained on:
/// `[docs_complete, is_duplicate, area_ha, is_in_critical_wildlife_zone,
/// community_support]`. The order is part of the artifact contract.
pub fn encode(claim: &Claim) -> [f64; FEATURE_COUNT] {
    [
        flag(claim.docs_complete),
        flag(claim.is_duplicate),
        claim.area_ha.max(0.0),
        flag(claim.is_in_critical_wildlife_zone),
        flag(claim.community_support),
    ]
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
