use super::{Priority, RuleScore};
use crate::dss::claims::domain::{Claim, ClaimStatus};

const BASE_SCORE: f64 = 50.0;

/// Deterministic additive scoring with a signed rationale entry per applied
/// rule. Adjustments run in a fixed order so the trail reads the same for
/// identical claims; the trail is never empty because the documents rule
/// always contributes.
pub fn score_claim(claim: &Claim) -> RuleScore {
    let mut total = BASE_SCORE;
    let mut explanation = Vec::new();

    if claim.docs_complete {
        total += 15.0;
        explanation.push("+15 complete documents".to_string());
    } else {
        total -= 10.0;
        explanation.push("-10 missing documents".to_string());
    }

    if claim.is_duplicate {
        total -= 25.0;
        explanation.push("-25 potential duplicate".to_string());
    }

    if claim.area_ha <= 2.0 {
        total += 10.0;
        explanation.push("+10 small area <=2ha".to_string());
    } else if claim.area_ha >= 10.0 {
        total -= 5.0;
        explanation.push("-5 large area >=10ha".to_string());
    }

    if claim.is_in_critical_wildlife_zone {
        total -= 15.0;
        explanation.push("-15 critical wildlife zone".to_string());
    }

    if claim.community_support {
        total += 10.0;
        explanation.push("+10 community support".to_string());
    }

    match claim.status {
        ClaimStatus::Approved => {
            total -= 40.0;
            explanation.push("-40 already approved".to_string());
        }
        ClaimStatus::Rejected => {
            total -= 30.0;
            explanation.push("-30 already rejected".to_string());
        }
        ClaimStatus::Pending => {}
    }

    let score = total.clamp(0.0, 100.0).round() as u8;

    RuleScore {
        score,
        priority: Priority::from_score(score),
        explanation,
    }
}
