//! Seeded synthetic claim dataset plus the dashboard summaries derived from it.
//!
//! The generator stands in for a registry integration that is not part of this
//! service; the fixed seed keeps demo environments and tests on the same data.

use std::collections::BTreeMap;

use chrono::{Duration, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::domain::{Claim, ClaimStatus, LandUseKind};

pub const DATASET_SEED: u64 = 12508;

const STATES: [&str; 4] = ["MH", "MP", "OD", "TR"];
const CLAIMANTS: [&str; 8] = [
    "Asha", "Ravi", "Sita", "Aman", "Pooja", "Rahul", "Meera", "Dev",
];

/// Generate `count` synthetic claims from the fixed seed.
pub fn generate_claims(count: usize) -> Vec<Claim> {
    let mut rng = StdRng::seed_from_u64(DATASET_SEED);
    let today = Local::now().date_naive();
    (0..count).map(|idx| generate_claim(&mut rng, today, idx)).collect()
}

fn generate_claim(rng: &mut StdRng, today: NaiveDate, idx: usize) -> Claim {
    let state = STATES[rng.gen_range(0..STATES.len())];
    let status_roll: f64 = rng.gen();
    let status = if status_roll < 0.45 {
        ClaimStatus::Pending
    } else if status_roll < 0.85 {
        ClaimStatus::Approved
    } else {
        ClaimStatus::Rejected
    };
    let area_ha = (rng.gen_range(0.2..=12.0) * 100.0_f64).round() / 100.0;
    let created = today - Duration::days(rng.gen_range(0..=365));
    let docs_complete = rng.gen::<f64>() > 0.25;
    let is_duplicate = rng.gen::<f64>() < 0.1;
    let is_in_critical_wildlife_zone = rng.gen::<f64>() < 0.12;
    let community_support = rng.gen::<f64>() > 0.5;
    let land_type = LandUseKind::ALL[rng.gen_range(0..LandUseKind::ALL.len())];
    let claimant = CLAIMANTS[rng.gen_range(0..CLAIMANTS.len())];

    Claim {
        claim_id: Some(format!("CLM-{}", 2000 + idx)),
        claimant: Some(claimant.to_string()),
        state: Some(state.to_string()),
        status,
        area_ha,
        created: Some(created),
        docs_complete,
        is_duplicate,
        is_in_critical_wildlife_zone,
        community_support,
        land_type: Some(land_type),
    }
}

/// Counts of claims per area band, in hectares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AreaBuckets {
    #[serde(rename = "0-2")]
    pub upto_two: usize,
    #[serde(rename = "2-5")]
    pub two_to_five: usize,
    #[serde(rename = "5-10")]
    pub five_to_ten: usize,
    #[serde(rename = "10+")]
    pub ten_plus: usize,
}

/// Dashboard rollup over a claim set.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimAggregates {
    pub total: usize,
    pub by_status: BTreeMap<&'static str, usize>,
    pub by_state: BTreeMap<String, usize>,
    pub by_month: BTreeMap<String, usize>,
    pub area_buckets: AreaBuckets,
}

pub fn aggregates(claims: &[Claim]) -> ClaimAggregates {
    let mut by_status = BTreeMap::new();
    let mut by_state = BTreeMap::new();
    let mut by_month = BTreeMap::new();
    let mut area_buckets = AreaBuckets::default();

    for claim in claims {
        *by_status.entry(claim.status.label()).or_insert(0) += 1;
        if let Some(state) = &claim.state {
            *by_state.entry(state.clone()).or_insert(0) += 1;
        }
        if let Some(created) = claim.created {
            *by_month.entry(created.format("%Y-%m").to_string()).or_insert(0) += 1;
        }
        if claim.area_ha <= 2.0 {
            area_buckets.upto_two += 1;
        } else if claim.area_ha <= 5.0 {
            area_buckets.two_to_five += 1;
        } else if claim.area_ha <= 10.0 {
            area_buckets.five_to_ten += 1;
        } else {
            area_buckets.ten_plus += 1;
        }
    }

    ClaimAggregates {
        total: claims.len(),
        by_status,
        by_state,
        by_month,
        area_buckets,
    }
}

/// Per-land-use summary with a management suggestion for review teams.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandUseInsight {
    pub land_type: LandUseKind,
    pub claims: usize,
    pub avg_area_ha: f64,
    pub suggestion: &'static str,
}

pub fn land_use_insights(claims: &[Claim]) -> Vec<LandUseInsight> {
    LandUseKind::ALL
        .iter()
        .filter_map(|kind| {
            let areas: Vec<f64> = claims
                .iter()
                .filter(|claim| claim.land_type == Some(*kind))
                .map(|claim| claim.area_ha)
                .collect();
            if areas.is_empty() {
                return None;
            }
            let avg = areas.iter().sum::<f64>() / areas.len() as f64;
            Some(LandUseInsight {
                land_type: *kind,
                claims: areas.len(),
                avg_area_ha: (avg * 100.0).round() / 100.0,
                suggestion: suggestion(*kind),
            })
        })
        .collect()
}

fn suggestion(kind: LandUseKind) -> &'static str {
    match kind {
        LandUseKind::DegradedForest => "Afforestation and community forestry with native species",
        LandUseKind::CommunityForest => {
            "Sustainable community-managed forestry and NTFP livelihood support"
        }
        LandUseKind::Agroforestry => "Agroforestry with mixed cropping and soil conservation",
        LandUseKind::ProtectedZone => "Conservation-first usage with minimal disturbance",
    }
}
