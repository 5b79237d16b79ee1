use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::service::ScoringService;
use super::{BatchOutcome, ModelScore, RuleScore};
use crate::dss::claims::dataset;
use crate::dss::claims::domain::Claim;

/// Router exposing the decision-support scoring and dataset endpoints.
///
/// Authorization is the caller's concern: handlers assume the request already
/// passed whatever gate fronts this service and only coerce payloads.
pub fn scoring_router(service: Arc<ScoringService>) -> Router {
    Router::new()
        .route("/api/dss/score", post(score_rules_handler))
        .route("/api/dss/score-batch", post(score_rules_batch_handler))
        .route("/api/dss/ml/score", post(score_model_handler))
        .route("/api/dss/ml/score-batch", post(score_model_batch_handler))
        .route("/api/claims", get(claims_handler))
        .route("/api/dashboard/aggregates", get(aggregates_handler))
        .route("/api/ai/landuse-insights", get(land_use_handler))
        .with_state(service)
}

pub(crate) async fn score_rules_handler(
    State(service): State<Arc<ScoringService>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let claim = Claim::from_value(&body);
    let result = service.score_rules(&claim);
    Json(json!({ "input": claim, "result": result }))
}

pub(crate) async fn score_model_handler(
    State(service): State<Arc<ScoringService>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let claim = Claim::from_value(&body);
    let result = service.score_model(&claim);
    Json(json!({ "input": claim, "result": result }))
}

pub(crate) async fn score_rules_batch_handler(
    State(service): State<Arc<ScoringService>>,
    Json(body): Json<Value>,
) -> Json<BatchOutcome<RuleScore>> {
    let claims = batch_claims(&body);
    Json(service.score_batch_rules(&claims))
}

pub(crate) async fn score_model_batch_handler(
    State(service): State<Arc<ScoringService>>,
    Json(body): Json<Value>,
) -> Json<BatchOutcome<ModelScore>> {
    let claims = batch_claims(&body);
    Json(service.score_batch_model(&claims))
}

pub(crate) async fn claims_handler(State(service): State<Arc<ScoringService>>) -> Json<Value> {
    let claims = service.claims();
    Json(json!({ "claims": &*claims }))
}

pub(crate) async fn aggregates_handler(State(service): State<Arc<ScoringService>>) -> Json<Value> {
    let claims = service.claims();
    Json(json!(dataset::aggregates(&claims)))
}

pub(crate) async fn land_use_handler(State(service): State<Arc<ScoringService>>) -> Json<Value> {
    let claims = service.claims();
    Json(json!({ "land_use": dataset::land_use_insights(&claims) }))
}

/// A missing or malformed `claims` list reads as empty; entries coerce
/// per-claim so one bad record never aborts the batch.
fn batch_claims(body: &Value) -> Vec<Claim> {
    body.get("claims")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().map(Claim::from_value).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn batch_claims_defaults_to_empty() {
        assert!(batch_claims(&json!({})).is_empty());
        assert!(batch_claims(&json!({ "claims": "many" })).is_empty());
        assert!(batch_claims(&json!(null)).is_empty());
    }

    #[test]
    fn batch_claims_coerces_each_entry() {
        let claims = batch_claims(&json!({
            "claims": [
                { "claim_id": "CLM-1", "docs_complete": true },
                "garbage",
                { "claim_id": "CLM-3", "area_ha": "oops" },
            ]
        }));

        assert_eq!(claims.len(), 3);
        assert_eq!(claims[0].claim_id.as_deref(), Some("CLM-1"));
        assert_eq!(claims[1], Claim::default());
        assert_eq!(claims[2].area_ha, 0.0);
    }
}
