//! Integration coverage for the rule-based scoring path and the dataset
//! endpoints, exercised through the public service facade and HTTP router.

mod common {
    use std::sync::Arc;

    use claims_triage::dss::scoring::ScoringService;
    use tempfile::TempDir;

    pub(crate) const DATASET_SIZE: usize = 25;

    pub(crate) fn scoring_service() -> (TempDir, Arc<ScoringService>) {
        let dir = tempfile::tempdir().expect("tempdir");
        let service = Arc::new(ScoringService::new(
            dir.path().join("model.json"),
            DATASET_SIZE,
        ));
        (dir, service)
    }

    pub(crate) fn strong_claim() -> serde_json::Value {
        serde_json::json!({
            "claim_id": "CLM-2042",
            "docs_complete": true,
            "is_duplicate": false,
            "area_ha": 1.5,
            "is_in_critical_wildlife_zone": false,
            "community_support": true,
            "status": "pending",
        })
    }
}

mod rules {
    use super::common::*;
    use claims_triage::dss::claims::domain::{Claim, ClaimStatus};
    use claims_triage::dss::scoring::Priority;

    #[test]
    fn strong_pending_claim_scores_85_high() {
        let (_dir, service) = scoring_service();
        let claim = Claim::from_value(&strong_claim());

        let result = service.score_rules(&claim);

        assert_eq!(result.score, 85);
        assert_eq!(result.priority, Priority::High);
        assert_eq!(
            result.explanation,
            vec![
                "+15 complete documents",
                "+10 small area <=2ha",
                "+10 community support",
            ]
        );
    }

    #[test]
    fn approved_variant_scores_45_medium() {
        let (_dir, service) = scoring_service();
        let mut claim = Claim::from_value(&strong_claim());
        claim.status = ClaimStatus::Approved;

        let result = service.score_rules(&claim);

        assert_eq!(result.score, 45);
        assert_eq!(result.priority, Priority::Medium);
    }

    #[test]
    fn every_generated_claim_scores_within_bounds() {
        let (_dir, service) = scoring_service();
        for claim in service.claims().iter() {
            let result = service.score_rules(claim);
            assert!(result.score <= 100);
            assert_eq!(result.priority, Priority::from_score(result.score));
            assert!(!result.explanation.is_empty());
        }
    }

    #[test]
    fn batch_results_line_up_with_inputs() {
        let (_dir, service) = scoring_service();
        let claims: Vec<Claim> = service.claims().iter().cloned().collect();

        let outcome = service.score_batch_rules(&claims);

        assert_eq!(outcome.count, claims.len());
        for (entry, claim) in outcome.results.iter().zip(&claims) {
            assert_eq!(entry.id, claim.claim_id);
            assert_eq!(&entry.input, claim);
            assert_eq!(entry.result, service.score_rules(claim));
        }
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use claims_triage::dss::scoring::scoring_router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn dispatch(router: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.expect("router dispatch");
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        (status, payload)
    }

    fn post(uri: &str, payload: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn score_endpoint_echoes_input_and_result() {
        let (_dir, service) = scoring_service();
        let router = scoring_router(service);

        let (status, payload) = dispatch(router, post("/api/dss/score", &strong_claim())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            payload["input"]["claim_id"].as_str(),
            Some("CLM-2042")
        );
        assert_eq!(payload["result"]["score"].as_u64(), Some(85));
        assert_eq!(payload["result"]["priority"].as_str(), Some("high"));
        assert_eq!(
            payload["result"]["explanation"]
                .as_array()
                .map(|entries| entries.len()),
            Some(3)
        );
    }

    #[tokio::test]
    async fn batch_endpoint_preserves_order_and_count() {
        let (_dir, service) = scoring_service();
        let router = scoring_router(service);

        let body = json!({
            "claims": [
                { "claim_id": "CLM-1", "docs_complete": true, "area_ha": 1.0 },
                { "claim_id": "CLM-2", "is_duplicate": true, "area_ha": 11.0 },
                { "claim_id": "CLM-3", "status": "rejected" },
            ]
        });

        let (status, payload) = dispatch(router, post("/api/dss/score-batch", &body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["count"].as_u64(), Some(3));
        let results = payload["results"].as_array().expect("results list");
        let ids: Vec<_> = results
            .iter()
            .map(|entry| entry["id"].as_str().expect("id"))
            .collect();
        assert_eq!(ids, vec!["CLM-1", "CLM-2", "CLM-3"]);
        for entry in results {
            assert!(entry["result"]["score"].as_u64().expect("score") <= 100);
            assert!(entry["input"].is_object());
        }
    }

    #[tokio::test]
    async fn empty_batch_yields_zero_count() {
        let (_dir, service) = scoring_service();
        let router = scoring_router(service);

        let (status, payload) =
            dispatch(router, post("/api/dss/score-batch", &json!({ "claims": [] }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["count"].as_u64(), Some(0));
        assert_eq!(payload["results"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn malformed_claims_degrade_instead_of_failing() {
        let (_dir, service) = scoring_service();
        let router = scoring_router(service);

        let body = json!({
            "claims": [
                { "area_ha": "plenty", "docs_complete": "yes", "status": 9 },
                "not even an object",
            ]
        });

        let (status, payload) = dispatch(router, post("/api/dss/score-batch", &body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["count"].as_u64(), Some(2));
    }

    #[tokio::test]
    async fn claims_endpoint_serves_the_cached_dataset() {
        let (_dir, service) = scoring_service();
        let router = scoring_router(service);

        let (status, payload) = dispatch(router, get("/api/claims")).await;

        assert_eq!(status, StatusCode::OK);
        let claims = payload["claims"].as_array().expect("claims list");
        assert_eq!(claims.len(), DATASET_SIZE);
        assert_eq!(claims[0]["claim_id"].as_str(), Some("CLM-2000"));
    }

    #[tokio::test]
    async fn aggregates_endpoint_counts_the_dataset() {
        let (_dir, service) = scoring_service();
        let router = scoring_router(service);

        let (status, payload) = dispatch(router, get("/api/dashboard/aggregates")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["total"].as_u64(), Some(DATASET_SIZE as u64));
        let by_status = payload["by_status"].as_object().expect("by_status");
        let counted: u64 = by_status.values().filter_map(Value::as_u64).sum();
        assert_eq!(counted, DATASET_SIZE as u64);
        assert!(payload["area_buckets"].is_object());
    }

    #[tokio::test]
    async fn landuse_endpoint_reports_insights() {
        let (_dir, service) = scoring_service();
        let router = scoring_router(service);

        let (status, payload) = dispatch(router, get("/api/ai/landuse-insights")).await;

        assert_eq!(status, StatusCode::OK);
        let insights = payload["land_use"].as_array().expect("land_use list");
        assert!(!insights.is_empty());
        for entry in insights {
            assert!(entry["claims"].as_u64().expect("claims") > 0);
            assert!(entry["suggestion"].as_str().is_some());
        }
    }
}
