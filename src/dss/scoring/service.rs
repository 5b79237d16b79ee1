use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use tracing::{info, warn};

use super::features;
use super::gbdt::{GradientBoostedModel, TRAINING_SEED};
use super::rules;
use super::store;
use super::{BatchOutcome, ModelScore, Priority, RuleScore, ScoredClaim};
use crate::dss::claims::dataset;
use crate::dss::claims::domain::Claim;

/// Process-wide scoring facade. Construct once and share via `Arc`; the model
/// artifact and the generated dataset initialize lazily behind `OnceLock`, so
/// concurrent first requests agree on a single training run and a single
/// dataset.
pub struct ScoringService {
    model_path: PathBuf,
    dataset_size: usize,
    model: OnceLock<Arc<GradientBoostedModel>>,
    claims: OnceLock<Arc<Vec<Claim>>>,
}

impl ScoringService {
    pub fn new(model_path: PathBuf, dataset_size: usize) -> Self {
        Self {
            model_path,
            dataset_size,
            model: OnceLock::new(),
            claims: OnceLock::new(),
        }
    }

    /// Rule-path scoring; pure, no model access.
    pub fn score_rules(&self, claim: &Claim) -> RuleScore {
        rules::score_claim(claim)
    }

    /// Model-path scoring; trains or loads the artifact on first use.
    pub fn score_model(&self, claim: &Claim) -> ModelScore {
        score_with(&self.model(), claim)
    }

    pub fn score_batch_rules(&self, claims: &[Claim]) -> BatchOutcome<RuleScore> {
        score_batch(claims, rules::score_claim)
    }

    pub fn score_batch_model(&self, claims: &[Claim]) -> BatchOutcome<ModelScore> {
        let model = self.model();
        score_batch(claims, |claim| score_with(&model, claim))
    }

    /// The cached artifact. The first caller performs the train-or-load
    /// sequence; everyone else waits on the same initialization and then
    /// shares the read-only result without touching storage again.
    pub fn model(&self) -> Arc<GradientBoostedModel> {
        self.model
            .get_or_init(|| Arc::new(self.load_or_train()))
            .clone()
    }

    fn load_or_train(&self) -> GradientBoostedModel {
        match store::load(&self.model_path) {
            Ok(Some(model)) => {
                info!(path = %self.model_path.display(), "loaded persisted model artifact");
                return model;
            }
            Ok(None) => {
                info!(path = %self.model_path.display(), "no persisted model artifact, training")
            }
            Err(err) => {
                warn!(error = %err, path = %self.model_path.display(), "persisted model artifact unusable, retraining")
            }
        }

        let model = GradientBoostedModel::train_synthetic(TRAINING_SEED);
        if let Err(err) = store::save(&self.model_path, &model) {
            // Keep serving from memory; persistence is best-effort.
            warn!(error = %err, path = %self.model_path.display(), "failed to persist trained model artifact");
        }
        model
    }

    /// The cached synthetic dataset, generated once per process.
    pub fn claims(&self) -> Arc<Vec<Claim>> {
        self.claims
            .get_or_init(|| Arc::new(dataset::generate_claims(self.dataset_size)))
            .clone()
    }
}

fn score_with(model: &GradientBoostedModel, claim: &Claim) -> ModelScore {
    let prob = model.predict_proba(&features::encode(claim));
    let score = (prob * 100.0).round() as u8;
    ModelScore {
        score,
        priority: Priority::from_score(score),
        prob,
    }
}

/// Transparent 1:1 map over the input order; no reordering or filtering.
fn score_batch<T>(claims: &[Claim], scorer: impl Fn(&Claim) -> T) -> BatchOutcome<T> {
    let results: Vec<ScoredClaim<T>> = claims
        .iter()
        .map(|claim| ScoredClaim {
            id: claim.claim_id.clone(),
            result: scorer(claim),
            input: claim.clone(),
        })
        .collect();
    BatchOutcome {
        count: results.len(),
        results,
    }
}
