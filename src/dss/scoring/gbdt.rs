//! Gradient-boosted decision trees for the classifier scoring path.
//!
//! A small binary classifier trained with logistic loss: depth-limited
//! regression trees are fit to the loss gradients, leaves take a Newton step,
//! and every stage is deterministic (seeded draws, exact greedy splits,
//! first-wins tie-breaking) so a fixed seed always yields the same artifact.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::features::FEATURE_COUNT;

/// Seed for the synthetic training procedure.
pub const TRAINING_SEED: u64 = 42;

const TRAINING_SAMPLES: usize = 500;
const TREE_COUNT: usize = 100;
const LEARNING_RATE: f64 = 0.1;
const MAX_DEPTH: usize = 3;
const MIN_SAMPLES_SPLIT: usize = 2;
const MIN_GAIN: f64 = 1e-9;
const EPS: f64 = 1e-12;
const HESSIAN_FLOOR: f64 = 1e-6;
const PROB_FLOOR: f64 = 1e-6;

/// Node in a flattened tree. Internal nodes route on `feature <= threshold`;
/// leaves carry the boosted increment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Depth-limited regression tree stored as a node arena rooted at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn output(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                Node::Leaf { value } => return *value,
            }
        }
    }
}

/// Trained ensemble: a log-odds prior plus shrunken tree increments. The
/// feature order of [`super::features::encode`] is part of this contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostedModel {
    bias: f64,
    learning_rate: f64,
    trees: Vec<Tree>,
}

impl GradientBoostedModel {
    /// Positive-class probability for an encoded claim. Read-only.
    pub fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let mut margin = self.bias;
        for tree in &self.trees {
            margin += self.learning_rate * tree.output(features);
        }
        sigmoid(margin)
    }

    /// Train on the synthetic labeled draws; reproducible for a fixed seed.
    pub fn train_synthetic(seed: u64) -> Self {
        let (samples, labels) = synthetic_dataset(seed);
        Self::fit(&samples, &labels)
    }

    fn fit(samples: &[[f64; FEATURE_COUNT]], labels: &[f64]) -> Self {
        let count = labels.len() as f64;
        let prior = (labels.iter().sum::<f64>() / count).clamp(PROB_FLOOR, 1.0 - PROB_FLOOR);
        let bias = (prior / (1.0 - prior)).ln();

        let all: Vec<usize> = (0..labels.len()).collect();
        let mut margins = vec![bias; labels.len()];
        let mut gradients = vec![0.0; labels.len()];
        let mut hessians = vec![0.0; labels.len()];
        let mut trees = Vec::with_capacity(TREE_COUNT);

        for _ in 0..TREE_COUNT {
            for index in 0..labels.len() {
                let p = sigmoid(margins[index]);
                gradients[index] = labels[index] - p;
                hessians[index] = (p * (1.0 - p)).max(HESSIAN_FLOOR);
            }

            let mut builder = TreeBuilder {
                samples,
                gradients: &gradients,
                hessians: &hessians,
                nodes: Vec::new(),
            };
            builder.grow(&all, 0);
            let tree = Tree {
                nodes: builder.nodes,
            };

            for (index, margin) in margins.iter_mut().enumerate() {
                *margin += LEARNING_RATE * tree.output(&samples[index]);
            }
            trees.push(tree);
        }

        Self {
            bias,
            learning_rate: LEARNING_RATE,
            trees,
        }
    }
}

/// Draw the labeled training set: 500 uniform 5-feature samples where indexes
/// 0, 1, 3, 4 threshold into booleans and index 2 scales to [0, 12) hectares.
/// A sample is positive iff documents are complete, it is not a duplicate, it
/// has community support, and the area is below 3 ha.
fn synthetic_dataset(seed: u64) -> (Vec<[f64; FEATURE_COUNT]>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity(TRAINING_SAMPLES);
    let mut labels = Vec::with_capacity(TRAINING_SAMPLES);

    for _ in 0..TRAINING_SAMPLES {
        let mut raw = [0.0_f64; FEATURE_COUNT];
        for value in &mut raw {
            *value = rng.gen();
        }

        let docs_complete = threshold(raw[0]);
        let is_duplicate = threshold(raw[1]);
        let area = raw[2] * 12.0;
        let critical_zone = threshold(raw[3]);
        let community_support = threshold(raw[4]);

        let positive = docs_complete == 1.0
            && is_duplicate == 0.0
            && community_support == 1.0
            && area < 3.0;

        samples.push([docs_complete, is_duplicate, area, critical_zone, community_support]);
        labels.push(if positive { 1.0 } else { 0.0 });
    }

    (samples, labels)
}

fn threshold(value: f64) -> f64 {
    if value > 0.5 {
        1.0
    } else {
        0.0
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

struct TreeBuilder<'a> {
    samples: &'a [[f64; FEATURE_COUNT]],
    gradients: &'a [f64],
    hessians: &'a [f64],
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    fn grow(&mut self, indices: &[usize], depth: usize) -> usize {
        if depth >= MAX_DEPTH || indices.len() < MIN_SAMPLES_SPLIT {
            return self.push_leaf(indices);
        }
        let Some(split) = self.best_split(indices) else {
            return self.push_leaf(indices);
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&index| self.samples[index][split.feature] <= split.threshold);

        let slot = self.nodes.len();
        self.nodes.push(Node::Leaf { value: 0.0 });
        let left = self.grow(&left_indices, depth + 1);
        let right = self.grow(&right_indices, depth + 1);
        self.nodes[slot] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        slot
    }

    fn push_leaf(&mut self, indices: &[usize]) -> usize {
        let sum_g: f64 = indices.iter().map(|&index| self.gradients[index]).sum();
        let sum_h: f64 = indices.iter().map(|&index| self.hessians[index]).sum();
        self.nodes.push(Node::Leaf {
            value: sum_g / (sum_h + EPS),
        });
        self.nodes.len() - 1
    }

    /// Exact greedy search over midpoints between adjacent distinct values.
    /// Ties keep the first candidate (lowest feature, lowest threshold) so
    /// training is order-deterministic.
    fn best_split(&self, indices: &[usize]) -> Option<SplitCandidate> {
        let total_g: f64 = indices.iter().map(|&index| self.gradients[index]).sum();
        let total_h: f64 = indices.iter().map(|&index| self.hessians[index]).sum();
        let parent = gain_term(total_g, total_h);

        let mut best: Option<SplitCandidate> = None;
        for feature in 0..FEATURE_COUNT {
            let mut ordered = indices.to_vec();
            ordered.sort_by(|&a, &b| self.samples[a][feature].total_cmp(&self.samples[b][feature]));

            let mut left_g = 0.0;
            let mut left_h = 0.0;
            for position in 0..ordered.len() - 1 {
                let index = ordered[position];
                left_g += self.gradients[index];
                left_h += self.hessians[index];

                let here = self.samples[index][feature];
                let next = self.samples[ordered[position + 1]][feature];
                if next <= here {
                    continue;
                }

                let gain = gain_term(left_g, left_h)
                    + gain_term(total_g - left_g, total_h - left_h)
                    - parent;
                if gain > MIN_GAIN && best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: (here + next) / 2.0,
                        gain,
                    });
                }
            }
        }
        best
    }
}

fn gain_term(g: f64, h: f64) -> f64 {
    g * g / (h + EPS)
}
