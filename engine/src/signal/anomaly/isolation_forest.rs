//! Isolation forest over one-dimensional samples.
//!
//! Each tree recursively splits a random subsample at a uniform threshold
//! between the node's min and max. Outliers are isolated after fewer splits,
//! so a short average path length means "anomalous".
//!
//! ```text
//! score(x)    = -2^(-E[h(x)] / c(subsample))
//! offset      = percentile(score(train), 100 * contamination)
//! decision(x) = score(x) - offset        // < 0 => outlier
//! ```
//!
//! All randomness comes from a seeded `StdRng`, so fitting is reproducible.

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

#[derive(Clone, Copy, Debug)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_samples: usize,
    pub contamination: f64,
    pub seed: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Arena-allocated isolation tree; the root is node 0.
#[derive(Clone, Debug)]
struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    fn grow(values: &[f64], max_depth: usize, rng: &mut StdRng) -> Self {
        let mut nodes = Vec::new();
        build(&mut nodes, values, 0, max_depth, rng);
        Self { nodes }
    }

    fn path_length(&self, x: f64) -> f64 {
        let mut idx = 0;
        let mut depth = 0.0;

        loop {
            match self.nodes[idx] {
                Node::Leaf { size } => return depth + average_path_length(size),
                Node::Split {
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x <= threshold { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }
}

fn build(
    nodes: &mut Vec<Node>,
    values: &[f64],
    depth: usize,
    max_depth: usize,
    rng: &mut StdRng,
) -> usize {
    let idx = nodes.len();
    nodes.push(Node::Leaf { size: values.len() });

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    // Constant nodes cannot be split further.
    if depth >= max_depth || values.len() <= 1 || max <= min {
        return idx;
    }

    // Convex combination: `max - min` may overflow for finite extremes.
    let u: f64 = rng.gen_range(0.0..1.0);
    let threshold = (min * (1.0 - u) + max * u).clamp(min, max);
    let (lower, upper): (Vec<f64>, Vec<f64>) = values.iter().copied().partition(|&v| v <= threshold);

    let left = build(nodes, &lower, depth + 1, max_depth, rng);
    let right = build(nodes, &upper, depth + 1, max_depth, rng);
    nodes[idx] = Node::Split {
        threshold,
        left,
        right,
    };

    idx
}

/// Average path length of an unsuccessful binary search tree lookup among
/// `n` points.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolated percentile (`p` in 0..=100) of unsorted values.
fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

#[derive(Clone, Debug)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    subsample: usize,
    offset: f64,
}

impl IsolationForest {
    pub fn fit(samples: &[f64], params: &ForestParams) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let n = samples.len();
        let subsample = params.max_samples.min(n).max(1);
        let max_depth = (subsample.max(2) as f64).log2().ceil() as usize;

        let trees = (0..params.n_estimators.max(1))
            .map(|_| {
                let picked: Vec<f64> = if n == 0 {
                    Vec::new()
                } else {
                    sample(&mut rng, n, subsample)
                        .iter()
                        .map(|i| samples[i])
                        .collect()
                };
                IsolationTree::grow(&picked, max_depth, &mut rng)
            })
            .collect();

        let mut forest = Self {
            trees,
            subsample,
            offset: 0.0,
        };

        let train_scores: Vec<f64> = samples.iter().map(|&x| forest.score_samples(x)).collect();
        forest.offset = percentile(&train_scores, params.contamination * 100.0);
        forest
    }

    /// Negated anomaly score in [-1, 0); lower is more abnormal.
    pub fn score_samples(&self, x: f64) -> f64 {
        let mean_depth = self.trees.iter().map(|t| t.path_length(x)).sum::<f64>()
            / self.trees.len() as f64;

        let norm = average_path_length(self.subsample);
        if norm <= 0.0 {
            // A single-sample forest cannot tell points apart.
            return -1.0;
        }

        -(2f64.powf(-mean_depth / norm))
    }

    /// Calibrated score; negative values are outliers.
    pub fn decision_function(&self, x: f64) -> f64 {
        self.score_samples(x) - self.offset
    }

    pub fn is_outlier(&self, x: f64) -> bool {
        self.decision_function(x) < 0.0
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }
}
