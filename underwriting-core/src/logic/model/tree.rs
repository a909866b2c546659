//! CART Decision Tree
//!
//! Binary classification tree with Gini impurity and `x[f] <= threshold`
//! splits. Nodes live in a flat arena (root at index 0) and keep their
//! training cover and class distribution, which the attribution engine
//! walks directly.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

pub const N_CLASSES: usize = 2;

/// How many features are drawn as split candidates at each node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    All,
    Sqrt,
    Log2,
    Count(usize),
}

impl MaxFeatures {
    pub fn resolve(&self, n_features: usize) -> usize {
        let k = match self {
            MaxFeatures::All => n_features,
            MaxFeatures::Sqrt => (n_features as f64).sqrt() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2() as usize,
            MaxFeatures::Count(k) => *k,
        };
        k.clamp(1, n_features.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeConfig {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Split {
    pub feature: usize,
    pub threshold: f64,
    pub left: usize,
    pub right: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// None for leaves
    pub split: Option<Split>,
    /// Training rows (bootstrap duplicates included) reaching this node
    pub cover: f64,
    /// Class distribution of those rows
    pub value: [f64; N_CLASSES],
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        self.split.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

struct Candidate {
    score: f64,
    feature: usize,
    threshold: f64,
}

impl DecisionTree {
    /// Grow a tree on the rows listed in `sample` (duplicates allowed)
    pub fn fit(
        x: &Array2<f64>,
        y: &[u8],
        sample: &mut [usize],
        config: &TreeConfig,
        rng: &mut StdRng,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        if !sample.is_empty() {
            tree.grow(x, y, sample, 0, config, rng);
        }
        tree
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn leaf_for(&self, row: &[f64]) -> Option<&Node> {
        let mut node = self.nodes.first()?;
        while let Some(split) = node.split {
            node = if row[split.feature] <= split.threshold {
                &self.nodes[split.left]
            } else {
                &self.nodes[split.right]
            };
        }
        Some(node)
    }

    pub fn predict_proba(&self, row: &[f64]) -> [f64; N_CLASSES] {
        self.leaf_for(row).map(|n| n.value).unwrap_or([0.5; N_CLASSES])
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match nodes[index].split {
                Some(s) => 1 + walk(nodes, s.left).max(walk(nodes, s.right)),
                None => 0,
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    fn grow(
        &mut self,
        x: &Array2<f64>,
        y: &[u8],
        rows: &mut [usize],
        depth: usize,
        config: &TreeConfig,
        rng: &mut StdRng,
    ) -> usize {
        let counts = class_counts(y, rows);
        let n = rows.len();
        let node_id = self.nodes.len();
        self.nodes.push(Node {
            split: None,
            cover: n as f64,
            value: [counts[0] as f64 / n as f64, counts[1] as f64 / n as f64],
        });

        let pure = counts.iter().any(|&c| c == n);
        let depth_reached = config.max_depth.map_or(false, |d| depth >= d);
        if pure
            || depth_reached
            || n < config.min_samples_split
            || n < 2 * config.min_samples_leaf
        {
            return node_id;
        }

        let Some(best) = best_split(x, y, rows, counts, config, rng) else {
            return node_id;
        };

        let mid = partition(rows, |row| x[[row, best.feature]] <= best.threshold);
        let (left_rows, right_rows) = rows.split_at_mut(mid);
        let left = self.grow(x, y, left_rows, depth + 1, config, rng);
        let right = self.grow(x, y, right_rows, depth + 1, config, rng);

        self.nodes[node_id].split = Some(Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        });
        node_id
    }
}

fn class_counts(y: &[u8], rows: &[usize]) -> [usize; N_CLASSES] {
    let mut counts = [0usize; N_CLASSES];
    for &row in rows {
        counts[y[row] as usize] += 1;
    }
    counts
}

/// n * gini, i.e. n - Σ c² / n
fn weighted_gini(counts: [usize; N_CLASSES], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let sum_sq: f64 = counts.iter().map(|&c| (c * c) as f64).sum();
    n as f64 - sum_sq / n as f64
}

/// Moves rows matching `goes_left` to the front; returns how many matched
fn partition(rows: &mut [usize], goes_left: impl Fn(usize) -> bool) -> usize {
    let mut mid = 0;
    for k in 0..rows.len() {
        if goes_left(rows[k]) {
            rows.swap(mid, k);
            mid += 1;
        }
    }
    mid
}

/// Draws `max_features` candidate features in random order; keeps drawing
/// past that budget only while no valid split has been found.
fn best_split(
    x: &Array2<f64>,
    y: &[u8],
    rows: &[usize],
    parent: [usize; N_CLASSES],
    config: &TreeConfig,
    rng: &mut StdRng,
) -> Option<Candidate> {
    let n = rows.len();
    let n_features = x.ncols();
    let budget = config.max_features.resolve(n_features);

    let mut features: Vec<usize> = (0..n_features).collect();
    features.shuffle(rng);

    let mut best: Option<Candidate> = None;
    let mut sorted: Vec<(f64, u8)> = Vec::with_capacity(n);

    for (visited, &feature) in features.iter().enumerate() {
        if visited >= budget && best.is_some() {
            break;
        }

        sorted.clear();
        sorted.extend(rows.iter().map(|&row| (x[[row, feature]], y[row])));
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        if sorted[0].0 == sorted[n - 1].0 {
            continue;
        }

        let mut left = [0usize; N_CLASSES];
        for pos in 0..n - 1 {
            left[sorted[pos].1 as usize] += 1;

            let (lo, hi) = (sorted[pos].0, sorted[pos + 1].0);
            if lo == hi {
                continue;
            }

            let n_left = pos + 1;
            let n_right = n - n_left;
            if n_left < config.min_samples_leaf || n_right < config.min_samples_leaf {
                continue;
            }

            let right = [parent[0] - left[0], parent[1] - left[1]];
            let score = weighted_gini(left, n_left) + weighted_gini(right, n_right);

            if best.as_ref().map_or(true, |b| score < b.score) {
                let mut threshold = lo / 2.0 + hi / 2.0;
                if threshold >= hi || !threshold.is_finite() {
                    threshold = lo;
                }
                best = Some(Candidate { score, feature, threshold });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn fit_all(x: &Array2<f64>, y: &[u8], config: &TreeConfig) -> DecisionTree {
        let mut rows: Vec<usize> = (0..y.len()).collect();
        let mut rng = StdRng::seed_from_u64(1);
        DecisionTree::fit(x, y, &mut rows, config, &mut rng)
    }

    #[test]
    fn test_max_features_resolve() {
        assert_eq!(MaxFeatures::Sqrt.resolve(5), 2);
        assert_eq!(MaxFeatures::Log2.resolve(5), 2);
        assert_eq!(MaxFeatures::All.resolve(5), 5);
        assert_eq!(MaxFeatures::Count(0).resolve(5), 1);
        assert_eq!(MaxFeatures::Count(9).resolve(5), 5);
    }

    #[test]
    fn test_single_threshold_is_learned() {
        // label = x0 > 2.5, x1 is noise
        let x = Array2::from_shape_vec(
            (6, 2),
            vec![1.0, 9.0, 2.0, 3.0, 2.5, 7.0, 3.0, 1.0, 4.0, 8.0, 5.0, 2.0],
        )
        .unwrap();
        let y = [0, 0, 0, 1, 1, 1];
        let config = TreeConfig { max_features: MaxFeatures::All, ..Default::default() };
        let tree = fit_all(&x, &y, &config);

        let root = tree.root().unwrap();
        let split = root.split.unwrap();
        assert_eq!(split.feature, 0);
        assert_eq!(split.threshold, 2.75);
        assert_eq!(root.cover, 6.0);
        assert_eq!(root.value, [0.5, 0.5]);

        assert_eq!(tree.predict_proba(&[2.0, 0.0]), [1.0, 0.0]);
        assert_eq!(tree.predict_proba(&[4.5, 0.0]), [0.0, 1.0]);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.n_leaves(), 2);
    }

    #[test]
    fn test_children_cover_sums_to_parent() {
        let x = Array2::from_shape_fn((40, 3), |(i, j)| ((i * 7 + j * 13) % 17) as f64);
        let y: Vec<u8> = (0..40).map(|i| ((i * 7) % 17 > 8) as u8).collect();
        let tree = fit_all(&x, &y, &TreeConfig::default());

        for node in tree.nodes() {
            if let Some(split) = node.split {
                let l = &tree.nodes()[split.left];
                let r = &tree.nodes()[split.right];
                assert_eq!(l.cover + r.cover, node.cover);
                for c in 0..N_CLASSES {
                    let mixed = (l.value[c] * l.cover + r.value[c] * r.cover) / node.cover;
                    assert!((mixed - node.value[c]).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_max_depth_respected() {
        let x = Array2::from_shape_fn((64, 2), |(i, j)| (i * (j + 1)) as f64);
        let y: Vec<u8> = (0..64).map(|i| (i % 2) as u8).collect();
        let config = TreeConfig { max_depth: Some(3), ..Default::default() };
        let tree = fit_all(&x, &y, &config);
        assert!(tree.depth() <= 3);
    }

    #[test]
    fn test_pure_node_is_leaf() {
        let x = Array2::from_shape_vec((3, 1), vec![1.0, 2.0, 3.0]).unwrap();
        let tree = fit_all(&x, &[1, 1, 1], &TreeConfig::default());
        assert_eq!(tree.nodes().len(), 1);
        assert_eq!(tree.predict_proba(&[10.0]), [0.0, 1.0]);
    }
}
