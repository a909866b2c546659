//! Exact TreeSHAP (path-dependent)
//!
//! Polynomial-time Shapley values for one tree: walk every root-to-leaf path
//! while tracking, per unique feature on the path, the fraction of "feature
//! absent" (cover-weighted) and "feature present" (follows `row`) flows.
//! Attributions for every class are accumulated in a single traversal.

use crate::logic::model::{DecisionTree, Node, N_CLASSES};

#[derive(Debug, Clone, Copy)]
struct PathElement {
    feature: Option<usize>,
    zero_fraction: f64,
    one_fraction: f64,
    pweight: f64,
}

/// Add the Shapley values of `tree` at `row` into `phi[feature][class]`.
/// Per tree: `root.value + Σ phi = leaf.value`.
pub fn tree_shap(tree: &DecisionTree, row: &[f64], phi: &mut [[f64; N_CLASSES]]) {
    if tree.nodes().is_empty() {
        return;
    }
    recurse(tree.nodes(), row, phi, 0, &[], 1.0, 1.0, None);
}

#[allow(clippy::too_many_arguments)]
fn recurse(
    nodes: &[Node],
    row: &[f64],
    phi: &mut [[f64; N_CLASSES]],
    node_index: usize,
    parent_path: &[PathElement],
    zero_fraction: f64,
    one_fraction: f64,
    feature: Option<usize>,
) {
    let mut path = parent_path.to_vec();
    extend(&mut path, zero_fraction, one_fraction, feature);

    let node = &nodes[node_index];
    let Some(split) = node.split else {
        let depth = path.len() - 1;
        for i in 1..=depth {
            let weight = unwound_sum(&path, i);
            let element = path[i];
            if let Some(f) = element.feature {
                let scale = weight * (element.one_fraction - element.zero_fraction);
                for c in 0..N_CLASSES {
                    phi[f][c] += scale * node.value[c];
                }
            }
        }
        return;
    };

    let (hot, cold) = if row[split.feature] <= split.threshold {
        (split.left, split.right)
    } else {
        (split.right, split.left)
    };
    let hot_zero = nodes[hot].cover / node.cover;
    let cold_zero = nodes[cold].cover / node.cover;

    // A feature already on the path is undone and redone at this split
    let (mut incoming_zero, mut incoming_one) = (1.0, 1.0);
    if let Some(k) = path.iter().position(|e| e.feature == Some(split.feature)) {
        incoming_zero = path[k].zero_fraction;
        incoming_one = path[k].one_fraction;
        unwind(&mut path, k);
    }

    recurse(
        nodes,
        row,
        phi,
        hot,
        &path,
        hot_zero * incoming_zero,
        incoming_one,
        Some(split.feature),
    );
    recurse(
        nodes,
        row,
        phi,
        cold,
        &path,
        cold_zero * incoming_zero,
        0.0,
        Some(split.feature),
    );
}

fn extend(path: &mut Vec<PathElement>, zero_fraction: f64, one_fraction: f64, feature: Option<usize>) {
    let depth = path.len();
    path.push(PathElement {
        feature,
        zero_fraction,
        one_fraction,
        pweight: if depth == 0 { 1.0 } else { 0.0 },
    });

    let denom = (depth + 1) as f64;
    for i in (0..depth).rev() {
        path[i + 1].pweight += one_fraction * path[i].pweight * (i + 1) as f64 / denom;
        path[i].pweight = zero_fraction * path[i].pweight * (depth - i) as f64 / denom;
    }
}

fn unwind(path: &mut Vec<PathElement>, index: usize) {
    let depth = path.len() - 1;
    let one = path[index].one_fraction;
    let zero = path[index].zero_fraction;
    let denom = (depth + 1) as f64;
    let mut next_one = path[depth].pweight;

    for i in (0..depth).rev() {
        if one != 0.0 {
            let tmp = path[i].pweight;
            path[i].pweight = next_one * denom / ((i + 1) as f64 * one);
            next_one = tmp - path[i].pweight * zero * (depth - i) as f64 / denom;
        } else {
            path[i].pweight = path[i].pweight * denom / (zero * (depth - i) as f64);
        }
    }

    for i in index..depth {
        path[i].feature = path[i + 1].feature;
        path[i].zero_fraction = path[i + 1].zero_fraction;
        path[i].one_fraction = path[i + 1].one_fraction;
    }
    path.pop();
}

/// Total permutation weight of the path with element `index` removed
fn unwound_sum(path: &[PathElement], index: usize) -> f64 {
    let depth = path.len() - 1;
    let one = path[index].one_fraction;
    let zero = path[index].zero_fraction;
    let mut next_one = path[depth].pweight;
    let mut total = 0.0;

    if one != 0.0 {
        for i in (0..depth).rev() {
            let tmp = next_one / ((i + 1) as f64 * one);
            total += tmp;
            next_one = path[i].pweight - tmp * zero * (depth - i) as f64;
        }
    } else {
        for i in (0..depth).rev() {
            total += path[i].pweight / (zero * (depth - i) as f64);
        }
    }

    total * (depth + 1) as f64
}
