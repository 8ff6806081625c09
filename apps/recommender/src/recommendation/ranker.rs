use std::cmp::Ordering;

use crate::model::CategoryMapping;
use crate::recommendation::models::Recommendation;

/// Top `top_n` categories by descending score.
///
/// Equal scores keep ascending index order and NaN scores rank last, so the output
/// is fully determined by the input.
pub fn rank(scores: &[f32], top_n: usize, mapping: &CategoryMapping) -> Vec<Recommendation> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| descending(scores[a], scores[b]));

    indices
        .into_iter()
        .take(top_n)
        .map(|index| Recommendation {
            job_title: mapping.label(index),
            confidence: scores[index],
        })
        .collect()
}

fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}
