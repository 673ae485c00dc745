//! Dense vector helpers shared by the in-memory store and callers ranking embeddings.

/// Cosine similarity of `a` and `b`; `0.0` when either has zero norm or their lengths differ.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Scale `v` to unit length. Zero vectors are returned unchanged.
#[must_use]
pub fn normalize(v: &[f32]) -> Vec<f32> {
    let n = norm(v);
    if n == 0.0 {
        return v.to_vec();
    }
    v.iter().map(|x| x / n).collect()
}

/// Indices of the `k` candidates most similar to `query`, best first.
///
/// Candidates whose dimension differs from `query` are skipped. Ties keep candidate order.
#[must_use]
pub fn top_k_similar<V: AsRef<[f32]>>(query: &[f32], candidates: &[V], k: usize) -> Vec<usize> {
    let mut scored: Vec<(usize, f32)> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.as_ref().len() == query.len())
        .map(|(i, c)| (i, cosine_similarity(query, c.as_ref())))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.into_iter().take(k).map(|(i, _)| i).collect()
}

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors() {
        let v = [0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < f32::EPSILON);
    }

    #[test]
    fn opposite_vectors() {
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_scores_zero() {
        assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).abs() < f32::EPSILON);
        assert!(cosine_similarity(&[], &[]).abs() < f32::EPSILON);
    }

    #[test]
    fn mismatched_lengths_score_zero() {
        assert!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 5.0]).abs() < f32::EPSILON);
    }

    #[test]
    fn normalize_unit_length() {
        let n = normalize(&[3.0, 4.0]);
        assert!((n[0] - 0.6).abs() < 1e-6);
        assert!((n[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn normalize_zero_vector_unchanged() {
        assert_eq!(normalize(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn top_k_orders_by_similarity() {
        let candidates = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.7, 0.7]];
        assert_eq!(top_k_similar(&[1.0, 0.0], &candidates, 2), vec![1, 2]);
    }

    #[test]
    fn top_k_larger_than_candidates() {
        let candidates = [[1.0_f32, 0.0]];
        assert_eq!(top_k_similar(&[1.0, 0.0], &candidates, 5), vec![0]);
    }

    #[test]
    fn top_k_ties_keep_candidate_order() {
        let candidates = vec![vec![2.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];
        assert_eq!(top_k_similar(&[1.0, 0.0], &candidates, 3), vec![0, 1, 2]);
    }

    #[test]
    fn top_k_skips_wrong_dimension() {
        let candidates = vec![vec![1.0, 0.0, 9.0], vec![0.0, 1.0], vec![1.0]];
        assert_eq!(top_k_similar(&[1.0, 0.0], &candidates, 3), vec![1]);
    }

    #[test]
    fn top_k_zero() {
        let candidates = vec![vec![1.0, 0.0]];
        assert!(top_k_similar(&[1.0, 0.0], &candidates, 0).is_empty());
    }
}
