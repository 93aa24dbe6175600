// Vector math shared by the word-vector queries.
//
// Vectors are stored as f32 to keep large vocabularies compact; all
// accumulation happens in f64.

/// Dot product of two equally long vectors.
pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum()
}

/// Euclidean length of a vector.
pub fn norm(v: &[f32]) -> f64 {
    v.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt()
}

/// Scale a vector to unit length. Zero vectors stay zero.
pub fn unit_vector(v: &[f32]) -> Vec<f32> {
    let n = norm(v);
    if n < f64::EPSILON {
        return v.to_vec();
    }
    v.iter().map(|x| (*x as f64 / n) as f32).collect()
}

/// Cosine similarity in [-1, 1]. Mismatched, empty or zero vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let denom = norm(a) * norm(b);
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot(a, b) / denom).clamp(-1.0, 1.0)
    }
}

/// Element-wise mean of several vectors of the same dimension.
///
/// Returns `None` for an empty input.
pub fn mean_vector(vectors: &[&[f32]]) -> Option<Vec<f32>> {
    let first = vectors.first()?;
    let dim = first.len();
    let n = vectors.len() as f64;

    let mut sum = vec![0.0_f64; dim];
    for v in vectors {
        for (acc, x) in sum.iter_mut().zip(v.iter()) {
            *acc += *x as f64;
        }
    }

    Some(sum.into_iter().map(|s| (s / n) as f32).collect())
}
