/// Euclidean length of a vector.
pub(crate) fn embedding_norm(vec: &[f32]) -> f32 {
    vec.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Normalize a vector to unit length.
///
/// Returns the original vector when the norm is zero.
pub(crate) fn normalize_embedding(vec: &[f32]) -> Vec<f32> {
    let norm = embedding_norm(vec);
    if norm == 0.0 {
        vec.to_vec()
    } else {
        vec.iter().map(|x| x / norm).collect()
    }
}

/// Cosine similarity between every paragraph of `left` and every paragraph
/// of `right`, row-major with `left.len()` rows.
///
/// Zero-magnitude paragraphs score 0 against everything.
pub(crate) fn cosine_matrix(left: &[Vec<f32>], right: &[Vec<f32>]) -> Vec<f32> {
    let right_normalized: Vec<Vec<f32>> = right.iter().map(|v| normalize_embedding(v)).collect();

    let mut matrix = Vec::with_capacity(left.len() * right.len());
    for row in left {
        let row = normalize_embedding(row);
        for column in &right_normalized {
            let dot: f32 = row.iter().zip(column.iter()).map(|(a, b)| a * b).sum();
            matrix.push(dot.clamp(-1.0, 1.0));
        }
    }
    matrix
}
