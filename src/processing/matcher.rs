//! Greedy paragraph matching between two documents.

use std::cmp::Ordering;

use crate::domain::document::Document;
use crate::domain::similarity::MatchResult;
use crate::errors::{SimilarityError, SimilarityResult};
use crate::models::config::{AcceptancePolicy, MatcherSettings};
use crate::processing::embedding::cosine_matrix;

/// Paragraph pairs accepted by the greedy scan.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct GreedyOutcome {
    pub pairs: Vec<(usize, usize)>,
    pub total_score: f64,
}

#[derive(Clone, Copy)]
struct Cell {
    score: f32,
    row: usize,
    column: usize,
}

/// Sort cells by score descending, then `(row, column)` ascending.
fn cell_order(a: &Cell, b: &Cell) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then(a.row.cmp(&b.row))
        .then(a.column.cmp(&b.column))
}

/// Accept the best still-unmatched paragraph pairs scoring at least
/// `threshold`, one paragraph per side at most once.
pub(crate) fn greedy_match(
    left: &[Vec<f32>],
    right: &[Vec<f32>],
    threshold: f64,
) -> GreedyOutcome {
    let (rows, columns) = (left.len(), right.len());
    if rows == 0 || columns == 0 {
        return GreedyOutcome::default();
    }
    let matrix = cosine_matrix(left, right);

    let mut cells: Vec<Cell> = matrix
        .iter()
        .enumerate()
        .map(|(offset, &score)| Cell {
            score,
            row: offset / columns,
            column: offset % columns,
        })
        .collect();
    cells.sort_by(cell_order);

    let limit = rows.min(columns);
    let mut used_rows = vec![false; rows];
    let mut used_columns = vec![false; columns];
    let mut outcome = GreedyOutcome::default();

    for cell in cells {
        if outcome.pairs.len() == limit || f64::from(cell.score) < threshold {
            break;
        }
        if used_rows[cell.row] || used_columns[cell.column] {
            continue;
        }
        used_rows[cell.row] = true;
        used_columns[cell.column] = true;
        outcome.total_score += f64::from(cell.score);
        outcome.pairs.push((cell.row, cell.column));
    }

    outcome
}

/// Whether `matched` paragraphs out of the shorter document's `min_length`
/// are enough to call the two documents the same story.
pub(crate) fn is_accepted(
    settings: &MatcherSettings,
    matched: usize,
    min_length: usize,
    total_score: f64,
) -> bool {
    let ratio_met = matched as f64 >= settings.content_similarity_ratio * min_length as f64;
    match settings.policy {
        AcceptancePolicy::Ratio => ratio_met,
        AcceptancePolicy::Tiered => {
            (min_length == 1 && matched == 1)
                || ((2..=3).contains(&min_length) && ratio_met)
                || matched >= 3
        }
        AcceptancePolicy::ScoreMass => {
            total_score >= settings.similarity_threshold * min_length as f64
        }
    }
}

fn check_dimensions(document: &Document, expected: usize) -> SimilarityResult<()> {
    for (paragraph, vector) in document.embeddings.iter().enumerate() {
        if vector.is_empty() || vector.len() != expected {
            return Err(SimilarityError::Shape {
                document: document.id.clone(),
                reason: format!(
                    "paragraph {paragraph} has dimension {}, expected {expected}",
                    vector.len()
                ),
            });
        }
    }
    Ok(())
}

/// Compare two documents, `left` at corpus position `left_index` and `right`
/// at `right_index`.
///
/// Returns `Ok(None)` when either document has no paragraphs or the pair
/// fails the configured acceptance policy. Mismatched embedding dimensions
/// are reported as a shape error.
pub fn match_documents(
    left: &Document,
    left_index: usize,
    right: &Document,
    right_index: usize,
    settings: &MatcherSettings,
) -> SimilarityResult<Option<MatchResult>> {
    let (rows, columns) = (left.paragraph_count(), right.paragraph_count());
    if rows == 0 || columns == 0 {
        return Ok(None);
    }

    let dimension = left.embeddings[0].len();
    check_dimensions(left, dimension)?;
    check_dimensions(right, dimension)?;

    let outcome = greedy_match(
        &left.embeddings,
        &right.embeddings,
        settings.similarity_threshold,
    );
    let min_length = rows.min(columns);
    let matched = outcome.pairs.len();

    if !is_accepted(settings, matched, min_length, outcome.total_score) {
        return Ok(None);
    }

    let left_is_key = match rows.cmp(&columns) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => left_index < right_index,
    };
    let (key, val) = if left_is_key {
        (left_index, right_index)
    } else {
        (right_index, left_index)
    };

    Ok(Some(MatchResult {
        key,
        val,
        score: (outcome.total_score / min_length as f64) as f32,
    }))
}
