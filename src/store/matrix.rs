use crate::error::{AppError, AppResult};

/// Square, row-major matrix of pairwise similarity scores
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dimension: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Builds a matrix from its rows, rejecting ragged input and non-finite scores.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> AppResult<Self> {
        let dimension = rows.len();
        let mut scores = Vec::with_capacity(dimension * dimension);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dimension {
                return Err(AppError::Artifact(format!(
                    "Similarity row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    dimension
                )));
            }
            scores.extend(row);
        }

        Self::from_flat(dimension, scores)
    }

    /// Decodes `dimension * dimension` little-endian `f32` values.
    pub fn from_le_bytes(dimension: usize, bytes: &[u8]) -> AppResult<Self> {
        let expected = dimension
            .checked_mul(dimension)
            .and_then(|cells| cells.checked_mul(4))
            .ok_or_else(|| AppError::Artifact(format!("Dimension {} is too large", dimension)))?;

        if bytes.len() != expected {
            return Err(AppError::Artifact(format!(
                "Similarity artifact has {} bytes, expected {} for a {}x{} f32 matrix",
                bytes.len(),
                expected,
                dimension,
                dimension
            )));
        }

        let scores = bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        Self::from_flat(dimension, scores)
    }

    fn from_flat(dimension: usize, scores: Vec<f32>) -> AppResult<Self> {
        if let Some(position) = scores.iter().position(|score| !score.is_finite()) {
            return Err(AppError::Artifact(format!(
                "Non-finite similarity score at row {}, column {}",
                position / dimension,
                position % dimension
            )));
        }

        Ok(Self { dimension, scores })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Similarity of movie `index` to every movie, or `None` when out of range
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.dimension {
            return None;
        }
        let start = index * self.dimension;
        Some(&self.scores[start..start + self.dimension])
    }
}
