/// Precomputed similarity data
///
/// The catalog and its similarity matrix are loaded once at startup, validated,
/// and shared read-only between requests.
use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::CatalogEntry,
};

pub mod artifact;
pub mod matrix;

pub use artifact::load;
pub use matrix::SimilarityMatrix;

#[derive(Debug)]
pub struct SimilarityStore {
    catalog: Vec<CatalogEntry>,
    matrix: SimilarityMatrix,
    /// Title → first catalog index carrying it
    title_index: HashMap<String, usize>,
}

impl SimilarityStore {
    /// Pairs a catalog with its matrix, enforcing that they describe the same movies.
    pub fn new(catalog: Vec<CatalogEntry>, matrix: SimilarityMatrix) -> AppResult<Self> {
        if catalog.is_empty() {
            return Err(AppError::Artifact("Movie catalog is empty".to_string()));
        }

        if catalog.len() != matrix.dimension() {
            return Err(AppError::Artifact(format!(
                "Catalog has {} movies but the similarity matrix is {}x{}",
                catalog.len(),
                matrix.dimension(),
                matrix.dimension()
            )));
        }

        let mut title_index = HashMap::with_capacity(catalog.len());
        let mut duplicates = 0usize;
        for (index, entry) in catalog.iter().enumerate() {
            if title_index.contains_key(&entry.title) {
                duplicates += 1;
            } else {
                title_index.insert(entry.title.clone(), index);
            }
        }

        if duplicates > 0 {
            tracing::warn!(
                duplicates,
                "Catalog contains duplicate titles; lookups resolve to the first occurrence"
            );
        }

        Ok(Self {
            catalog,
            matrix,
            title_index,
        })
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Catalog index of the first movie with exactly this title
    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }

    pub fn entry(&self, index: usize) -> Option<&CatalogEntry> {
        self.catalog.get(index)
    }

    pub fn similarity_row(&self, index: usize) -> Option<&[f32]> {
        self.matrix.row(index)
    }

    /// All titles in catalog order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.catalog.iter().map(|entry| entry.title.as_str())
    }
}
