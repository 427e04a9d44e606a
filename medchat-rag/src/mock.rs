//! Deterministic embeddings for tests and offline development.

use async_trait::async_trait;

use crate::document::Embedding;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;

/// Produces deterministic unit vectors derived from the text bytes.
///
/// The same text always maps to the same vector, and distinct texts almost
/// always map to distinct directions, so similarity search over mock
/// embeddings behaves sensibly: a query identical to a stored text scores
/// 1.0 against it.
#[derive(Debug, Clone)]
pub struct MockEmbeddings {
    dimensions: usize,
}

impl MockEmbeddings {
    /// Create a mock provider emitting vectors of the given dimension.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn vector_for(&self, text: &str) -> Embedding {
        // FNV-1a over the text seeds a splitmix-style stream per component.
        let mut state: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in text.bytes() {
            state ^= u64::from(byte);
            state = state.wrapping_mul(0x0000_0100_0000_01b3);
        }

        let mut vector = Vec::with_capacity(self.dimensions);
        for _ in 0..self.dimensions {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            // Top 31 bits scaled into [-1, 1).
            let unit = ((state >> 33) as f32) / (1u64 << 30) as f32;
            vector.push(unit - 1.0);
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for component in &mut vector {
                *component /= norm;
            }
        }
        vector
    }
}

impl Default for MockEmbeddings {
    /// Mirrors the dimensionality of `text-embedding-ada-002`.
    fn default() -> Self {
        Self::new(1536)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddings {
    fn name(&self) -> &str {
        "mock"
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        Ok(texts.iter().map(|text| self.vector_for(text)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
