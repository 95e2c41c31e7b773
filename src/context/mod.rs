pub mod delete;
pub mod instructions;
pub mod query;
pub mod search;
pub mod stats;
pub mod store;
pub mod summary;
pub mod tags;
pub mod types;

/// Convert an f32 embedding slice to raw bytes for sqlite-vec.
pub fn embedding_to_bytes(embedding: &[f32]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            embedding.as_ptr() as *const u8,
            embedding.len() * std::mem::size_of::<f32>(),
        )
    }
}

/// Cosine similarity recovered from the L2 distance between two unit vectors:
/// `d² = 2 - 2·cos`, so `cos = 1 - d²/2`.
pub fn l2_distance_to_similarity(distance: f64) -> f64 {
    1.0 - (distance * distance) / 2.0
}
