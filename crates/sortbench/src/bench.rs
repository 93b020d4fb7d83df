//! Timing comparison of the two sorts over generated data

use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, SortError};
use crate::record::{FieldValue, Record};
use crate::sort::{bubble_sort_by_key, builtin_sort_by_key, key_sequence};

/// Dataset sizes compared by default
pub const DEFAULT_SIZES: [usize; 3] = [10, 100, 1000];

const PRIORITIES: [&str; 3] = ["low", "medium", "high"];

/// Timing of both sorts for one dataset size
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkRow {
    pub size: usize,
    /// Seconds taken by the library sort
    pub builtin_secs: f64,
    /// Seconds taken by the bubble sort
    pub bubble_secs: f64,
    /// `bubble_secs / builtin_secs`, None when the library sort was too fast to measure
    pub speedup: Option<f64>,
    /// Both sorts produced the same key sequence
    pub verified: bool,
}

/// Random records with `id`, `value`, `priority` and `score` fields
pub fn generate_records<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Vec<Record> {
    (0..size)
        .map(|i| {
            let mut record = Record::new();
            record.insert("id".to_string(), FieldValue::Int(i as i64));
            record.insert("value".to_string(), FieldValue::Int(rng.gen_range(1..=1000)));
            let priority = PRIORITIES.choose(&mut *rng).copied().unwrap_or("low");
            record.insert("priority".to_string(), FieldValue::from(priority));
            record.insert("score".to_string(), FieldValue::Float(rng.gen_range(0.0..100.0)));
            record
        })
        .collect()
}

/// Time both sorts on one generated dataset per size
pub fn benchmark<R: Rng + ?Sized>(sizes: &[usize], key: &str, rng: &mut R) -> Result<Vec<BenchmarkRow>> {
    let mut rows = Vec::with_capacity(sizes.len());

    for &size in sizes {
        let data = generate_records(size, rng);

        let start = Instant::now();
        let builtin = builtin_sort_by_key(&data, key, false);
        let builtin_secs = start.elapsed().as_secs_f64();

        let start = Instant::now();
        let bubble = bubble_sort_by_key(&data, key)?;
        let bubble_secs = start.elapsed().as_secs_f64();

        if key_sequence(&builtin, key) != key_sequence(&bubble, key) {
            return Err(SortError::Mismatch {
                size,
                key: key.to_string(),
            });
        }

        let speedup = (builtin_secs > 0.0).then(|| bubble_secs / builtin_secs);
        debug!("size {}: builtin {:.6}s, bubble {:.6}s", size, builtin_secs, bubble_secs);

        rows.push(BenchmarkRow {
            size,
            builtin_secs,
            bubble_secs,
            speedup,
            verified: true,
        });
    }

    info!("Benchmarked {} dataset size(s) on key '{}'", rows.len(), key);
    Ok(rows)
}
