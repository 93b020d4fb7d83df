//! Sorting comparison
//!
//! Compares the standard library's stable sort against a hand-written
//! bubble sort on records keyed by field name, and times both over
//! generated datasets of increasing size.

pub mod bench;
pub mod error;
pub mod record;
pub mod sort;

pub use bench::{benchmark, generate_records, BenchmarkRow, DEFAULT_SIZES};
pub use error::{Result, SortError};
pub use record::{record, sample_employees, FieldValue, Record};
pub use sort::{builtin_sort_by_key, bubble_sort_by_key};
