//! The two sorting implementations under comparison

use crate::error::{Result, SortError};
use crate::record::{FieldValue, Record};

/// Value used for records missing the sort key
static MISSING: FieldValue = FieldValue::Int(0);

/// Stable library sort by `key`; records without `key` sort as `0`
pub fn builtin_sort_by_key(records: &[Record], key: &str, reverse: bool) -> Vec<Record> {
    let mut sorted = records.to_vec();
    if reverse {
        sorted.sort_by(|a, b| field(b, key).cmp(field(a, key)));
    } else {
        sorted.sort_by(|a, b| field(a, key).cmp(field(b, key)));
    }
    sorted
}

fn field<'a>(record: &'a Record, key: &str) -> &'a FieldValue {
    record.get(key).unwrap_or(&MISSING)
}

/// Textbook bubble sort by `key` on a copy of `records`.
///
/// Every record must carry `key`.
pub fn bubble_sort_by_key(records: &[Record], key: &str) -> Result<Vec<Record>> {
    if let Some(index) = records.iter().position(|r| !r.contains_key(key)) {
        return Err(SortError::MissingKey {
            index,
            key: key.to_string(),
        });
    }

    let mut result = records.to_vec();
    let n = result.len();
    for i in 0..n {
        for j in 0..n.saturating_sub(i + 1) {
            if result[j][key] > result[j + 1][key] {
                result.swap(j, j + 1);
            }
        }
    }
    Ok(result)
}

/// Values of `key` in order, for comparing two sort results
pub fn key_sequence<'a>(records: &'a [Record], key: &str) -> Vec<&'a FieldValue> {
    records.iter().map(|r| field(r, key)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{record, sample_employees};
    use test_case::test_case;

    fn names(records: &[Record]) -> Vec<String> {
        records.iter().map(|r| r["name"].to_string()).collect()
    }

    #[test]
    fn test_builtin_ascending_by_salary() {
        let sorted = builtin_sort_by_key(&sample_employees(), "salary", false);
        assert_eq!(names(&sorted), ["Bob", "Diana", "Alice", "Charlie"]);
    }

    #[test]
    fn test_builtin_descending_by_experience() {
        let sorted = builtin_sort_by_key(&sample_employees(), "experience", true);
        assert_eq!(names(&sorted), ["Charlie", "Alice", "Diana", "Bob"]);
    }

    #[test]
    fn test_builtin_missing_key_sorts_as_zero() {
        let mut employees = sample_employees();
        employees.push(record([("name", "Eve")]));
        let sorted = builtin_sort_by_key(&employees, "salary", false);
        assert_eq!(names(&sorted)[0], "Eve");
        assert_eq!(sorted.len(), 5);
    }

    #[test]
    fn test_builtin_is_stable() {
        let records = vec![
            record([("name", FieldValue::from("first")), ("rank", FieldValue::Int(1))]),
            record([("name", FieldValue::from("second")), ("rank", FieldValue::Int(1))]),
            record([("name", FieldValue::from("zero")), ("rank", FieldValue::Int(0))]),
        ];
        let sorted = builtin_sort_by_key(&records, "rank", false);
        assert_eq!(names(&sorted), ["zero", "first", "second"]);
    }

    #[test_case(&[] ; "empty")]
    #[test_case(&[7] ; "single")]
    #[test_case(&[3, 1, 2] ; "small")]
    #[test_case(&[5, 5, 1, 9, -3, 0, 5] ; "duplicates and negatives")]
    fn test_bubble_matches_builtin(values: &[i64]) {
        let records: Vec<Record> = values.iter().map(|&v| record([("value", v)])).collect();
        let bubble = bubble_sort_by_key(&records, "value").unwrap();
        let builtin = builtin_sort_by_key(&records, "value", false);
        assert_eq!(key_sequence(&bubble, "value"), key_sequence(&builtin, "value"));
    }

    #[test]
    fn test_bubble_leaves_input_untouched() {
        let employees = sample_employees();
        let sorted = bubble_sort_by_key(&employees, "salary").unwrap();
        assert_eq!(names(&employees), ["Alice", "Bob", "Charlie", "Diana"]);
        assert_eq!(names(&sorted), ["Bob", "Diana", "Alice", "Charlie"]);
    }

    #[test]
    fn test_bubble_rejects_missing_key() {
        let mut employees = sample_employees();
        employees.push(record([("name", "Eve")]));
        let err = bubble_sort_by_key(&employees, "salary").unwrap_err();
        assert_eq!(
            err,
            SortError::MissingKey {
                index: 4,
                key: "salary".to_string()
            }
        );
    }
}
