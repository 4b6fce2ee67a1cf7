use std::{
    collections::{BTreeMap, HashSet},
    hash::Hash,
};

use serde::{Deserialize, Serialize};

/// Field name to message mapping, produced when a [`Validator`] recorded any failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(transparent)]
#[error("{}", format_errors(.0))]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn format_errors(errors: &BTreeMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Collects validation failures keyed by field name.
///
/// Only the first failure recorded for a field is kept, later checks on the same
/// field are still evaluated but do not replace the message.
/// A new validator is expected for each validated value.
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .0
            .entry(field.into())
            .or_insert_with(|| message.into());
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_error(field, message);
        }
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.valid() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    /// True if no value in the slice repeats.
    pub fn unique<T: Eq + Hash>(values: &[T]) -> bool {
        let mut seen = HashSet::with_capacity(values.len());
        values.iter().all(|v| seen.insert(v))
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn test_fresh_validator_is_valid() {
        let v = Validator::new();
        assert!(v.valid());
        assert!(v.into_result().is_ok());
    }

    #[test]
    fn test_first_failure_wins() {
        let mut v = Validator::new();
        v.check(true, "title", "ok");
        v.check(false, "title", "must be provided");
        v.check(false, "title", "must not be more than 500 bytes long");
        v.check(false, "year", "must be provided");

        assert!(!v.valid());
        let errors = v.into_result().unwrap_err();
        assert_eq!(2, errors.len());
        assert_eq!(Some("must be provided"), errors.get("title"));
        assert_eq!(Some("must be provided"), errors.get("year"));
        assert!(!errors.contains("runtime"));
    }

    #[test]
    fn test_unique() {
        assert!(Validator::unique(&["Drama", "Noir"]));
        assert!(!Validator::unique(&["Drama", "Drama"]));
        assert!(Validator::unique::<String>(&[]));
        assert!(!Validator::unique(&[1, 2, 3, 1]));
    }

    #[test]
    fn test_errors_serialize_as_map() {
        let mut v = Validator::new();
        v.add_error("genres", "must contain at least 1 genre");
        v.add_error("runtime", "must be a positive integer");
        let json = serde_json::to_value(v.errors()).unwrap();
        assert_eq!(
            serde_json::json!({
                "genres": "must contain at least 1 genre",
                "runtime": "must be a positive integer"
            }),
            json
        );
        assert_eq!(
            "genres: must contain at least 1 genre, runtime: must be a positive integer",
            v.errors().to_string()
        );
    }

    #[quickcheck]
    fn test_unique_matches_set_size(values: Vec<u8>) -> bool {
        let distinct = values.iter().collect::<HashSet<_>>().len();
        Validator::unique(&values) == (distinct == values.len())
    }

    #[quickcheck]
    fn test_valid_iff_all_checks_pass(checks: Vec<(bool, u8)>) -> bool {
        let mut v = Validator::new();
        for (ok, field) in &checks {
            v.check(*ok, &format!("f{field}"), "failed");
        }
        v.valid() == checks.iter().all(|(ok, _)| *ok)
    }
}
