//! # Structural diff of JSON configuration files
//!
//! `cfgdiff` compares a reference JSON document with a sample document and reports every
//! leaf-level discrepancy, keyed by the dotted path of the value from the document root.
//! Objects present on both sides are walked into and never reported themselves; everything
//! else (arrays included) is compared as a whole.
//!
//! ## Examples
//!
//! **Compare two configuration files**
//!
//! ```rust
#![doc = include_str!("../demos/simple_object_diff.rs")]
//! ```
//!
//! Output:
//! ```json
#![doc = include_str!("../demos/simple_object_diff.json")]
//! ```
mod element_path_parser;

pub mod config;
pub mod diff_set;
pub mod error;
pub mod loader;
pub mod path;
pub mod report;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use approx::relative_eq;
use chrono::DateTime;
use derive_builder::Builder;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

pub use crate::diff_set::{DiffEntry, DiffSet};
pub use crate::error::{ConfigError, DiffError, DiffResult, LoadError, Side};
pub use crate::path::{IgnorePath, KeyPath, Path, PathElement};

/// The JSON type of a value, as named in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Null,
    Array,
    Bool,
    Object,
    String,
    Number,
}

impl From<&Value> for Type {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Type::Null,
            Value::Bool(_) => Type::Bool,
            Value::Number(_) => Type::Number,
            Value::String(_) => Type::String,
            Value::Array(_) => Type::Array,
            Value::Object(_) => Type::Object,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Null => "null",
            Type::Array => "array",
            Type::Bool => "boolean",
            Type::Object => "object",
            Type::String => "string",
            Type::Number => "number",
        };
        f.write_str(name)
    }
}

/// What to do when a key holds an object on one side and anything else on the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeMismatchPolicy {
    /// Record both values as a single leaf difference at that path.
    #[default]
    Record,
    /// Fail the whole comparison with [`DiffError::TypeMismatch`].
    Reject,
}

/// Use [`DiffBuilder`] to configure a [`Diff`] and run [`Diff::compare`] to get the
/// differences between a reference and a sample document.
///
/// A `Diff` keeps no state between calls, so one instance can be reused and shared.
#[derive(Default, Builder, Debug, Clone)]
pub struct Diff {
    /// Patterns of paths to skip.
    /// Use [`DiffBuilder::ignore_path`] to add them in a more convenient way.
    #[builder(default = vec![])]
    ignore_paths: Vec<IgnorePath>,

    /// If not zero, numbers that are not both integers are compared using
    /// [`approx::relative_eq`] with this epsilon, e.g. `0.19999999999999 ~ 0.2`.
    /// When zero they must have the same `f64` value.
    #[builder(default = 0.0)]
    approx_float_eq_epsilon: f64,

    /// An acceptable difference between two string values that are both valid
    /// `rfc3339` timestamps. Only applied when not zero.
    #[builder(default = Duration::from_millis(0))]
    approx_date_time_eq_duration: Duration,

    /// How an object facing a non-object at the same key is handled.
    #[builder(default)]
    type_mismatch: TypeMismatchPolicy,
}

impl DiffBuilder {
    /// Set a dotted path pattern to skip during the comparison.
    /// A string path will be parsed to [`Path`] and appended to the ignored paths.
    ///
    /// ## Examples
    ///
    /// `database.password` skips `password` inside `database`:
    ///
    /// ```json
    /// {
    ///     "database": {
    ///         "host": "db.internal",
    ///         "password": "hunter2"
    ///     }
    /// }
    /// ```
    ///
    /// `*` matches any single key, so `services.*.port` skips the `port` of every service,
    /// and a key containing dots can be quoted: `logging.'Microsoft.AspNetCore'`.
    /// Ignoring an object path skips its whole subtree.
    ///
    /// <div class="warning">
    ///
    /// **NOTE**: if the key is missing in the reference or the sample, the result will still
    /// report it. Use [`DiffBuilder::ignore_path_with_missing`] with `ignore_missing` set to
    /// true instead.
    ///
    /// </div>
    pub fn ignore_path(&mut self, path: &str) -> &mut Self {
        self.ignore_path_with_missing(path, false)
    }

    /// Adds a path to the ignored ones. `ignore_missing` indicates whether the key should
    /// also be skipped when it is present on only one side.
    /// See [`DiffBuilder::ignore_path`] for the pattern syntax.
    pub fn ignore_path_with_missing(&mut self, path: &str, ignore_missing: bool) -> &mut Self {
        match Path::from_str(path) {
            Ok(elements) => self
                .ignore_paths
                .get_or_insert_with(Vec::new)
                .push(IgnorePath(elements, ignore_missing)),
            Err(reason) => warn!(pattern = path, %reason, "skipping invalid ignore path"),
        }
        self
    }
}

/// Compares two documents with the default options.
pub fn compare(reference: &Value, sample: &Value) -> DiffResult<DiffSet> {
    Diff::default().compare(reference, sample)
}

impl Diff {
    /// Reports every discrepancy between `reference` and `sample`, both of which must be
    /// JSON objects.
    ///
    /// Entries come in discovery order: at each level the reference keys first, depth-first,
    /// then the keys only the sample has.
    pub fn compare(&self, reference: &Value, sample: &Value) -> DiffResult<DiffSet> {
        let reference = root_object(reference, Side::Reference)?;
        let sample = root_object(sample, Side::Sample)?;

        let mut differences = DiffSet::new();
        self.objects(reference, sample, &KeyPath::root(), &mut differences)?;

        debug!(
            differences = differences.len(),
            changed = differences.changed(),
            missing_in_sample = differences.missing_in_sample(),
            missing_in_reference = differences.missing_in_reference(),
            "compared documents"
        );
        Ok(differences)
    }

    fn objects(
        &self,
        reference: &Map<String, Value>,
        sample: &Map<String, Value>,
        parent: &KeyPath,
        differences: &mut DiffSet,
    ) -> DiffResult<()> {
        for (key, reference_value) in reference {
            let path = parent.child(key);

            let Some(sample_value) = sample.get(key) else {
                if !self.ignore_path(&path, false) {
                    record(differences, &path, DiffEntry::only_in_reference(reference_value.clone()));
                }
                continue;
            };

            if self.ignore_path(&path, true) {
                continue;
            }

            match (reference_value, sample_value) {
                (Value::Object(reference_value), Value::Object(sample_value)) => {
                    self.objects(reference_value, sample_value, &path, differences)?;
                }
                (Value::Object(_), _) | (_, Value::Object(_)) => match self.type_mismatch {
                    TypeMismatchPolicy::Record => record(
                        differences,
                        &path,
                        DiffEntry::changed(reference_value.clone(), sample_value.clone()),
                    ),
                    TypeMismatchPolicy::Reject => {
                        return Err(DiffError::TypeMismatch {
                            path: path.to_string(),
                            reference: reference_value.into(),
                            sample: sample_value.into(),
                        })
                    }
                },
                _ => {
                    if !self.values_eq(reference_value, sample_value) {
                        record(
                            differences,
                            &path,
                            DiffEntry::changed(reference_value.clone(), sample_value.clone()),
                        );
                    }
                }
            }
        }

        for (key, sample_value) in sample {
            if reference.contains_key(key) {
                continue;
            }
            let path = parent.child(key);
            if !self.ignore_path(&path, false) {
                record(differences, &path, DiffEntry::only_in_sample(sample_value.clone()));
            }
        }

        Ok(())
    }

    /// Deep equality of two values. Object key order is irrelevant, array order is not.
    fn values_eq(&self, reference: &Value, sample: &Value) -> bool {
        use serde_json::Value::{Array, Bool, Null, Number, Object, String};

        match (reference, sample) {
            (Null, Null) => true,
            (Bool(reference), Bool(sample)) => reference == sample,
            (Number(reference), Number(sample)) => self.numbers_eq(reference, sample),
            (String(reference), String(sample)) => self.strings_eq(reference, sample),
            (Array(reference), Array(sample)) => {
                reference.len() == sample.len()
                    && reference.iter().zip(sample).all(|(r, s)| self.values_eq(r, s))
            }
            (Object(reference), Object(sample)) => {
                reference.len() == sample.len()
                    && reference
                        .iter()
                        .all(|(key, r)| sample.get(key).is_some_and(|s| self.values_eq(r, s)))
            }
            _ => false,
        }
    }

    fn numbers_eq(&self, reference: &serde_json::Number, sample: &serde_json::Number) -> bool {
        if reference.is_u64() && sample.is_u64() || reference.is_i64() && sample.is_i64() {
            return reference == sample;
        }
        match (reference.as_f64(), sample.as_f64()) {
            (Some(reference), Some(sample)) if self.approx_float_eq_epsilon == 0.0 => reference == sample,
            (Some(reference), Some(sample)) => {
                relative_eq!(reference, sample, epsilon = self.approx_float_eq_epsilon)
            }
            _ => reference == sample,
        }
    }

    fn strings_eq(&self, reference: &str, sample: &str) -> bool {
        if reference == sample {
            return true;
        }
        if self.approx_date_time_eq_duration.is_zero() {
            return false;
        }

        match (
            DateTime::parse_from_rfc3339(reference),
            DateTime::parse_from_rfc3339(sample),
        ) {
            (Ok(reference), Ok(sample)) => (reference - sample)
                .abs()
                .to_std()
                .is_ok_and(|delta| delta <= self.approx_date_time_eq_duration),
            _ => false,
        }
    }

    /// Returns true if `path` should be skipped.
    /// `has_key` tells whether both documents have the key; a key present on one side only
    /// is skipped only when its pattern was added with `ignore_missing`.
    fn ignore_path(&self, path: &KeyPath, has_key: bool) -> bool {
        self.ignore_paths
            .iter()
            .filter(|IgnorePath(pattern, _)| pattern.matches(path))
            .any(|IgnorePath(_, ignore_missing)| has_key || *ignore_missing)
    }
}

fn root_object(value: &Value, side: Side) -> DiffResult<&Map<String, Value>> {
    value.as_object().ok_or(DiffError::MissingInput {
        side,
        found: value.into(),
    })
}

fn record(differences: &mut DiffSet, path: &KeyPath, entry: DiffEntry) {
    trace!(path = %path, "difference");
    if !differences.insert(path.to_string(), entry) {
        warn!(path = %path, "dotted path collides with an earlier difference, keeping the first");
    }
}
