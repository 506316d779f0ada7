//! Variable and file-name maps.
//!
//! Both maps are supplied once per run. Keys are kept in ordered maps so that
//! serialising them is independent of construction order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::enums::Segment;
use crate::error::{ConfigError, Result};

/// Role of the subject identifier column.
pub const GROUP: &str = "GROUP";
/// Role of the outcome label column.
pub const LABEL: &str = "LABEL";
/// Role of the time index column of the dynamic segment.
pub const SEQUENCE: &str = "SEQUENCE";

/// A variable map entry: one column, or a list of feature columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarSpec {
    Column(String),
    Columns(Vec<String>),
}

impl VarSpec {
    pub fn as_column(&self) -> Option<&str> {
        match self {
            VarSpec::Column(name) => Some(name),
            VarSpec::Columns(_) => None,
        }
    }

    pub fn as_columns(&self) -> Option<&[String]> {
        match self {
            VarSpec::Column(_) => None,
            VarSpec::Columns(names) => Some(names),
        }
    }
}

impl From<&str> for VarSpec {
    fn from(value: &str) -> Self {
        VarSpec::Column(value.to_string())
    }
}

impl From<Vec<&str>> for VarSpec {
    fn from(value: Vec<&str>) -> Self {
        VarSpec::Columns(value.into_iter().map(str::to_string).collect())
    }
}

/// Mapping from logical role (`GROUP`, `LABEL`, `SEQUENCE`, segment feature
/// roles) to concrete column names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableMap(BTreeMap<String, VarSpec>);

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a role.
    #[must_use]
    pub fn with(mut self, role: impl Into<String>, spec: impl Into<VarSpec>) -> Self {
        self.0.insert(role.into(), spec.into());
        self
    }

    pub fn get(&self, role: &str) -> Option<&VarSpec> {
        self.0.get(role)
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.contains_key(role)
    }

    /// Single-column role lookup.
    pub fn column(&self, role: &str) -> Result<Option<&str>> {
        match self.0.get(role) {
            None => Ok(None),
            Some(spec) => spec.as_column().map(Some).ok_or_else(|| ConfigError::VariableShape {
                role: role.to_string(),
                expected: "a single column name",
            }),
        }
    }

    /// Feature-list role lookup (e.g. `STATIC`, `DYNAMIC`).
    pub fn columns(&self, role: &str) -> Result<Option<&[String]>> {
        match self.0.get(role) {
            None => Ok(None),
            Some(spec) => spec.as_columns().map(Some).ok_or_else(|| ConfigError::VariableShape {
                role: role.to_string(),
                expected: "a list of column names",
            }),
        }
    }

    /// The subject identifier column. Required for every run.
    pub fn group(&self) -> Result<&str> {
        self.column(GROUP)?.ok_or_else(|| ConfigError::MissingVariable {
            role: GROUP.to_string(),
        })
    }

    pub fn label(&self) -> Result<Option<&str>> {
        self.column(LABEL)
    }

    pub fn sequence(&self) -> Result<Option<&str>> {
        self.column(SEQUENCE)
    }

    /// A copy of this map without `role`.
    #[must_use]
    pub fn without(&self, role: &str) -> Self {
        let mut map = self.0.clone();
        map.remove(role);
        Self(map)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &VarSpec)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<VarSpec>> FromIterator<(K, V)> for VariableMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Mapping from segment to the file holding its table, relative to the data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileNames(BTreeMap<Segment, String>);

impl FileNames {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, segment: Segment, file_name: impl Into<String>) -> Self {
        self.0.insert(segment, file_name.into());
        self
    }

    pub fn get(&self, segment: Segment) -> Option<&str> {
        self.0.get(&segment).map(String::as_str)
    }

    pub fn contains(&self, segment: Segment) -> bool {
        self.0.contains_key(&segment)
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.0.keys().copied()
    }

    /// Resolve every entry against `data_dir`.
    pub fn resolve<'a>(
        &'a self,
        data_dir: &'a Path,
    ) -> impl Iterator<Item = (Segment, PathBuf)> + 'a {
        self.0
            .iter()
            .map(move |(segment, name)| (*segment, data_dir.join(name)))
    }

    /// A copy of this map without `segment`.
    #[must_use]
    pub fn without(&self, segment: Segment) -> Self {
        let mut map = self.0.clone();
        map.remove(&segment);
        Self(map)
    }

    /// The segment that enumerates the cohort: Static, else Outcome.
    pub fn subject_source(&self) -> Result<Segment> {
        [Segment::Static, Segment::Outcome]
            .into_iter()
            .find(|segment| self.contains(*segment))
            .ok_or(ConfigError::NoSubjectSource)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(Segment, S)> for FileNames {
    fn from_iter<T: IntoIterator<Item = (Segment, S)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}
