//! Core data model shared with sweep generators and result tooling
//!
//! An [`ExperimentSet`] is produced by an external sweep generator and handed
//! to the orchestrator untouched. Each [`Experiment`] is a unique name plus the
//! parameters that fill the configuration template for one simulator run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::errors::{SharedError, SharedResult};

/// A single scalar template parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    /// Integers above `i64::MAX`, kept exact instead of decaying to a float
    UInt(u64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(value) => write!(f, "{value}"),
            ParamValue::UInt(value) => write!(f, "{value}"),
            ParamValue::Float(value) => f.write_str(&format_float(*value)),
            ParamValue::Text(value) => f.write_str(value),
        }
    }
}

/// Shortest round-trip float text in the form sweep configs use
///
/// Debug already keeps the decimal point on integral floats (`40000000000.0`)
/// and switches to an exponent at the same cutoffs. The exponent is rewritten
/// to carry a sign and at least two digits (`9.50003e-06`, `1e+16`).
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(value) => ParamValue::Int(value),
            Err(_) => ParamValue::UInt(value),
        }
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

/// Parameters of one experiment
///
/// Positional parameters fill template slots in order. Named parameters are
/// matched against the template's slot names and must cover them exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Parameters {
    Positional(Vec<ParamValue>),
    Named(BTreeMap<String, ParamValue>),
}

impl Parameters {
    pub fn len(&self) -> usize {
        match self {
            Parameters::Positional(values) => values.len(),
            Parameters::Named(fields) => fields.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<ParamValue>> for Parameters {
    fn from(values: Vec<ParamValue>) -> Self {
        Parameters::Positional(values)
    }
}

impl From<BTreeMap<String, ParamValue>> for Parameters {
    fn from(fields: BTreeMap<String, ParamValue>) -> Self {
        Parameters::Named(fields)
    }
}

/// A named unit of work driving one simulator invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Experiment {
    name: String,
    parameters: Parameters,
}

impl Experiment {
    pub fn new(name: impl Into<String>, parameters: impl Into<Parameters>) -> SharedResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            parameters: parameters.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}

/// Experiment names become artifact file names, so they must be a single
/// path component.
fn validate_name(name: &str) -> SharedResult<()> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name is a relative path component")
    } else if name.contains(['/', '\\']) {
        Some("name contains a path separator")
    } else if name.contains('\0') {
        Some("name contains a NUL byte")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(SharedError::InvalidExperimentName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Mapping from experiment name to experiment, iterated in name order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Parameters>", into = "BTreeMap<String, Parameters>")]
pub struct ExperimentSet {
    experiments: BTreeMap<String, Experiment>,
}

impl ExperimentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an experiment, rejecting names already present
    pub fn insert(&mut self, name: impl Into<String>, parameters: impl Into<Parameters>) -> SharedResult<()> {
        let experiment = Experiment::new(name, parameters)?;
        if self.experiments.contains_key(experiment.name()) {
            return Err(SharedError::DuplicateExperiment {
                name: experiment.name,
            });
        }
        self.experiments.insert(experiment.name.clone(), experiment);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Experiment> {
        self.experiments.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Experiment> {
        self.experiments.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.experiments.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    /// Parse a JSON object of `name -> parameters`
    ///
    /// A name repeated inside the object keeps its last value, like a JSON
    /// object loaded into a dict. Only [`ExperimentSet::insert`] rejects
    /// duplicates.
    pub fn from_json_str(json: &str) -> SharedResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> SharedResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SharedError::ReadError {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

impl TryFrom<BTreeMap<String, Parameters>> for ExperimentSet {
    type Error = SharedError;

    fn try_from(raw: BTreeMap<String, Parameters>) -> Result<Self, Self::Error> {
        let mut set = ExperimentSet::new();
        for (name, parameters) in raw {
            set.insert(name, parameters)?;
        }
        Ok(set)
    }
}

impl From<ExperimentSet> for BTreeMap<String, Parameters> {
    fn from(set: ExperimentSet) -> Self {
        set.experiments
            .into_iter()
            .map(|(name, experiment)| (name, experiment.parameters))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ExperimentSet {
    type Item = &'a Experiment;
    type IntoIter = std::collections::btree_map::Values<'a, String, Experiment>;

    fn into_iter(self) -> Self::IntoIter {
        self.experiments.values()
    }
}
