use super::Pipeline;
use crate::error::{PixcryptError, Result};
use crate::transform::{
    Transform, DEFAULT_ADD_VALUE, DEFAULT_MULTIPLY_FACTOR, DEFAULT_XOR_KEY,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One `{ "name": ..., params }` entry of a pipeline description file.
///
/// Unknown parameter names are rejected so a typo cannot silently fall back
/// to a default. Shuffle seeds are optional here only so a missing seed is
/// reported as a pipeline error naming the step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case", deny_unknown_fields)]
pub enum OperationRecord {
    Swap,
    Xor {
        #[serde(default = "default_key")]
        key: u8,
    },
    Add {
        #[serde(default = "default_value")]
        value: i16,
    },
    Multiply {
        #[serde(default = "default_factor")]
        factor: u16,
    },
    ShuffleRows {
        #[serde(default)]
        seed: Option<u64>,
    },
    ShuffleCols {
        #[serde(default)]
        seed: Option<u64>,
    },
}

fn default_key() -> u8 {
    DEFAULT_XOR_KEY
}

fn default_value() -> i16 {
    DEFAULT_ADD_VALUE
}

fn default_factor() -> u16 {
    DEFAULT_MULTIPLY_FACTOR
}

impl OperationRecord {
    /// Resolve into a transform; `index` is only used for error messages.
    pub fn to_transform(&self, index: usize) -> Result<Transform> {
        let missing_seed = |name: &str| {
            PixcryptError::InvalidPipeline(format!("step {} ({}) requires a seed", index, name))
        };
        Ok(match *self {
            Self::Swap => Transform::Swap,
            Self::Xor { key } => Transform::Xor { key },
            Self::Add { value } => Transform::add(value),
            Self::Multiply { factor } => Transform::Multiply { factor },
            Self::ShuffleRows { seed } => Transform::ShuffleRows {
                seed: seed.ok_or_else(|| missing_seed("shuffle_rows"))?,
            },
            Self::ShuffleCols { seed } => Transform::ShuffleColumns {
                seed: seed.ok_or_else(|| missing_seed("shuffle_cols"))?,
            },
        })
    }
}

/// Build a pipeline from description records.
pub fn pipeline_from_records(records: &[OperationRecord]) -> Result<Pipeline> {
    let transforms = records
        .iter()
        .enumerate()
        .map(|(i, record)| record.to_transform(i))
        .collect::<Result<Vec<_>>>()?;
    Pipeline::new(transforms)
}

/// Parse a JSON array of operation records.
pub fn parse_pipeline_json(json: &str) -> Result<Pipeline> {
    let records: Vec<OperationRecord> = serde_json::from_str(json)?;
    pipeline_from_records(&records)
}

/// Read a JSON pipeline description from disk.
pub fn load_pipeline(path: &Path) -> Result<Pipeline> {
    let json = std::fs::read_to_string(path)?;
    parse_pipeline_json(&json)
}

/// Build a pipeline from short-form operations such as `xor:42`.
pub fn parse_pipeline_ops<S: AsRef<str>>(ops: &[S]) -> Result<Pipeline> {
    let transforms = ops
        .iter()
        .map(|op| op.as_ref().parse::<Transform>())
        .collect::<Result<Vec<_>>>()?;
    Pipeline::new(transforms)
}
