//! Elementary, shape-preserving pixel transforms.
//!
//! Every transform knows how to apply itself to a [`PixelBuffer`] and how to
//! describe its own inverse as another [`Transform`] value. Swap and Xor are
//! involutions; the others invert into a different parameterization.

use crate::buffer::PixelBuffer;
use crate::error::{PixcryptError, Result};
use crate::permutation::Permutation;
use serde::Serialize;
use std::fmt;

/// Default XOR key when a description omits `key`.
pub const DEFAULT_XOR_KEY: u8 = 123;
/// Default addend when a description omits `value`.
pub const DEFAULT_ADD_VALUE: i16 = 50;
/// Default multiplier when a description omits `factor`.
///
/// Even, so a pipeline relying on it is rejected as non-invertible.
pub const DEFAULT_MULTIPLY_FACTOR: u16 = 2;

/// Channel order applied by [`Transform::Swap`] (RGB <-> BGR).
const SWAP_ORDER: [usize; 3] = [2, 1, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Transform {
    /// Reverse the channel order of a 3-channel image.
    Swap,
    /// `s ^ key`
    Xor { key: u8 },
    /// `(s + value) mod 256`; `value` is already normalized into `0..=255`.
    Add { value: u8 },
    /// `(s * factor) mod 256`
    Multiply { factor: u16 },
    /// Reorder rows by `Permutation::generate(seed, height)`.
    ShuffleRows { seed: u64 },
    /// Reorder columns by `Permutation::generate(seed, width)`.
    #[serde(rename = "shuffle_cols")]
    ShuffleColumns { seed: u64 },
    /// Reorder rows by the inverse of `Permutation::generate(seed, height)`.
    UnshuffleRows { seed: u64 },
    /// Reorder columns by the inverse of `Permutation::generate(seed, width)`.
    #[serde(rename = "unshuffle_cols")]
    UnshuffleColumns { seed: u64 },
}

impl Transform {
    /// Additive transform with any signed offset, reduced mod 256.
    pub fn add(value: i16) -> Self {
        Self::Add {
            value: value.rem_euclid(256) as u8,
        }
    }

    /// Short operation name as used in pipeline descriptions.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Swap => "swap",
            Self::Xor { .. } => "xor",
            Self::Add { .. } => "add",
            Self::Multiply { .. } => "multiply",
            Self::ShuffleRows { .. } => "shuffle_rows",
            Self::ShuffleColumns { .. } => "shuffle_cols",
            Self::UnshuffleRows { .. } => "unshuffle_rows",
            Self::UnshuffleColumns { .. } => "unshuffle_cols",
        }
    }

    /// True for transforms that undo themselves.
    pub fn is_involution(&self) -> bool {
        match self {
            Self::Swap | Self::Xor { .. } => true,
            Self::Add { value } => *value == 0 || *value == 128,
            Self::Multiply { factor } => {
                let f = factor % 256;
                f == 1 || f == 255 || f == 127 || f == 129
            }
            _ => false,
        }
    }

    /// Check, without a buffer, that this transform has an inverse.
    pub fn ensure_invertible(&self) -> Result<()> {
        match self {
            Self::Multiply { factor } if factor % 2 == 0 => {
                Err(PixcryptError::NonInvertibleTransform(*factor))
            }
            _ => Ok(()),
        }
    }

    /// The transform whose `forward` undoes this one's `forward`.
    pub fn inverse(&self) -> Result<Transform> {
        Ok(match *self {
            Self::Swap => Self::Swap,
            Self::Xor { key } => Self::Xor { key },
            Self::Add { value } => Self::Add {
                value: value.wrapping_neg(),
            },
            Self::Multiply { factor } => Self::Multiply {
                factor: mod_inverse_256(factor)
                    .ok_or(PixcryptError::NonInvertibleTransform(factor))?,
            },
            Self::ShuffleRows { seed } => Self::UnshuffleRows { seed },
            Self::ShuffleColumns { seed } => Self::UnshuffleColumns { seed },
            Self::UnshuffleRows { seed } => Self::ShuffleRows { seed },
            Self::UnshuffleColumns { seed } => Self::ShuffleColumns { seed },
        })
    }

    /// Apply this transform to `buffer` in place.
    pub fn forward(&self, buffer: &mut PixelBuffer) -> Result<()> {
        match *self {
            Self::Swap => {
                if buffer.channels() != Some(SWAP_ORDER.len()) {
                    return Err(PixcryptError::Shape(format!(
                        "channel swap needs exactly 3 channels, buffer is {}",
                        buffer.shape()
                    )));
                }
                let order = Permutation::from_indices(SWAP_ORDER.to_vec())?;
                buffer.apply_channel_permutation(&order)
            }
            Self::Xor { key } => {
                buffer.apply_elementwise(|s| s ^ key);
                Ok(())
            }
            Self::Add { value } => {
                buffer.apply_elementwise(|s| s.wrapping_add(value));
                Ok(())
            }
            Self::Multiply { factor } => {
                let f = (factor % 256) as u8;
                buffer.apply_elementwise(|s| s.wrapping_mul(f));
                Ok(())
            }
            Self::ShuffleRows { seed } => {
                let perm = Permutation::generate(seed, buffer.height());
                buffer.apply_row_permutation(&perm)
            }
            Self::ShuffleColumns { seed } => {
                let perm = Permutation::generate(seed, buffer.width());
                buffer.apply_column_permutation(&perm)
            }
            Self::UnshuffleRows { seed } => {
                let perm = Permutation::generate(seed, buffer.height()).invert();
                buffer.apply_row_permutation(&perm)
            }
            Self::UnshuffleColumns { seed } => {
                let perm = Permutation::generate(seed, buffer.width()).invert();
                buffer.apply_column_permutation(&perm)
            }
        }
    }
}

/// Multiplicative inverse of `factor` modulo 256 via extended Euclid.
///
/// Returns `None` when `factor` is even, i.e. shares a factor with 256.
pub fn mod_inverse_256(factor: u16) -> Option<u16> {
    const MODULUS: i32 = 256;
    let (mut old_r, mut r) = (i32::from(factor) % MODULUS, MODULUS);
    let (mut old_s, mut s) = (1i32, 0i32);

    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }

    if old_r != 1 {
        return None;
    }
    Some(old_s.rem_euclid(MODULUS) as u16)
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Swap => write!(f, "swap"),
            Self::Xor { key } => write!(f, "xor(key={})", key),
            Self::Add { value } => write!(f, "add(value={})", value),
            Self::Multiply { factor } => write!(f, "multiply(factor={})", factor),
            Self::ShuffleRows { seed }
            | Self::ShuffleColumns { seed }
            | Self::UnshuffleRows { seed }
            | Self::UnshuffleColumns { seed } => write!(f, "{}(seed={})", self.name(), seed),
        }
    }
}

/// Short form `name[:param]`, e.g. `xor:42`, `add:-7`, `shuffle_rows:1234`.
impl std::str::FromStr for Transform {
    type Err = PixcryptError;
    fn from_str(s: &str) -> Result<Self> {
        let (name, param) = match s.split_once(':') {
            Some((name, param)) => (name.trim(), Some(param.trim())),
            None => (s.trim(), None),
        };

        fn parse_param<T: std::str::FromStr>(name: &str, param: &str) -> Result<T> {
            param.parse().map_err(|_| {
                PixcryptError::InvalidPipeline(format!("bad parameter for {}: {}", name, param))
            })
        }

        let name = name.to_lowercase();
        match (name.as_str(), param) {
            ("swap", None) => Ok(Self::Swap),
            ("swap", Some(_)) => Err(PixcryptError::InvalidPipeline(
                "swap takes no parameter".into(),
            )),
            ("xor", p) => Ok(Self::Xor {
                key: p.map(|p| parse_param(&name, p)).transpose()?.unwrap_or(DEFAULT_XOR_KEY),
            }),
            ("add", p) => Ok(Self::add(
                p.map(|p| parse_param(&name, p)).transpose()?.unwrap_or(DEFAULT_ADD_VALUE),
            )),
            ("multiply", p) => Ok(Self::Multiply {
                factor: p
                    .map(|p| parse_param(&name, p))
                    .transpose()?
                    .unwrap_or(DEFAULT_MULTIPLY_FACTOR),
            }),
            ("shuffle_rows", Some(p)) => Ok(Self::ShuffleRows {
                seed: parse_param(&name, p)?,
            }),
            ("shuffle_cols", Some(p)) => Ok(Self::ShuffleColumns {
                seed: parse_param(&name, p)?,
            }),
            ("shuffle_rows", None) | ("shuffle_cols", None) => Err(
                PixcryptError::InvalidPipeline(format!("{} requires a seed", name)),
            ),
            _ => Err(PixcryptError::UnsupportedOperation(format!("operation: {}", s))),
        }
    }
}
