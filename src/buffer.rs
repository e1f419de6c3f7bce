//! Owned 8-bit pixel storage with an `(height, width[, channels])` shape.

use crate::error::{PixcryptError, Result};
use crate::permutation::Permutation;
use std::fmt;

/// Channel counts a buffer may carry on its channel axis.
pub const SUPPORTED_CHANNELS: [usize; 3] = [1, 3, 4];

const MAX_CHANNELS: usize = 4;

/// Row-major `u8` samples plus their shape.
///
/// `channels` is `None` for a plain 2D (grayscale) array, which has no
/// channel axis at all. That is distinct from `Some(1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    height: usize,
    width: usize,
    channels: Option<usize>,
    samples: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw samples, checking that the length matches the shape.
    pub fn new(
        height: usize,
        width: usize,
        channels: Option<usize>,
        samples: Vec<u8>,
    ) -> Result<Self> {
        if let Some(c) = channels {
            if !SUPPORTED_CHANNELS.contains(&c) {
                return Err(PixcryptError::InvalidBuffer(format!(
                    "unsupported channel count {} (expected 1, 3 or 4)",
                    c
                )));
            }
        }
        let expected = shape_len(height, width, channels)?;
        if samples.len() != expected {
            return Err(PixcryptError::InvalidBuffer(format!(
                "{} samples do not fit shape {}",
                samples.len(),
                Shape { height, width, channels }
            )));
        }
        Ok(Self {
            height,
            width,
            channels,
            samples,
        })
    }

    /// A buffer of the given shape with every sample set to `value`.
    pub fn filled(height: usize, width: usize, channels: Option<usize>, value: u8) -> Result<Self> {
        let len = shape_len(height, width, channels)?;
        Self::new(height, width, channels, vec![value; len])
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn channels(&self) -> Option<usize> {
        self.channels
    }

    pub fn shape(&self) -> Shape {
        Shape {
            height: self.height,
            width: self.width,
            channels: self.channels,
        }
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }

    /// Samples per pixel (1 when there is no channel axis).
    fn pixel_len(&self) -> usize {
        self.channels.unwrap_or(1)
    }

    fn row_len(&self) -> usize {
        self.width * self.pixel_len()
    }

    /// Map `f` over every sample in place.
    pub fn apply_elementwise<F: FnMut(u8) -> u8>(&mut self, mut f: F) {
        for sample in self.samples.iter_mut() {
            *sample = f(*sample);
        }
    }

    /// Reorder the channels of every pixel: new channel `i` is old channel
    /// `perm[i]`.
    pub fn apply_channel_permutation(&mut self, perm: &Permutation) -> Result<()> {
        let channels = self.channels.ok_or_else(|| {
            PixcryptError::Shape(format!(
                "channel permutation needs a channel axis, buffer is {}",
                self.shape()
            ))
        })?;
        check_axis("channel", channels, perm)?;

        let order = perm.as_slice();
        let mut scratch = [0u8; MAX_CHANNELS];
        for pixel in self.samples.chunks_exact_mut(channels) {
            scratch[..channels].copy_from_slice(pixel);
            for (dst, &src) in pixel.iter_mut().zip(order) {
                *dst = scratch[src];
            }
        }
        Ok(())
    }

    /// Reorder whole rows: new row `i` is old row `perm[i]`.
    pub fn apply_row_permutation(&mut self, perm: &Permutation) -> Result<()> {
        check_axis("row", self.height, perm)?;
        let row_len = self.row_len();
        if row_len == 0 {
            return Ok(());
        }

        let mut out = Vec::with_capacity(self.samples.len());
        for &src in perm.as_slice() {
            out.extend_from_slice(&self.samples[src * row_len..(src + 1) * row_len]);
        }
        self.samples = out;
        Ok(())
    }

    /// Reorder whole columns: new column `j` is old column `perm[j]`.
    pub fn apply_column_permutation(&mut self, perm: &Permutation) -> Result<()> {
        check_axis("column", self.width, perm)?;
        let pixel_len = self.pixel_len();
        let row_len = self.row_len();
        if row_len == 0 {
            return Ok(());
        }

        let mut out = Vec::with_capacity(self.samples.len());
        for row in self.samples.chunks_exact(row_len) {
            for &src in perm.as_slice() {
                out.extend_from_slice(&row[src * pixel_len..(src + 1) * pixel_len]);
            }
        }
        self.samples = out;
        Ok(())
    }
}

/// Sample count for a shape, or `InvalidBuffer` if it overflows `usize`.
fn shape_len(height: usize, width: usize, channels: Option<usize>) -> Result<usize> {
    height
        .checked_mul(width)
        .and_then(|n| n.checked_mul(channels.unwrap_or(1)))
        .ok_or_else(|| {
            PixcryptError::InvalidBuffer(format!(
                "shape {} overflows the addressable sample count",
                Shape { height, width, channels }
            ))
        })
}

fn check_axis(axis: &'static str, expected: usize, perm: &Permutation) -> Result<()> {
    if perm.len() != expected {
        return Err(PixcryptError::DimensionMismatch {
            axis,
            expected,
            actual: perm.len(),
        });
    }
    Ok(())
}

/// Buffer shape, displayed numpy-style as `(H, W)` or `(H, W, C)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub height: usize,
    pub width: usize,
    pub channels: Option<usize>,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.channels {
            Some(c) => write!(f, "({}, {}, {})", self.height, self.width, c),
            None => write!(f, "({}, {})", self.height, self.width),
        }
    }
}
