pub mod description;

pub use description::*;

use crate::buffer::PixelBuffer;
use crate::error::Result;
use crate::transform::Transform;
use log::{debug, info};
use sha3::{Digest, Sha3_256};
use std::fmt;

/// An ordered, validated list of transforms.
///
/// Decryption applies the inverse of each step in reverse order. Only for
/// involutions (Swap, Xor) does that coincide with re-applying the step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    transforms: Vec<Transform>,
}

impl Pipeline {
    /// Build a pipeline, rejecting any step that cannot be inverted.
    pub fn new(transforms: Vec<Transform>) -> Result<Self> {
        for t in &transforms {
            t.ensure_invertible()?;
        }
        Ok(Self { transforms })
    }

    /// The built-in pipeline used when no description is supplied.
    pub fn default_obfuscation() -> Self {
        Self {
            transforms: vec![
                Transform::Swap,
                Transform::Xor { key: 42 },
                Transform::ShuffleRows { seed: 1234 },
            ],
        }
    }

    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Encrypt: apply every transform in declared order.
    pub fn apply_forward(&self, buffer: &mut PixelBuffer) -> Result<()> {
        info!(
            "Applying {} transform(s) forward to {}",
            self.transforms.len(),
            buffer.shape()
        );
        for (step, t) in self.transforms.iter().enumerate() {
            debug!("step {}: {}", step, t);
            t.forward(buffer)?;
        }
        Ok(())
    }

    /// Decrypt: apply the inverse of every transform in reverse order.
    pub fn apply_inverse(&self, buffer: &mut PixelBuffer) -> Result<()> {
        info!(
            "Applying {} transform(s) in reverse to {}",
            self.transforms.len(),
            buffer.shape()
        );
        for (step, t) in self.transforms.iter().enumerate().rev() {
            let inverse = t.inverse()?;
            debug!("step {}: {} (undoing {})", step, inverse, t);
            inverse.forward(buffer)?;
        }
        Ok(())
    }

    /// The pipeline whose forward run equals this pipeline's inverse run.
    pub fn inverse(&self) -> Result<Pipeline> {
        let transforms = self
            .transforms
            .iter()
            .rev()
            .map(Transform::inverse)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { transforms })
    }

    /// SHA3-256 over the canonical JSON form, hex encoded.
    pub fn fingerprint(&self) -> Result<String> {
        let canonical = serde_json::to_vec(&self.transforms)?;
        let mut hasher = Sha3_256::new();
        hasher.update(b"pixcrypt_pipeline_v1");
        hasher.update(&canonical);
        Ok(hex::encode(hasher.finalize()))
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.transforms.is_empty() {
            return write!(f, "(empty)");
        }
        for (i, t) in self.transforms.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", t)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PixcryptError;

    fn sample_rgb(height: usize, width: usize) -> PixelBuffer {
        let samples = (0..height * width * 3)
            .map(|i| ((i * 31 + 7) % 256) as u8)
            .collect();
        PixelBuffer::new(height, width, Some(3), samples).unwrap()
    }

    fn full_pipeline() -> Pipeline {
        Pipeline::new(vec![
            Transform::Swap,
            Transform::Xor { key: 42 },
            Transform::add(-77),
            Transform::Multiply { factor: 3 },
            Transform::ShuffleRows { seed: 1234 },
            Transform::ShuffleColumns { seed: 4321 },
            Transform::Multiply { factor: 201 },
        ])
        .unwrap()
    }

    #[test]
    fn test_forward_inverse_roundtrip() {
        let original = sample_rgb(12, 9);
        let pipeline = full_pipeline();

        let mut buf = original.clone();
        pipeline.apply_forward(&mut buf).unwrap();
        assert_ne!(buf, original);
        assert_eq!(buf.shape(), original.shape());

        pipeline.apply_inverse(&mut buf).unwrap();
        assert_eq!(buf, original);
    }

    #[test]
    fn test_inverse_pipeline_matches_apply_inverse() {
        let original = sample_rgb(8, 8);
        let pipeline = full_pipeline();

        let mut encrypted = original.clone();
        pipeline.apply_forward(&mut encrypted).unwrap();

        let mut via_inverse = encrypted.clone();
        pipeline.inverse().unwrap().apply_forward(&mut via_inverse).unwrap();

        let mut via_apply = encrypted;
        pipeline.apply_inverse(&mut via_apply).unwrap();

        assert_eq!(via_inverse, via_apply);
        assert_eq!(via_apply, original);
    }

    #[test]
    fn test_inverse_order_is_reversed() {
        let pipeline = Pipeline::new(vec![
            Transform::add(1),
            Transform::ShuffleRows { seed: 3 },
        ])
        .unwrap();
        let inverse = pipeline.inverse().unwrap();
        assert_eq!(
            inverse.transforms(),
            &[
                Transform::UnshuffleRows { seed: 3 },
                Transform::Add { value: 255 },
            ]
        );
    }

    #[test]
    fn test_rejects_even_factor_at_construction() {
        let err = Pipeline::new(vec![Transform::Xor { key: 1 }, Transform::Multiply { factor: 2 }])
            .unwrap_err();
        assert!(matches!(err, PixcryptError::NonInvertibleTransform(2)));
    }

    #[test]
    fn test_xor_example() {
        let pipeline = Pipeline::new(vec![Transform::Xor { key: 42 }]).unwrap();
        let mut buf = PixelBuffer::filled(2, 2, Some(3), 0).unwrap();

        pipeline.apply_forward(&mut buf).unwrap();
        assert_eq!(buf.samples(), &[42u8; 12]);

        pipeline.apply_inverse(&mut buf).unwrap();
        assert_eq!(buf.samples(), &[0u8; 12]);
    }

    #[test]
    fn test_default_pipeline_roundtrip() {
        let original = sample_rgb(10, 4);
        let pipeline = Pipeline::default_obfuscation();

        let mut buf = original.clone();
        pipeline.apply_forward(&mut buf).unwrap();
        pipeline.apply_inverse(&mut buf).unwrap();
        assert_eq!(buf, original);
    }

    #[test]
    fn test_swap_on_grayscale_surfaces_shape_error() {
        let mut gray = PixelBuffer::filled(3, 3, None, 5).unwrap();
        let err = Pipeline::default_obfuscation()
            .apply_forward(&mut gray)
            .unwrap_err();
        assert!(matches!(err, PixcryptError::Shape(_)));
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let original = sample_rgb(2, 2);
        let pipeline = Pipeline::new(Vec::new()).unwrap();
        let mut buf = original.clone();
        pipeline.apply_forward(&mut buf).unwrap();
        pipeline.apply_inverse(&mut buf).unwrap();
        assert_eq!(buf, original);
        assert_eq!(pipeline.to_string(), "(empty)");
    }

    #[test]
    fn test_fingerprint_is_stable_and_order_sensitive() {
        let a = Pipeline::new(vec![Transform::Swap, Transform::Xor { key: 1 }]).unwrap();
        let b = Pipeline::new(vec![Transform::Swap, Transform::Xor { key: 1 }]).unwrap();
        let c = Pipeline::new(vec![Transform::Xor { key: 1 }, Transform::Swap]).unwrap();

        let fa = a.fingerprint().unwrap();
        assert_eq!(fa.len(), 64);
        assert_eq!(fa, b.fingerprint().unwrap());
        assert_ne!(fa, c.fingerprint().unwrap());
    }

    #[test]
    fn test_display_joins_steps() {
        assert_eq!(
            Pipeline::default_obfuscation().to_string(),
            "swap -> xor(key=42) -> shuffle_rows(seed=1234)"
        );
    }
}
