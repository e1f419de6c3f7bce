use crate::buffer::Shape;
use crate::codec;
use crate::error::Result;
use crate::pipeline::Pipeline;
use log::info;
use std::path::Path;

/// Options shared by the encrypt and decrypt commands
#[derive(Debug, Clone)]
pub struct CryptOptions {
    pub pipeline: Pipeline,
}

impl Default for CryptOptions {
    fn default() -> Self {
        Self {
            pipeline: Pipeline::default_obfuscation(),
        }
    }
}

/// Encrypt an image file by running the pipeline forward.
/// Returns the shape of the processed image.
pub fn encrypt_image(input_path: &Path, output_path: &Path, options: &CryptOptions) -> Result<Shape> {
    let mut buffer = codec::decode(input_path)?;
    options.pipeline.apply_forward(&mut buffer)?;
    codec::encode(&buffer, output_path)?;

    info!(
        "Encrypted {} -> {} with {}",
        input_path.display(),
        output_path.display(),
        options.pipeline
    );
    Ok(buffer.shape())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelBuffer;
    use crate::transform::Transform;
    use tempfile::tempdir;

    #[test]
    fn test_encrypt_changes_pixels_and_keeps_shape() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.png");
        let output = dir.path().join("encrypted.png");

        let samples: Vec<u8> = (0..6 * 4 * 3).map(|i| (i * 3) as u8).collect();
        let original = PixelBuffer::new(6, 4, Some(3), samples).unwrap();
        codec::encode(&original, &input).unwrap();

        let shape = encrypt_image(&input, &output, &CryptOptions::default()).unwrap();
        assert_eq!(shape, original.shape());

        let encrypted = codec::decode(&output).unwrap();
        assert_eq!(encrypted.shape(), original.shape());
        assert_ne!(encrypted, original);
    }

    #[test]
    fn test_encrypt_grayscale_with_swap_fails_without_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("gray.png");
        let output = dir.path().join("never.png");
        codec::encode(&PixelBuffer::filled(3, 3, None, 8).unwrap(), &input).unwrap();

        let options = CryptOptions {
            pipeline: Pipeline::new(vec![Transform::Swap]).unwrap(),
        };
        assert!(encrypt_image(&input, &output, &options).is_err());
        assert!(!output.exists());
    }
}
