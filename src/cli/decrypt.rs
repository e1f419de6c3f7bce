use crate::buffer::Shape;
use crate::cli::encrypt::CryptOptions;
use crate::codec;
use crate::error::Result;
use log::info;
use std::path::Path;

/// Decrypt an image file by running the inverse of the pipeline.
/// The pipeline must be the same one used to encrypt.
pub fn decrypt_image(input_path: &Path, output_path: &Path, options: &CryptOptions) -> Result<Shape> {
    let mut buffer = codec::decode(input_path)?;
    options.pipeline.apply_inverse(&mut buffer)?;
    codec::encode(&buffer, output_path)?;

    info!(
        "Decrypted {} -> {} with {}",
        input_path.display(),
        output_path.display(),
        options.pipeline
    );
    Ok(buffer.shape())
}
