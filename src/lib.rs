//! Pixcrypt - Reversible Pixel Transform Pipelines
//!
//! Applies an ordered list of elementary, shape-preserving transforms to an
//! image's 8-bit pixel buffer and inverts that list exactly. The transforms
//! are obfuscation primitives, not a cipher.
//!
//! ## Transforms
//!
//! - **Swap**: RGB <-> BGR channel reversal (involution, 3-channel only)
//! - **Xor**: XOR every sample with a fixed byte (involution)
//! - **Add**: modular addition; inverted by the additive inverse mod 256
//! - **Multiply**: modular multiplication; odd factors only, inverted by the
//!   multiplicative inverse mod 256
//! - **ShuffleRows / ShuffleColumns**: seeded permutation of rows or
//!   columns; inverted by the inverse permutation
//!
//! Decrypting runs the inverse of each step in reverse order:
//!
//! ```text
//! encrypt: T1 → T2 → ... → Tn
//! decrypt: Tn⁻¹ → ... → T2⁻¹ → T1⁻¹
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use pixcrypt::cli::{decrypt_image, encrypt_image, CryptOptions};
//! use pixcrypt::pipeline::parse_pipeline_ops;
//! use std::path::Path;
//!
//! let options = CryptOptions {
//!     pipeline: parse_pipeline_ops(&["swap", "xor:42", "shuffle_rows:1234"]).unwrap(),
//! };
//! encrypt_image(Path::new("photo.png"), Path::new("locked.png"), &options).unwrap();
//! decrypt_image(Path::new("locked.png"), Path::new("restored.png"), &options).unwrap();
//! ```

pub mod buffer;
pub mod cli;
pub mod codec;
pub mod error;
pub mod permutation;
pub mod pipeline;
pub mod transform;

pub use buffer::{PixelBuffer, Shape};
pub use error::{PixcryptError, Result};
pub use permutation::Permutation;
pub use pipeline::Pipeline;
pub use transform::Transform;
