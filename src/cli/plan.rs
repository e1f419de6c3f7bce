use crate::error::Result;
use crate::pipeline::Pipeline;

/// Describe a pipeline: forward steps, the inverse steps decrypt will run,
/// and the fingerprint to compare between encrypt and decrypt.
pub fn show_plan(pipeline: &Pipeline) -> Result<String> {
    let inverse = pipeline.inverse()?;

    let mut output = String::new();
    output.push_str("Pixcrypt Pipeline Plan\n");
    output.push_str("======================\n\n");

    output.push_str(&format!("Encrypt ({} steps):\n", pipeline.len()));
    for (i, t) in pipeline.transforms().iter().enumerate() {
        let note = if t.is_involution() { "  [involution]" } else { "" };
        output.push_str(&format!("  {}. {}{}\n", i + 1, t, note));
    }
    output.push('\n');

    output.push_str(&format!("Decrypt ({} steps):\n", inverse.len()));
    for (i, t) in inverse.transforms().iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, t));
    }
    output.push('\n');

    output.push_str(&format!("Fingerprint: {}\n", pipeline.fingerprint()?));
    Ok(output)
}
