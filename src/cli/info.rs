use crate::codec;
use crate::error::Result;
use std::path::Path;

/// Display information about an image file as the pipeline will see it
pub fn show_info(path: &Path) -> Result<String> {
    let buffer = codec::decode(path)?;
    let file_size = std::fs::metadata(path)?.len();

    let layout = match buffer.channels() {
        None => "grayscale (no channel axis)",
        Some(1) => "single channel",
        Some(3) => "RGB",
        Some(4) => "RGBA",
        Some(_) => "unknown",
    };

    let mut output = String::new();

    output.push_str("Pixcrypt Image Information\n");
    output.push_str("==========================\n\n");

    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("File size: {}\n", format_size(file_size)));
    output.push('\n');

    output.push_str("Pixel Buffer:\n");
    output.push_str(&format!("  Shape: {}\n", buffer.shape()));
    output.push_str(&format!("  Height: {}\n", buffer.height()));
    output.push_str(&format!("  Width: {}\n", buffer.width()));
    output.push_str(&format!("  Layout: {}\n", layout));
    output.push_str(&format!("  Samples: {}\n", buffer.samples().len()));
    output.push('\n');

    output.push_str("Transforms:\n");
    output.push_str(&format!(
        "  Channel swap: {}\n",
        if buffer.channels() == Some(3) { "supported" } else { "not supported" }
    ));
    if codec::is_lossy(path) {
        output.push_str("  Warning: lossy format, encrypted output will not decrypt exactly\n");
    }

    Ok(output)
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
