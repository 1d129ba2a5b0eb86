//! Display helpers shared by the commands

use console::{Style, StyledObject};

use crate::resource::MapVersion;

/// Bold label, as used for `Label: value` lines
pub fn label(text: &str) -> StyledObject<&str> {
    Style::new().bold().apply_to(text)
}

/// Highlighted version, or `none` when nothing is recorded
pub fn version(version: MapVersion) -> String {
    if version.is_none() {
        "none".to_string()
    } else {
        Style::new().yellow().apply_to(version).to_string()
    }
}

/// Human readable byte size
pub fn formatted_size(bytes: u64) -> String {
    let size = bytes as f64;
    if size < 1024.0 {
        format!("{bytes} B")
    } else if size < 1024.0 * 1024.0 {
        format!("{:.1} KB", size / 1024.0)
    } else if size < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.1} MB", size / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", size / (1024.0 * 1024.0 * 1024.0))
    }
}
