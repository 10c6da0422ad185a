// Local configuration file: existence check and pretty-printed write.

use crate::error::ConfigureError;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::path::Path;

/// Where the node reads its core configuration from.
pub const DEFAULT_CONFIG_PATH: &str = "/config/core.json";

/// Whether a configuration file is already present at `path`.
pub fn config_exists(path: &Path) -> bool {
    path.exists()
}

/// Serialize `document` with 4-space indentation, no trailing newline.
pub fn render(document: &Value) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut ser)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `document` to `path`, replacing whatever was there.
pub fn write_configuration(path: &Path, document: &Value) -> Result<(), ConfigureError> {
    let write_err = |source: std::io::Error| ConfigureError::Write {
        path: path.to_path_buf(),
        source,
    };
    let rendered = render(document).map_err(|e| write_err(e.into()))?;
    std::fs::write(path, rendered).map_err(write_err)
}
