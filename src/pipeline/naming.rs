//! File names for uploaded images and their heat-maps.
//!
//! Callers store each heat-map under a name derived from the input file so
//! that concurrent requests for different files never share an output path.

const FALLBACK_STEM: &str = "upload";

/// Strips directory components and replaces every character outside
/// `[A-Za-z0-9._-]` with `_`.  Leading dots are dropped so the result can
/// never be `.`/`..` or a hidden file.
pub fn sanitize_file_name(raw: &str) -> String {
    // Browsers on Windows may send a full path.
    let base = raw.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        FALLBACK_STEM.to_owned()
    } else {
        cleaned.to_owned()
    }
}

/// `spectral_<name>.png` for an input file name.  The sanitized name keeps
/// its own extension, so `leaf.jpg` and `leaf.png` get distinct heat-maps.
pub fn spectral_file_name(input_name: &str) -> String {
    format!("spectral_{}.png", sanitize_file_name(input_name))
}
