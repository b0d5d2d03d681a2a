use std::io::Cursor;
use tiny_http::Response;

use plant_hpi::pipeline::sanitize_file_name;

use crate::state::SharedState;

/// Whether `name` can be served from the heat-map directory: a bare,
/// already-sanitized `.png` file name with no path components.
fn is_servable(name: &str) -> bool {
    !name.is_empty() && sanitize_file_name(name) == name && name.ends_with(".png")
}

/// `GET /spectral_images/{name}`
///
/// Serves a previously rendered heat-map.
pub fn handle_get(name: &str, state: &SharedState) -> Response<Cursor<Vec<u8>>> {
    if !is_servable(name) {
        return crate::routes::not_found();
    }
    match std::fs::read(state.config.spectral_dir.join(name)) {
        Ok(bytes) => crate::routes::png_response(bytes),
        Err(_)    => crate::routes::not_found(),
    }
}
