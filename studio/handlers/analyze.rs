use std::io::{Cursor, Read};

use base64::Engine;
use log::{error, info, warn};
use serde::Serialize;
use tiny_http::{Request, Response};

use plant_hpi::pipeline::{sanitize_file_name, spectral_file_name};
use plant_hpi::{HealthCategory, HealthReport, HpiError};

use crate::render::{render_page, PageResult};
use crate::state::{SharedState, StudioState};
use crate::util::multipart::{extract_boundary, extract_file_field};
use crate::util::query::query_flag;

/// Multipart field that carries the uploaded image.
const IMAGE_FIELD: &str = "image";

// ---------------------------------------------------------------------------
// Upload processing shared by the HTML page and the JSON API
// ---------------------------------------------------------------------------

/// A scored upload whose heat-map has been stored.
#[derive(Debug)]
struct Processed {
    report:       HealthReport,
    spectral_url: String,
}

/// Why an upload produced no result.
#[derive(Debug)]
struct UploadError {
    status:  u16,
    kind:    &'static str,
    message: String,
}

impl UploadError {
    fn bad_request(message: impl Into<String>) -> Self {
        UploadError { status: 400, kind: "BadRequest", message: message.into() }
    }

    fn storage(message: impl Into<String>) -> Self {
        UploadError { status: 500, kind: "StorageError", message: message.into() }
    }
}

impl From<HpiError> for UploadError {
    fn from(e: HpiError) -> Self {
        let status = match e {
            HpiError::Render(_) => 500,
            HpiError::Decode(_) | HpiError::NotAPlant => 400,
        };
        UploadError { status, kind: e.kind().as_str(), message: e.to_string() }
    }
}

fn content_type(request: &Request) -> String {
    request.headers().iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default()
}

/// Reads at most `limit + 1` bytes of body, enough to tell whether the
/// upload is over the limit without buffering all of it.
fn read_body_limited(request: &mut Request, limit: usize) -> Result<Vec<u8>, std::io::Error> {
    let mut body = Vec::new();
    request.as_reader().take(limit as u64 + 1).read_to_end(&mut body)?;
    Ok(body)
}

fn process_upload(request: &mut Request, state: &StudioState) -> Result<Processed, UploadError> {
    let content_type = content_type(request);
    let body = read_body_limited(request, state.config.max_upload_bytes)
        .map_err(|e| UploadError::bad_request(format!("Could not read request body: {}", e)))?;
    process_body(&content_type, &body, state)
}

/// Validates a multipart body, stores the upload, scores it, and stores the
/// heat-map next to the other `spectral_*` files.
fn process_body(content_type: &str, body: &[u8], state: &StudioState) -> Result<Processed, UploadError> {
    let limit = state.config.max_upload_bytes;
    if body.len() > limit {
        return Err(UploadError {
            status:  413,
            kind:    "PayloadTooLarge",
            message: format!("Upload exceeds the {} byte limit", limit),
        });
    }

    let boundary = extract_boundary(content_type)
        .ok_or_else(|| UploadError::bad_request("No file part"))?;
    let upload = extract_file_field(body, &boundary, IMAGE_FIELD)
        .ok_or_else(|| UploadError::bad_request("No file part"))?;
    if upload.filename.is_empty() {
        return Err(UploadError::bad_request("No selected file"));
    }

    let file_name   = sanitize_file_name(&upload.filename);
    let upload_path = state.config.upload_dir.join(&file_name);
    std::fs::write(&upload_path, &upload.bytes).map_err(|e| {
        error!("could not save upload {}: {}", upload_path.display(), e);
        UploadError::storage(format!("Could not save upload '{}'", file_name))
    })?;

    let report = state.pipeline.run(&upload.bytes).map_err(|e| {
        warn!("{}: {}", file_name, e);
        UploadError::from(e)
    })?;
    if let Some(w) = &report.warning {
        warn!("{}: {}", file_name, w);
    }

    let spectral_name = spectral_file_name(&file_name);
    let spectral_path = state.config.spectral_dir.join(&spectral_name);
    std::fs::write(&spectral_path, &report.artifact).map_err(|e| {
        error!("could not save heat-map {}: {}", spectral_path.display(), e);
        UploadError::storage(format!("Could not save heat-map '{}'", spectral_name))
    })?;

    info!("{}: HPI {:.2} ({})", file_name, report.score, report.category);
    Ok(Processed { report, spectral_url: format!("/spectral_images/{}", spectral_name) })
}

// ---------------------------------------------------------------------------
// GET /  and  POST /
// ---------------------------------------------------------------------------

pub fn handle_get() -> Response<Cursor<Vec<u8>>> {
    crate::routes::html_response(200, render_page(PageResult::Empty))
}

pub fn handle_upload(request: &mut Request, state: &SharedState) -> Response<Cursor<Vec<u8>>> {
    match process_upload(request, state) {
        Ok(p) => crate::routes::html_response(200, render_page(PageResult::Scored {
            score:        p.report.score,
            category:     p.report.category,
            spectral_url: &p.spectral_url,
        })),
        Err(e) => crate::routes::html_response(e.status, render_page(PageResult::Error(&e.message))),
    }
}

// ---------------------------------------------------------------------------
// POST /api/hpi
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ApiSuccess<'a> {
    health_status:  HealthCategory,
    average_hpi:    f64,
    spectral_image: &'a str,
    /// Base64 PNG, only with `?inline=1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    hpi_image:      Option<String>,
    /// Row-major per-pixel percentages, only with `?values=1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    hpi_percentage: Option<&'a [Vec<f64>]>,
}

#[derive(Debug, Serialize)]
struct ApiFailure<'a> {
    error_kind: &'a str,
    message:    &'a str,
}

fn success_json(p: &Processed, inline: bool, values: bool) -> String {
    let body = ApiSuccess {
        health_status:  p.report.category,
        average_hpi:    p.report.score,
        spectral_image: &p.spectral_url,
        hpi_image:      inline.then(|| base64::engine::general_purpose::STANDARD.encode(&p.report.artifact)),
        hpi_percentage: values.then_some(p.report.percentage.data.as_slice()),
    };
    serde_json::to_string(&body).unwrap_or_else(|_| "{}".into())
}

fn failure_json(e: &UploadError) -> String {
    serde_json::to_string(&ApiFailure { error_kind: e.kind, message: &e.message })
        .unwrap_or_else(|_| "{}".into())
}

pub fn handle_api(request: &mut Request, query: &str, state: &SharedState) -> Response<Cursor<Vec<u8>>> {
    let inline = query_flag(query, "inline");
    let values = query_flag(query, "values");
    match process_upload(request, state) {
        Ok(p)  => crate::routes::json_response(200, success_json(&p, inline, values)),
        Err(e) => crate::routes::json_response(e.status, failure_json(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StudioConfig;
    use image::{DynamicImage, GenericImageView, GrayImage, ImageOutputFormat};
    use plant_hpi::Matrix;

    const BOUNDARY: &str = "----HpiStudioTest";

    fn processed() -> Processed {
        Processed {
            report: HealthReport {
                score:      62.5,
                category:   HealthCategory::Good,
                artifact:   vec![1, 2, 3],
                percentage: Matrix::from_data(vec![vec![0.0, 100.0], vec![50.0, 100.0]]),
                width:      2,
                height:     2,
                warning:    None,
            },
            spectral_url: "/spectral_images/spectral_leaf.png.png".into(),
        }
    }

    fn temp_state(max_upload_bytes: usize) -> (tempfile::TempDir, StudioState) {
        let dir = tempfile::tempdir().unwrap();
        let state = StudioState::new(StudioConfig {
            upload_dir:   dir.path().join("uploads"),
            spectral_dir: dir.path().join("spectral_images"),
            max_upload_bytes,
            ..StudioConfig::default()
        });
        state.ensure_dirs().unwrap();
        (dir, state)
    }

    fn multipart_type() -> String {
        format!("multipart/form-data; boundary={}", BOUNDARY)
    }

    fn form(field: &str, filename: &str, data: &[u8]) -> Vec<u8> {
        let mut out = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{f}\"; filename=\"{n}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n",
            b = BOUNDARY, f = field, n = filename
        ).into_bytes();
        out.extend_from_slice(data);
        out.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        out
    }

    fn gray_png(width: u32, height: u32, pixels: Vec<u8>) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(GrayImage::from_raw(width, height, pixels).unwrap())
            .write_to(&mut buf, ImageOutputFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn dir_len(path: &std::path::Path) -> usize {
        std::fs::read_dir(path).unwrap().count()
    }

    // ── JSON shaping ─────────────────────────────────────────────────────

    #[test]
    fn success_body_uses_api_field_names() {
        let v: serde_json::Value = serde_json::from_str(&success_json(&processed(), false, false)).unwrap();
        assert_eq!(v["health_status"], "Good");
        assert_eq!(v["average_hpi"], 62.5);
        assert_eq!(v["spectral_image"], "/spectral_images/spectral_leaf.png.png");
        assert!(v.get("hpi_image").is_none());
        assert!(v.get("hpi_percentage").is_none());
    }

    #[test]
    fn inline_adds_base64_image() {
        let v: serde_json::Value = serde_json::from_str(&success_json(&processed(), true, false)).unwrap();
        assert_eq!(v["hpi_image"], "AQID");
    }

    #[test]
    fn values_adds_percentage_grid() {
        let v: serde_json::Value = serde_json::from_str(&success_json(&processed(), false, true)).unwrap();
        assert_eq!(v["hpi_percentage"], serde_json::json!([[0.0, 100.0], [50.0, 100.0]]));
    }

    #[test]
    fn pipeline_errors_map_to_status_and_kind() {
        let e = UploadError::from(HpiError::Decode("unsupported format".into()));
        assert_eq!((e.status, e.kind), (400, "DecodeError"));
        let e = UploadError::from(HpiError::Render("disk full".into()));
        assert_eq!((e.status, e.kind), (500, "RenderError"));

        let v: serde_json::Value = serde_json::from_str(&failure_json(&e)).unwrap();
        assert_eq!(v["error_kind"], "RenderError");
        assert_eq!(v["message"], "disk full");
    }

    // ── Upload handling ──────────────────────────────────────────────────

    #[test]
    fn missing_boundary_is_no_file_part() {
        let (_dir, state) = temp_state(1024);
        let e = process_body("application/json", b"{}", &state).unwrap_err();
        assert_eq!((e.status, e.message.as_str()), (400, "No file part"));
    }

    #[test]
    fn missing_image_field_is_no_file_part() {
        let (_dir, state) = temp_state(1024);
        let body = form("photo", "leaf.png", &gray_png(2, 2, vec![0, 85, 170, 255]));
        let e = process_body(&multipart_type(), &body, &state).unwrap_err();
        assert_eq!((e.status, e.message.as_str()), (400, "No file part"));
        assert_eq!(dir_len(&state.config.upload_dir), 0);
    }

    #[test]
    fn empty_filename_is_no_selected_file() {
        let (_dir, state) = temp_state(1024);
        let e = process_body(&multipart_type(), &form("image", "", b""), &state).unwrap_err();
        assert_eq!((e.status, e.message.as_str()), (400, "No selected file"));
    }

    #[test]
    fn oversized_body_is_payload_too_large() {
        let (_dir, state) = temp_state(64);
        let body = form("image", "leaf.png", &[0u8; 128]);
        let e = process_body(&multipart_type(), &body, &state).unwrap_err();
        assert_eq!((e.status, e.kind), (413, "PayloadTooLarge"));
        assert_eq!(dir_len(&state.config.upload_dir), 0);
        assert_eq!(dir_len(&state.config.spectral_dir), 0);
    }

    #[test]
    fn upload_and_heat_map_land_in_configured_dirs() {
        let (_dir, state) = temp_state(1 << 20);
        let png = gray_png(2, 2, vec![0, 85, 170, 255]);
        let p = process_body(&multipart_type(), &form("image", "../leaf.png", &png), &state).unwrap();

        assert_eq!(p.report.score, 50.0);
        assert_eq!(p.report.category, HealthCategory::Good);
        assert_eq!(p.spectral_url, "/spectral_images/spectral_leaf.png.png");
        assert_eq!(std::fs::read(state.config.upload_dir.join("leaf.png")).unwrap(), png);

        let stored = std::fs::read(state.config.spectral_dir.join("spectral_leaf.png.png")).unwrap();
        assert_eq!(stored, p.report.artifact);
        assert_eq!(image::load_from_memory(&stored).unwrap().height(), 2);
    }

    #[test]
    fn same_stem_uploads_keep_separate_heat_maps() {
        let (_dir, state) = temp_state(1 << 20);
        let a = process_body(&multipart_type(), &form("image", "leaf.png", &gray_png(1, 2, vec![0, 255])), &state).unwrap();
        let b = process_body(&multipart_type(), &form("image", "leaf.jpg", &gray_png(2, 1, vec![0, 255])), &state).unwrap();

        assert_ne!(a.spectral_url, b.spectral_url);
        assert_eq!(dir_len(&state.config.spectral_dir), 2);
    }

    #[test]
    fn undecodable_upload_is_saved_then_rejected() {
        let (_dir, state) = temp_state(1024);
        let e = process_body(&multipart_type(), &form("image", "leaf.png", b"not an image"), &state).unwrap_err();
        assert_eq!((e.status, e.kind), (400, "DecodeError"));
        assert!(state.config.upload_dir.join("leaf.png").is_file());
        assert_eq!(dir_len(&state.config.spectral_dir), 0);
    }
}
