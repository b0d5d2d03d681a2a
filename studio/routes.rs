use std::io::Cursor;
use log::info;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::state::SharedState;
use crate::handlers;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn bytes_response(status: u16, content_type: &str, bytes: Vec<u8>) -> Response<Cursor<Vec<u8>>> {
    let len = bytes.len();
    Response::new(
        StatusCode(status),
        vec![Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()).unwrap()],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

pub fn html_response(status: u16, body: String) -> Response<Cursor<Vec<u8>>> {
    bytes_response(status, "text/html; charset=utf-8", body.into_bytes())
}

pub fn json_response(status: u16, body: String) -> Response<Cursor<Vec<u8>>> {
    bytes_response(status, "application/json", body.into_bytes())
}

pub fn png_response(bytes: Vec<u8>) -> Response<Cursor<Vec<u8>>> {
    bytes_response(200, "image/png", bytes)
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    bytes_response(404, "text/plain", b"404 Not Found".to_vec())
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Splits a request URL into its path and (possibly empty) query string.
pub fn split_url(url: &str) -> (&str, &str) {
    url.split_once('?').unwrap_or((url, ""))
}

/// Dispatches incoming requests to the appropriate handler.
///
/// Handlers receive a `&mut Request` so that the dispatcher retains
/// ownership and can call `request.respond(response)` at the end.
pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url    = request.url().to_owned();
    let (path, query) = split_url(&url);
    info!("{} {}", method, path);

    let response = match (&method, path) {
        // ── Upload page ──────────────────────────────────────────────────
        (Method::Get,  "/") => handlers::analyze::handle_get(),
        (Method::Post, "/") => handlers::analyze::handle_upload(&mut request, &state),

        // ── JSON API ─────────────────────────────────────────────────────
        (Method::Post, "/api/hpi") => handlers::analyze::handle_api(&mut request, query, &state),

        // ── Stored heat-maps ─────────────────────────────────────────────
        (Method::Get, p) if p.starts_with("/spectral_images/") => {
            let name = &p["/spectral_images/".len()..];
            handlers::spectral::handle_get(name, &state)
        }

        // ── 404 ──────────────────────────────────────────────────────────
        _ => not_found(),
    };

    let _ = request.respond(response);
}
