use actix_web::{
    http::{header, StatusCode},
    web, HttpRequest, HttpResponse,
};
use futures::{future, StreamExt};
use std::path::{Path, PathBuf};
use tokio_util::io::ReaderStream;

use super::{responder, AppState};

pub const INDEX_FILE: &str = "index.html";

/// Lexically normalize a URL path into a path relative to the static root.
///
/// `/` maps to `index.html`. Empty and `.` segments are dropped, `..` removes
/// the previous segment. Returns `None` when `..` would climb above the root,
/// when a segment carries a backslash or NUL, or when nothing is left.
/// The path is used as sent, so percent-encoded dots stay literal file names.
pub fn resolve_request_path(url_path: &str) -> Option<PathBuf> {
    let url_path = if url_path == "/" { "/index.html" } else { url_path };

    let mut segments: Vec<&str> = Vec::new();
    for segment in url_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s if s.contains('\\') || s.contains('\0') => return None,
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return None;
    }
    Some(segments.iter().collect())
}

fn bad_request() -> HttpResponse {
    responder::plain_text(StatusCode::BAD_REQUEST, "Bad request")
}

fn not_found() -> HttpResponse {
    responder::plain_text(StatusCode::NOT_FOUND, "Not found")
}

/// Serve `relative` from `root`, streaming the file.
pub async fn serve_file(root: &Path, relative: &Path) -> HttpResponse {
    let root = match tokio::fs::canonicalize(root).await {
        Ok(root) => root,
        Err(e) => {
            log::warn!("Static root {} unavailable: {}", root.display(), e);
            return not_found();
        }
    };

    let requested = root.join(relative);
    let resolved = match tokio::fs::canonicalize(&requested).await {
        Ok(path) => path,
        Err(_) => return not_found(),
    };
    if !resolved.starts_with(&root) {
        log::warn!("Refusing {} outside static root", resolved.display());
        return bad_request();
    }

    match tokio::fs::metadata(&resolved).await {
        Ok(metadata) if metadata.is_file() => {}
        _ => return not_found(),
    }

    let file = match tokio::fs::File::open(&resolved).await {
        Ok(file) => file,
        Err(e) => {
            log::warn!("Failed to open {}: {}", resolved.display(), e);
            return not_found();
        }
    };

    let display = resolved.display().to_string();
    let body = ReaderStream::new(file).take_while(move |chunk| {
        if let Err(e) = chunk {
            log::warn!("Read error while streaming {}: {}", display, e);
        }
        future::ready(chunk.is_ok())
    });

    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, responder::content_type_for(&resolved)))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(body)
}

pub async fn serve(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let relative = match resolve_request_path(req.path()) {
        Some(relative) => relative,
        None => {
            log::debug!("Rejected static path {}", req.path());
            return bad_request();
        }
    };

    serve_file(&state.static_root, &relative).await
}
