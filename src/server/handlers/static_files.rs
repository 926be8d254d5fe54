//! Static file serving handlers.

use std::path::{Path, PathBuf};

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};

use super::super::AppState;

/// Serve `index.html` from the static directory.
pub async fn serve_index(State(state): State<AppState>) -> Response {
    match tokio::fs::read_to_string(state.static_dir.join("index.html")).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to read index.html: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error serving index.html",
            )
                .into_response()
        }
    }
}

/// Serve the favicon, or an empty 204 when there is none.
pub async fn serve_favicon(State(state): State<AppState>) -> Response {
    match tokio::fs::read(state.static_dir.join("favicon.ico")).await {
        Ok(content) => ([(header::CONTENT_TYPE, "image/x-icon")], content).into_response(),
        Err(_) => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Serve any other path from the static directory.
pub async fn serve_static(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    let Some(file) = resolve_static(&state.static_dir, path) else {
        return (StatusCode::NOT_FOUND, "File not found").into_response();
    };

    let content = match tokio::fs::read(&file).await {
        Ok(c) => c,
        Err(_) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read file").into_response();
        }
    };

    let mime = mime_guess::from_path(&file)
        .first_or_octet_stream()
        .to_string();

    ([(header::CONTENT_TYPE, mime)], content).into_response()
}

/// Resolve a request path to a regular file inside `root`.
///
/// Returns `None` for anything outside `root`, including symlinks that
/// point out of it.
fn resolve_static(root: &Path, path: &str) -> Option<PathBuf> {
    if path.is_empty() || path.contains("..") || path.starts_with('/') {
        return None;
    }

    let canonical_root = root.canonicalize().ok()?;
    let canonical_file = canonical_root.join(path).canonicalize().ok()?;

    if !canonical_file.starts_with(&canonical_root) || !canonical_file.is_file() {
        return None;
    }

    Some(canonical_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_static_stays_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("public");
        std::fs::create_dir_all(root.join("css")).unwrap();
        std::fs::write(root.join("css/site.css"), "body {}").unwrap();
        std::fs::write(dir.path().join("secret.txt"), "nope").unwrap();

        assert!(resolve_static(&root, "css/site.css").is_some());
        assert!(resolve_static(&root, "../secret.txt").is_none());
        assert!(resolve_static(&root, "css/../../secret.txt").is_none());
        assert!(resolve_static(&root, "css").is_none());
        assert!(resolve_static(&root, "").is_none());
        assert!(resolve_static(&root, "missing.js").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_static_rejects_escaping_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("public");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(dir.path().join("secret.txt"), "nope").unwrap();
        std::os::unix::fs::symlink(dir.path().join("secret.txt"), root.join("link.txt")).unwrap();

        assert!(resolve_static(&root, "link.txt").is_none());
    }
}
