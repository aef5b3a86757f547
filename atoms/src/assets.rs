//! Read-only files served from the static directory under `/static/...`.

use std::path::{Component, Path, PathBuf};

use lambda_http::{http::StatusCode, Body, Error, Response};

use crate::response::ApiError;

/// Resolves `rel` under `root`. Only plain file and directory names are
/// accepted, so the result can never point outside `root`.
pub fn resolve(root: &Path, rel: &str) -> Option<PathBuf> {
    if rel.is_empty() {
        return None;
    }
    let mut path = root.to_path_buf();
    for component in Path::new(rel).components() {
        match component {
            Component::Normal(part) => path.push(part),
            _ => return None,
        }
    }
    Some(path)
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// GET /static/{path}
pub async fn serve_file(root: &Path, rel: &str) -> Result<Response<Body>, Error> {
    let Some(path) = resolve(root, rel) else {
        tracing::warn!("Rejected static path: {}", rel);
        return ApiError::RouteNotFound.into_response();
    };

    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!("Static file {} unavailable: {}", path.display(), e);
            return ApiError::RouteNotFound.into_response();
        }
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type(&path))
        .body(Body::Binary(data))
        .map_err(Box::new)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_rejects_escapes() {
        let root = Path::new("/srv/static");
        assert_eq!(
            resolve(root, "css/site.css"),
            Some(PathBuf::from("/srv/static/css/site.css"))
        );
        assert_eq!(resolve(root, ""), None);
        assert_eq!(resolve(root, "../secret.txt"), None);
        assert_eq!(resolve(root, "css/../../secret.txt"), None);
        assert_eq!(resolve(root, "/etc/passwd"), None);
        assert_eq!(resolve(root, "./index.html"), None);
    }

    #[tokio::test]
    async fn serves_existing_files_with_content_type() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("css")).unwrap();
        std::fs::write(tmp.path().join("css").join("site.css"), "body {}").unwrap();

        let resp = serve_file(tmp.path(), "css/site.css").await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "text/css; charset=utf-8");
        assert_eq!(&resp.body()[..], b"body {}");
    }

    #[tokio::test]
    async fn missing_files_and_directories_are_404() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("css")).unwrap();

        for rel in ["nope.txt", "css", "../outside.txt"] {
            let resp = serve_file(tmp.path(), rel).await.unwrap();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", rel);
        }
    }
}
