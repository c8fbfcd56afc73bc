// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! File gateway for generated analysis artifacts.
//!
//! A requested name is only served if sanitizing it leaves it unchanged. The
//! gateway never rewrites a name into a different, "safe" one: any change means
//! the request is rejected.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::GatewayError;

/// Content type used when the extension is not recognized.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Reduce `name` to a flat filename made of `[A-Za-z0-9_.-]`.
///
/// Path separators become word breaks, whitespace runs become `_`, anything
/// outside the allowed set is dropped, and leading/trailing `.` and `_` are
/// stripped so the result can never be `..` or a hidden file.
pub fn sanitize_filename(name: &str) -> String {
    let spaced: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_ascii_whitespace().collect::<Vec<_>>().join("_");

    let allowed: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    allowed.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Check `requested` against the exact-match policy without touching disk.
pub fn validate_filename(requested: &str) -> Result<&str, GatewayError> {
    if requested.is_empty() {
        return Err(GatewayError::MissingName);
    }
    if sanitize_filename(requested) != requested {
        return Err(GatewayError::UnsafeName(requested.to_string()));
    }
    Ok(requested)
}

/// Content type inferred from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "txt" => "text/plain; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        "json" => "application/json",
        "html" | "htm" => "text/html; charset=utf-8",
        "pdf" => "application/pdf",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// A file read from the artifact directory.
#[derive(Debug)]
pub struct Artifact {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Resolves and reads files below a fixed artifact root.
#[derive(Debug, Clone)]
pub struct ArtifactGateway {
    root: PathBuf,
}

impl ArtifactGateway {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map `requested` to an existing regular file under the root.
    pub fn resolve(&self, requested: &str) -> Result<PathBuf, GatewayError> {
        let name = validate_filename(requested)?;
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(GatewayError::NotFound(name.to_string()));
        }
        Ok(path)
    }

    pub async fn serve(&self, requested: &str) -> Result<Artifact, GatewayError> {
        let path = self.resolve(requested)?;

        // The analysis step may replace files underneath us.
        let bytes = tokio::fs::read(&path).await.map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                GatewayError::NotFound(requested.to_string())
            } else {
                GatewayError::Io {
                    name: requested.to_string(),
                    source,
                }
            }
        })?;

        let content_type = content_type_for(&path);
        debug!(name = requested, content_type, size = bytes.len(), "serving artifact");

        Ok(Artifact {
            content_type,
            bytes,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn gateway_with(files: &[(&str, &[u8])]) -> (TempDir, ArtifactGateway) {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("Failed to create temp dir: {e}"));
        for (name, contents) in files {
            std::fs::write(dir.path().join(name), contents)
                .unwrap_or_else(|e| panic!("Failed to write {name}: {e}"));
        }
        let gateway = ArtifactGateway::new(dir.path());
        (dir, gateway)
    }

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(
            sanitize_filename("fig1_linear_regression.png"),
            "fig1_linear_regression.png"
        );
        assert_eq!(
            sanitize_filename("fig4_decision_tree_rules.txt"),
            "fig4_decision_tree_rules.txt"
        );
    }

    #[test]
    fn test_sanitize_neutralizes_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("/etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("..\\..\\boot.ini"), "boot.ini");
        assert_eq!(sanitize_filename(".."), "");
    }

    #[test]
    fn test_sanitize_rewrites_spaces_and_unicode() {
        assert_eq!(sanitize_filename("my plot.png"), "my_plot.png");
        assert_eq!(sanitize_filename("planète.png"), "plante.png");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
    }

    #[test]
    fn test_validate_empty_is_missing_name() {
        assert!(matches!(
            validate_filename(""),
            Err(GatewayError::MissingName)
        ));
    }

    #[test]
    fn test_validate_rejects_any_rewrite() {
        for name in [
            "../secret.png",
            "../../etc/passwd",
            "/etc/passwd",
            "sub/dir.png",
            "..",
            "fig 1.png",
            "naïve.png",
            "_leading.png",
        ] {
            assert!(
                matches!(validate_filename(name), Err(GatewayError::UnsafeName(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_resolve_returns_path_inside_root() {
        let (dir, gateway) = gateway_with(&[("fig3_pca_kmeans.png", b"png".as_slice())]);
        let path = gateway
            .resolve("fig3_pca_kmeans.png")
            .unwrap_or_else(|e| panic!("resolve failed: {e}"));
        assert_eq!(path, dir.path().join("fig3_pca_kmeans.png"));
        assert!(path.starts_with(gateway.root()));
    }

    #[test]
    fn test_resolve_missing_file_is_not_found() {
        let (_dir, gateway) = gateway_with(&[]);
        assert!(matches!(
            gateway.resolve("nonexistent.png"),
            Err(GatewayError::NotFound(_))
        ));
    }

    #[test]
    fn test_resolve_directory_is_not_found() {
        let (dir, gateway) = gateway_with(&[]);
        std::fs::create_dir(dir.path().join("nested"))
            .unwrap_or_else(|e| panic!("mkdir: {e}"));
        assert!(matches!(
            gateway.resolve("nested"),
            Err(GatewayError::NotFound(_))
        ));
    }

    #[test]
    fn test_resolve_traversal_is_unsafe_even_if_target_exists() {
        let (dir, _) = gateway_with(&[]);
        let inner = dir.path().join("output");
        std::fs::create_dir(&inner).unwrap_or_else(|e| panic!("mkdir: {e}"));
        std::fs::write(dir.path().join("secret.txt"), b"secret")
            .unwrap_or_else(|e| panic!("write: {e}"));

        let gateway = ArtifactGateway::new(&inner);
        assert!(matches!(
            gateway.resolve("../secret.txt"),
            Err(GatewayError::UnsafeName(_))
        ));
    }

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(content_type_for(Path::new("a.png")), "image/png");
        assert_eq!(content_type_for(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(
            content_type_for(Path::new("rules.txt")),
            "text/plain; charset=utf-8"
        );
        assert_eq!(content_type_for(Path::new("blob.bin")), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for(Path::new("noext")), DEFAULT_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn test_serve_reads_bytes_and_type() {
        let (_dir, gateway) =
            gateway_with(&[("fig6_correlation_heatmap.png", b"\x89PNG".as_slice())]);
        let artifact = gateway
            .serve("fig6_correlation_heatmap.png")
            .await
            .unwrap_or_else(|e| panic!("serve failed: {e}"));
        assert_eq!(artifact.content_type, "image/png");
        assert_eq!(artifact.bytes, b"\x89PNG".to_vec());
    }

    #[tokio::test]
    async fn test_serve_propagates_rejections() {
        let (_dir, gateway) = gateway_with(&[]);
        assert!(matches!(
            gateway.serve("").await,
            Err(GatewayError::MissingName)
        ));
        assert!(matches!(
            gateway.serve("../../etc/passwd").await,
            Err(GatewayError::UnsafeName(_))
        ));
        assert!(matches!(
            gateway.serve("missing.png").await,
            Err(GatewayError::NotFound(_))
        ));
    }
}
