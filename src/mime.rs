use std::path::Path;

/// Resolve the `Content-Type` an uploaded file is stored with.
///
/// Total by construction: unknown extensions fall back to
/// `application/octet-stream`, and the same path always resolves to the
/// same type.
pub fn resolve_content_type(path: &Path) -> String {
    match path.extension().and_then(|ext| ext.to_str()) {
        // Source maps are JSON but absent from the shared mime db.
        Some("map") => "application/json".to_string(),
        _ => mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    }
}
