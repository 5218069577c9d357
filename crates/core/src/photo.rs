//! Photo file naming, path containment, and content types.
//!
//! Stored photo paths have the form `{photo_dir}/{file_name}`. Only the
//! final component is ever used to locate a file on disk, and that
//! component must be a single plain file name.

use std::path::{Component, Path, PathBuf};

use crate::error::CoreError;
use crate::types::DbId;

/// Extensions accepted for uploaded photos (lower-case, without the dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Lower-cased extension of the final component of `original`, if any.
pub fn extension_of(original: &str) -> Option<String> {
    let name = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Validate the extension of an uploaded file name and return it.
pub fn validate_extension(original: &str) -> Result<String, CoreError> {
    match extension_of(original) {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(ext),
        Some(ext) => Err(CoreError::Validation(format!(
            "Unsupported photo format '.{ext}'. Supported: {}",
            ALLOWED_EXTENSIONS.join(", ")
        ))),
        None => Err(CoreError::Validation(
            "Photo file name must have an extension".to_string(),
        )),
    }
}

/// Generate a collision-resistant file name for a new upload.
///
/// The random part is a v4 UUID (122 random bits from the OS CSPRNG); the
/// owner id is kept as a prefix so files can be traced back to a record.
pub fn generate_file_name(owner_id: DbId, original: &str) -> Result<String, CoreError> {
    let ext = validate_extension(original)?;
    Ok(format!("{owner_id}_{}.{ext}", uuid::Uuid::new_v4().simple()))
}

/// Check that `name` is a single, plain file name.
///
/// Rejects empty names, separators, `.`/`..`, absolute paths, drive
/// prefixes and NUL bytes.
pub fn validate_file_name(name: &str) -> Result<&str, CoreError> {
    if name.is_empty() {
        return Err(CoreError::Validation("File name is required".to_string()));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(CoreError::Validation(format!("Invalid file name '{name}'")));
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(name),
        _ => Err(CoreError::Validation(format!("Invalid file name '{name}'"))),
    }
}

/// Resolve `name` inside `root`, refusing anything that would escape it.
pub fn resolve_in_dir(root: &Path, name: &str) -> Result<PathBuf, CoreError> {
    let name = validate_file_name(name)?;
    Ok(root.join(name))
}

/// The value stored in the record's photo column for `file_name`.
pub fn stored_path(photo_dir: &str, file_name: &str) -> String {
    format!("{}/{file_name}", photo_dir.trim_end_matches(['/', '\\']))
}

/// The file name part of a stored photo path.
pub fn file_name_of(stored: &str) -> &str {
    stored.rsplit(['/', '\\']).next().unwrap_or(stored)
}

/// MIME type for a photo, derived from its extension.
pub fn content_type_for(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
