//! Destination filenames for downloaded images.
//!
//! Search results carry free-form titles; these helpers turn them into names
//! that are always safe to join onto the output directory.

mod sanitize;

pub use sanitize::sanitize;

use crate::identifier::ContentId;

/// Linux NAME_MAX, in bytes.
const NAME_MAX: usize = 255;

/// Extension appended to names built from search results.
pub const IMAGE_EXTENSION: &str = "jpg";

/// Builds the desired filename for a search result from its text fields.
pub fn filename_for(title: &str, description: &str, alt_text: &str) -> String {
    sanitize(&format!("{title} {description} {alt_text}.{IMAGE_EXTENSION}"))
}

/// Name used on disk for `desired`, falling back to the content identifier.
///
/// The sanitized name is used as-is when it has a stem. When sanitizing leaves
/// nothing (or only an extension such as `.jpg`, which happens for titles written
/// entirely in non-Latin scripts) the identifier becomes the stem, so distinct URLs
/// never collide on an empty or hidden name. Over-long names are cut in the stem,
/// keeping the extension.
pub fn destination_name(desired: &str, id: &ContentId) -> String {
    let sanitized = sanitize(desired);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        return id.to_string();
    }

    let (stem, ext) = match sanitized.rfind('.') {
        Some(i) => sanitized.split_at(i),
        None => (sanitized.as_str(), ""),
    };
    let stem = if stem.trim_matches('.').is_empty() {
        id.as_str()
    } else {
        stem
    };

    if stem.len() + ext.len() <= NAME_MAX {
        return format!("{stem}{ext}");
    }
    if ext.len() >= NAME_MAX / 2 {
        // Not a real extension; cut the whole name.
        let whole = format!("{stem}{ext}");
        return whole[..NAME_MAX].to_string();
    }
    // Sanitized names are pure ASCII, so any byte index is a char boundary.
    format!("{}{}", &stem[..NAME_MAX - ext.len()], ext)
}
