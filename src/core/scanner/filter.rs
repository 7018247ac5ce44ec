//! Decides which files count as photos or media.

use std::collections::HashSet;
use std::path::Path;

const MEDIA_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tiff", "tif", "heic", "heif", "raw", "cr2",
    "nef", "dng", "arw", "raf", "mp4", "mov", "avi", "mkv", "wmv", "webm", "m4v", "3gp",
];

/// Extension and visibility filter for scanned files
pub struct MediaFilter {
    extensions: HashSet<String>,
    include_hidden: bool,
}

impl MediaFilter {
    /// Create a filter with the default photo and video extensions
    pub fn new() -> Self {
        Self {
            extensions: MEDIA_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            include_hidden: false,
        }
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Whether a file is visible to the scan at all
    pub fn is_visible(&self, path: &Path) -> bool {
        if self.include_hidden {
            return true;
        }
        !path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.starts_with('.'))
    }

    /// Whether a file's extension marks it as a photo or video (case-insensitive)
    pub fn is_media(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.contains(&ext.to_lowercase()))
    }
}

impl Default for MediaFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_matching_ignores_case() {
        let filter = MediaFilter::new();
        assert!(filter.is_media(Path::new("/dump/IMG_0001.JPG")));
        assert!(filter.is_media(Path::new("/dump/clip.Mov")));
        assert!(filter.is_media(Path::new("/dump/IMG_1234.heic")));
    }

    #[test]
    fn documents_are_not_media() {
        let filter = MediaFilter::new();
        assert!(!filter.is_media(Path::new("/dump/notes.txt")));
        assert!(!filter.is_media(Path::new("/dump/no_extension")));
    }

    #[test]
    fn hidden_files_are_invisible_by_default() {
        let filter = MediaFilter::new();
        assert!(!filter.is_visible(Path::new("/dump/.DS_Store")));
        assert!(filter.is_visible(Path::new("/dump/photo.jpg")));
        assert!(filter
            .with_hidden(true)
            .is_visible(Path::new("/dump/.DS_Store")));
    }
}
