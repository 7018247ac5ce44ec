//! # Tagging Module
//!
//! Asks a remote vision model for descriptive tags of an image.
//!
//! The request carries the image, a short description built from the
//! image's own keywords and GPS position, and a fixed instruction. The reply
//! is a semicolon-separated tag list.

mod client;

pub use client::{VisionClient, VisionConfig, DEFAULT_API_VERSION};

use crate::core::metadata::EmbeddedMetadata;
use crate::error::TagError;
use std::path::Path;

/// Instruction sent with every image
pub const TAG_INSTRUCTION: &str = "Give me back relevant tags for this image, given the detail \
provided along with it and its content. Separate them with semicolons (;). Do not include any \
other information or markup in your reply.";

/// A remote service that turns an image into tags
pub trait TaggingService: Send + Sync {
    /// Tag the image at `path`
    fn tag(&self, path: &Path, description: &str) -> Result<Vec<String>, TagError>;
}

/// Build the free-text description sent alongside an image
pub fn describe(metadata: &EmbeddedMetadata) -> String {
    let mut description = String::new();

    if !metadata.keywords.is_empty() {
        description = format!("An image with keywords '{}'", metadata.keywords.join(","));
    }

    if let Some((lat, lon)) = metadata.coordinates() {
        if description.is_empty() {
            description = format!("Taken at geolocation {},{}", lat, lon);
        } else {
            description.push_str(&format!(" and taken at geolocation {},{}", lat, lon));
        }
    }

    description
}

/// Split a `tag; tag; tag` reply
pub fn parse_tags(reply: &str) -> Vec<String> {
    reply
        .split(';')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::Dms;

    #[test]
    fn no_keywords_or_gps_is_empty() {
        assert_eq!(describe(&EmbeddedMetadata::default()), "");
    }

    #[test]
    fn keywords_only() {
        let meta = EmbeddedMetadata {
            keywords: vec!["beach".to_string(), "family".to_string()],
            ..Default::default()
        };
        assert_eq!(describe(&meta), "An image with keywords 'beach,family'");
    }

    #[test]
    fn gps_only_is_capitalised() {
        let meta = EmbeddedMetadata {
            gps_latitude: Some(Dms::from([40.0, 30.0, 0.0])),
            gps_longitude: Some(Dms::from([-79.0, 15.0, 0.0])),
            ..Default::default()
        };
        assert_eq!(describe(&meta), "Taken at geolocation 40.5,-79.25");
    }

    #[test]
    fn keywords_and_gps_are_joined() {
        let meta = EmbeddedMetadata {
            keywords: vec!["bridge".to_string()],
            gps_latitude: Some(Dms::from([40.0, 30.0, 0.0])),
            gps_longitude: Some(Dms::from([-79.0, 15.0, 0.0])),
            ..Default::default()
        };
        assert_eq!(
            describe(&meta),
            "An image with keywords 'bridge' and taken at geolocation 40.5,-79.25"
        );
    }

    #[test]
    fn parse_tags_trims_and_drops_empties() {
        assert_eq!(
            parse_tags(" sunset ; beach;;  ocean waves ;\n"),
            vec!["sunset", "beach", "ocean waves"]
        );
        assert!(parse_tags("").is_empty());
    }
}
