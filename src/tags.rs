//! Cover art and duration metadata on the downloaded files.
//!
//! Embedding is best-effort by contract: a track must never be lost from
//! the playlist solely because artwork could not be written into it.

use std::path::Path;
use std::time::Duration;

use lofty::{AudioFile, MimeType, Picture, PictureType, Tag, TagExt, TaggedFileExt};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum TagError {
    #[error("failed to read tags: {0}")]
    Read(#[source] lofty::LoftyError),
    #[error("failed to write tags: {0}")]
    Write(#[source] lofty::LoftyError),
}

/// What a file carries in its tags. The two fields are independent: a file
/// can know its duration and have no art, or the other way around.
#[derive(Debug, Default)]
pub struct EmbeddedMeta {
    pub art: Option<Vec<u8>>,
    pub duration: Option<Duration>,
}

/// Read the embedded front cover (or first picture) and the duration.
pub fn read_embedded(path: &Path) -> Result<EmbeddedMeta, TagError> {
    let tagged = lofty::read_from_path(path).map_err(TagError::Read)?;

    let duration = Some(tagged.properties().duration());

    let art = tagged
        .primary_tag()
        .or_else(|| tagged.first_tag())
        .and_then(|tag| {
            let pictures = tag.pictures();
            pictures
                .iter()
                .find(|p| matches!(p.pic_type(), PictureType::CoverFront))
                .or_else(|| pictures.first())
                .map(|p| p.data().to_vec())
        });

    Ok(EmbeddedMeta { art, duration })
}

/// Embed `image` as the single front cover of `path`.
///
/// Best-effort: any failure is logged and swallowed so the caller can keep
/// the track regardless.
pub fn embed_art(path: &Path, image: &[u8]) {
    match try_embed_art(path, image) {
        Ok(()) => debug!(path = %path.display(), bytes = image.len(), "embedded cover art"),
        Err(e) => warn!(path = %path.display(), error = %e, "cover art embedding failed, keeping track"),
    }
}

fn try_embed_art(path: &Path, image: &[u8]) -> Result<(), TagError> {
    let tagged = lofty::read_from_path(path).map_err(TagError::Read)?;

    let mut tag = match tagged.primary_tag() {
        Some(t) => t.clone(),
        None => Tag::new(tagged.primary_tag_type()),
    };

    let picture = Picture::new_unchecked(
        PictureType::CoverFront,
        Some(sniff_mime(image)),
        Some("Cover".to_string()),
        image.to_vec(),
    );

    if tag.pictures().is_empty() {
        tag.push_picture(picture);
    } else {
        tag.set_picture(0, picture);
    }

    tag.save_to_path(path).map_err(TagError::Write)
}

/// Detect the image format from its magic bytes instead of trusting the
/// source to always be JPEG. Unknown formats fall back to JPEG.
fn sniff_mime(image: &[u8]) -> MimeType {
    if image.starts_with(&[0xFF, 0xD8, 0xFF]) {
        MimeType::Jpeg
    } else if image.starts_with(&[0x89, b'P', b'N', b'G']) {
        MimeType::Png
    } else if image.starts_with(b"GIF8") {
        MimeType::Gif
    } else if image.len() >= 12 && image.starts_with(b"RIFF") && &image[8..12] == b"WEBP" {
        MimeType::Unknown("image/webp".to_string())
    } else {
        MimeType::Jpeg
    }
}
