//! Conversion from the legacy artist file format
//!
//! The legacy file uses blank-line separated blocks tagged `n:` (name),
//! `d:` (description), `i:` (image URL) and `h:` (thumbnail stem, the image
//! lived at `<stem>.jpg`). There were no ids.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};

use crate::store::ArtistRecord;
use crate::{Error, Result};

/// One artist as found in the legacy file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyArtist {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub thumb_stem: Option<String>,
}

impl LegacyArtist {
    pub fn old_thumbnail(&self) -> Option<String> {
        self.thumb_stem.as_ref().map(|stem| format!("{}.jpg", stem))
    }
}

/// Outcome of a migration run
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub records: Vec<ArtistRecord>,
    /// Thumbnails copied into the new images directory
    pub copied: usize,
    /// Legacy thumbnail files that could not be found
    pub missing: Vec<String>,
}

/// Parse legacy content; blocks without a name are skipped
pub fn parse_legacy(content: &str) -> Vec<LegacyArtist> {
    let mut artists = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in content.lines().chain(std::iter::once("")) {
        if !line.trim().is_empty() {
            block.push(line);
            continue;
        }
        if let Some(artist) = parse_block(&block) {
            artists.push(artist);
        }
        block.clear();
    }

    artists
}

fn parse_block(lines: &[&str]) -> Option<LegacyArtist> {
    let mut name = None;
    let mut description = None;
    let mut image_url = None;
    let mut thumb_stem = None;

    for line in lines {
        let Some((tag, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        match tag {
            "n" => name = Some(value),
            "d" => description = Some(value),
            "i" => image_url = Some(value),
            "h" => thumb_stem = Some(value),
            _ => {}
        }
    }

    Some(LegacyArtist {
        name: name?,
        description: description.unwrap_or_default(),
        image_url: image_url.unwrap_or_default(),
        thumb_stem: thumb_stem.filter(|s| !s.is_empty()),
    })
}

/// Refuse to replace a master list that already holds content unless `force`
pub fn check_target(master: &Path, force: bool) -> Result<()> {
    if force {
        return Ok(());
    }
    match fs::read_to_string(master) {
        Ok(existing) if !existing.trim().is_empty() => Err(Error::InvalidInput(format!(
            "{} is not empty; pass --force to overwrite it",
            master.display()
        ))),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Assign ids 1..N and copy thumbnails to `<id>.jpg`
///
/// A missing legacy thumbnail is recorded in the report, not an error.
pub fn migrate(
    artists: &[LegacyArtist],
    old_images: &Path,
    new_images: &Path,
) -> Result<MigrationReport> {
    fs::create_dir_all(new_images)?;
    let mut report = MigrationReport::default();

    for (index, artist) in artists.iter().enumerate() {
        let id = index as u32 + 1;
        let new_thumb = format!("{}.jpg", id);

        match artist.old_thumbnail() {
            Some(old) if old_images.join(&old).is_file() => {
                fs::copy(old_images.join(&old), new_images.join(&new_thumb))?;
                info!("{}: {} -> {}", id, old, new_thumb);
                report.copied += 1;
            }
            Some(old) => {
                warn!("{}: missing legacy thumbnail {}", id, old);
                report.missing.push(old);
            }
            None => {
                warn!("{}: {} has no legacy thumbnail", id, artist.name);
                report.missing.push(format!("<none for {}>", artist.name));
            }
        }

        report.records.push(ArtistRecord {
            id,
            name: artist.name.clone(),
            description: artist.description.clone(),
            image_url: artist.image_url.clone(),
            thumbnail: new_thumb,
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LEGACY: &str = "n: Ada \nd:machines\ni:http://example/a.png\nh:abc\n\nd:orphan block\n\nn:Bo\nh:def\n";

    #[test]
    fn test_parse_skips_nameless_blocks() {
        let artists = parse_legacy(LEGACY);
        assert_eq!(artists.len(), 2);
        assert_eq!(artists[0].name, "Ada");
        assert_eq!(artists[0].old_thumbnail().as_deref(), Some("abc.jpg"));
        assert_eq!(artists[1].description, "");
        assert_eq!(artists[1].image_url, "");
    }

    #[test]
    fn test_migrate_assigns_ids_and_copies_thumbnails() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("old_images");
        let new = dir.path().join("images");
        fs::create_dir_all(&old).unwrap();
        fs::write(old.join("abc.jpg"), b"ada").unwrap();

        let report = migrate(&parse_legacy(LEGACY), &old, &new).unwrap();

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].id, 1);
        assert_eq!(report.records[0].thumbnail, "1.jpg");
        assert_eq!(report.records[1].id, 2);
        assert_eq!(report.copied, 1);
        assert_eq!(report.missing, vec!["def.jpg".to_string()]);
        assert_eq!(fs::read(new.join("1.jpg")).unwrap(), b"ada");
        assert!(!new.join("2.jpg").exists());
    }

    #[test]
    fn test_check_target_refuses_non_empty_master_without_force() {
        let dir = TempDir::new().unwrap();
        let master = dir.path().join("artists_master.txt");
        fs::write(&master, "id:1\nn:Ada\n\n").unwrap();

        assert!(matches!(
            check_target(&master, false),
            Err(Error::InvalidInput(_))
        ));
        assert!(check_target(&master, true).is_ok());
    }

    #[test]
    fn test_check_target_accepts_missing_or_blank_master() {
        let dir = TempDir::new().unwrap();
        let master = dir.path().join("artists_master.txt");
        assert!(check_target(&master, false).is_ok());

        fs::write(&master, "\n  \n").unwrap();
        assert!(check_target(&master, false).is_ok());
    }
}
