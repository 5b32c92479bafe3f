//! Flat-file artist store
//!
//! Owns the master list and the pending list behind one mutex. Every
//! read-modify-persist sequence runs while holding it, so ids stay unique and
//! the files never interleave two writers.
//!
//! Mutations are applied to a copy, written to disk (temp file + rename) and
//! only then committed in memory. A failed write leaves both sides unchanged.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::thumbnail::ThumbnailGenerator;
use crate::validation::{ArtistEdit, ArtistForm, FieldErrors};
use crate::{Error, Result};

pub mod pending;
pub mod record;

pub use record::ArtistRecord;

/// File name of the master list inside the data directory
pub const MASTER_LIST_FILE: &str = "artists_master.txt";
/// File name of the pending list inside the data directory
pub const PENDING_LIST_FILE: &str = "artists_to_add.txt";

/// Locations of the two list files
#[derive(Debug, Clone)]
pub struct StorePaths {
    pub master: PathBuf,
    pub pending: PathBuf,
}

impl StorePaths {
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            master: data_dir.join(MASTER_LIST_FILE),
            pending: data_dir.join(PENDING_LIST_FILE),
        }
    }
}

#[derive(Debug, Default)]
struct Lists {
    master: Vec<ArtistRecord>,
    pending: Vec<String>,
}

/// Result of an add-form submission
#[derive(Debug)]
pub enum Submission {
    /// Record created; the pending list is returned as it now stands
    Created {
        record: ArtistRecord,
        pending: Vec<String>,
    },
    /// Nothing was changed
    Rejected(FieldErrors),
}

/// Result of an edit-form submission
#[derive(Debug)]
pub enum Update {
    Updated(ArtistRecord),
    /// Nothing was changed; `thumbnail` is the record's current thumbnail
    Rejected { errors: FieldErrors, thumbnail: String },
}

/// In-memory lists persisted to two flat files
pub struct ArtistStore {
    paths: StorePaths,
    thumbnails: ThumbnailGenerator,
    lists: Mutex<Lists>,
}

impl ArtistStore {
    /// Load both files; a missing file is an empty list
    pub fn open(paths: StorePaths, thumbnails: ThumbnailGenerator) -> Result<Self> {
        let master = match read_optional(&paths.master)? {
            Some(content) => record::parse_master_list(&content)?,
            None => {
                info!("Master list {} not found, starting empty", paths.master.display());
                Vec::new()
            }
        };
        let pending = match read_optional(&paths.pending)? {
            Some(content) => pending::parse_pending_list(&content),
            None => {
                info!("Pending list {} not found, starting empty", paths.pending.display());
                Vec::new()
            }
        };

        info!(
            "Loaded {} artists and {} pending names",
            master.len(),
            pending.len()
        );

        Ok(Self {
            paths,
            thumbnails,
            lists: Mutex::new(Lists { master, pending }),
        })
    }

    pub fn thumbnails(&self) -> &ThumbnailGenerator {
        &self.thumbnails
    }

    /// Snapshot of the master list
    pub async fn artists(&self) -> Vec<ArtistRecord> {
        self.lists.lock().await.master.clone()
    }

    /// Snapshot of the pending list
    pub async fn pending(&self) -> Vec<String> {
        self.lists.lock().await.pending.clone()
    }

    pub async fn find(&self, id: u32) -> Option<ArtistRecord> {
        self.lists
            .lock()
            .await
            .master
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// Duplicate-name check against the master list, optionally skipping a record
    pub async fn name_taken(&self, name: &str, exclude_id: Option<u32>) -> bool {
        record::name_conflict(&self.lists.lock().await.master, name, exclude_id)
    }

    /// Append a record whose thumbnail already exists; assigns the next id
    pub async fn add_record(
        &self,
        name: &str,
        description: &str,
        image_url: &str,
        thumbnail: &str,
    ) -> Result<ArtistRecord> {
        let mut lists = self.lists.lock().await;
        let record = ArtistRecord {
            id: record::next_id(&lists.master)?,
            name: name.to_string(),
            description: description.to_string(),
            image_url: image_url.to_string(),
            thumbnail: thumbnail.to_string(),
        };
        self.append(&mut lists, &record)?;
        Ok(record)
    }

    /// Full add flow: validate, create thumbnail, append, drop from pending
    pub async fn submit(&self, form: &ArtistForm) -> Result<Submission> {
        let mut lists = self.lists.lock().await;

        let mut errors = form.validate();
        if errors.name.is_none() && record::name_conflict(&lists.master, &form.name, None) {
            errors.name = Some(FieldErrors::NAME_TAKEN.to_string());
        }
        if !errors.is_empty() {
            return Ok(Submission::Rejected(errors));
        }

        let id = record::next_id(&lists.master)?;
        let thumbnail = ThumbnailGenerator::filename_for(id);
        if let Err(e) = self.thumbnails.ensure(&form.image_url, &thumbnail).await {
            warn!("Thumbnail error for {}: {}", form.image_url, e);
            return Ok(Submission::Rejected(FieldErrors::thumbnail_failed()));
        }

        let record = ArtistRecord {
            id,
            name: form.name.clone(),
            description: form.description.clone(),
            image_url: form.image_url.clone(),
            thumbnail,
        };

        if let Err(e) = self.append(&mut lists, &record) {
            let _ = self.thumbnails.remove(&record.thumbnail);
            return Err(e);
        }

        if !form.original_name.is_empty() {
            let mut names = lists.pending.clone();
            if pending::remove_name(&mut names, &form.original_name) {
                self.write_pending(&names)?;
                lists.pending = names;
            }
        }

        Ok(Submission::Created {
            record,
            pending: lists.pending.clone(),
        })
    }

    /// Edit flow for record `id`
    ///
    /// A new, non-empty image URL regenerates the thumbnail and the old file
    /// is deleted; an unchanged or empty URL keeps the current one.
    pub async fn update_record(&self, id: u32, edit: &ArtistEdit) -> Result<Update> {
        let mut lists = self.lists.lock().await;
        let index = lists
            .master
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(format!("artist {}", id)))?;
        let current = lists.master[index].clone();

        let mut errors = edit.validate();
        if errors.name.is_none() && record::name_conflict(&lists.master, &edit.name, Some(id)) {
            errors.name = Some(FieldErrors::NAME_TAKEN.to_string());
        }
        if !errors.is_empty() {
            return Ok(Update::Rejected {
                errors,
                thumbnail: current.thumbnail,
            });
        }

        let mut updated = current.clone();
        updated.name = edit.name.clone();
        updated.description = edit.description.clone();

        let replaces_image = !edit.image_url.is_empty() && edit.image_url != current.image_url;
        if replaces_image {
            let thumbnail = self.thumbnails.unused_filename_for(id, &current.thumbnail);
            if let Err(e) = self.thumbnails.fetch_and_resize(&edit.image_url, &thumbnail).await {
                warn!("Thumbnail error for {}: {}", edit.image_url, e);
                return Ok(Update::Rejected {
                    errors: FieldErrors::thumbnail_failed(),
                    thumbnail: current.thumbnail,
                });
            }
            updated.image_url = edit.image_url.clone();
            updated.thumbnail = thumbnail;
        }

        let mut master = lists.master.clone();
        master[index] = updated.clone();
        if let Err(e) = self.write_master(&master) {
            if replaces_image && updated.thumbnail != current.thumbnail {
                let _ = self.thumbnails.remove(&updated.thumbnail);
            }
            return Err(e);
        }
        lists.master = master;

        if replaces_image && current.thumbnail != updated.thumbnail {
            if let Err(e) = self.thumbnails.remove(&current.thumbnail) {
                warn!("Could not delete old thumbnail {}: {}", current.thumbnail, e);
            }
        }

        info!("Updated artist {} ({})", updated.id, updated.name);
        Ok(Update::Updated(updated))
    }

    /// Remove record `id` and its thumbnail file
    ///
    /// Returns the removed record, or `None` if no record had that id.
    pub async fn delete_record(&self, id: u32) -> Result<Option<ArtistRecord>> {
        let mut lists = self.lists.lock().await;
        let Some(index) = lists.master.iter().position(|r| r.id == id) else {
            return Ok(None);
        };

        let mut master = lists.master.clone();
        let removed = master.remove(index);
        self.write_master(&master)?;
        lists.master = master;

        if let Err(e) = self.thumbnails.remove(&removed.thumbnail) {
            warn!("Could not delete thumbnail {}: {}", removed.thumbnail, e);
        }

        info!("Deleted artist {} ({})", removed.id, removed.name);
        Ok(Some(removed))
    }

    /// Append names (trimmed, blanks skipped); returns the resulting list
    pub async fn add_pending_names(&self, names: &[String]) -> Result<Vec<String>> {
        let mut lists = self.lists.lock().await;
        let additions: Vec<String> = names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();

        if !additions.is_empty() {
            let mut next = lists.pending.clone();
            next.extend(additions);
            self.write_pending(&next)?;
            lists.pending = next;
        }

        Ok(lists.pending.clone())
    }

    /// Case-insensitive removal; returns the resulting list
    pub async fn remove_pending_name(&self, name: &str) -> Result<Vec<String>> {
        let mut lists = self.lists.lock().await;
        let mut next = lists.pending.clone();
        if pending::remove_name(&mut next, name) {
            self.write_pending(&next)?;
            lists.pending = next;
        }
        Ok(lists.pending.clone())
    }

    /// Rewrite both files from memory
    pub async fn save(&self) -> Result<()> {
        let lists = self.lists.lock().await;
        self.write_master(&lists.master)?;
        self.write_pending(&lists.pending)
    }

    /// Final flush at shutdown
    pub async fn close(self) -> Result<()> {
        self.save().await?;
        info!("Artist store closed");
        Ok(())
    }

    fn append(&self, lists: &mut Lists, record: &ArtistRecord) -> Result<()> {
        let mut master = lists.master.clone();
        master.push(record.clone());
        self.write_master(&master)?;
        lists.master = master;
        info!("Added artist {} ({})", record.id, record.name);
        Ok(())
    }

    fn write_master(&self, records: &[ArtistRecord]) -> Result<()> {
        write_master_list(&self.paths.master, records)
    }

    fn write_pending(&self, names: &[String]) -> Result<()> {
        write_atomic(&self.paths.pending, &pending::serialize_pending_list(names))
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Replace the master list file at `path` with `records`
pub fn write_master_list(path: &Path, records: &[ArtistRecord]) -> Result<()> {
    write_atomic(path, &record::serialize_master_list(records))
}

/// Write to a sibling temp file, then rename over the target
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp = path.with_extension("txt.tmp");
    fs::write(&temp, content)?;
    if let Err(e) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(e.into());
    }
    Ok(())
}
