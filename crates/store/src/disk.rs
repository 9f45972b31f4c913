/// JSON file persistence for the gallery collection and refresh marker
use crate::{seed_collection, Result, VideoArtifact};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const VIDEOS_FILE: &str = "videos.json";
const MARKER_FILE: &str = "last_refresh.json";

/// File-backed store rooted at one directory
pub struct GalleryStore {
    dir: PathBuf,
}

impl GalleryStore {
    /// Store rooted at the given directory
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store rooted at the platform app-data directory
    pub fn at_default_location() -> Self {
        Self::new(crate::app_data_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the persisted collection and refresh marker.
    ///
    /// Never fails. Missing or malformed data falls back to the built-in
    /// sample collection with no marker, so the next launch refreshes.
    pub fn load(&self) -> (Vec<VideoArtifact>, Option<DateTime<Utc>>) {
        let videos = match self.read_videos() {
            Some(videos) => videos,
            None => return (seed_collection(), None),
        };
        (videos, self.read_marker())
    }

    /// Persist the collection. A failed write leaves the previous file intact.
    pub fn save_videos(&self, videos: &[VideoArtifact]) -> Result<()> {
        let json = serde_json::to_string_pretty(videos)?;
        self.write_atomic(VIDEOS_FILE, &json)
    }

    /// Persist the refresh marker as an RFC 3339 timestamp string.
    pub fn save_marker(&self, at: DateTime<Utc>) -> Result<()> {
        let json = serde_json::to_string(&at.to_rfc3339())?;
        self.write_atomic(MARKER_FILE, &json)
    }

    fn read_videos(&self) -> Option<Vec<VideoArtifact>> {
        let path = self.dir.join(VIDEOS_FILE);
        let raw = fs::read_to_string(&path).ok()?;
        let videos: Vec<VideoArtifact> = match serde_json::from_str(&raw) {
            Ok(videos) => videos,
            Err(err) => {
                warn!("discarding unreadable {}: {}", path.display(), err);
                return None;
            }
        };
        // Hand-edited or older files may drop required fields.
        if videos.iter().any(|v| v.id.is_empty() || v.title.is_empty()) {
            warn!("discarding {}: entries missing id or title", path.display());
            return None;
        }
        Some(videos)
    }

    fn read_marker(&self) -> Option<DateTime<Utc>> {
        let raw = fs::read_to_string(self.dir.join(MARKER_FILE)).ok()?;
        let text: String = serde_json::from_str(&raw).ok()?;
        DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    // Write to a sibling temp file, then rename over the target.
    fn write_atomic(&self, name: &str, contents: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let tmp = self.dir.join(format!("{}.tmp", name));
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, self.dir.join(name))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn temp_store() -> (tempfile::TempDir, GalleryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = GalleryStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn test_load_empty_dir_returns_seeds() {
        let (_dir, store) = temp_store();
        let (videos, marker) = store.load();
        assert_eq!(videos, seed_collection());
        assert!(marker.is_none());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (_dir, store) = temp_store();
        let videos = vec![VideoArtifact::new(
            "Dunes".to_string(),
            "a dune sea at dawn".to_string(),
            "data:video/mp4;base64,AAAA".to_string(),
        )];
        let marker = Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).unwrap();

        store.save_videos(&videos).unwrap();
        store.save_marker(marker).unwrap();

        let (loaded, loaded_marker) = store.load();
        assert_eq!(loaded, videos);
        assert_eq!(loaded_marker, Some(marker));
    }

    #[test]
    fn test_corrupt_videos_fall_back_to_seeds_without_marker() {
        let (_dir, store) = temp_store();
        store
            .save_marker(Utc.with_ymd_and_hms(2024, 3, 9, 8, 0, 0).unwrap())
            .unwrap();
        fs::write(store.dir().join(VIDEOS_FILE), "{not json").unwrap();

        let (videos, marker) = store.load();
        assert_eq!(videos, seed_collection());
        assert!(marker.is_none());
    }

    #[test]
    fn test_entries_missing_required_fields_are_discarded() {
        let (_dir, store) = temp_store();
        let raw = r#"[
            {"id": "a", "title": "Fine", "description": "p", "videoUrl": "u"},
            {"id": "", "title": "No id", "description": "p", "videoUrl": "u"}
        ]"#;
        fs::write(store.dir().join(VIDEOS_FILE), raw).unwrap();

        let (videos, _) = store.load();
        assert_eq!(videos, seed_collection());
    }

    #[test]
    fn test_unparseable_marker_reads_as_absent() {
        let (_dir, store) = temp_store();
        store.save_videos(&seed_collection()).unwrap();
        fs::write(store.dir().join(MARKER_FILE), "\"yesterday-ish\"").unwrap();

        let (_, marker) = store.load();
        assert!(marker.is_none());
    }

    #[test]
    fn test_save_overwrites_previous_collection() {
        let (_dir, store) = temp_store();
        let first = vec![VideoArtifact::new(
            "One".to_string(),
            "p1".to_string(),
            "u1".to_string(),
        )];
        let second = vec![
            VideoArtifact::new("Two".to_string(), "p2".to_string(), "u2".to_string()),
            first[0].clone(),
        ];

        store.save_videos(&first).unwrap();
        store.save_videos(&second).unwrap();

        let (loaded, _) = store.load();
        assert_eq!(loaded, second);
    }

    #[test]
    fn test_empty_collection_is_preserved_not_reseeded() {
        let (_dir, store) = temp_store();
        store.save_videos(&[]).unwrap();
        let (videos, _) = store.load();
        assert!(videos.is_empty());
    }
}
