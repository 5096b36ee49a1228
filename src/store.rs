use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::StoreError;
use crate::models::LocationRecord;

/// Ordered location records mirrored to one JSON file, plus the photo directory.
///
/// Records are only ever appended. Their count names the next image file,
/// so insertion order must survive a restart.
#[derive(Debug)]
pub struct LocationStore {
    data_file: PathBuf,
    image_dir: PathBuf,
    locations: Vec<LocationRecord>,
}

impl LocationStore {
    /// Creates both directories if needed and loads the data file when it exists.
    pub fn open(
        data_file: impl Into<PathBuf>,
        image_dir: impl AsRef<Path>,
    ) -> Result<Self, StoreError> {
        let data_file = data_file.into();
        let image_dir = image_dir.as_ref();

        fs::create_dir_all(image_dir).map_err(|e| StoreError::io(image_dir, e))?;
        let image_dir = std::path::absolute(image_dir).map_err(|e| StoreError::io(image_dir, e))?;

        if let Some(parent) = data_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let locations = if data_file.exists() {
            load_locations(&data_file)?
        } else {
            Vec::new()
        };

        tracing::info!(
            data_file = %data_file.display(),
            image_dir = %image_dir.display(),
            count = locations.len(),
            "location store opened"
        );

        Ok(Self { data_file, image_dir, locations })
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn records(&self) -> &[LocationRecord] {
        &self.locations
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    // image_<N+1>.png where N is the current record count
    pub fn next_image_path(&self) -> PathBuf {
        self.image_dir.join(format!("image_{}.png", self.locations.len() + 1))
    }

    /// Writes (or overwrites) the next image file. Does not add a record.
    pub fn save_image(&self, bytes: &[u8]) -> Result<PathBuf, StoreError> {
        let path = self.next_image_path();
        fs::write(&path, bytes).map_err(|e| StoreError::io(&path, e))?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "image saved");
        Ok(path)
    }

    /// Appends a record and rewrites the whole data file.
    ///
    /// On a failed write the record is dropped again, so the length is unchanged.
    pub fn append(&mut self, record: LocationRecord) -> Result<usize, StoreError> {
        self.locations.push(record);
        if let Err(e) = save_locations(&self.data_file, &self.locations) {
            self.locations.pop();
            return Err(e);
        }
        tracing::info!(count = self.locations.len(), "location saved");
        Ok(self.locations.len())
    }
}

fn load_locations(path: &Path) -> Result<Vec<LocationRecord>, StoreError> {
    let text = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| StoreError::json(path, e))?;
    if !value.is_array() {
        return Err(StoreError::Corrupt { path: path.to_path_buf() });
    }
    serde_json::from_value(value).map_err(|_| StoreError::Corrupt { path: path.to_path_buf() })
}

// Full rewrite through a temp file, pretty-printed with 4-space indent.
fn save_locations(path: &Path, locations: &[LocationRecord]) -> Result<(), StoreError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    locations.serialize(&mut ser).map_err(|e| StoreError::json(path, e))?;

    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);

    fs::write(&tmp_path, buf).map_err(|e| StoreError::io(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| StoreError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn record(address: &str) -> LocationRecord {
        LocationRecord::from_submission(json!({
            "lat": 33.5, "lng": 126.5, "address": address, "photo": "data:image/png;base64,QUJD"
        }))
        .unwrap()
    }

    fn open_in(dir: &TempDir) -> LocationStore {
        let data_file = dir.path().join("data/pin_state.json");
        LocationStore::open(data_file, dir.path().join("images")).unwrap()
    }

    #[test]
    fn opens_empty_and_creates_directories() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);
        assert!(store.is_empty());
        assert!(dir.path().join("images").is_dir());
        assert!(dir.path().join("data").is_dir());
        assert!(store.image_dir().is_absolute());
    }

    #[test]
    fn append_persists_in_order_and_reloads() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);
        assert_eq!(store.append(record("first")).unwrap(), 1);
        assert_eq!(store.append(record("두번째")).unwrap(), 2);

        let text = fs::read_to_string(store.data_file()).unwrap();
        assert!(text.contains("두번째"), "non-ASCII must be written unescaped");
        assert!(text.contains("\n    {"), "expected 4-space indentation");

        let reopened = open_in(&dir);
        assert_eq!(reopened.records(), store.records());
        assert_eq!(reopened.records()[0].address(), Some(&json!("first")));
    }

    #[test]
    fn image_name_follows_record_count() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);
        let first = store.save_image(b"one").unwrap();
        assert!(first.ends_with("image_1.png"));

        // no record appended yet: same name is overwritten
        let again = store.save_image(b"two").unwrap();
        assert_eq!(first, again);
        assert_eq!(fs::read(&again).unwrap(), b"two");

        store.append(record("a")).unwrap();
        assert!(store.next_image_path().ends_with("image_2.png"));
    }

    #[test]
    fn failed_write_leaves_length_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);
        store.append(record("kept")).unwrap();

        // a directory at the temp path makes the rewrite fail
        fs::create_dir(dir.path().join("data/pin_state.json.tmp")).unwrap();
        assert!(store.append(record("lost")).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn rejects_non_array_data_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data/pin_state.json"), r#"{"lat": 1}"#).unwrap();
        let data_file = dir.path().join("data/pin_state.json");
        let err = LocationStore::open(data_file, dir.path().join("images")).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
