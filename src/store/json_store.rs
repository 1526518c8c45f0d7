use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

use crate::config::Config;
use crate::store::schema::{AttemptHistoryData, EXPORT_VERSION, ExportData, ProfileData};

const PROFILE_FILE: &str = "profile.json";
const ATTEMPTS_FILE: &str = "attempts.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("permitdrill");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    #[allow(dead_code)] // Used by integration tests
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => T::default(),
            }
        } else {
            T::default()
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Load and deserialize the profile. Returns None if the file exists but
    /// cannot be parsed (schema mismatch / corruption).
    pub fn load_profile(&self) -> Option<ProfileData> {
        let path = self.file_path(PROFILE_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path).ok()?;
            serde_json::from_str(&content).ok()
        } else {
            // No file yet: a fresh default, not a schema mismatch
            Some(ProfileData::default())
        }
    }

    pub fn save_profile(&self, data: &ProfileData) -> Result<()> {
        self.save(PROFILE_FILE, data)
    }

    pub fn load_attempts(&self) -> AttemptHistoryData {
        self.load(ATTEMPTS_FILE)
    }

    pub fn save_attempts(&self, data: &AttemptHistoryData) -> Result<()> {
        self.save(ATTEMPTS_FILE, data)
    }

    /// Delete the persisted attempt history. Missing file is not an error.
    pub fn delete_attempts(&self) -> Result<()> {
        let path = self.file_path(ATTEMPTS_FILE);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Bundle all persisted data + config into an ExportData struct.
    pub fn export_all(&self, config: &Config) -> ExportData {
        ExportData {
            permitdrill_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            config: config.clone(),
            profile: self.load_profile().unwrap_or_default(),
            attempts: self.load_attempts(),
        }
    }

    /// Import an exported bundle. Both payloads are serialized up front, so a
    /// serialization failure leaves the store untouched; each file then
    /// commits through the atomic tmp+rename path. The config snapshot in the
    /// bundle is informational and is not restored.
    pub fn import_all(&self, data: &ExportData) -> Result<()> {
        if data.permitdrill_export_version != EXPORT_VERSION {
            bail!(
                "Unsupported export version: {} (expected {})",
                data.permitdrill_export_version,
                EXPORT_VERSION
            );
        }

        serde_json::to_string(&data.profile)?;
        serde_json::to_string(&data.attempts)?;

        self.save_profile(&data.profile)?;
        self.save_attempts(&data.attempts)?;
        Ok(())
    }
}
