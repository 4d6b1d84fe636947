use super::store::MemoryStore;
use crate::core::config::EngineConfig;
use crate::core::constants::SAVE_VERSION_MAGIC;
use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// A store snapshot on disk in a checksummed binary format.
pub struct SaveFile {
    path: PathBuf,
}

impl SaveFile {
    /// Save file `name` inside `dir`, creating the directory if needed.
    pub fn new(dir: &Path, name: &str) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(name),
        })
    }

    /// Save file `name` in the platform data directory for this crate.
    pub fn in_project_dir(name: &str) -> io::Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "ascend").ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "Could not determine data directory")
        })?;
        Self::new(project_dirs.data_dir(), name)
    }

    /// Save file `name` in the config's `save_directory`, or the platform data
    /// directory when none is set.
    pub fn for_config(config: &EngineConfig, name: &str) -> io::Result<Self> {
        match &config.save_directory {
            Some(dir) => Self::new(dir, name),
            None => Self::in_project_dir(name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Writes the store to disk.
    ///
    /// File format:
    /// - Version magic (8 bytes)
    /// - Data length (4 bytes)
    /// - bincode-encoded store (variable length)
    /// - SHA256 checksum over everything above (32 bytes)
    pub fn save(&self, store: &MemoryStore) -> io::Result<()> {
        let data =
            bincode::serialize(store).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let data_len = u32::try_from(data.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "Save data too large"))?;

        let mut hasher = Sha256::new();
        hasher.update(SAVE_VERSION_MAGIC.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        // Write to a sibling file first so a crash never leaves a torn save
        let tmp_path = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&SAVE_VERSION_MAGIC.to_le_bytes())?;
            file.write_all(&data_len.to_le_bytes())?;
            file.write_all(&data)?;
            file.write_all(&checksum)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Reads and verifies the store.
    ///
    /// Fails if the file is missing, the magic differs, the checksum does not
    /// match, or the payload cannot be decoded.
    pub fn load(&self) -> io::Result<MemoryStore> {
        let mut file = fs::File::open(&self.path)?;

        let mut version_bytes = [0u8; 8];
        file.read_exact(&mut version_bytes)?;
        let version = u64::from_le_bytes(version_bytes);
        if version != SAVE_VERSION_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Invalid save version: expected 0x{:016X}, got 0x{:016X}",
                    SAVE_VERSION_MAGIC, version
                ),
            ));
        }

        let mut length_bytes = [0u8; 4];
        file.read_exact(&mut length_bytes)?;
        let data_len = u32::from_le_bytes(length_bytes);

        let mut data = vec![0u8; data_len as usize];
        file.read_exact(&mut data)?;

        let mut stored_checksum = [0u8; 32];
        file.read_exact(&mut stored_checksum)?;

        let mut hasher = Sha256::new();
        hasher.update(version_bytes);
        hasher.update(length_bytes);
        hasher.update(&data);
        if stored_checksum != hasher.finalize().as_slice() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Checksum verification failed",
            ));
        }

        bincode::deserialize(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Loads the store, treating any failure as "no data".
    pub fn load_or_default(&self) -> MemoryStore {
        match self.load() {
            Ok(store) => store,
            Err(e) if e.kind() == io::ErrorKind::NotFound => MemoryStore::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "discarding unreadable save");
                MemoryStore::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::store::KvStore;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ascend_save_test_{}_{name}", std::process::id()));
        fs::remove_dir_all(&dir).ok();
        dir
    }

    #[test]
    fn test_save_and_load() {
        let dir = temp_dir("roundtrip");
        let save = SaveFile::new(&dir, "player.dat").unwrap();

        let mut store = MemoryStore::new();
        store.set_int("PlayerLevel", 12);
        store.set_float("WorldVariance", -1.25);
        store.set_string("SelectedClass", "Magic");
        save.save(&store).unwrap();

        assert!(save.exists());
        let loaded = save.load().unwrap();
        assert_eq!(loaded, store);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_save_directory_is_used() {
        let dir = temp_dir("configured");
        let config = EngineConfig {
            save_directory: Some(dir.clone()),
            ..Default::default()
        };
        let save = SaveFile::for_config(&config, "world.dat").unwrap();
        assert_eq!(save.path(), dir.join("world.dat"));
        assert!(dir.is_dir());

        let mut store = MemoryStore::new();
        store.set_int("WorldLevel", 7);
        save.save(&store).unwrap();
        assert_eq!(save.load().unwrap().get_int("WorldLevel", 1), 7);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_file_loads_default() {
        let dir = temp_dir("missing");
        let save = SaveFile::new(&dir, "none.dat").unwrap();
        assert!(save.load().is_err());
        assert!(save.load_or_default().is_empty());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_corrupted_file_loads_default() {
        let dir = temp_dir("corrupt");
        let save = SaveFile::new(&dir, "player.dat").unwrap();

        let mut store = MemoryStore::new();
        store.set_int("PlayerXP", 99);
        save.save(&store).unwrap();

        // Flip a payload byte so the checksum no longer matches
        let mut bytes = fs::read(save.path()).unwrap();
        bytes[12] ^= 0xFF;
        fs::write(save.path(), bytes).unwrap();

        let err = save.load().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(save.load_or_default().is_empty());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_magic_rejected() {
        let dir = temp_dir("magic");
        let save = SaveFile::new(&dir, "player.dat").unwrap();
        fs::write(save.path(), [0u8; 64]).unwrap();
        assert!(save.load().is_err());
        fs::remove_dir_all(&dir).ok();
    }
}
