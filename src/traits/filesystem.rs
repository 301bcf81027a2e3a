use anyhow::{Context, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Trait for filesystem operations to enable testing with mocks
pub trait FileSystem: Send + Sync {
    /// Read file contents as string
    #[allow(dead_code)]
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write string contents to file
    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    /// Write string contents to file and mark it executable (no-op on Windows)
    fn write_executable(&self, path: &Path, contents: &str) -> Result<()>;

    /// Create directory and all parent directories
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Check if path exists
    #[allow(dead_code)]
    fn exists(&self, path: &Path) -> bool;
}

/// Real filesystem implementation using std::fs
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create parent directory: {:?}", parent))?;
        }

        std::fs::write(path, contents).with_context(|| format!("Failed to write file: {:?}", path))
    }

    fn write_executable(&self, path: &Path, contents: &str) -> Result<()> {
        self.write(path, contents)?;

        #[cfg(unix)]
        {
            use std::fs::Permissions;
            use std::os::unix::fs::PermissionsExt;

            std::fs::set_permissions(path, Permissions::from_mode(0o755))
                .with_context(|| format!("Failed to set permissions on: {:?}", path))?;
        }

        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {:?}", path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Mock filesystem implementation for testing (in-memory)
#[allow(dead_code)]
pub struct MockFileSystem {
    files: Arc<RwLock<HashMap<PathBuf, String>>>,
    directories: Arc<RwLock<HashSet<PathBuf>>>,
    executables: Arc<RwLock<HashSet<PathBuf>>>,
}

#[allow(dead_code)]
impl MockFileSystem {
    /// Create new empty mock filesystem
    pub fn new() -> Self {
        Self {
            files: Arc::new(RwLock::new(HashMap::new())),
            directories: Arc::new(RwLock::new(HashSet::new())),
            executables: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Get captured file contents for testing assertions
    pub fn get_file_contents(&self, path: &Path) -> Option<String> {
        self.files.read().unwrap().get(path).cloned()
    }

    /// Check if file was written
    pub fn has_file(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    /// Check if file was written with the executable flag
    pub fn is_executable(&self, path: &Path) -> bool {
        self.executables.read().unwrap().contains(path)
    }

    /// List all files in mock filesystem
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.files.read().unwrap().keys().cloned().collect()
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .with_context(|| format!("File not found in mock filesystem: {:?}", path))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }

        self.files
            .write()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn write_executable(&self, path: &Path, contents: &str) -> Result<()> {
        self.write(path, contents)?;
        self.executables.write().unwrap().insert(path.to_path_buf());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut directories = self.directories.write().unwrap();
        directories.insert(path.to_path_buf());

        // Also add parent directories
        let mut current = path;
        while let Some(parent) = current.parent() {
            directories.insert(parent.to_path_buf());
            current = parent;
        }

        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
            || self.directories.read().unwrap().contains(path)
    }
}
