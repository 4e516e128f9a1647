use std::{
    io::SeekFrom,
    path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use tokio::{
    fs,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};
use tracing::{info, warn};

use crate::{
    application::{error::ApplicationError, services::StorageService},
    domain::models::file::{FileContent, FileData, StoredFile},
    services::error::StorageError,
};

const SNIFF_LEN: usize = 8192;
/// NAME_MAX on the filesystems we run on.
const MAX_FILENAME_BYTES: usize = 255;
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Stores uploads as plain files directly under a single root directory.
pub struct LocalStorageService {
    root: PathBuf,
}

impl LocalStorageService {
    /// The root is made absolute and normalized once, here. It does not need
    /// to exist yet; `init` creates it.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref();
        let absolute = std::path::absolute(root)
            .map_err(|e| StorageError::IoError(format!("{}: {}", root.display(), e)))?;

        Ok(Self {
            root: normalize(&absolute),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins `filename` to the root and checks that the normalized result is
    /// a direct child of the root.
    pub fn sanitize(&self, filename: &str) -> Result<PathBuf, StorageError> {
        if filename.trim().is_empty() {
            return Err(StorageError::InvalidPath("empty filename".to_string()));
        }

        let candidate = Path::new(filename);
        if candidate.has_root() {
            return Err(StorageError::InvalidPath(format!(
                "'{}' is an absolute path",
                filename
            )));
        }
        if candidate
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(StorageError::InvalidPath(format!(
                "'{}' contains a parent directory segment",
                filename
            )));
        }

        let destination = normalize(&self.root.join(candidate));
        if destination.parent() != Some(self.root.as_path()) {
            return Err(StorageError::InvalidPath(format!(
                "'{}' resolves outside the storage root",
                filename
            )));
        }

        let name_len = destination
            .file_name()
            .map(|name| name.len())
            .unwrap_or_default();
        if name_len > MAX_FILENAME_BYTES {
            return Err(StorageError::InvalidPath(format!(
                "filename is {} bytes, the limit is {}",
                name_len, MAX_FILENAME_BYTES
            )));
        }

        Ok(destination)
    }

    fn storage_path_of(&self, absolute: &Path) -> String {
        absolute
            .strip_prefix(&self.root)
            .unwrap_or(absolute)
            .to_string_lossy()
            .into_owned()
    }

    async fn guess_mime_type(path: &Path, file: &mut fs::File) -> Result<String, StorageError> {
        if let Some(mime) = mime_guess::from_path(path).first() {
            return Ok(mime.essence_str().to_string());
        }

        let mut head = vec![0u8; SNIFF_LEN];
        let read = file
            .read(&mut head)
            .await
            .map_err(|e| StorageError::from_io(e, path))?;
        file.seek(SeekFrom::Start(0))
            .await
            .map_err(|e| StorageError::from_io(e, path))?;

        Ok(infer::get(&head[..read])
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string()))
    }
}

/// Lexical normalization: drops `.` and applies `..` without touching the
/// filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(segment) => normalized.push(segment),
        }
    }
    normalized
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn init(&self, reset: bool) -> Result<(), ApplicationError> {
        if reset {
            match fs::remove_dir_all(&self.root).await {
                Ok(()) => info!(root = %self.root.display(), "Storage root wiped"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(StorageError::from_io(e, &self.root).into()),
            }
        }

        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::from_io(e, &self.root))?;

        info!(root = %self.root.display(), "Storage root ready");
        Ok(())
    }

    async fn exists(&self, filename: &str) -> Result<bool, ApplicationError> {
        let path = self.sanitize(filename)?;
        let exists = fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::from_io(e, &path))?;
        Ok(exists)
    }

    async fn upload(&self, file_data: FileData) -> Result<StoredFile, ApplicationError> {
        let path = self.sanitize(&file_data.filename)?;
        let start = std::time::Instant::now();

        // create_new: an existing file is reported as a conflict, never replaced.
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| StorageError::from_io(e, &path))?;

        let written = async {
            file.write_all(&file_data.content).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %cleanup, "Failed to remove partial upload");
            }
            return Err(StorageError::from_io(e, &path).into());
        }

        info!(
            path = %path.display(),
            size_bytes = file_data.size(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(StoredFile {
            storage_path: self.storage_path_of(&path),
            size: file_data.size(),
        })
    }

    async fn download(&self, storage_path: &str) -> Result<FileContent, ApplicationError> {
        let path = self.sanitize(storage_path)?;

        let mut file = fs::File::open(&path)
            .await
            .map_err(|e| StorageError::from_io(e, &path))?;
        let metadata = file
            .metadata()
            .await
            .map_err(|e| StorageError::from_io(e, &path))?;

        if !metadata.is_file() {
            return Err(StorageError::NotFound(path.display().to_string()).into());
        }

        let mime_type = Self::guess_mime_type(&path, &mut file).await?;

        info!(
            path = %path.display(),
            size_bytes = metadata.len(),
            mime_type = %mime_type,
            "Local storage download opened"
        );

        Ok(FileContent {
            file,
            size: metadata.len(),
            mime_type,
        })
    }

    async fn delete(&self, storage_path: &str) -> Result<(), ApplicationError> {
        let path = self.sanitize(storage_path)?;

        let metadata = match fs::symlink_metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "File already absent from storage");
                return Ok(());
            }
            Err(e) => return Err(StorageError::from_io(e, &path).into()),
        };

        let removed = if metadata.is_dir() {
            fs::remove_dir_all(&path).await
        } else {
            fs::remove_file(&path).await
        };

        match removed {
            Ok(()) => {
                info!(path = %path.display(), "Local storage delete successful");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from_io(e, &path).into()),
        }
    }
}
