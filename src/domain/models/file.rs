use axum::body::Bytes;

/// An upload as received from the client, before it touches the disk.
#[derive(Debug, Clone)]
pub struct FileData {
    pub content: Bytes,
    pub filename: String,
}

impl FileData {
    pub fn new(content: Bytes, filename: String) -> Self {
        Self { content, filename }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Where an upload ended up inside the storage root.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    /// Path relative to the storage root, as persisted in the metadata table.
    pub storage_path: String,
    pub size: u64,
}

/// An opened file ready to be streamed back to a client.
#[derive(Debug)]
pub struct FileContent {
    pub file: tokio::fs::File,
    pub size: u64,
    pub mime_type: String,
}
