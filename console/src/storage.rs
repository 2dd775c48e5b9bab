//! The storage collaborator: a narrow file-store interface plus the
//! persisted high-score record, a single decimal integer text line at a
//! well-known path. Every failure here degrades to a default value or a
//! skipped write; nothing in this module can halt the engine.

use std::{
    fs,
    io::{self, Read, Seek, Write},
    path::PathBuf,
};

pub const HIGHSCORE_FILE: &str = "/highscore.txt";

pub trait ReadSeek: Read + Seek + Send {}
impl<T: Read + Seek + Send> ReadSeek for T {}

pub trait Storage: Send + Sync {
    fn open_read(&self, path: &str) -> io::Result<Box<dyn ReadSeek>>;
    fn open_write(&self, path: &str) -> io::Result<Box<dyn Write + Send>>;
    fn exists(&self, path: &str) -> bool;
}

/// Filesystem-backed storage rooted at the asset directory. Well-known
/// paths use a leading slash like the card filesystem they model; it is
/// stripped when resolving against the root.
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl Storage for FsStorage {
    fn open_read(&self, path: &str) -> io::Result<Box<dyn ReadSeek>> {
        Ok(Box::new(fs::File::open(self.resolve(path))?))
    }

    fn open_write(&self, path: &str) -> io::Result<Box<dyn Write + Send>> {
        Ok(Box::new(fs::File::create(self.resolve(path))?))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }
}

/// Seeds the record file with "0" when it is missing, so first boot on a
/// fresh card behaves like any later boot.
pub fn prepare_high_score(storage: &dyn Storage) {
    if storage.exists(HIGHSCORE_FILE) {
        return;
    }
    if let Err(error) = write_record(storage, 0) {
        tracing::warn!("failed to seed high-score file: {error}");
    }
}

/// Loads the persisted record, falling back to 0 on any failure: a
/// missing card, an unreadable file, or a corrupt line.
pub fn load_high_score(storage: &dyn Storage) -> u32 {
    let mut handle = match storage.open_read(HIGHSCORE_FILE) {
        Ok(handle) => handle,
        Err(error) => {
            tracing::warn!("high-score file unavailable, starting from 0: {error}");
            return 0;
        }
    };

    let mut text = String::new();
    if let Err(error) = handle.read_to_string(&mut text) {
        tracing::warn!("high-score file unreadable, starting from 0: {error}");
        return 0;
    }

    match text.trim().parse() {
        Ok(score) => score,
        Err(_) => {
            tracing::warn!(record = %text.trim(), "corrupt high-score record, starting from 0");
            0
        }
    }
}

pub fn save_high_score(storage: &dyn Storage, score: u32) {
    match write_record(storage, score) {
        Ok(()) => tracing::info!(score, "high score persisted"),
        Err(error) => tracing::warn!(score, "failed to persist high score: {error}"),
    }
}

fn write_record(storage: &dyn Storage, score: u32) -> io::Result<()> {
    let mut handle = storage.open_write(HIGHSCORE_FILE)?;
    writeln!(handle, "{score}")?;
    handle.flush()
}
