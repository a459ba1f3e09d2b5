#![forbid(unsafe_code)]

mod error;
mod forms;
mod requests;
mod rows;
mod support;
mod templates;

pub use error::{RangeBoundError, StoreError};
pub use forms::FormOwner;
pub use requests::*;
pub use rows::RangeRemoval;
pub use templates::Template;

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

use support::install_schema;

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join("journalforms.db");
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        install_schema(&conn)?;

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }
}
