//! Database backed by two JSON documents
//!
//! `clubs.json` holds `{"clubs": [...]}` and `competitions.json` holds `{"competitions": [...]}`.
//! Each document is rewritten as a whole on every booking, through a temporary file renamed over
//! the original.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::{fs, sync::Mutex};

use super::memory::Collections;
use crate::{
    domain::{Club, Competition},
    ports::database::{DatabasePort, Error},
};

#[derive(Debug, Serialize, Deserialize)]
struct ClubsDocument {
    clubs: Vec<Club>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CompetitionsDocument {
    competitions: Vec<Competition>,
}

#[derive(Debug)]
pub struct JsonFileDatabase {
    clubs_path: PathBuf,
    competitions_path: PathBuf,
    /// Current content of both files
    ///
    /// The async mutex is held for the whole commit so that writers never interleave.
    collections: Mutex<Collections>,
}

impl JsonFileDatabase {
    /// Load both documents
    pub async fn open(
        clubs_path: impl Into<PathBuf>,
        competitions_path: impl Into<PathBuf>,
    ) -> Result<Self, Error> {
        let clubs_path = clubs_path.into();
        let competitions_path = competitions_path.into();

        let clubs: ClubsDocument = read_document(&clubs_path).await?;
        let competitions: CompetitionsDocument = read_document(&competitions_path).await?;
        tracing::debug!(
            clubs = clubs.clubs.len(),
            competitions = competitions.competitions.len(),
            "loaded data files"
        );

        Ok(Self {
            collections: Mutex::new(Collections::new(clubs.clubs, competitions.competitions)?),
            clubs_path,
            competitions_path,
        })
    }

    /// Write both documents, leaving the previous files in place if anything fails
    async fn commit(&self, previous: &Collections, next: &Collections) -> Result<(), Error> {
        let clubs = serde_json::to_vec_pretty(&ClubsDocument {
            clubs: next.clubs(),
        })?;
        let competitions = serde_json::to_vec_pretty(&CompetitionsDocument {
            competitions: next.competitions(),
        })?;

        let clubs_tmp = temp_path(&self.clubs_path);
        let competitions_tmp = temp_path(&self.competitions_path);
        if let Err(err) = stage(&clubs_tmp, &clubs, &competitions_tmp, &competitions).await {
            let _ = fs::remove_file(&clubs_tmp).await;
            let _ = fs::remove_file(&competitions_tmp).await;
            return Err(err.into());
        }

        if let Err(err) = fs::rename(&clubs_tmp, &self.clubs_path).await {
            let _ = fs::remove_file(&clubs_tmp).await;
            let _ = fs::remove_file(&competitions_tmp).await;
            return Err(err.into());
        }
        if let Err(err) = fs::rename(&competitions_tmp, &self.competitions_path).await {
            let _ = fs::remove_file(&competitions_tmp).await;
            tracing::warn!(
                path = %self.competitions_path.display(),
                error = %err,
                "competitions file not written, restoring clubs file"
            );
            let restored = serde_json::to_vec_pretty(&ClubsDocument {
                clubs: previous.clubs(),
            })?;
            if let Err(restore_err) = write_atomic(&self.clubs_path, &restored).await {
                tracing::error!(
                    path = %self.clubs_path.display(),
                    error = %restore_err,
                    "failed to restore clubs file"
                );
            }
            return Err(err.into());
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl DatabasePort for JsonFileDatabase {
    async fn find_club(&self, name_or_email: &str) -> Result<Club, Error> {
        self.collections.lock().await.find_club(name_or_email)
    }

    async fn find_competition(&self, name: &str) -> Result<Competition, Error> {
        self.collections.lock().await.find_competition(name)
    }

    async fn list_clubs(&self) -> Result<Vec<Club>, Error> {
        Ok(self.collections.lock().await.clubs())
    }

    async fn list_competitions(&self) -> Result<Vec<Competition>, Error> {
        Ok(self.collections.lock().await.competitions())
    }

    async fn save_booking(&self, club: Club, competition: Competition) -> Result<(), Error> {
        let mut collections = self.collections.lock().await;

        let mut next = collections.clone();
        next.replace_booking(club, competition)?;
        self.commit(&collections, &next).await?;

        // Only swap the in-memory state once both files are on disk
        *collections = next;

        Ok(())
    }
}

async fn read_document<T>(path: &Path) -> Result<T, Error>
where
    T: for<'de> Deserialize<'de>,
{
    let raw = fs::read(path).await?;
    Ok(serde_json::from_slice(&raw)?)
}

async fn stage(
    clubs_tmp: &Path,
    clubs: &[u8],
    competitions_tmp: &Path,
    competitions: &[u8],
) -> std::io::Result<()> {
    write_synced(clubs_tmp, clubs).await?;
    write_synced(competitions_tmp, competitions).await
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;

    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = temp_path(path);
    write_synced(&tmp, bytes).await?;
    fs::rename(&tmp, path).await
}

fn temp_path(path: &Path) -> PathBuf {
    path.with_extension("json.tmp")
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Adapter(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Adapter(Box::new(err))
    }
}
