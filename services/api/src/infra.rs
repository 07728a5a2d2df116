use leaderboard::leaderboard::{
    DatasetFormat, DatasetImporter, EmployeeRecord, ImportError, InMemoryDatasetRepository,
    LeaderboardService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use axum::body::Bytes;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

pub(crate) type SharedLeaderboard = Arc<LeaderboardService<InMemoryDatasetRepository>>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Everything the upload endpoint needs to replace the shared dataset.
#[derive(Clone)]
pub(crate) struct UploadState {
    pub(crate) service: SharedLeaderboard,
    pub(crate) store: Option<Arc<DatasetFileStore>>,
    /// Held from the disk write until the in-memory swap so both keep the same upload order.
    pub(crate) commit: Arc<Mutex<()>>,
}

impl UploadState {
    pub(crate) fn new(service: SharedLeaderboard, store: Option<Arc<DatasetFileStore>>) -> Self {
        Self {
            service,
            store,
            commit: Arc::new(Mutex::new(())),
        }
    }
}

/// Keeps the most recent upload on disk so a restart serves the same boards.
///
/// The configured path acts as a stem: the file is written with the extension
/// of the uploaded format and any copy in another format is removed.
#[derive(Debug, Clone)]
pub(crate) struct DatasetFileStore {
    path: PathBuf,
    writes: Arc<std::sync::Mutex<()>>,
}

impl DatasetFileStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writes: Arc::new(std::sync::Mutex::new(())),
        }
    }

    fn path_for(&self, format: DatasetFormat) -> PathBuf {
        self.path.with_extension(format.extension())
    }

    /// The stored dataset file, if one exists.
    pub(crate) fn existing(&self) -> Option<PathBuf> {
        DatasetFormat::ALL
            .into_iter()
            .map(|format| self.path_for(format))
            .find(|candidate| candidate.is_file())
    }

    pub(crate) fn load(&self) -> Result<Option<(PathBuf, Vec<EmployeeRecord>)>, ImportError> {
        match self.existing() {
            Some(path) => {
                let records = DatasetImporter::from_path(&path)?;
                Ok(Some((path, records)))
            }
            None => Ok(None),
        }
    }

    /// Write through a uniquely named temp file and rename so readers never see a partial upload.
    pub(crate) async fn persist(
        self: Arc<Self>,
        format: DatasetFormat,
        bytes: Bytes,
    ) -> io::Result<PathBuf> {
        tokio::task::spawn_blocking(move || self.replace(format, &bytes))
            .await
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?
    }

    fn replace(&self, format: DatasetFormat, bytes: &[u8]) -> io::Result<PathBuf> {
        let target = self.path_for(format);
        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let mut staged = NamedTempFile::new_in(&parent)?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;

        let _guard = self
            .writes
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "dataset store lock poisoned"))?;
        staged.persist(&target)?;

        for other in DatasetFormat::ALL.into_iter().filter(|other| *other != format) {
            match std::fs::remove_file(self.path_for(other)) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err),
            }
        }

        Ok(target)
    }
}
