//! Roster access: where students come from and how they are cached.

use crate::config::DEFAULT_HTTP_TIMEOUT;
use crate::data::load_roster;
use crate::error::RosterError;
use crate::model::Student;
use log::{debug, error, info};
use reqwest::Client;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Something that can produce the full roster
pub trait RosterSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<Vec<Student>, RosterError>> + Send;
}

/// Reads the roster from an upstream JSON endpoint
pub struct HttpRosterSource {
    client: Client,
    url: String,
}

impl HttpRosterSource {
    pub fn new(url: impl Into<String>) -> Result<Self, RosterError> {
        let client = Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RosterSource for HttpRosterSource {
    async fn fetch(&self) -> Result<Vec<Student>, RosterError> {
        info!("Fetching roster from {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(RosterError::Status(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }
}

/// Reads the roster from a local `.csv` or `.json` file
pub struct FileRosterSource {
    path: PathBuf,
}

impl FileRosterSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RosterSource for FileRosterSource {
    async fn fetch(&self) -> Result<Vec<Student>, RosterError> {
        info!("Loading roster from {}", self.path.display());
        load_roster(&self.path)
    }
}

/// A fixed in-memory roster
pub struct StaticRosterSource {
    students: Vec<Student>,
}

impl StaticRosterSource {
    pub fn new(students: Vec<Student>) -> Self {
        Self { students }
    }
}

impl RosterSource for StaticRosterSource {
    async fn fetch(&self) -> Result<Vec<Student>, RosterError> {
        Ok(self.students.clone())
    }
}

/// The source selected at startup
pub enum RosterSourceKind {
    Http(HttpRosterSource),
    File(FileRosterSource),
    Static(StaticRosterSource),
}

impl RosterSource for RosterSourceKind {
    async fn fetch(&self) -> Result<Vec<Student>, RosterError> {
        match self {
            RosterSourceKind::Http(source) => source.fetch().await,
            RosterSourceKind::File(source) => source.fetch().await,
            RosterSourceKind::Static(source) => source.fetch().await,
        }
    }
}

/// Lazily loaded, memoized roster.
///
/// The cache lock is held across the fetch, so concurrent callers share a
/// single request. Failures are logged and yield an empty roster; they are
/// not cached.
pub struct RosterRepository<S = RosterSourceKind> {
    source: S,
    cache: Mutex<Option<Arc<Vec<Student>>>>,
}

impl<S: RosterSource> RosterRepository<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: Mutex::new(None),
        }
    }

    pub async fn fetch_students(&self) -> Arc<Vec<Student>> {
        let mut cache = self.cache.lock().await;

        if let Some(students) = cache.as_ref() {
            debug!("Serving {} cached students", students.len());
            return Arc::clone(students);
        }

        match self.source.fetch().await {
            Ok(students) => {
                info!("Loaded {} student records", students.len());
                let students = Arc::new(students);
                *cache = Some(Arc::clone(&students));
                students
            }
            Err(err) => {
                error!("Failed to fetch students: {}", err);
                Arc::new(Vec::new())
            }
        }
    }

    /// Drop the cached roster; the next fetch goes back to the source.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.lock().await;
        if cache.take().is_some() {
            info!("Roster cache invalidated");
        }
    }

    pub async fn is_cached(&self) -> bool {
        self.cache.lock().await.is_some()
    }
}
