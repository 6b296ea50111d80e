use crate::config::HttpConfig;
use crate::retry::{backoff, send_with_retry, RequestFailure};
use futures_util::TryStreamExt;
use log::{info, warn};
use reqwest::Client;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio_util::io::StreamReader;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("URL '{0}' has no file name to cache under")]
    InvalidUrl(String),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Download of {0} was interrupted")]
    DownloadIo(String, #[source] std::io::Error),
}

impl DownloadError {
    pub(crate) fn from_failure(url: &str, failure: RequestFailure) -> Self {
        match failure {
            RequestFailure::Network(e) => DownloadError::NetworkRequest(url.to_string(), e),
            RequestFailure::Status { status, source } => DownloadError::HttpStatus {
                url: url.to_string(),
                status,
                source,
            },
        }
    }
}

/// The last path segment of `url`, ignoring any query string or fragment.
pub fn file_name_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next()?;
    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && !name.contains(':'))
}

/// Download cache shared by the trip and weather cleaners.
///
/// Each remote file is stored once in `cache_dir` under its remote file name.
pub struct DataLoader {
    cache_dir: PathBuf,
    download_client: Client,
    http: HttpConfig,
}

impl DataLoader {
    pub fn new(cache_dir: &Path, http: HttpConfig) -> Result<DataLoader, DownloadError> {
        // No total deadline: large files may take long while still progressing.
        let download_client = Client::builder()
            .connect_timeout(http.timeout())
            .read_timeout(http.read_timeout())
            .build()
            .map_err(DownloadError::ClientBuild)?;
        Ok(DataLoader {
            cache_dir: cache_dir.to_path_buf(),
            download_client,
            http,
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub(crate) fn client(&self) -> &Client {
        &self.download_client
    }

    pub(crate) fn http(&self) -> &HttpConfig {
        &self.http
    }

    /// Returns the local path of `url`, downloading it on a cache miss.
    pub async fn get_file(&self, url: &str) -> Result<PathBuf, DownloadError> {
        let file_name =
            file_name_from_url(url).ok_or_else(|| DownloadError::InvalidUrl(url.to_string()))?;
        let path = self.cache_dir.join(file_name);

        if fs::metadata(&path).await.is_ok() {
            info!("Cache hit for {} at {:?}", file_name, path);
            return Ok(path);
        }

        warn!("Cache miss for {}. Downloading.", file_name);
        fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| DownloadError::CacheDirCreation(self.cache_dir.clone(), e))?;
        self.download(url, &path).await?;
        Ok(path)
    }

    /// Downloads `url` to `path`, re-issuing the request when the body
    /// stream breaks off, up to `max_retries` times.
    async fn download(&self, url: &str, path: &Path) -> Result<(), DownloadError> {
        let mut attempt = 0;
        loop {
            match self.download_once(url, path).await {
                Err(DownloadError::DownloadIo(_, e)) if attempt < self.http.max_retries => {
                    let delay = backoff(attempt, &self.http);
                    warn!(
                        "Download of {} broke off ({}), retry {}/{} in {:?}",
                        url,
                        e,
                        attempt + 1,
                        self.http.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// Streams `url` into a temporary file in the cache directory and moves it
    /// into place only once the body has been fully received.
    async fn download_once(&self, url: &str, path: &Path) -> Result<(), DownloadError> {
        info!("Downloading data from {}", url);
        let response = send_with_retry(|| self.download_client.get(url), &self.http)
            .await
            .map_err(|failure| DownloadError::from_failure(url, failure))?;

        let temp_file = tempfile::NamedTempFile::new_in(&self.cache_dir)
            .map_err(|e| DownloadError::CacheWrite(path.to_path_buf(), e))?;
        let std_file = temp_file
            .reopen()
            .map_err(|e| DownloadError::CacheWrite(path.to_path_buf(), e))?;
        let mut file = fs::File::from_std(std_file);

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        let mut reader = StreamReader::new(stream);
        let written = tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(|e| DownloadError::DownloadIo(url.to_string(), e))?;
        file.sync_all()
            .await
            .map_err(|e| DownloadError::CacheWrite(path.to_path_buf(), e))?;
        drop(file);

        temp_file
            .persist(path)
            .map_err(|e| DownloadError::CacheWrite(path.to_path_buf(), e.error))?;
        info!("Cached {} bytes from {} to {:?}", written, url, path);
        Ok(())
    }
}
