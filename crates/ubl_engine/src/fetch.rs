use std::io;
use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};
use futures_util::TryStreamExt;
use reqwest::header::{ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER, USER_AGENT};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;
use ubl_logging::ubl_debug;
use url::Url;

use crate::decode::decode_payload;
use crate::settings::RefreshSettings;
use crate::{FailureKind, FetchError};

// Some list servers filter on these; keep them as they are.
const REQUEST_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.8";
const REQUEST_USER_AGENT: &str = "Mozilla";
const REQUEST_REFERER: &str = "google.com";

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Download the raw list payload described by `settings`.
    async fn fetch(&self, settings: &RefreshSettings) -> Result<String, FetchError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher;

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self
    }

    fn build_client(settings: &RefreshSettings) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .read_timeout(settings.read_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Connect, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, settings: &RefreshSettings) -> Result<String, FetchError> {
        let url = parse_banlist_url(&settings.banlist_url)?;
        let deadline = DeadlineTimer::arm(settings.deadline);
        let client = Self::build_client(settings)?;

        let request = client
            .get(url.clone())
            .header(ACCEPT_LANGUAGE, REQUEST_ACCEPT_LANGUAGE)
            .header(USER_AGENT, REQUEST_USER_AGENT)
            .header(REFERER, REQUEST_REFERER);

        let head_timeout = settings.connect_timeout + settings.read_timeout;
        let response = match tokio::time::timeout(head_timeout, request.send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return Err(FetchError::new(FailureKind::Connect, err.to_string())),
            Err(_) => {
                return Err(FetchError::new(
                    FailureKind::Connect,
                    format!("no response from {url} within {head_timeout:?}"),
                ))
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::Connect,
                format!("{url} answered {status}"),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let started = Instant::now();
        let stream = response.bytes_stream().map_err(|err| {
            if err.is_timeout() {
                io::Error::new(io::ErrorKind::TimedOut, err)
            } else {
                io::Error::other(err)
            }
        });
        let body =
            read_until_cancelled(StreamReader::new(stream), settings.chunk_size, deadline.token())
                .await?;
        drop(deadline);

        ubl_debug!(
            "Read {} bytes from {} in {:?}",
            body.len(),
            url,
            started.elapsed()
        );
        Ok(decode_payload(&body, content_type.as_deref()))
    }
}

fn parse_banlist_url(raw: &str) -> Result<Url, FetchError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FetchError::new(FailureKind::Config, "banlist-url is not set"));
    }
    let url = Url::parse(raw)
        .map_err(|err| FetchError::new(FailureKind::Config, format!("{raw:?}: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(FetchError::new(
            FailureKind::Config,
            format!("{raw:?}: unsupported scheme {scheme}"),
        )),
    }
}

/// Cancels its token once the deadline passes. Dropping it disarms the timer.
struct DeadlineTimer {
    token: CancellationToken,
    timer: JoinHandle<()>,
}

impl DeadlineTimer {
    fn arm(deadline: Duration) -> Self {
        let token = CancellationToken::new();
        let expired = token.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            expired.cancel();
        });
        Self { token, timer }
    }

    fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for DeadlineTimer {
    fn drop(&mut self) {
        self.timer.abort();
    }
}

/// Read `reader` to the end in `chunk_size` pieces, giving up as soon as
/// `cancel` fires.
async fn read_until_cancelled<R: AsyncRead>(
    reader: R,
    chunk_size: usize,
    cancel: &CancellationToken,
) -> Result<Bytes, FetchError> {
    tokio::pin!(reader);
    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut payload = BytesMut::new();

    loop {
        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            read = reader.read(&mut buffer) => Some(read),
        };
        match read {
            None => {
                return Err(FetchError::new(
                    FailureKind::ReadTimeout,
                    format!("deadline passed after {} bytes", payload.len()),
                ))
            }
            Some(Ok(0)) => return Ok(payload.freeze()),
            Some(Ok(n)) => payload.extend_from_slice(&buffer[..n]),
            Some(Err(err)) if err.kind() == io::ErrorKind::TimedOut => {
                return Err(FetchError::new(FailureKind::ReadTimeout, err.to_string()))
            }
            Some(Err(err)) => return Err(FetchError::new(FailureKind::Read, err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[test]
    fn rejects_missing_and_malformed_urls() {
        for raw in ["", "   ", "not a url", "ftp://example.com/list", "file:///etc/passwd"] {
            let err = parse_banlist_url(raw).unwrap_err();
            assert_eq!(err.kind, FailureKind::Config, "{raw:?}");
        }
        assert!(parse_banlist_url(" https://example.com/ubl.csv ").is_ok());
    }

    #[tokio::test]
    async fn reads_in_small_chunks_until_eof() {
        let (mut writer, reader) = tokio::io::duplex(64);
        tokio::spawn(async move {
            writer.write_all(b"v1\nalice\nbob").await.unwrap();
        });

        let token = CancellationToken::new();
        let body = read_until_cancelled(reader, 3, &token).await.unwrap();
        assert_eq!(&body[..], b"v1\nalice\nbob");
    }

    #[tokio::test]
    async fn stalled_reader_stops_at_deadline() {
        let (mut writer, reader) = tokio::io::duplex(64);
        writer.write_all(b"v1\npartial").await.unwrap();

        let deadline = Duration::from_millis(100);
        let timer = DeadlineTimer::arm(deadline);
        let started = Instant::now();
        let err = read_until_cancelled(reader, 4, timer.token())
            .await
            .unwrap_err();

        assert_eq!(err.kind, FailureKind::ReadTimeout);
        assert!(started.elapsed() < deadline + Duration::from_secs(1));
        drop(writer);
    }

    #[tokio::test]
    async fn dropped_timer_never_fires() {
        let timer = DeadlineTimer::arm(Duration::from_millis(20));
        let token = timer.token().clone();
        drop(timer);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(!token.is_cancelled());
    }
}
