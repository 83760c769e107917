use crate::core::constants::USER_AGENT;
use crate::core::geo::TileCoord;
use crate::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use reqwest::{redirect, StatusCode};
use std::time::{Duration, Instant};

/// Image for a single tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileImage {
    /// Encoded image bytes as served
    Loaded(Vec<u8>),
    /// Nothing to show; the tile renders empty
    Blank,
}

impl TileImage {
    pub fn is_blank(&self) -> bool {
        matches!(self, TileImage::Blank)
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            TileImage::Loaded(data) => Some(data),
            TileImage::Blank => None,
        }
    }
}

/// Result of a tile loading operation
#[derive(Debug, Clone)]
pub struct TileResult {
    pub coord: TileCoord,
    /// Layer revision the request was issued under
    pub revision: u64,
    pub image: TileImage,
    pub elapsed: Duration,
}

/// Fetches tile images.
///
/// Redirects are never followed: the provider answers with a redirect when a
/// survey has no imagery for a tile, so anything but `200 OK` with a body is
/// treated as a blank tile. Failures stay local to their tile and are not
/// retried.
pub struct TileLoader {
    client: reqwest::Client,
    result_tx: Sender<TileResult>,
    result_rx: Receiver<TileResult>,
}

impl TileLoader {
    /// Create a tile loader with its own HTTP client
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(redirect::Policy::none())
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(16)
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Use a preconfigured client. It should have redirects disabled.
    pub fn with_client(client: reqwest::Client) -> Self {
        let (result_tx, result_rx) = unbounded();
        Self {
            client,
            result_tx,
            result_rx,
        }
    }

    /// Fetch the image behind `src`
    pub async fn fetch(&self, src: &str) -> TileImage {
        match fetch_image_data(&self.client, src).await {
            Some(data) => TileImage::Loaded(data),
            None => TileImage::Blank,
        }
    }

    /// Start downloading a tile in the background. The outcome, blank or not,
    /// arrives through [`try_recv_results`](Self::try_recv_results).
    pub fn queue_tile(&self, coord: TileCoord, url: String, revision: u64) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                log::error!("no async runtime to load tile {}: {}", coord, e);
                let _ = tx.send(TileResult {
                    coord,
                    revision,
                    image: TileImage::Blank,
                    elapsed: Duration::ZERO,
                });
                return;
            }
        };

        handle.spawn(async move {
            let started = Instant::now();
            let image = match fetch_image_data(&client, &url).await {
                Some(data) => TileImage::Loaded(data),
                None => TileImage::Blank,
            };
            let _ = tx.send(TileResult {
                coord,
                revision,
                image,
                elapsed: started.elapsed(),
            });
        });
    }

    /// Try to receive completed tile results (non-blocking)
    pub fn try_recv_results(&self) -> Vec<TileResult> {
        self.result_rx.try_iter().collect()
    }
}

impl std::fmt::Debug for TileLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileLoader")
            .field("pending_results", &self.result_rx.len())
            .finish_non_exhaustive()
    }
}

/// GET `url` without following redirects. `Some(bytes)` only for a `200 OK`
/// with a non-empty body.
pub async fn fetch_image_data(client: &reqwest::Client, url: &str) -> Option<Vec<u8>> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            log::warn!("tile request failed: {}", e);
            return None;
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        log::debug!("tile answered {}, leaving blank", status);
        return None;
    }

    match response.bytes().await {
        Ok(bytes) if !bytes.is_empty() => Some(bytes.to_vec()),
        Ok(_) => None,
        Err(e) => {
            log::warn!("tile body read failed: {}", e);
            None
        }
    }
}
