//! Async frame fetching.
//!
//! Frames load over HTTP through a shared client or straight from the
//! filesystem, decode off the event loop, and report back over a
//! channel in completion order. Completion order is not request order;
//! the engine tolerates that.

use std::time::Duration;

use anyhow::Result;
use image::DynamicImage;
use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use url::Url;

use spinview_core::FrameRequest;

use crate::event::FrameLoadResult;

const LOAD_TIMEOUT_SECS: u64 = 30;

/// Spawns frame fetches and funnels their results into one channel.
pub struct FrameLoader {
    client: Client,
    tx: mpsc::UnboundedSender<FrameLoadResult>,
}

impl FrameLoader {
    pub fn new() -> Result<(Self, mpsc::UnboundedReceiver<FrameLoadResult>)> {
        let client = Client::builder()
            .timeout(Duration::from_secs(LOAD_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        let (tx, rx) = mpsc::unbounded_channel();

        Ok((Self { client, tx }, rx))
    }

    /// Fetch one frame in the background; the result arrives on the
    /// channel. No retries here: a failed frame simply never reports
    /// loaded and its index stays unreachable.
    pub fn spawn(&self, request: FrameRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = match fetch(&client, &request.locator).await {
                Ok(image) => FrameLoadResult::Success {
                    index: request.index,
                    image,
                },
                Err(e) => {
                    warn!(index = request.index, "frame load failed: {e:#}");
                    FrameLoadResult::Failure {
                        index: request.index,
                        error: e.to_string(),
                    }
                }
            };
            let _ = tx.send(result);
        });
    }

    /// Fetch a frame inline. Used for frame 0, which must be decoded
    /// before the viewer can show anything.
    pub async fn load_now(&self, locator: &str) -> Result<DynamicImage> {
        fetch(&self.client, locator).await
    }
}

async fn fetch(client: &Client, locator: &str) -> Result<DynamicImage> {
    let bytes = match Url::parse(locator) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            let response = client.get(url).send().await?.error_for_status()?;
            response.bytes().await?
        }
        _ => bytes::Bytes::from(tokio::fs::read(locator).await?),
    };

    debug!(locator, len = bytes.len(), "frame fetched");
    Ok(image::load_from_memory(&bytes)?)
}
