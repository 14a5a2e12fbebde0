use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;
use crate::models::TitleKey;

/// Keys for everything fetched from upstream APIs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    TitleSearch(String),
    TitleDetails(TitleKey),
    /// Certification of a title in a region
    Certification(TitleKey, String),
    Verdict(TitleKey),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::TitleSearch(query) => write!(f, "search:{}", query.trim().to_lowercase()),
            CacheKey::TitleDetails(key) => write!(f, "title:{}", key),
            CacheKey::Certification(key, region) => {
                write!(f, "cert:{}:{}", key, region.to_uppercase())
            }
            CacheKey::Verdict(key) => write!(f, "verdict:{}", key),
        }
    }
}

/// Creates a Redis client for caching
///
/// Does not connect; connections are opened on first use.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

struct PendingWrite {
    key: String,
    value: String,
    ttl: u64,
}

/// Read-through store for rows fetched from TMDB and the verdict pipeline
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<PendingWrite>,
}

/// Stops the background writer after it drains queued writes
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Signals the writer and waits until every queued write was attempted
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
    }
}

impl Cache {
    /// Creates the cache and spawns its background writer task
    ///
    /// Writes go through a channel so handlers never wait on Redis to store
    /// what they just fetched.
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let task = tokio::spawn(Self::run_writer(
            redis_client.clone(),
            write_rx,
            shutdown_rx,
        ));

        let cache = Self {
            redis_client,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx, task })
    }

    async fn run_writer(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<PendingWrite>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::debug!("Cache writer started");
        let mut conn: Option<MultiplexedConnection> = None;

        loop {
            tokio::select! {
                Some(write) = write_rx.recv() => {
                    Self::store(&client, &mut conn, write).await;
                }
                _ = shutdown_rx.recv() => {
                    write_rx.close();
                    let mut flushed = 0usize;
                    while let Some(write) = write_rx.recv().await {
                        Self::store(&client, &mut conn, write).await;
                        flushed += 1;
                    }
                    tracing::info!(flushed, "Cache writer stopped");
                    break;
                }
            }
        }
    }

    /// Stores one write; a failed connection is dropped and reopened on the next write
    async fn store(client: &Client, conn: &mut Option<MultiplexedConnection>, write: PendingWrite) {
        let result: AppResult<()> = async {
            let mut c = match conn.take() {
                Some(c) => c,
                None => client.get_multiplexed_async_connection().await?,
            };
            let _: () = c.set_ex(&write.key, &write.value, write.ttl).await?;
            *conn = Some(c);
            Ok(())
        }
        .await;

        if let Err(e) = result {
            tracing::error!(error = %e, key = %write.key, "Failed to write to Redis cache");
        }
    }

    /// Returns the cached value for `key`, or `None` on a miss
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        cached
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error for {}: {}", key, e))
                })
            })
            .transpose()
    }

    /// Queues `value` for storage under `key` with a TTL in seconds
    ///
    /// Returns immediately; failures are logged by the writer task.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let value = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Cache serialization error");
                return;
            }
        };

        let write = PendingWrite {
            key: key.to_string(),
            value,
            ttl,
        };

        if self.write_tx.send(write).is_err() {
            tracing::warn!(key = %key, "Cache writer closed, dropping write");
        }
    }
}
