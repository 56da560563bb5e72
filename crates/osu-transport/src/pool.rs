//! HTTP client pool
//!
//! Ad-hoc mode builds a fresh `reqwest::Client` for every call and drops it on
//! release. Pinned mode keeps one client (and its connection pool) for the
//! whole session. A pinned client that the caller reports as dead is replaced
//! on the next acquisition, but only once it has served a response: a client
//! that never got through is kept, so an unreachable upstream does not churn
//! through replacements.
//!
//! The pinned slot is guarded by a lock held only for check-and-recreate,
//! never across an HTTP call.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::settings::TransportSettings;

struct PinnedClient {
    client: reqwest::Client,
    generation: u64,
    closed: bool,
    served: Arc<AtomicBool>,
}

/// A client checked out for one call.
#[derive(Debug)]
pub struct TransportHandle {
    client: reqwest::Client,
    /// Generation of the pinned client; `None` for ad-hoc clients
    generation: Option<u64>,
    served: Option<Arc<AtomicBool>>,
}

impl TransportHandle {
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn is_pinned(&self) -> bool {
        self.generation.is_some()
    }

    pub fn generation(&self) -> Option<u64> {
        self.generation
    }

    /// Record that this client got a response from upstream.
    pub fn mark_served(&self) {
        if let Some(served) = &self.served {
            served.store(true, Ordering::SeqCst);
        }
    }
}

pub struct TransportPool {
    settings: TransportSettings,
    pinned: Mutex<Option<PinnedClient>>,
    created: AtomicU64,
}

impl TransportPool {
    /// New pool in ad-hoc mode.
    pub fn new(settings: TransportSettings) -> Self {
        Self {
            settings,
            pinned: Mutex::new(None),
            created: AtomicU64::new(0),
        }
    }

    /// New pool that starts out pinned.
    pub fn pinned(settings: TransportSettings) -> Result<Self> {
        let mut pool = Self::new(settings);
        let pinned = pool.new_pinned()?;
        *pool.pinned.get_mut() = Some(pinned);
        Ok(pool)
    }

    pub fn settings(&self) -> &TransportSettings {
        &self.settings
    }

    /// Total clients built so far, ad-hoc and pinned.
    pub fn clients_created(&self) -> u64 {
        self.created.load(Ordering::SeqCst)
    }

    fn build_client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .read_timeout(self.settings.read_timeout)
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(client)
    }

    fn new_pinned(&self) -> Result<PinnedClient> {
        let client = self.build_client()?;
        Ok(PinnedClient {
            client,
            generation: self.clients_created(),
            closed: false,
            served: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Switch to pinned mode. No-op when already pinned.
    pub async fn start(&self) -> Result<()> {
        let mut slot = self.pinned.lock().await;
        if slot.is_none() {
            let pinned = self.new_pinned()?;
            info!(generation = pinned.generation, "pinned transport started");
            *slot = Some(pinned);
        }
        Ok(())
    }

    /// Drop the pinned client and return to ad-hoc mode.
    pub async fn stop(&self) {
        if let Some(pinned) = self.pinned.lock().await.take() {
            info!(generation = pinned.generation, "pinned transport stopped");
        }
    }

    pub async fn is_pinned(&self) -> bool {
        self.pinned.lock().await.is_some()
    }

    /// Check out a client for one call.
    pub async fn acquire(&self) -> Result<TransportHandle> {
        let mut slot = self.pinned.lock().await;
        if let Some(pinned) = slot.as_mut() {
            if pinned.closed {
                let old = pinned.generation;
                *pinned = self.new_pinned()?;
                metrics::counter!("osu_transport_pool_recreated_total").increment(1);
                warn!(
                    old_generation = old,
                    generation = pinned.generation,
                    "pinned transport was closed, recreated it"
                );
            }
            return Ok(TransportHandle {
                client: pinned.client.clone(),
                generation: Some(pinned.generation),
                served: Some(Arc::clone(&pinned.served)),
            });
        }
        drop(slot);

        let client = self.build_client()?;
        debug!("ad-hoc transport created");
        Ok(TransportHandle {
            client,
            generation: None,
            served: None,
        })
    }

    /// Return a handle after the call. Ad-hoc clients are dropped here.
    pub fn release(&self, handle: TransportHandle) {
        if handle.generation.is_none() {
            debug!("ad-hoc transport closed");
        }
        drop(handle);
    }

    /// Report the pinned client of `generation` as dead.
    ///
    /// Reports about an already-replaced generation are ignored, as are
    /// reports about a client that never served a response.
    pub async fn mark_closed(&self, generation: u64) {
        let mut slot = self.pinned.lock().await;
        let Some(pinned) = slot.as_mut().filter(|p| p.generation == generation) else {
            return;
        };
        if !pinned.served.load(Ordering::SeqCst) {
            debug!(generation, "close report for a client that never connected, keeping it");
            return;
        }
        if !pinned.closed {
            warn!(generation, "pinned transport marked closed");
        }
        pinned.closed = true;
    }
}
