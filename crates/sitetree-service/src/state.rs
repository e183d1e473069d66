use std::sync::Arc;
use tokio::sync::RwLock;

use sitetree_core::{FileSystem, PhysicalFileSystem, SiteConfig, Snapshot};

use crate::settings::ServiceSettings;

/// Global state shared by the coordinator and every reader.
/// Must be Send + Sync
#[derive(Clone)]
pub struct GlobalState {
    /// Fixed for the process lifetime
    pub config: Arc<SiteConfig>,

    pub settings: Arc<RwLock<ServiceSettings>>,

    /// Latest complete snapshot. Replaced as a whole, never edited in place;
    /// readers clone the inner `Arc` and drop the lock immediately.
    pub snapshot: Arc<RwLock<Option<Arc<Snapshot>>>>,

    pub fs: Arc<dyn FileSystem>,
}

impl GlobalState {
    pub fn new(config: SiteConfig, settings: ServiceSettings) -> Self {
        let fs = Arc::new(PhysicalFileSystem {
            follow_links: config.content.follow_links,
        });
        Self::with_fs(config, settings, fs)
    }

    pub fn with_fs(config: SiteConfig, settings: ServiceSettings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            config: Arc::new(config),
            settings: Arc::new(RwLock::new(settings)),
            snapshot: Arc::new(RwLock::new(None)),
            fs,
        }
    }

    pub async fn current(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.read().await.clone()
    }

    pub(crate) async fn publish(&self, snapshot: Arc<Snapshot>) -> Option<Arc<Snapshot>> {
        let mut slot = self.snapshot.write().await;
        slot.replace(snapshot)
    }
}
