use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::services::{ClickAccounting, LinkService, RedirectResolver};
use crate::storage::{LinkStore, StorageFactory};

/// Everything the HTTP workers share
pub struct StartupContext {
    pub store: Arc<dyn LinkStore>,
    pub link_service: Arc<LinkService>,
    pub resolver: Arc<RedirectResolver>,
}

impl StartupContext {
    /// Wire services onto an existing store.
    pub fn from_store(store: Arc<dyn LinkStore>) -> Self {
        let link_service = Arc::new(LinkService::from_config(store.clone()));
        let resolver = Arc::new(RedirectResolver::new(
            store.clone(),
            Arc::new(ClickAccounting::new()),
        ));
        Self {
            store,
            link_service,
            resolver,
        }
    }
}

/// 准备服务器启动的上下文：连接存储、执行迁移、构建服务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let store: Arc<dyn LinkStore> = storage;
    let context = StartupContext::from_store(store);

    debug!("Pre-startup finished in {:?}", start_time.elapsed());
    Ok(context)
}
