//! Code → URL resolution with click accounting.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::errors::{RegistryError, Result};
use crate::storage::LinkStore;
use crate::utils::is_valid_short_code;

/// Tracing target for clicks that were served but not counted.
pub const CLICK_ACCOUNTING_TARGET: &str = "tinylink::click_accounting";

/// Process-wide tally of click increments, reported by the health route.
#[derive(Debug, Default)]
pub struct ClickAccounting {
    recorded: AtomicU64,
    dropped: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickAccountingSnapshot {
    pub recorded: u64,
    pub dropped: u64,
}

impl ClickAccounting {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_success(&self) {
        self.recorded.fetch_add(1, Ordering::Relaxed);
    }

    fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ClickAccountingSnapshot {
        ClickAccountingSnapshot {
            recorded: self.recorded.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

pub struct RedirectResolver {
    store: Arc<dyn LinkStore>,
    accounting: Arc<ClickAccounting>,
}

impl RedirectResolver {
    pub fn new(store: Arc<dyn LinkStore>, accounting: Arc<ClickAccounting>) -> Self {
        Self { store, accounting }
    }

    pub fn accounting(&self) -> &Arc<ClickAccounting> {
        &self.accounting
    }

    /// Look up `code` and record one visit.
    ///
    /// Lookup happens first so nothing is counted for a miss. Once the URL
    /// is known it is always returned: a failed increment is logged under
    /// [`CLICK_ACCOUNTING_TARGET`] and tallied as dropped.
    pub async fn resolve(&self, code: &str) -> Result<String> {
        if !is_valid_short_code(code) {
            trace!("Invalid short code rejected: {}", code);
            return Err(RegistryError::not_found(format!(
                "Link '{}' not found",
                code
            )));
        }

        let link = self
            .store
            .select_by_code(code)
            .await?
            .ok_or_else(|| RegistryError::not_found(format!("Link '{}' not found", code)))?;

        match self.store.increment_click(code).await {
            Ok(true) => self.accounting.record_success(),
            Ok(false) => {
                // 查询与计数之间链接被删除
                self.accounting.record_dropped();
                warn!(
                    target: CLICK_ACCOUNTING_TARGET,
                    code = %code,
                    "Link disappeared before its click was recorded"
                );
            }
            Err(e) => {
                self.accounting.record_dropped();
                warn!(
                    target: CLICK_ACCOUNTING_TARGET,
                    code = %code,
                    error = %e,
                    "Click served but not recorded"
                );
            }
        }

        Ok(link.url)
    }
}
