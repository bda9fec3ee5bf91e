//! Link registry service
//!
//! Create / get / delete / list on top of a [`LinkStore`]. Shared by the
//! HTTP handlers and the CLI.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::get_config;
use crate::errors::{RegistryError, Result};
use crate::services::code_generator::{CodeGenerator, RandomCodeGenerator};
use crate::storage::{InsertOutcome, Link, LinkStore};
use crate::utils::{is_reserved_code, is_valid_short_code};
use crate::utils::url_validator::validate_url;

/// Request to create a new link
#[derive(Debug, Clone, Default)]
pub struct CreateLinkRequest {
    /// Target URL
    pub url: String,
    /// Short code (optional, generated when absent or empty)
    pub code: Option<String>,
}

impl CreateLinkRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Service for link management operations
///
/// Holds no mutable state of its own; any number of instances may share
/// one store.
pub struct LinkService {
    store: Arc<dyn LinkStore>,
    generator: Arc<dyn CodeGenerator>,
    max_generation_attempts: u32,
}

impl LinkService {
    pub fn new(
        store: Arc<dyn LinkStore>,
        generator: Arc<dyn CodeGenerator>,
        max_generation_attempts: u32,
    ) -> Self {
        Self {
            store,
            generator,
            max_generation_attempts: max_generation_attempts.max(1),
        }
    }

    /// Build with the random generator and attempt limit from the global
    /// configuration.
    pub fn from_config(store: Arc<dyn LinkStore>) -> Self {
        let registry = get_config().registry.clone().normalized();
        Self::new(
            store,
            Arc::new(RandomCodeGenerator::new(registry.code_length)),
            registry.max_generation_attempts,
        )
    }

    /// Create a new short link
    pub async fn create_link(&self, req: CreateLinkRequest) -> Result<Link> {
        // 存储规范化后的 URL，解析时已去掉 \t \r \n
        let url = validate_url(&req.url)
            .map_err(|e| RegistryError::invalid_url(e.to_string()))?
            .to_string();

        match req.code.filter(|c| !c.is_empty()) {
            Some(code) => self.create_with_code(&code, &url).await,
            None => self.create_with_generated_code(&url).await,
        }
    }

    async fn create_with_code(&self, code: &str, url: &str) -> Result<Link> {
        if !is_valid_short_code(code) {
            return Err(RegistryError::invalid_code(format!(
                "Invalid short code '{}': must be 6-8 characters, letters and numbers only",
                code
            )));
        }

        if is_reserved_code(code) {
            return Err(RegistryError::code_taken(format!(
                "Short code '{}' is reserved",
                code
            )));
        }

        match self.store.insert_unique(code, url).await? {
            InsertOutcome::Inserted(link) => {
                info!("LinkService: created link '{}' -> '{}'", link.code, link.url);
                Ok(link)
            }
            InsertOutcome::Conflict => Err(RegistryError::code_taken(format!(
                "Short code '{}' already exists",
                code
            ))),
        }
    }

    /// Generate, insert, and regenerate on conflict until the attempt
    /// budget runs out.
    async fn create_with_generated_code(&self, url: &str) -> Result<Link> {
        for attempt in 1..=self.max_generation_attempts {
            let code = self.generator.generate();

            if !is_valid_short_code(&code) {
                warn!(
                    "LinkService: generator produced invalid code '{}' (attempt {}/{})",
                    code, attempt, self.max_generation_attempts
                );
                continue;
            }

            if is_reserved_code(&code) {
                warn!(
                    "LinkService: generated reserved code '{}' (attempt {}/{})",
                    code, attempt, self.max_generation_attempts
                );
                continue;
            }

            match self.store.insert_unique(&code, url).await? {
                InsertOutcome::Inserted(link) => {
                    info!(
                        "LinkService: created link '{}' -> '{}' (attempt {})",
                        link.code, link.url, attempt
                    );
                    return Ok(link);
                }
                InsertOutcome::Conflict => {
                    warn!(
                        "LinkService: generated code '{}' collided (attempt {}/{})",
                        code, attempt, self.max_generation_attempts
                    );
                }
            }
        }

        Err(RegistryError::generation_exhausted(format!(
            "Could not generate a unique short code after {} attempts",
            self.max_generation_attempts
        )))
    }

    /// Get a single link
    pub async fn get_link(&self, code: &str) -> Result<Link> {
        if !is_valid_short_code(code) {
            return Err(not_found(code));
        }

        self.store
            .select_by_code(code)
            .await?
            .ok_or_else(|| not_found(code))
    }

    /// Delete a link. Deleting an absent code is `NotFound`, every time.
    pub async fn delete_link(&self, code: &str) -> Result<()> {
        if !is_valid_short_code(code) {
            return Err(not_found(code));
        }

        if self.store.delete_by_code(code).await? == 0 {
            return Err(not_found(code));
        }

        info!("LinkService: deleted '{}'", code);
        Ok(())
    }

    /// All links, newest first
    pub async fn list_links(&self) -> Result<Vec<Link>> {
        self.store.select_all_ordered().await
    }
}

fn not_found(code: &str) -> RegistryError {
    RegistryError::not_found(format!("Link '{}' not found", code))
}
