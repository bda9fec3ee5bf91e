//! LinkService tests
//!
//! Registry behaviour against a real SQLite store, plus a scripted in-memory
//! store for collision and failure injection.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use chrono::Utc;
use tempfile::TempDir;
use tinylink::config::init_config;
use tinylink::errors::{RegistryError, Result};
use tinylink::services::{CodeGenerator, CreateLinkRequest, LinkService, RandomCodeGenerator};
use tinylink::storage::backend::SeaOrmStorage;
use tinylink::storage::{InsertOutcome, Link, LinkStore};
use tinylink::utils::is_valid_short_code;

// =============================================================================
// Test Setup
// =============================================================================

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

/// Create a test service with temporary storage
async fn create_test_service() -> (LinkService, TempDir) {
    init_test_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test_service.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage: Arc<dyn LinkStore> = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("Failed to create storage"),
    );

    (LinkService::from_config(storage), temp_dir)
}

/// Generator that replays a fixed list of codes, then repeats the last one.
struct ScriptedGenerator {
    codes: Mutex<VecDeque<String>>,
    last: Mutex<String>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            last: Mutex::new(codes.last().copied().unwrap_or("aaaaaa").to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CodeGenerator for ScriptedGenerator {
    fn generate(&self) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.codes.lock().unwrap().pop_front() {
            Some(code) => code,
            None => self.last.lock().unwrap().clone(),
        }
    }
}

/// In-memory store with switchable failures
#[derive(Default)]
struct MockStore {
    links: Mutex<HashMap<String, Link>>,
    fail_all: bool,
    insert_calls: AtomicUsize,
}

impl MockStore {
    fn failing() -> Self {
        Self {
            fail_all: true,
            ..Default::default()
        }
    }

    fn seed(&self, code: &str, url: &str) {
        self.links.lock().unwrap().insert(
            code.to_string(),
            Link {
                code: code.to_string(),
                url: url.to_string(),
                click_count: 0,
                last_clicked: None,
                created_at: Utc::now(),
            },
        );
    }

    fn check(&self, op: &str) -> Result<()> {
        if self.fail_all {
            Err(RegistryError::store_unavailable(format!(
                "Store operation '{}' failed",
                op
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LinkStore for MockStore {
    async fn insert_unique(&self, code: &str, url: &str) -> Result<InsertOutcome> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.check("insert_unique")?;
        let mut links = self.links.lock().unwrap();
        if links.contains_key(code) {
            return Ok(InsertOutcome::Conflict);
        }
        let link = Link {
            code: code.to_string(),
            url: url.to_string(),
            click_count: 0,
            last_clicked: None,
            created_at: Utc::now(),
        };
        links.insert(code.to_string(), link.clone());
        Ok(InsertOutcome::Inserted(link))
    }

    async fn select_by_code(&self, code: &str) -> Result<Option<Link>> {
        self.check("select_by_code")?;
        Ok(self.links.lock().unwrap().get(code).cloned())
    }

    async fn increment_click(&self, code: &str) -> Result<bool> {
        self.check("increment_click")?;
        match self.links.lock().unwrap().get_mut(code) {
            Some(link) => {
                link.click_count += 1;
                link.last_clicked = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_code(&self, code: &str) -> Result<u64> {
        self.check("delete_by_code")?;
        Ok(self.links.lock().unwrap().remove(code).map_or(0, |_| 1))
    }

    async fn select_all_ordered(&self) -> Result<Vec<Link>> {
        self.check("select_all_ordered")?;
        let mut all: Vec<Link> = self.links.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn ping(&self) -> Result<()> {
        self.check("ping")
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn create_request(code: Option<&str>, url: &str) -> CreateLinkRequest {
    CreateLinkRequest {
        url: url.to_string(),
        code: code.map(|s| s.to_string()),
    }
}

// =============================================================================
// Create Link Tests
// =============================================================================

#[cfg(test)]
mod create_link_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_link_with_code() {
        let (service, _temp) = create_test_service().await;

        let link = service
            .create_link(create_request(Some("mycode"), "https://example.com"))
            .await
            .unwrap();

        assert_eq!(link.code, "mycode");
        assert_eq!(link.url, "https://example.com/");
        assert_eq!(link.click_count, 0);
        assert!(link.last_clicked.is_none());
    }

    #[tokio::test]
    async fn test_create_link_auto_generate_code() {
        let (service, _temp) = create_test_service().await;

        let link = service
            .create_link(create_request(None, "https://example.com/a"))
            .await
            .unwrap();

        assert!(is_valid_short_code(&link.code));
        assert_eq!(link.click_count, 0);

        let fetched = service.get_link(&link.code).await.unwrap();
        assert_eq!(fetched, link);
    }

    #[tokio::test]
    async fn test_empty_code_is_treated_as_absent() {
        let (service, _temp) = create_test_service().await;

        let link = service
            .create_link(create_request(Some(""), "https://example.com"))
            .await
            .unwrap();

        assert!(is_valid_short_code(&link.code));
    }

    #[tokio::test]
    async fn test_create_link_conflict() {
        let (service, _temp) = create_test_service().await;

        service
            .create_link(create_request(Some("taken01"), "https://first.com"))
            .await
            .unwrap();

        let result = service
            .create_link(create_request(Some("taken01"), "https://second.com"))
            .await;

        match result {
            Err(RegistryError::CodeTaken(msg)) => assert!(msg.contains("taken01")),
            other => panic!("Expected CodeTaken, got {:?}", other),
        }

        // 原链接保持不变
        let link = service.get_link("taken01").await.unwrap();
        assert_eq!(link.url, "https://first.com/");
        assert_eq!(service.list_links().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_link_invalid_code() {
        let (service, _temp) = create_test_service().await;

        for code in ["abc", "abcdefghi", "abc-12", "abc 123", "ab_cdef", "ünïcøde"] {
            let result = service
                .create_link(create_request(Some(code), "https://example.com"))
                .await;
            assert!(
                matches!(result, Err(RegistryError::InvalidCode(_))),
                "code {:?} should be rejected, got {:?}",
                code,
                result
            );
        }

        assert!(service.list_links().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_link_invalid_url() {
        let (service, _temp) = create_test_service().await;

        for url in [
            "",
            "   ",
            "not a url",
            "/relative/path",
            "javascript:alert(1)",
            "data:text/html,hi",
        ] {
            let result = service.create_link(create_request(None, url)).await;
            assert!(
                matches!(result, Err(RegistryError::InvalidUrl(_))),
                "url {:?} should be rejected, got {:?}",
                url,
                result
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_url_checked_before_code() {
        let (service, _temp) = create_test_service().await;

        let result = service
            .create_link(create_request(Some("!!"), "nope"))
            .await;
        assert!(matches!(result, Err(RegistryError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_url_is_stored_normalized() {
        let (service, _temp) = create_test_service().await;

        let link = service
            .create_link(create_request(
                Some("crlf01"),
                "https://example.com/a\r\nSet-Cookie: x=1",
            ))
            .await
            .unwrap();
        assert_eq!(link.url, "https://example.com/aSet-Cookie:%20x=1");
        assert!(!link.url.contains(['\r', '\n', '\t']));

        let link = service
            .create_link(create_request(Some("tab001"), "  HTTPS://Example.COM/p\tq  "))
            .await
            .unwrap();
        assert_eq!(link.url, "https://example.com/pq");

        let stored = service.get_link("tab001").await.unwrap();
        assert_eq!(stored.url, link.url);
    }

    #[tokio::test]
    async fn test_reserved_code_is_taken() {
        let (service, _temp) = create_test_service().await;

        let result = service
            .create_link(create_request(Some("healthz"), "https://example.com"))
            .await;
        assert!(matches!(result, Err(RegistryError::CodeTaken(_))));
        assert!(service.list_links().await.unwrap().is_empty());

        // 路由匹配区分大小写，其他大小写组合可用
        assert!(
            service
                .create_link(create_request(Some("Healthz"), "https://example.com"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_create_link_boundary_lengths() {
        let (service, _temp) = create_test_service().await;

        assert!(
            service
                .create_link(create_request(Some("abc123"), "https://six.example"))
                .await
                .is_ok()
        );
        assert!(
            service
                .create_link(create_request(Some("ABCD1234"), "https://eight.example"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_concurrent_creates_same_code_one_wins() {
        let (service, _temp) = create_test_service().await;
        let service = Arc::new(service);

        let mut handles = Vec::new();
        for i in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .create_link(create_request(
                        Some("race01"),
                        &format!("https://example.com/{}", i),
                    ))
                    .await
            }));
        }

        let mut ok = 0;
        let mut taken = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(RegistryError::CodeTaken(_)) => taken += 1,
                Err(e) => panic!("unexpected error: {:?}", e),
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(taken, 7);
        assert_eq!(service.list_links().await.unwrap().len(), 1);
    }
}

// =============================================================================
// Generation Retry Tests
// =============================================================================

#[cfg(test)]
mod generation_tests {
    use super::*;

    #[tokio::test]
    async fn test_retry_on_collision() {
        let store = Arc::new(MockStore::default());
        store.seed("aaaaaa", "https://existing.example");
        store.seed("bbbbbb", "https://existing.example");

        let generator = Arc::new(ScriptedGenerator::new(&["aaaaaa", "bbbbbb", "cccccc"]));
        let service = LinkService::new(store.clone(), generator.clone(), 5);

        let link = service
            .create_link(create_request(None, "https://new.example"))
            .await
            .unwrap();

        assert_eq!(link.code, "cccccc");
        assert_eq!(generator.calls(), 3);
    }

    #[tokio::test]
    async fn test_generation_exhausted() {
        let store = Arc::new(MockStore::default());
        store.seed("dupdup", "https://existing.example");

        let generator = Arc::new(ScriptedGenerator::new(&["dupdup"]));
        let service = LinkService::new(store.clone(), generator.clone(), 4);

        let result = service
            .create_link(create_request(None, "https://new.example"))
            .await;

        assert!(matches!(result, Err(RegistryError::GenerationExhausted(_))));
        assert_eq!(generator.calls(), 4);
        assert_eq!(store.insert_calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let store = Arc::new(MockStore::default());
        let generator = Arc::new(ScriptedGenerator::new(&["qwerty"]));
        let service = LinkService::new(store, generator.clone(), 0);

        let link = service
            .create_link(create_request(None, "https://new.example"))
            .await
            .unwrap();
        assert_eq!(link.code, "qwerty");
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalid_generated_code_is_not_inserted() {
        let store = Arc::new(MockStore::default());
        let generator = Arc::new(ScriptedGenerator::new(&["bad", "good12"]));
        let service = LinkService::new(store.clone(), generator, 3);

        let link = service
            .create_link(create_request(None, "https://new.example"))
            .await
            .unwrap();
        assert_eq!(link.code, "good12");
        assert_eq!(store.insert_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_generated_reserved_code_is_skipped() {
        let store = Arc::new(MockStore::default());
        let generator = Arc::new(ScriptedGenerator::new(&["healthz", "fresh1"]));
        let service = LinkService::new(store.clone(), generator.clone(), 3);

        let link = service
            .create_link(create_request(None, "https://new.example"))
            .await
            .unwrap();
        assert_eq!(link.code, "fresh1");
        assert_eq!(generator.calls(), 2);
        assert_eq!(store.insert_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_explicit_code_is_never_retried() {
        let store = Arc::new(MockStore::default());
        store.seed("mine01", "https://existing.example");

        let generator = Arc::new(ScriptedGenerator::new(&["other1"]));
        let service = LinkService::new(store.clone(), generator.clone(), 5);

        let result = service
            .create_link(create_request(Some("mine01"), "https://new.example"))
            .await;
        assert!(matches!(result, Err(RegistryError::CodeTaken(_))));
        assert_eq!(generator.calls(), 0);
        assert_eq!(store.insert_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_not_retried() {
        let store = Arc::new(MockStore::failing());
        let generator = Arc::new(ScriptedGenerator::new(&["abcdef", "ghijkl"]));
        let service = LinkService::new(store.clone(), generator.clone(), 5);

        let result = service
            .create_link(create_request(None, "https://new.example"))
            .await;

        assert!(matches!(result, Err(RegistryError::StoreUnavailable(_))));
        assert_eq!(store.insert_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_random_generator_against_real_store() {
        let (_service, temp) = create_test_service().await;
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            temp.path().join("test_service.db").display()
        );
        let store: Arc<dyn LinkStore> =
            Arc::new(SeaOrmStorage::new(&db_url, "sqlite").await.unwrap());
        let service = LinkService::new(store, Arc::new(RandomCodeGenerator::new(8)), 5);

        let link = service
            .create_link(create_request(None, "https://example.com"))
            .await
            .unwrap();
        assert_eq!(link.code.len(), 8);
    }
}

// =============================================================================
// Get / Delete / List Tests
// =============================================================================

#[cfg(test)]
mod read_delete_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_link() {
        let (service, _temp) = create_test_service().await;

        let result = service.get_link("nothere").await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_malformed_code_is_not_found() {
        let (service, _temp) = create_test_service().await;

        let result = service.get_link("x").await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_then_get_and_delete_again() {
        let (service, _temp) = create_test_service().await;

        service
            .create_link(create_request(Some("gone01"), "https://example.com"))
            .await
            .unwrap();

        service.delete_link("gone01").await.unwrap();

        assert!(matches!(
            service.get_link("gone01").await,
            Err(RegistryError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_link("gone01").await,
            Err(RegistryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_code_can_be_reused_after_delete() {
        let (service, _temp) = create_test_service().await;

        service
            .create_link(create_request(Some("again1"), "https://one.example"))
            .await
            .unwrap();
        service.delete_link("again1").await.unwrap();

        let link = service
            .create_link(create_request(Some("again1"), "https://two.example"))
            .await
            .unwrap();
        assert_eq!(link.url, "https://two.example/");
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (service, _temp) = create_test_service().await;

        for code in ["first1", "second", "third3"] {
            service
                .create_link(create_request(Some(code), "https://example.com"))
                .await
                .unwrap();
        }

        let codes: Vec<String> = service
            .list_links()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.code)
            .collect();
        assert_eq!(codes, vec!["third3", "second", "first1"]);

        service
            .create_link(create_request(Some("fourth"), "https://example.com"))
            .await
            .unwrap();
        let links = service.list_links().await.unwrap();
        assert_eq!(links[0].code, "fourth");
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (service, _temp) = create_test_service().await;
        assert!(service.list_links().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_store_unavailable() {
        let store = Arc::new(MockStore::failing());
        let service = LinkService::new(store, Arc::new(RandomCodeGenerator::default()), 5);

        assert!(matches!(
            service.get_link("abcdef").await,
            Err(RegistryError::StoreUnavailable(_))
        ));
        assert!(matches!(
            service.list_links().await,
            Err(RegistryError::StoreUnavailable(_))
        ));
        assert!(matches!(
            service.delete_link("abcdef").await,
            Err(RegistryError::StoreUnavailable(_))
        ));
    }
}
