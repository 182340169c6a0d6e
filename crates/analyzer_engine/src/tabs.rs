use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use analyzer_logging::analyzer_debug;

use crate::fetch::Fetcher;
use crate::{ExtractionFailure, TabDocument, TabId};

/// The privileged view of open tabs: which one is active, and its document.
#[async_trait::async_trait]
pub trait TabProvider: Send + Sync {
    async fn active_tab(&self) -> Option<TabId>;
    async fn load(&self, tab_id: TabId) -> Result<TabDocument, ExtractionFailure>;
}

/// Open tabs keyed by id. The most recently opened tab is active.
#[derive(Debug)]
struct TabRegistry<T> {
    next_id: TabId,
    tabs: BTreeMap<TabId, T>,
    active: Option<TabId>,
}

impl<T: Clone> TabRegistry<T> {
    fn new() -> Self {
        Self {
            next_id: 1,
            tabs: BTreeMap::new(),
            active: None,
        }
    }

    fn open(&mut self, entry: T) -> TabId {
        let id = self.next_id;
        self.next_id += 1;
        self.tabs.insert(id, entry);
        self.active = Some(id);
        id
    }

    fn close(&mut self, tab_id: TabId) -> bool {
        let removed = self.tabs.remove(&tab_id).is_some();
        if self.active == Some(tab_id) {
            self.active = self.tabs.keys().next_back().copied();
        }
        removed
    }

    fn get(&self, tab_id: TabId) -> Result<T, ExtractionFailure> {
        self.tabs
            .get(&tab_id)
            .cloned()
            .ok_or(ExtractionFailure::TabClosed(tab_id))
    }
}

fn lock<T>(registry: &Mutex<TabRegistry<T>>) -> std::sync::MutexGuard<'_, TabRegistry<T>> {
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Tabs whose documents are already in memory (local files, tests).
#[derive(Debug, Clone)]
pub struct InMemoryTabs {
    registry: Arc<Mutex<TabRegistry<TabDocument>>>,
}

impl Default for InMemoryTabs {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTabs {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(TabRegistry::new())),
        }
    }

    pub fn open(&self, url: impl Into<String>, html: impl Into<String>) -> TabId {
        lock(&self.registry).open(TabDocument {
            url: url.into(),
            html: html.into(),
        })
    }

    pub fn close(&self, tab_id: TabId) -> bool {
        lock(&self.registry).close(tab_id)
    }
}

#[async_trait::async_trait]
impl TabProvider for InMemoryTabs {
    async fn active_tab(&self) -> Option<TabId> {
        lock(&self.registry).active
    }

    async fn load(&self, tab_id: TabId) -> Result<TabDocument, ExtractionFailure> {
        lock(&self.registry).get(tab_id)
    }
}

/// Tabs backed by URLs; each load fetches the live document.
pub struct HttpTabs<F> {
    fetcher: F,
    registry: Mutex<TabRegistry<String>>,
}

impl<F: Fetcher> HttpTabs<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            registry: Mutex::new(TabRegistry::new()),
        }
    }

    pub fn open(&self, url: &str) -> Result<TabId, ExtractionFailure> {
        let parsed = url::Url::parse(url).map_err(|err| ExtractionFailure::LoadFailed {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ExtractionFailure::LoadFailed {
                url: url.to_string(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }
        Ok(lock(&self.registry).open(parsed.to_string()))
    }

    pub fn close(&self, tab_id: TabId) -> bool {
        lock(&self.registry).close(tab_id)
    }
}

#[async_trait::async_trait]
impl<F: Fetcher> TabProvider for HttpTabs<F> {
    async fn active_tab(&self) -> Option<TabId> {
        lock(&self.registry).active
    }

    async fn load(&self, tab_id: TabId) -> Result<TabDocument, ExtractionFailure> {
        let url = lock(&self.registry).get(tab_id)?;
        analyzer_debug!("Loading tab {} from {}", tab_id, url);
        self.fetcher.fetch_document(&url).await
    }
}
