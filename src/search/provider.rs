//! Image search provider: the host-facing orchestrator
//!
//! Gates the terms, drives the session through debounce and fetch, and
//! publishes the outcome into the result cache. Metadata, activation and
//! filtering are answered from the cache alone.

use super::models::{SearchEvent, SearchEventKind};
use super::session::{Flight, SearchSession};
use super::traits::{ProviderError, SearchProvider};
use crate::cache::ResultCache;
use crate::config::{Settings, SubsearchPolicy};
use crate::launcher::{self, CommandLauncher, Launcher};
use crate::locales::{self, SentinelTexts};
use crate::metrics::{MetricsSnapshot, ProviderMetrics};
use crate::network::HttpClient;
use crate::query::{GateDecision, QueryGate};
use crate::remote::{Pixabay, RemoteClient, RemoteFetchError};
use crate::results::{ImageResult, ResultMeta, Sentinel};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Capacity of the progress event channel
const EVENT_CAPACITY: usize = 16;

/// Pixabay-backed search provider
pub struct ImageSearchProvider {
    id: String,
    gate: QueryGate,
    subsearch: SubsearchPolicy,
    texts: SentinelTexts,
    client: Arc<dyn RemoteClient>,
    launcher: Arc<dyn Launcher>,
    cache: ResultCache,
    session: SearchSession,
    events: broadcast::Sender<SearchEvent>,
    metrics: ProviderMetrics,
}

impl ImageSearchProvider {
    /// Create a provider around an arbitrary remote client and launcher
    pub fn new(
        settings: &Settings,
        client: Arc<dyn RemoteClient>,
        launcher: Arc<dyn Launcher>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            id: settings.general.provider_id.clone(),
            gate: QueryGate::new(settings.search.prefix.clone()),
            subsearch: settings.search.subsearch,
            texts: locales::sentinel_texts(&settings.pixabay.lang),
            client,
            launcher,
            cache: ResultCache::with_settings(&settings.cache),
            session: SearchSession::new(settings.search.debounce()),
            events,
            metrics: ProviderMetrics::new(),
        }
    }

    /// Create the production provider: Pixabay over HTTP, `xdg-open` activation
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let http = HttpClient::with_settings(&settings.outgoing)?;
        let client = Arc::new(Pixabay::new(http, &settings.pixabay));
        let launcher = Arc::new(CommandLauncher::with_settings(&settings.launcher));
        Ok(Self::new(settings, client, launcher))
    }

    /// Subscribe to progress events
    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.events.subscribe()
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// The host removed the provider: drop any pending timer and call
    pub fn teardown(&self) {
        info!("Tearing down provider {}", self.id);
        self.session.cancel();
    }

    fn emit(&self, event: SearchEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Turn a settled fetch into ids, writing records into the cache
    fn publish(&self, result: Result<Vec<ImageResult>, RemoteFetchError>) -> Vec<String> {
        match result {
            Ok(images) if images.is_empty() => {
                self.metrics.inc_empty_result();
                vec![Sentinel::NothingFound.id().to_string()]
            }
            Ok(images) => self.cache.put_all(images),
            Err(e) => {
                warn!("Remote search via {} failed: {}", self.client.name(), e);
                self.metrics.inc_fetch_error();
                vec![Sentinel::Error.id().to_string()]
            }
        }
    }

    /// Keep previous ids whose cached tags contain every refinement word
    fn filter_by_tags(&self, previous_results: &[String], terms: &[String]) -> Vec<String> {
        let words = self.gate.query_words(terms);

        previous_results
            .iter()
            .filter(|id| {
                self.cache
                    .get_record(id)
                    .map(|image| words.iter().all(|word| image.matches_tag(word)))
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SearchProvider for ImageSearchProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn get_initial_result_set(
        &self,
        terms: &[String],
        cancellable: &CancellationToken,
    ) -> Result<Vec<String>, ProviderError> {
        debug!("get_initial_result_set({:?})", terms);
        self.metrics.inc_search();

        if cancellable.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        let ticket = self.session.begin();
        let query = match self.gate.evaluate(terms) {
            GateDecision::Rejected => {
                self.metrics.inc_gate_rejection();
                self.session.finish(&ticket);
                return Ok(Vec::new());
            }
            GateDecision::Accepted(query) => query,
        };

        self.emit(SearchEvent::loading(ticket.generation()));

        let client = &self.client;
        let metrics = &self.metrics;
        let flight = self
            .session
            .run(&ticket, cancellable, |token| async move {
                metrics.inc_fetch();
                let start = Instant::now();
                let result = client.fetch(&query, &token).await;
                metrics.record_latency(start.elapsed().as_millis() as u64);
                result
            })
            .await;

        match flight {
            Flight::HostCancelled => {
                debug!("Generation {} cancelled by host", ticket.generation());
                self.metrics.inc_discarded();
                Err(ProviderError::Cancelled)
            }
            Flight::Superseded => {
                debug!("Generation {} superseded", ticket.generation());
                self.metrics.inc_discarded();
                Ok(Vec::new())
            }
            Flight::Completed(result) => {
                match self.session.commit(&ticket, || self.publish(result)) {
                    Some(ids) => {
                        info!(
                            "Generation {} published {} result(s)",
                            ticket.generation(),
                            ids.len()
                        );
                        self.emit(SearchEvent::results(ticket.generation(), ids.clone()));
                        Ok(ids)
                    }
                    None => {
                        self.metrics.inc_discarded();
                        Ok(Vec::new())
                    }
                }
            }
        }
    }

    async fn get_subsearch_result_set(
        &self,
        previous_results: &[String],
        terms: &[String],
        cancellable: &CancellationToken,
    ) -> Result<Vec<String>, ProviderError> {
        debug!("get_subsearch_result_set({:?} => {:?})", previous_results, terms);

        match self.subsearch {
            SubsearchPolicy::Requery => self.get_initial_result_set(terms, cancellable).await,
            SubsearchPolicy::FilterTags => {
                if cancellable.is_cancelled() {
                    return Err(ProviderError::Cancelled);
                }
                Ok(self.filter_by_tags(previous_results, terms))
            }
        }
    }

    async fn get_result_metas(
        &self,
        ids: &[String],
        cancellable: &CancellationToken,
    ) -> Result<Vec<ResultMeta>, ProviderError> {
        let mut metas = Vec::with_capacity(ids.len());

        for (id, entry) in self.cache.get_many(ids) {
            if cancellable.is_cancelled() {
                return Err(ProviderError::Cancelled);
            }
            metas.push(ResultMeta::from_entry(&id, &entry, &self.texts));
        }

        if cancellable.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }
        Ok(metas)
    }

    fn activate_result(&self, id: &str, _terms: &[String]) {
        debug!("activate_result({})", id);

        let Some(image) = self.cache.get_record(id) else {
            return;
        };

        match launcher::web_url(&image.page_url) {
            Some(url) => self.launcher.open(&url),
            None => warn!("Refusing to open non-web URL for result {}", id),
        }
    }
}

impl Drop for ImageSearchProvider {
    fn drop(&mut self) {
        self.session.cancel();
    }
}
