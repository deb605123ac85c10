//! Cross-user semantic cache for tool results
//!
//! Lookups embed a text surrogate of the tool call and search live rows of the
//! same tenant and tool. Rows tied to a cloud resource and written by a read
//! call are shared; a shared row written by someone else is released only
//! after the RBAC service confirms the requester can use that provider's
//! server. No failure in here ever reaches the caller: every collaborator
//! error becomes a miss or a skipped write.

use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::domain::access::{AccessChecker, AccessSubject};
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::tool_cache::{
    build_cache_text, classify_permission, hash_args, now_epoch_secs, summarize_result,
    ttl_for_tool, CacheField, CacheFilter, CachedResult, HitCounter, ResourceScope,
    ScopeExtractorRegistry, SearchHit, SearchRequest, StatsRecorder, StoreRequest,
    ToolCacheConfig, ToolCacheStats, VectorStore,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{
    record_access_check, record_cleanup, record_lookup, record_store,
};

/// Text embedded at bootstrap to discover the vector dimension
const PROBE_TEXT: &str = "tool result cache dimension probe";

/// Longest a hit waits for its recorded count before reporting zero
const HIT_COUNT_READ_TIMEOUT: Duration = Duration::from_millis(250);

/// Why a lookup ended the way it did
#[derive(Debug)]
enum LookupOutcome {
    Hit(Box<SearchHit>),
    Disabled,
    Invalid,
    EmbeddingFailed,
    SearchFailed,
    NoCandidate,
    BelowThreshold,
    Denied,
}

impl LookupOutcome {
    fn label(&self) -> &'static str {
        match self {
            Self::Hit(hit) if hit.cross_user_hit => "cross_user_hit",
            Self::Hit(_) => "hit",
            Self::Disabled => "disabled",
            Self::Invalid => "invalid",
            Self::EmbeddingFailed => "embedding_failed",
            Self::SearchFailed => "search_failed",
            Self::NoCandidate => "no_candidate",
            Self::BelowThreshold => "below_threshold",
            Self::Denied => "denied",
        }
    }
}

/// Trait for tool result cache operations
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ToolResultCacheTrait: Send + Sync + std::fmt::Debug {
    /// Whether bootstrap succeeded and the cache is enabled
    fn is_ready(&self) -> bool;

    /// Best permitted cached result for a request, `None` on any miss
    async fn search(&self, request: &SearchRequest) -> Option<SearchHit>;

    /// Cache a fresh result; `false` when nothing was written
    async fn store(&self, request: &StoreRequest) -> bool;

    /// Delete expired rows, returning how many were removed
    async fn cleanup_expired(&self) -> usize;

    /// Probe the vector store
    async fn health_check(&self) -> Result<(), DomainError>;

    fn stats(&self) -> ToolCacheStats;

    fn reset_stats(&self);
}

/// Tool result cache service
#[derive(Debug)]
pub struct ToolResultCache {
    config: ToolCacheConfig,
    registry: ScopeExtractorRegistry,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    hit_counter: Arc<dyn HitCounter>,
    access_checker: Arc<dyn AccessChecker>,
    stats: StatsRecorder,
    dimensions: OnceLock<usize>,
}

impl ToolResultCache {
    /// Create a cache with the built-in scope extractors
    ///
    /// The cache serves nothing until [`Self::initialize`] succeeds.
    pub fn new(
        config: ToolCacheConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        hit_counter: Arc<dyn HitCounter>,
        access_checker: Arc<dyn AccessChecker>,
    ) -> Self {
        Self {
            config,
            registry: ScopeExtractorRegistry::with_builtin(),
            embedder,
            store,
            hit_counter,
            access_checker,
            stats: StatsRecorder::new(),
            dimensions: OnceLock::new(),
        }
    }

    /// Replace the scope extractor registry
    pub fn with_registry(mut self, registry: ScopeExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &ToolCacheConfig {
        &self.config
    }

    /// Embedding dimension fixed at bootstrap
    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions.get().copied()
    }

    /// Discover the embedding dimension and prepare the collection
    ///
    /// On failure the cache stays disabled: searches miss and stores are
    /// skipped until a later call succeeds.
    pub async fn initialize(&self) -> Result<usize, DomainError> {
        if !self.config.enabled {
            info!("Tool result cache disabled by configuration");
            return Err(DomainError::configuration("Tool result cache is disabled"));
        }

        if let Some(dimensions) = self.dimensions() {
            return Ok(dimensions);
        }

        match self.bootstrap().await {
            Ok(dimensions) => {
                let dimensions = *self.dimensions.get_or_init(|| dimensions);
                info!(
                    collection = %self.config.collection(),
                    dimensions,
                    embedding_provider = self.embedder.provider_name(),
                    embedding_model = %self.embedder.model(),
                    vector_store = self.store.backend_name(),
                    "Tool result cache ready"
                );
                Ok(dimensions)
            }
            Err(e) => {
                warn!(
                    collection = %self.config.collection(),
                    error = %e,
                    "Tool result cache bootstrap failed, cache disabled"
                );
                Err(e)
            }
        }
    }

    async fn bootstrap(&self) -> Result<usize, DomainError> {
        let probe = self.embedder.embed(PROBE_TEXT).await?;

        if probe.is_empty() {
            return Err(DomainError::provider(
                self.embedder.provider_name(),
                "Embedding probe returned an empty vector",
            ));
        }

        let wait = self.config.index_build_wait();
        timeout(wait, self.store.ensure_collection(probe.len()))
            .await
            .map_err(|_| {
                DomainError::storage(format!(
                    "Collection '{}' not ready after {:?}",
                    self.config.collection(),
                    wait
                ))
            })??;

        Ok(probe.len())
    }

    pub fn is_ready(&self) -> bool {
        self.ready_dimensions().is_some()
    }

    fn ready_dimensions(&self) -> Option<usize> {
        if self.config.enabled {
            self.dimensions()
        } else {
            None
        }
    }

    /// Best permitted cached result for a request
    ///
    /// Misses, denials and collaborator failures all return `None`.
    pub async fn search(&self, request: &SearchRequest) -> Option<SearchHit> {
        let started = Instant::now();
        let outcome = self.lookup(request).await;

        record_lookup(outcome.label(), started.elapsed());

        match outcome {
            LookupOutcome::Hit(hit) => {
                self.stats.record_hit(hit.similarity, hit.cross_user_hit);
                Some(*hit)
            }
            LookupOutcome::Disabled => None,
            LookupOutcome::Denied => {
                self.stats.record_access_denial();
                None
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    async fn lookup(&self, request: &SearchRequest) -> LookupOutcome {
        let Some(dimensions) = self.ready_dimensions() else {
            return LookupOutcome::Disabled;
        };

        if request.tenant_id.trim().is_empty() || request.tool_name.trim().is_empty() {
            debug!("Tool cache lookup without tenant or tool name");
            return LookupOutcome::Invalid;
        }

        let scope = self.registry.extract(&request.tool_name, &request.tool_args);
        let text = build_cache_text(
            &request.tool_name,
            &request.tool_args,
            request.query_text.as_deref(),
        );

        let embedding = match self.embed(&text, dimensions).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(
                    tool_name = %request.tool_name,
                    error = %e,
                    "Tool cache lookup embedding failed"
                );
                return LookupOutcome::EmbeddingFailed;
            }
        };

        let filter = search_filter(request, scope.as_ref(), now_epoch_secs());

        let candidates = match self.store.search(&embedding, &filter, self.config.top_k).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(tool_name = %request.tool_name, error = %e, "Tool cache search failed");
                return LookupOutcome::SearchFailed;
            }
        };

        let Some(best) = candidates
            .into_iter()
            .max_by(|a, b| a.similarity.total_cmp(&b.similarity))
        else {
            debug!(
                tenant_id = %request.tenant_id,
                tool_name = %request.tool_name,
                "Tool cache miss"
            );
            return LookupOutcome::NoCandidate;
        };

        if best.similarity < self.config.similarity_threshold {
            debug!(
                tool_name = %request.tool_name,
                similarity = best.similarity,
                threshold = self.config.similarity_threshold,
                "Tool cache candidate below threshold"
            );
            return LookupOutcome::BelowThreshold;
        }

        let row = best.row;
        let cross_user = row.original_user_id() != request.user_id;

        // Only the best candidate is ever considered; a denial is a plain miss.
        if cross_user {
            let permitted = match scope.as_ref() {
                Some(scope) if row.is_shared() => self.check_access(request, scope).await,
                _ => false,
            };

            if !permitted {
                return LookupOutcome::Denied;
            }
        }

        let hit_count = self.bump_hit_count(&row).await;

        debug!(
            tenant_id = %request.tenant_id,
            tool_name = %request.tool_name,
            cache_id = %row.id(),
            similarity = best.similarity,
            resource_scope = row.resource_scope().unwrap_or(""),
            cross_user,
            "Tool cache hit"
        );

        LookupOutcome::Hit(Box::new(SearchHit {
            result: row.result_value(),
            similarity: best.similarity,
            cache_id: row.id().to_string(),
            tool_name: row.tool_name().to_string(),
            cached_at: row.created_at(),
            hit_count,
            resource_scope: row.resource_scope().map(str::to_string),
            cross_user_hit: cross_user,
            original_user_id: cross_user.then(|| row.original_user_id().to_string()),
        }))
    }

    async fn embed(&self, text: &str, dimensions: usize) -> Result<Vec<f32>, DomainError> {
        let embedding = self.embedder.embed(text).await?;

        if embedding.len() != dimensions {
            return Err(DomainError::provider(
                self.embedder.provider_name(),
                format!(
                    "Embedding has {} dimensions, collection expects {}",
                    embedding.len(),
                    dimensions
                ),
            ));
        }

        Ok(embedding)
    }

    async fn check_access(&self, request: &SearchRequest, scope: &ResourceScope) -> bool {
        let subject = AccessSubject::new(
            request.user_id.clone(),
            request.user_groups.clone(),
            request.is_admin,
        );
        let server_id = scope.server_id();

        match self.access_checker.check_access(&subject, &server_id).await {
            Ok(decision) if decision.allowed => {
                record_access_check("allowed");
                true
            }
            Ok(decision) => {
                record_access_check("denied");
                debug!(
                    server_id = %server_id,
                    resource_scope = %scope,
                    reason = decision.reason.as_deref().unwrap_or(""),
                    "Cross-user tool cache candidate denied"
                );
                false
            }
            Err(e) => {
                record_access_check("error");
                warn!(
                    server_id = %server_id,
                    error = %e,
                    "Access check failed, treating as denied"
                );
                false
            }
        }
    }

    /// Hit count including this hit; the persistent increment runs detached
    async fn bump_hit_count(&self, row: &CachedResult) -> u64 {
        let read = timeout(HIT_COUNT_READ_TIMEOUT, self.hit_counter.get(row.id()));

        let recorded = match read.await {
            Ok(Ok(count)) => count,
            Ok(Err(e)) => {
                debug!(cache_id = %row.id(), error = %e, "Failed to read hit counter");
                0
            }
            Err(_) => {
                debug!(cache_id = %row.id(), "Hit counter read timed out");
                0
            }
        };

        let counter = Arc::clone(&self.hit_counter);
        let id = row.id().to_string();
        let ttl = row.remaining_ttl(now_epoch_secs());

        tokio::spawn(async move {
            if let Err(e) = counter.increment(&id, ttl).await {
                debug!(cache_id = %id, error = %e, "Failed to increment hit counter");
            }
        });

        row.hit_count() + recorded + 1
    }

    /// Cache a fresh tool result
    ///
    /// Always inserts a new row. Returns `false` when the cache is not ready
    /// or the write failed.
    pub async fn store(&self, request: &StoreRequest) -> bool {
        let Some(dimensions) = self.ready_dimensions() else {
            return false;
        };

        match self.insert_row(request, dimensions).await {
            Ok(()) => {
                self.stats.record_store(true);
                record_store("stored");
                true
            }
            Err(e) => {
                self.stats.record_store(false);
                record_store("failed");
                warn!(
                    tenant_id = %request.tenant_id,
                    tool_name = %request.tool_name,
                    error = %e,
                    "Failed to cache tool result"
                );
                false
            }
        }
    }

    async fn insert_row(
        &self,
        request: &StoreRequest,
        dimensions: usize,
    ) -> Result<(), DomainError> {
        if request.tenant_id.trim().is_empty()
            || request.tool_name.trim().is_empty()
            || request.user_id.trim().is_empty()
        {
            return Err(DomainError::validation(
                "tenantId, toolName and userId are required",
            ));
        }

        let scope = self.registry.extract(&request.tool_name, &request.tool_args);
        let permission = classify_permission(&request.tool_name, &request.tool_args);
        let text = build_cache_text(
            &request.tool_name,
            &request.tool_args,
            request.query_text.as_deref(),
        );

        let embedding = self.embed(&text, dimensions).await?;
        let payload = summarize_result(&request.result, &self.config.summarize_limits());
        let ttl = ttl_for_tool(&request.tool_name, self.config.default_ttl());

        let row = CachedResult::new(
            request.tenant_id.clone(),
            request.tool_name.clone(),
            request.user_id.clone(),
            embedding,
            payload,
            ttl,
        )
        .with_args_hash(hash_args(&request.tool_args))
        .with_query_text(request.query_text.as_deref().unwrap_or(&text))
        .with_sharing(scope.as_ref(), permission);

        debug!(
            tenant_id = %row.tenant_id(),
            tool_name = %row.tool_name(),
            cache_id = %row.id(),
            resource_scope = row.resource_scope().unwrap_or(""),
            shared = row.is_shared(),
            permission = permission.as_str(),
            ttl_secs = ttl.as_secs(),
            "Caching tool result"
        );

        self.store.insert(row).await
    }

    /// Delete every expired row in the collection
    pub async fn cleanup_expired(&self) -> usize {
        if !self.is_ready() {
            return 0;
        }

        match self.store.delete(&CacheFilter::expired()).await {
            Ok(deleted) => {
                record_cleanup(deleted);
                info!(
                    deleted,
                    collection = %self.config.collection(),
                    "Expired tool cache rows removed"
                );
                deleted
            }
            Err(e) => {
                warn!(error = %e, "Tool cache cleanup failed");
                0
            }
        }
    }

    pub async fn health_check(&self) -> Result<(), DomainError> {
        self.store.health_check().await
    }

    pub fn stats(&self) -> ToolCacheStats {
        self.stats.snapshot(self.is_ready())
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
        info!("Tool cache statistics reset");
    }
}

/// Filter for one lookup
///
/// Scoped lookups only see shared rows of the same resource. Unscoped lookups
/// only see the requester's own rows.
fn search_filter(request: &SearchRequest, scope: Option<&ResourceScope>, now: i64) -> CacheFilter {
    let mut clauses = CacheFilter::live_for_tool(&request.tenant_id, &request.tool_name, now);

    match scope {
        Some(scope) => {
            clauses.push(CacheFilter::eq(CacheField::IsShared, true));
            clauses.push(CacheFilter::eq(CacheField::ResourceScope, scope.to_string()));
        }
        None => clauses.push(CacheFilter::eq(
            CacheField::OriginalUserId,
            request.user_id.as_str(),
        )),
    }

    CacheFilter::and(clauses)
}

#[async_trait::async_trait]
impl ToolResultCacheTrait for ToolResultCache {
    fn is_ready(&self) -> bool {
        ToolResultCache::is_ready(self)
    }

    async fn search(&self, request: &SearchRequest) -> Option<SearchHit> {
        ToolResultCache::search(self, request).await
    }

    async fn store(&self, request: &StoreRequest) -> bool {
        ToolResultCache::store(self, request).await
    }

    async fn cleanup_expired(&self) -> usize {
        ToolResultCache::cleanup_expired(self).await
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        ToolResultCache::health_check(self).await
    }

    fn stats(&self) -> ToolCacheStats {
        ToolResultCache::stats(self)
    }

    fn reset_stats(&self) {
        ToolResultCache::reset_stats(self)
    }
}
