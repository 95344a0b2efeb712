//! Concurrent two-stream pharmacy search with graceful degradation.

use rxlocate_core::{
    LatLon, LocalCandidate, LocalEntryStore, MapSearchProvider, PharmacyCandidate,
    REPORT_SEARCH_RADIUS_MILES,
};

use crate::cache::{nearby_cache_key, search_cache_key, Cache};
use crate::merge::merge_candidates;

/// Runs the authoritative provider and the local store side by side and
/// merges their results.
///
/// A failing stream is logged and treated as empty, so a search always
/// produces a list ending with the "add a pharmacy" entry. Failures are never
/// cached.
pub struct PharmacySearch<M, L, MC, LC> {
    map: M,
    local: L,
    map_cache: MC,
    local_cache: LC,
}

impl<M, L, MC, LC> PharmacySearch<M, L, MC, LC>
where
    M: MapSearchProvider,
    L: LocalEntryStore,
    MC: Cache<Vec<PharmacyCandidate>>,
    LC: Cache<Vec<LocalCandidate>>,
{
    pub fn new(map: M, local: L, map_cache: MC, local_cache: LC) -> Self {
        Self {
            map,
            local,
            map_cache,
            local_cache,
        }
    }

    pub async fn search(&self, query: &str, origin: LatLon) -> Vec<PharmacyCandidate> {
        let (authoritative, local) =
            tokio::join!(self.authoritative(query, origin), self.nearby_local(origin));
        merge_candidates(authoritative, local, query, origin)
    }

    /// Drop every cached local stream. Called after a report is stored so the
    /// newly reported pharmacy shows up on the next search.
    pub fn invalidate_local(&self) {
        self.local_cache.clear();
    }

    async fn authoritative(&self, query: &str, origin: LatLon) -> Vec<PharmacyCandidate> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let key = search_cache_key(query, origin);
        if let Some(hit) = self.map_cache.get(&key) {
            tracing::debug!(%key, "authoritative search cache hit");
            return hit;
        }

        match self.map.search(query.trim(), origin).await {
            Ok(candidates) => {
                self.map_cache.set(key, candidates.clone());
                candidates
            }
            Err(e) => {
                tracing::warn!(error = %e, query, "authoritative search failed; using local results only");
                Vec::new()
            }
        }
    }

    async fn nearby_local(&self, origin: LatLon) -> Vec<LocalCandidate> {
        let key = nearby_cache_key(origin);
        if let Some(hit) = self.local_cache.get(&key) {
            return hit;
        }

        match self
            .local
            .query_nearby(origin, REPORT_SEARCH_RADIUS_MILES)
            .await
        {
            Ok(entries) => {
                self.local_cache.set(key, entries.clone());
                entries
            }
            Err(e) => {
                tracing::warn!(error = %e, "local entry lookup failed; skipping local results");
                Vec::new()
            }
        }
    }
}
