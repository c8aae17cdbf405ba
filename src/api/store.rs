//! Purpose: State orchestrator binding client, cache, pipeline, and derived views.
//! Exports: `Explorer`.
//! Role: Single owner of the collection and criteria consumed by presentation code.
//! Invariants: Any search/type/sort mutation resets the page to 1; the page stays clamped.
//! Invariants: A surfaced error coexists only with an empty collection.
//! Invariants: Results from superseded loads are discarded via the generation counter.

use std::collections::BTreeSet;

use tracing::warn;

use crate::api::enrich;
use crate::api::remote::RemoteClient;
use crate::core::cache::TtlCache;
use crate::core::catalog::Pokemon;
use crate::core::error::Error;
use crate::core::view::{self, Criteria, SortKey, SortOrder, ViewMode};

pub struct Explorer {
    client: RemoteClient,
    cache: TtlCache<Vec<Pokemon>>,
    entities: Vec<Pokemon>,
    filtered: Vec<Pokemon>,
    criteria: Criteria,
    loading: bool,
    error: Option<Error>,
    generation: u64,
}

impl Explorer {
    pub fn new(client: RemoteClient) -> Self {
        Self::with_cache(client, TtlCache::new())
    }

    /// The cache is plain injected state so tests can substitute one with
    /// a short TTL or pre-seeded contents.
    pub fn with_cache(client: RemoteClient, cache: TtlCache<Vec<Pokemon>>) -> Self {
        Self {
            client,
            cache,
            entities: Vec::new(),
            filtered: Vec::new(),
            criteria: Criteria::default(),
            loading: false,
            error: None,
            generation: 0,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.criteria.page_size = page_size.max(1);
        self
    }

    /// Initial load: runs the enrichment pipeline and commits the outcome.
    pub fn load(&mut self) {
        let generation = self.begin_load();
        let outcome = enrich::load_collection(&self.client, &mut self.cache);
        self.finish_load(generation, outcome);
    }

    /// Explicit invalidation: clears the entire cache, then loads again.
    pub fn refetch(&mut self) {
        self.cache.clear();
        self.load();
    }

    fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.generation
    }

    fn finish_load(&mut self, generation: u64, outcome: Result<Vec<Pokemon>, Error>) {
        if generation != self.generation {
            // A newer load owns the state now; drop this result.
            return;
        }
        self.loading = false;
        match outcome {
            Ok(entities) => {
                self.entities = entities;
                self.error = None;
            }
            Err(err) => {
                if self.entities.is_empty() {
                    self.error = Some(err);
                } else {
                    warn!(error = %err, "load failed; keeping the already-loaded collection");
                }
            }
        }
        self.refresh_view();
    }

    /// On-demand composite fetch for one entity. Detail and description are
    /// merged monotonically into the collection entry; failure propagates to
    /// the caller and never touches the global error state.
    pub fn entity_detail(&mut self, id: u32) -> Result<Pokemon, Error> {
        let (detail, species) = self.client.fetch_complete(id)?;
        let description = species.english_text();

        let position = self.entities.iter().position(|entry| entry.id == id);
        let base = match position {
            Some(index) => self.entities[index].clone(),
            None => Pokemon::skeletal(id, detail.name.clone()),
        };
        let mut updated = base.with_detail(&detail);
        if let Some(text) = description {
            updated = updated.with_description(text);
        }
        if let Some(index) = position {
            self.entities[index] = updated.clone();
            self.refresh_view();
        }
        Ok(updated)
    }

    pub fn entities(&self) -> &[Pokemon] {
        &self.entities
    }

    pub fn filtered(&self) -> &[Pokemon] {
        &self.filtered
    }

    pub fn current_page_entities(&self) -> &[Pokemon] {
        view::page_slice(&self.filtered, self.criteria.page, self.criteria.page_size)
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn current_page(&self) -> usize {
        self.criteria.page
    }

    pub fn total_pages(&self) -> usize {
        view::total_pages(self.filtered.len(), self.criteria.page_size)
    }

    pub fn search_term(&self) -> &str {
        &self.criteria.search
    }

    pub fn selected_types(&self) -> &BTreeSet<String> {
        &self.criteria.selected_types
    }

    pub fn sort_by(&self) -> SortKey {
        self.criteria.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.criteria.sort_order
    }

    pub fn view_mode(&self) -> ViewMode {
        self.criteria.view_mode
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.criteria.search = term.into();
        self.reset_page();
    }

    pub fn set_selected_types(&mut self, types: impl IntoIterator<Item = String>) {
        self.criteria.selected_types = types.into_iter().collect();
        self.reset_page();
    }

    pub fn set_sort_by(&mut self, sort_by: SortKey) {
        self.criteria.sort_by = sort_by;
        self.reset_page();
    }

    pub fn set_sort_order(&mut self, sort_order: SortOrder) {
        self.criteria.sort_order = sort_order;
        self.reset_page();
    }

    pub fn set_current_page(&mut self, page: usize) {
        self.criteria.page = view::clamp_page(page, self.total_pages());
    }

    /// Presentation-only; never resets pagination.
    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.criteria.view_mode = view_mode;
    }

    pub fn clear_filters(&mut self) {
        self.criteria.search.clear();
        self.criteria.selected_types.clear();
        self.criteria.sort_by = SortKey::default();
        self.criteria.sort_order = SortOrder::default();
        self.reset_page();
    }

    // Filter/sort mutations land here: page back to 1, view rederived.
    fn reset_page(&mut self) {
        self.criteria.page = 1;
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        self.filtered = view::derive_filtered(&self.entities, &self.criteria);
        let total = view::total_pages(self.filtered.len(), self.criteria.page_size);
        self.criteria.page = view::clamp_page(self.criteria.page, total);
    }
}
