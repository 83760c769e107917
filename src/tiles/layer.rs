use super::loader::{TileLoader, TileResult};
use super::source::{SurveyTileSource, TileSource};
use crate::core::geo::TileCoord;
use crate::prelude::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Satellite tile layer driven by the displayed survey.
///
/// Every refresh starts a new revision. Downloads started under an older
/// revision are left to finish but their results are dropped when polled,
/// so a survey switch never shows tiles of the previous survey.
#[derive(Debug)]
pub struct SurveyTileLayer {
    source: SurveyTileSource,
    loader: TileLoader,
    revision: AtomicU64,
    /// Tiles requested under the current revision and not yet polled
    pending: Mutex<HashSet<TileCoord>>,
}

impl SurveyTileLayer {
    pub fn new(source: SurveyTileSource, loader: TileLoader) -> Self {
        Self {
            source,
            loader,
            revision: AtomicU64::new(0),
            pending: Mutex::new(HashSet::default()),
        }
    }

    pub fn source(&self) -> &SurveyTileSource {
        &self.source
    }

    pub fn loader(&self) -> &TileLoader {
        &self.loader
    }

    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// URL the layer would use for `coord` right now
    pub fn tile_url(&self, coord: TileCoord) -> String {
        self.source.url(coord)
    }

    /// Queue downloads for `coords`, skipping tiles already in flight for the
    /// current revision. Returns how many were queued.
    pub fn request_tiles(&self, coords: &[TileCoord]) -> usize {
        let mut pending = self.pending();
        let revision = self.revision();
        let fresh: Vec<TileCoord> = coords
            .iter()
            .copied()
            .filter(|coord| coord.is_valid() && pending.insert(*coord))
            .collect();

        for coord in &fresh {
            self.loader.queue_tile(*coord, self.source.url(*coord), revision);
        }
        log::debug!(
            "queued {} of {} tiles at revision {}",
            fresh.len(),
            coords.len(),
            revision
        );
        fresh.len()
    }

    /// Discard everything loaded or in flight and start a new revision.
    /// Tiles must be requested again afterwards.
    pub fn refresh(&self) {
        let mut pending = self.pending();
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        pending.clear();
        log::debug!("tile layer refreshed, now at revision {}", revision);
    }

    /// Completed tiles of the current revision; stale ones are dropped
    pub fn poll_loaded(&self) -> Vec<TileResult> {
        // Revision changes happen under this lock
        let mut pending = self.pending();
        let current = self.revision();
        let results = self.loader.try_recv_results();
        let mut fresh = Vec::with_capacity(results.len());

        for result in results {
            if result.revision != current {
                log::debug!(
                    "dropping tile {} from revision {} (current {})",
                    result.coord,
                    result.revision,
                    current
                );
                continue;
            }
            pending.remove(&result.coord);
            fresh.push(result);
        }
        fresh
    }

    /// Number of tiles requested under the current revision and not yet polled
    pub fn pending_count(&self) -> usize {
        self.pending().len()
    }

    fn pending(&self) -> MutexGuard<'_, HashSet<TileCoord>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ApiConfig;
    use crate::ui::cell::SurveyCell;
    use std::sync::Arc;

    // Without a runtime the loader reports every queued tile as blank right
    // away, which makes channel contents deterministic.
    fn offline_layer() -> SurveyTileLayer {
        let source = SurveyTileSource::new(ApiConfig::default(), "Vert", SurveyCell::new());
        SurveyTileLayer::new(source, TileLoader::new().unwrap())
    }

    #[test]
    fn test_poll_keeps_only_current_revision() {
        let layer = offline_layer();
        let coord = TileCoord::new(0, 0, 1);

        assert_eq!(layer.request_tiles(&[coord]), 1);
        layer.refresh();
        assert_eq!(layer.request_tiles(&[coord]), 1);

        let results = layer.poll_loaded();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].revision, 1);
        assert_eq!(layer.pending_count(), 0);

        // The tile can be requested again once it arrived
        assert_eq!(layer.request_tiles(&[coord]), 1);
    }

    #[test]
    fn test_poisoned_pending_set_still_filters() {
        let layer = Arc::new(offline_layer());
        let poisoner = layer.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.pending.lock().unwrap();
            panic!("poison the pending set");
        })
        .join();
        assert!(layer.pending.is_poisoned());

        assert_eq!(layer.request_tiles(&[TileCoord::new(9, 0, 2)]), 0);
        let coord = TileCoord::new(3, 3, 2);
        assert_eq!(layer.request_tiles(&[coord, coord]), 1);
        assert_eq!(layer.poll_loaded().len(), 1);
        assert_eq!(layer.pending_count(), 0);
    }
}
