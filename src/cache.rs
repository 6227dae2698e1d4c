//! In-memory caching using moka
//!
//! Caches the settings singleton and the public price grid per year. Both are
//! read on every guest-facing page and change only through administrator writes,
//! which invalidate them explicitly.
//!
//! Each invalidation bumps a generation counter. A loader records the
//! generation before it reads the database and its result is dropped if an
//! invalidation happened in between, so a slow read cannot put back data that
//! a write has already replaced.

use chrono::{Datelike, Utc};
use moka::future::Cache;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::catalog::models::Settings;
use crate::catalog::queries as catalog_queries;
use crate::pricing::calculators::public_grid;
use crate::pricing::queries as pricing_queries;
use crate::pricing::responses::PublicGrid;

const SETTINGS_KEY: &str = "settings";

/// Application cache
#[derive(Clone)]
pub struct AppCache {
    /// Settings singleton
    pub settings: Cache<String, Arc<Settings>>,
    /// Public price grids (year -> grid)
    pub public_grids: Cache<i32, Arc<PublicGrid>>,
    settings_generation: Arc<AtomicU64>,
    catalog_generation: Arc<AtomicU64>,
}

impl AppCache {
    pub fn new() -> Self {
        Self {
            // Settings: 1 entry, 30 min TTL
            settings: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(30 * 60))
                .build(),

            // Public grids: a handful of years, 15 min TTL
            public_grids: Cache::builder()
                .max_capacity(16)
                .time_to_live(Duration::from_secs(15 * 60))
                .time_to_idle(Duration::from_secs(5 * 60))
                .build(),

            settings_generation: Arc::new(AtomicU64::new(0)),
            catalog_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn get_settings(&self) -> Option<Arc<Settings>> {
        self.settings.get(SETTINGS_KEY).await
    }

    /// Read before loading settings; pass to [`AppCache::put_settings`].
    pub fn settings_generation(&self) -> u64 {
        self.settings_generation.load(Ordering::SeqCst)
    }

    /// Cache settings loaded at `generation`. Returns false when an
    /// invalidation overtook the load and the value was dropped.
    pub async fn put_settings(&self, settings: Settings, generation: u64) -> bool {
        self.settings
            .insert(SETTINGS_KEY.to_string(), Arc::new(settings))
            .await;
        // re-check after the insert: an invalidation racing the insert either
        // removed the entry or bumped the counter before we read it here
        if self.settings_generation() != generation {
            self.settings.invalidate(SETTINGS_KEY).await;
            return false;
        }
        true
    }

    /// Read before loading a grid; pass to [`AppCache::put_public_grid`].
    pub fn catalog_generation(&self) -> u64 {
        self.catalog_generation.load(Ordering::SeqCst)
    }

    /// Cache a grid loaded at `generation`. Returns false when a catalog
    /// write overtook the load and the grid was dropped.
    pub async fn put_public_grid(&self, year: i32, grid: Arc<PublicGrid>, generation: u64) -> bool {
        self.public_grids.insert(year, grid).await;
        if self.catalog_generation() != generation {
            self.public_grids.invalidate(&year).await;
            return false;
        }
        true
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            settings_cached: self.settings.entry_count() > 0,
            public_grids_size: self.public_grids.entry_count(),
        }
    }

    /// Drop cached grids after any season or period write.
    pub fn invalidate_catalog(&self) {
        self.catalog_generation.fetch_add(1, Ordering::SeqCst);
        self.public_grids.invalidate_all();
        info!("Public grid cache invalidated");
    }

    /// Drop the settings entry after the fallback price changes.
    pub async fn invalidate_settings(&self) {
        self.settings_generation.fetch_add(1, Ordering::SeqCst);
        self.settings.invalidate(SETTINGS_KEY).await;
        info!("Settings cache invalidated");
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Entry counts, logged after each warm-up
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    pub settings_cached: bool,
    pub public_grids_size: u64,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes every 10 minutes.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    let mut interval = interval(Duration::from_secs(10 * 60));
    loop {
        // first tick completes immediately
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Load the settings row and the current year's grid.
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    let generation = cache.settings_generation();
    match catalog_queries::get_or_create_settings(db).await {
        Ok(settings) => {
            cache.put_settings(settings, generation).await;
        }
        Err(e) => warn!("Failed to warm settings cache: {}", e),
    }

    let year = Utc::now().year();
    let generation = cache.catalog_generation();
    match pricing_queries::find_periods_for_year(db, year).await {
        Ok(periods) => {
            let grid = Arc::new(public_grid(year, &periods));
            if !cache.put_public_grid(year, grid, generation).await {
                info!(year, "Catalog changed during warm-up, grid not cached");
            }
        }
        Err(e) => warn!("Failed to warm public grid cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_settings_round_trip_and_invalidation() {
        let cache = AppCache::new();
        assert!(cache.get_settings().await.is_none());

        let generation = cache.settings_generation();
        let stored = cache
            .put_settings(
                Settings {
                    default_price_per_night: dec!(100),
                },
                generation,
            )
            .await;
        assert!(stored);
        let cached = cache.get_settings().await.expect("settings cached");
        assert_eq!(cached.default_price_per_night, dec!(100));

        cache.invalidate_settings().await;
        assert!(cache.get_settings().await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_catalog_drops_grids() {
        let cache = AppCache::new();
        cache
            .public_grids
            .insert(
                2025,
                Arc::new(PublicGrid {
                    year: 2025,
                    periods: vec![],
                }),
            )
            .await;
        assert!(cache.public_grids.get(&2025).await.is_some());

        cache.invalidate_catalog();
        assert!(cache.public_grids.get(&2025).await.is_none());
    }

    fn empty_grid(year: i32) -> Arc<PublicGrid> {
        Arc::new(PublicGrid {
            year,
            periods: vec![],
        })
    }

    #[tokio::test]
    async fn test_grid_loaded_before_invalidation_is_not_cached() {
        let cache = AppCache::new();

        // a reader starts loading, then an admin write lands
        let generation = cache.catalog_generation();
        cache.invalidate_catalog();

        assert!(!cache.put_public_grid(2025, empty_grid(2025), generation).await);
        assert!(cache.public_grids.get(&2025).await.is_none());

        // the next load sees the new generation and sticks
        let generation = cache.catalog_generation();
        assert!(cache.put_public_grid(2025, empty_grid(2025), generation).await);
        assert!(cache.public_grids.get(&2025).await.is_some());
    }

    #[tokio::test]
    async fn test_settings_loaded_before_invalidation_are_not_cached() {
        let cache = AppCache::new();

        let generation = cache.settings_generation();
        cache.invalidate_settings().await;

        let stored = cache
            .put_settings(
                Settings {
                    default_price_per_night: dec!(90),
                },
                generation,
            )
            .await;
        assert!(!stored);
        assert!(cache.get_settings().await.is_none());
    }
}
