//! Service wiring over PostgreSQL.

use std::sync::Arc;

use tracing::info;

use shelf_core::config::AppConfig;
use shelf_core::result::AppResult;
use shelf_database::{DatabasePool, PgFolderStore, PgIdentityStore, PgItemStore};
use shelf_service::{
    CountAggregator, EnrichmentService, FolderService, ItemService, SearchEngine, ShareService,
};

/// Every service, connected to one database.
pub struct Shelf {
    pub config: AppConfig,
    pub pool: DatabasePool,
    pub items: Arc<ItemService>,
    pub folders: FolderService,
    pub shares: ShareService,
    pub search: Arc<SearchEngine>,
    pub counts: Arc<CountAggregator>,
    pub enrichment: EnrichmentService,
}

impl Shelf {
    /// Connect to the database and build the services.
    pub async fn connect(config: AppConfig) -> AppResult<Self> {
        let pool = DatabasePool::connect(&config.database).await?;

        let item_store = Arc::new(PgItemStore::new(pool.pool().clone()));
        let folder_store = Arc::new(PgFolderStore::new(pool.pool().clone()));
        let identity_store = Arc::new(PgIdentityStore::new(pool.pool().clone()));

        let items = Arc::new(ItemService::new(item_store.clone(), folder_store.clone()));
        let folders = FolderService::new(
            folder_store,
            identity_store,
            items.clone(),
            config.folders.clone(),
        );
        let shares = ShareService::new(item_store.clone(), config.share.clone());
        let search = Arc::new(SearchEngine::new(item_store.clone(), config.search.clone()));
        let counts = Arc::new(CountAggregator::new(item_store));
        let enrichment = EnrichmentService::from_config(&config.enrichment)?;

        info!("Services ready");
        Ok(Self {
            config,
            pool,
            items,
            folders,
            shares,
            search,
            counts,
            enrichment,
        })
    }
}
