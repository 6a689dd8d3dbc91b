//! Shared wiring for service integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use shelf_core::config::{FolderConfig, SearchConfig, ShareConfig};
use shelf_core::types::{FolderId, Outcome, UserId};
use shelf_database::MemoryBackend;
use shelf_entity::folder::{Folder, FolderKind};
use shelf_entity::item::{CreateItem, Item};
use shelf_realtime::MemoryChangeFeed;
use shelf_service::{
    CountAggregator, FolderService, ItemService, RequestContext, SearchEngine, ShareService,
};

/// Every service over one in-memory backend that publishes its changes.
pub struct TestApp {
    pub store: Arc<MemoryBackend>,
    pub feed: MemoryChangeFeed,
    pub items: Arc<ItemService>,
    pub folders: FolderService,
    pub shares: ShareService,
    pub search: Arc<SearchEngine>,
    pub counts: Arc<CountAggregator>,
    pub ctx: RequestContext,
}

impl TestApp {
    pub fn new() -> Self {
        let feed = MemoryChangeFeed::new(64);
        let store = Arc::new(MemoryBackend::with_publisher(Arc::new(feed.clone())));
        let items = Arc::new(ItemService::new(store.clone(), store.clone()));
        let folders = FolderService::new(
            store.clone(),
            store.clone(),
            items.clone(),
            FolderConfig::default(),
        );
        let shares = ShareService::new(store.clone(), ShareConfig::default());
        let search = Arc::new(SearchEngine::new(store.clone(), SearchConfig::default()));
        let counts = Arc::new(CountAggregator::new(store.clone()));

        Self {
            store,
            feed,
            items,
            folders,
            shares,
            search,
            counts,
            ctx: RequestContext::new(UserId::new()),
        }
    }

    /// Creates a prompt folder, failing the test on any error.
    pub async fn folder(&self, name: &str, parent: Option<FolderId>) -> Folder {
        match self
            .folders
            .create_folder(&self.ctx, name, parent, FolderKind::Prompt)
            .await
            .expect("folder create")
        {
            Outcome::Complete(folder) => folder,
            Outcome::Partial { error, .. } => panic!("unexpected partial create: {error}"),
        }
    }

    /// Creates an item with the given tags.
    pub async fn item(&self, title: &str, folder_id: Option<FolderId>, tags: &[&str]) -> Item {
        self.items
            .create(
                &self.ctx,
                CreateItem {
                    folder_id,
                    title: title.to_string(),
                    content: format!("{title} body"),
                    tags: tags.iter().map(|t| t.to_string()).collect(),
                    ..CreateItem::default()
                },
            )
            .await
            .expect("item create")
    }
}

pub fn titles(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.title.as_str()).collect()
}
