//! Application Context
//!
//! Owns every cache instance and the background sweep. Built once at
//! startup and handed to whoever needs the caches; tests build their own.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::info;

use crate::cache::{mutex_lock, ObjectCache};
use crate::config::Config;
use crate::coordinator::RequestCoordinator;
use crate::media::{MediaCacheStore, MediaProfile};
use crate::service::{MatchdayService, Upstream};
use crate::storage::KeyValueStore;
use crate::tasks::SweepTask;

const SOURCE: &str = "context";

pub struct AppContext {
    config: Config,
    objects: Arc<ObjectCache<Value>>,
    coordinator: Arc<RequestCoordinator<Value>>,
    icons: Arc<MediaCacheStore>,
    images: Arc<MediaCacheStore>,
    service: Option<Arc<MatchdayService>>,
    sweep: Mutex<Option<SweepTask>>,
}

impl AppContext {
    /// Builds the caches described by `config` over `storage`.
    ///
    /// No task is started; call [`AppContext::start`] for the sweep.
    pub fn new(config: Config, storage: Arc<dyn KeyValueStore>) -> Self {
        let icons = MediaProfile::icons()
            .ttl(config.icon_ttl())
            .max_entries(config.media_max_entries)
            .max_bytes(config.media_max_bytes);
        let images = MediaProfile::images()
            .ttl(config.image_ttl())
            .max_entries(config.media_max_entries)
            .max_bytes(config.media_max_bytes);

        Self {
            objects: Arc::new(ObjectCache::new(config.object_default_ttl())),
            coordinator: Arc::new(RequestCoordinator::new()),
            icons: Arc::new(MediaCacheStore::new(icons, Arc::clone(&storage))),
            images: Arc::new(MediaCacheStore::new(images, storage)),
            service: None,
            sweep: Mutex::new(None),
            config,
        }
    }

    /// Attaches the upstream client, enabling [`AppContext::service`].
    pub fn with_upstream(mut self, upstream: Arc<dyn Upstream>) -> Self {
        let service = MatchdayService::new(
            Arc::clone(&self.objects),
            Arc::clone(&self.coordinator),
            upstream,
        );
        self.service = Some(Arc::new(service));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn objects(&self) -> &Arc<ObjectCache<Value>> {
        &self.objects
    }

    pub fn coordinator(&self) -> &Arc<RequestCoordinator<Value>> {
        &self.coordinator
    }

    pub fn icons(&self) -> &Arc<MediaCacheStore> {
        &self.icons
    }

    pub fn images(&self) -> &Arc<MediaCacheStore> {
        &self.images
    }

    /// Media cache by profile name (`icons` or `images`).
    pub fn media(&self, name: &str) -> Option<&Arc<MediaCacheStore>> {
        [&self.icons, &self.images]
            .into_iter()
            .find(|store| store.name() == name)
    }

    /// None until an upstream is attached.
    pub fn service(&self) -> Option<&Arc<MatchdayService>> {
        self.service.as_ref()
    }

    // == Lifecycle ==
    /// Starts the object cache sweep. Calling it again is a no-op.
    pub fn start(&self) {
        let mut sweep = mutex_lock(&self.sweep, SOURCE, "start");
        if sweep.is_none() {
            *sweep = Some(SweepTask::spawn(
                Arc::clone(&self.objects),
                self.config.sweep_interval(),
            ));
        }
    }

    pub fn is_running(&self) -> bool {
        mutex_lock(&self.sweep, SOURCE, "is_running")
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Stops the sweep task if it is running.
    pub async fn shutdown(&self) {
        let task = mutex_lock(&self.sweep, SOURCE, "shutdown").take();
        if let Some(task) = task {
            task.stop().await;
            info!("Application context shut down");
        }
    }
}
