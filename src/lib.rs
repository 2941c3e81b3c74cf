use std::sync::Arc;

use uuid::{Builder, NoContext, Timestamp, Uuid};

pub mod api;
pub mod auth;
pub mod config;
pub mod constant;
pub mod error;
pub mod logging;
pub mod model;
pub mod network;
pub mod notify;
pub mod repository;
pub mod usecase;

mod adapter;
pub use adapter::datastore;

use config::AppConfig;

type WebApiPath = String;
type WebApiHdlrLabel = &'static str;
type AppLogAlias = Arc<String>;

pub struct AppDataStoreContext {
    pub in_mem: Option<Arc<Box<dyn datastore::AbstInMemoryDStore>>>,
}

// global state shared by all threads
pub struct AppSharedState {
    _cfg: Arc<AppConfig>,
    _log: Arc<logging::AppLogContext>,
    dstore: Arc<AppDataStoreContext>,
    _notify: Arc<Box<dyn notify::AbstOrderNotify>>,
}

impl AppSharedState {
    pub fn new(cfg: AppConfig, log: logging::AppLogContext) -> Self {
        let log = Arc::new(log);
        let notify = notify::app_notify_context(log.clone());
        let in_mem = datastore::build_context(log.clone(), &cfg.api_server.data_store);
        let in_mem = in_mem.map(Arc::new);
        let ds_ctx = Arc::new(AppDataStoreContext { in_mem });
        Self {
            _cfg: Arc::new(cfg),
            _log: log,
            dstore: ds_ctx,
            _notify: Arc::new(notify),
        }
    } // end of fn new

    pub fn config(&self) -> &Arc<AppConfig> {
        &self._cfg
    }

    pub fn log_context(&self) -> &Arc<logging::AppLogContext> {
        &self._log
    }

    pub fn datastore(&self) -> Arc<AppDataStoreContext> {
        self.dstore.clone()
    }

    pub fn order_notify(&self) -> Arc<Box<dyn notify::AbstOrderNotify>> {
        self._notify.clone()
    }
} // end of impl AppSharedState

impl Clone for AppSharedState {
    fn clone(&self) -> Self {
        Self {
            _cfg: self._cfg.clone(),
            _log: self._log.clone(),
            dstore: self.dstore.clone(),
            _notify: self._notify.clone(),
        }
    }
}

pub(crate) fn generate_custom_uid(machine_code: u8) -> Uuid {
    // UUIDv7 suits a single-node application, this service may run on
    // several nodes, so UUIDv8 is applied instead with a custom layout,
    // one byte of the random section carries the machine / node code
    let ts_ctx = NoContext;
    let (secs, nano) = Timestamp::now(ts_ctx).to_unix();
    let millis = (secs * 1000).saturating_add((nano as u64) / 1_000_000);
    let mut node_id = rand::random::<[u8; 10]>();
    node_id[0] = machine_code;
    let builder = Builder::from_unix_timestamp_millis(millis, &node_id);
    builder.into_uuid()
}
