mod in_mem;

use std::boxed::Box;
use std::sync::Arc;

use crate::config::AppDataStoreCfg;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};

pub use in_mem::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemDeleteInfo, AppInMemDstoreLock,
    AppInMemFetchKeys, AppInMemFetchedData, AppInMemFetchedSingleRow, AppInMemFetchedSingleTable,
    AppInMemUpdateData, AppInMemoryDStore,
};

pub(crate) fn build_context(
    logctx: Arc<AppLogContext>,
    cfg: &Vec<AppDataStoreCfg>,
) -> Option<Box<dyn AbstInMemoryDStore>> {
    let mut inmem = None;
    for c in cfg {
        match c {
            AppDataStoreCfg::InMemory(d) => {
                app_log_event!(
                    logctx,
                    AppLogLevel::DEBUG,
                    "in-memory datastore, max items per table : {}",
                    d.max_items
                );
                let item: Box<dyn AbstInMemoryDStore> = Box::new(AppInMemoryDStore::new(d));
                inmem = Some(item);
            }
        }
    }
    inmem
}
