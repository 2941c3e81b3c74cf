use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::AppInMemoryDbCfg;
use crate::error::{AppError, AppErrorCode};

// simple implementation of in-memory data storage

// application callers are responsible to maintain the structure
// of each row in each table. Each element of a row is stringified
// regardless of its original type (integer, decimal, timestamp)
type InnerRow = Vec<String>;
type InnerTable = HashMap<String, InnerRow>;
type AllTable = HashMap<String, InnerTable>;
pub type AppInMemUpdateData = AllTable;
pub type AppInMemDeleteInfo = InnerTable; // list of IDs per table
pub type AppInMemFetchKeys = InnerTable; // list of IDs per table
pub type AppInMemFetchedData = AllTable;
pub type AppInMemFetchedSingleTable = InnerTable;
pub type AppInMemFetchedSingleRow = InnerRow;

// the guard locks the entire store, callers must not invoke any other
// datastore operation while holding it
pub struct AppInMemDstoreLock {
    guard: OwnedMutexGuard<AllTable>,
}

pub trait AbsDStoreFilterKeyOp: Send + Sync {
    fn filter(&self, key: &String, row: &Vec<String>) -> bool;
}

#[async_trait]
pub trait AbstInMemoryDStore: Send + Sync {
    async fn create_table(&self, label: &str) -> DefaultResult<(), AppError>;
    async fn save(&self, data: AppInMemUpdateData) -> DefaultResult<usize, AppError>;
    async fn delete(&self, info: AppInMemDeleteInfo) -> DefaultResult<usize, AppError>;
    async fn fetch(&self, info: AppInMemFetchKeys) -> DefaultResult<AppInMemFetchedData, AppError>;
    async fn filter_keys(
        &self,
        tbl_label: String,
        op: &dyn AbsDStoreFilterKeyOp,
    ) -> DefaultResult<Vec<String>, AppError>;
    // read-modify-write cycle for concurrent callers, the pair has to be
    // used together so the rows read cannot be modified in between
    async fn fetch_acquire(
        &self,
        info: AppInMemFetchKeys,
    ) -> DefaultResult<(AppInMemFetchedData, AppInMemDstoreLock), AppError>;
    fn save_release(
        &self,
        data: AppInMemUpdateData,
        lock: AppInMemDstoreLock,
    ) -> DefaultResult<usize, AppError>;
}

pub struct AppInMemoryDStore {
    max_items_per_table: u32,
    table_map: Arc<Mutex<AllTable>>,
}

impl AppInMemoryDStore {
    pub fn new(cfg: &AppInMemoryDbCfg) -> Self {
        Self {
            table_map: Arc::new(Mutex::new(HashMap::new())),
            max_items_per_table: cfg.max_items,
        }
    }

    fn check_capacity(&self, map: &AllTable) -> DefaultResult<(), AppError> {
        let mut invalid = map
            .iter()
            .filter(|(_, table)| self.max_items_per_table as usize <= table.len());
        if let Some((label, _)) = invalid.next() {
            let msg = format!("{}, {}, {}", module_path!(), line!(), label);
            Err(AppError {
                detail: Some(msg),
                code: AppErrorCode::ExceedingMaxLimit,
            })
        } else {
            Ok(())
        }
    }

    fn check_table_existence(map: &AllTable, keys: Vec<&String>) -> DefaultResult<(), AppError> {
        let mut invalid = keys.iter().filter(|label| !map.contains_key(label.as_str()));
        if let Some(d) = invalid.next() {
            Err(AppError {
                detail: Some(d.to_string()),
                code: AppErrorCode::DataTableNotExist,
            })
        } else {
            Ok(())
        }
    }

    fn write_rows(map: &mut AllTable, data: AppInMemUpdateData) -> usize {
        data.into_iter()
            .map(|(label, d_grp)| {
                let cnt = d_grp.len();
                if let Some(table) = map.get_mut(label.as_str()) {
                    d_grp.into_iter().for_each(|(id, row)| {
                        let _old = table.insert(id, row);
                    });
                }
                cnt
            })
            .sum()
    }

    fn read_rows(map: &AllTable, info: AppInMemFetchKeys) -> AppInMemFetchedData {
        let rs_a = info
            .into_iter()
            .filter_map(|(label, ids)| {
                map.get(label.as_str()).map(|table| {
                    let rs_t = ids
                        .into_iter()
                        .filter_map(|id| table.get(id.as_str()).map(|row| (id, row.clone())))
                        .collect::<InnerTable>();
                    (label, rs_t)
                })
            })
            .collect::<Vec<(String, InnerTable)>>();
        HashMap::from_iter(rs_a)
    }
} // end of impl AppInMemoryDStore

#[async_trait]
impl AbstInMemoryDStore for AppInMemoryDStore {
    async fn create_table(&self, label: &str) -> DefaultResult<(), AppError> {
        let mut map = self.table_map.lock().await;
        if !map.contains_key(label) {
            map.insert(label.to_string(), HashMap::new());
        }
        Ok(())
    }

    async fn save(&self, data: AppInMemUpdateData) -> DefaultResult<usize, AppError> {
        let mut map = self.table_map.lock().await;
        let unchecked_labels = data.keys().collect::<Vec<&String>>();
        Self::check_table_existence(&map, unchecked_labels)?;
        self.check_capacity(&map)?;
        let tot_cnt = Self::write_rows(&mut map, data);
        self.check_capacity(&map)?;
        Ok(tot_cnt)
    }

    async fn delete(&self, info: AppInMemDeleteInfo) -> DefaultResult<usize, AppError> {
        let mut map = self.table_map.lock().await;
        let unchecked_labels = info.keys().collect::<Vec<&String>>();
        Self::check_table_existence(&map, unchecked_labels)?;
        let tot_cnt = info
            .iter()
            .map(|(label, ids)| {
                ids.iter()
                    .map(|id| {
                        if let Some(table) = map.get_mut(label.as_str()) {
                            table.remove(id);
                        }
                    })
                    .count()
            })
            .sum();
        Ok(tot_cnt)
    }

    async fn fetch(&self, info: AppInMemFetchKeys) -> DefaultResult<AppInMemFetchedData, AppError> {
        let map = self.table_map.lock().await;
        let unchecked_labels = info.keys().collect::<Vec<&String>>();
        Self::check_table_existence(&map, unchecked_labels)?;
        Ok(Self::read_rows(&map, info))
    }

    async fn filter_keys(
        &self,
        tbl_label: String,
        op: &dyn AbsDStoreFilterKeyOp,
    ) -> DefaultResult<Vec<String>, AppError> {
        let map = self.table_map.lock().await;
        Self::check_table_existence(&map, vec![&tbl_label])?;
        let out = map
            .get(tbl_label.as_str())
            .map(|table| {
                table
                    .iter()
                    .filter(|(key, row)| op.filter(key, row))
                    .map(|(key, _)| key.clone())
                    .collect::<Vec<String>>()
            })
            .unwrap_or_default();
        Ok(out)
    }

    async fn fetch_acquire(
        &self,
        info: AppInMemFetchKeys,
    ) -> DefaultResult<(AppInMemFetchedData, AppInMemDstoreLock), AppError> {
        let guard = self.table_map.clone().lock_owned().await;
        let unchecked_labels = info.keys().collect::<Vec<&String>>();
        Self::check_table_existence(&guard, unchecked_labels)?;
        let data = Self::read_rows(&guard, info);
        Ok((data, AppInMemDstoreLock { guard }))
    }

    fn save_release(
        &self,
        data: AppInMemUpdateData,
        lock: AppInMemDstoreLock,
    ) -> DefaultResult<usize, AppError> {
        let mut guard = lock.guard;
        let unchecked_labels = data.keys().collect::<Vec<&String>>();
        Self::check_table_existence(&guard, unchecked_labels)?;
        self.check_capacity(&guard)?;
        let tot_cnt = Self::write_rows(&mut guard, data);
        self.check_capacity(&guard)?;
        Ok(tot_cnt)
    } // lock dropped on return
} // end of impl AbstInMemoryDStore for AppInMemoryDStore
