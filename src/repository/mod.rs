mod in_mem;

use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AppError, AppErrorCode};
use crate::model::{CartModel, MysteryBoxModel, OrderAccessRole, OrderModel};
use crate::AppDataStoreContext;

use in_mem::{CartInMemRepo, MysteryBoxInMemRepo, OrderInMemRepo};

#[async_trait]
pub trait AbsOrderRepo: Send + Sync {
    async fn create(&self, order: OrderModel) -> DefaultResult<(), AppError>;
    async fn fetch(&self, oid: &str) -> DefaultResult<Option<OrderModel>, AppError>;
    // compare-and-swap against the version recorded in the store,
    // mismatch means another writer won and yields `VersionConflict`
    async fn update_status(
        &self,
        updated: &OrderModel,
        expect_version: u32,
    ) -> DefaultResult<(), AppError>;
    // order history of one user, newest first
    async fn fetch_by_user(
        &self,
        usr_id: u32,
        role: OrderAccessRole,
    ) -> DefaultResult<Vec<OrderModel>, AppError>;
}

// local replica of the catalog owned by the product service
#[async_trait]
pub trait AbsMysteryBoxRepo: Send + Sync {
    async fn fetch(&self, box_id: &str) -> DefaultResult<Option<MysteryBoxModel>, AppError>;
    async fn save(&self, mbox: MysteryBoxModel) -> DefaultResult<(), AppError>;
}

#[async_trait]
pub trait AbsCartRepo: Send + Sync {
    async fn update(&self, cart: CartModel) -> DefaultResult<usize, AppError>;
    async fn fetch_cart(&self, owner: u32, seq_num: u8) -> DefaultResult<CartModel, AppError>;
    async fn num_lines_saved(&self, owner: u32, seq_num: u8) -> DefaultResult<usize, AppError>;
    async fn discard(&self, owner: u32, seq_num: u8) -> DefaultResult<(), AppError>;
}

fn no_datastore_error() -> AppError {
    AppError {
        code: AppErrorCode::MissingDataStore,
        detail: Some("in-mem".to_string()),
    }
}

pub async fn app_repo_order(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsOrderRepo>, AppError> {
    if let Some(m) = &ds.in_mem {
        let obj = OrderInMemRepo::build(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        Err(no_datastore_error())
    }
}

pub async fn app_repo_mystery_box(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsMysteryBoxRepo>, AppError> {
    if let Some(m) = &ds.in_mem {
        let obj = MysteryBoxInMemRepo::build(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        Err(no_datastore_error())
    }
}

pub async fn app_repo_cart(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsCartRepo>, AppError> {
    if let Some(m) = &ds.in_mem {
        let obj = CartInMemRepo::build(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        Err(no_datastore_error())
    }
}
