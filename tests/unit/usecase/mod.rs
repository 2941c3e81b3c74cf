mod create_order;
mod view_order;

use std::result::Result as DefaultResult;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use tokio::sync::Mutex as AsyncMutex;

use mmart_order::error::{AppError, AppErrorCode};
use mmart_order::model::{CartModel, MysteryBoxModel, OrderAccessRole, OrderModel};
use mmart_order::notify::AbstOrderNotify;
use mmart_order::repository::{AbsCartRepo, AbsMysteryBoxRepo, AbsOrderRepo};

pub(super) type UtCreatedOrders = Arc<StdMutex<Vec<OrderModel>>>;
pub(super) type UtSentMessages = Arc<StdMutex<Vec<(u32, u32, String)>>>;
pub(super) type UtCartStore = Arc<AsyncMutex<Option<CartModel>>>;

pub(super) struct MockOrderRepo {
    _saved: AsyncMutex<Option<OrderModel>>,
    _history: AsyncMutex<Vec<OrderModel>>,
    _update_results: AsyncMutex<Vec<DefaultResult<(), AppError>>>,
    _created: UtCreatedOrders,
}

impl MockOrderRepo {
    pub(super) fn build(saved: Option<OrderModel>, created: UtCreatedOrders) -> Self {
        Self {
            _saved: AsyncMutex::new(saved),
            _history: AsyncMutex::new(Vec::new()),
            _update_results: AsyncMutex::new(Vec::new()),
            _created: created,
        }
    }

    pub(super) fn with_history(mut self, history: Vec<OrderModel>) -> Self {
        self._history = AsyncMutex::new(history);
        self
    }

    pub(super) fn with_update_results(
        mut self,
        results: Vec<DefaultResult<(), AppError>>,
    ) -> Self {
        self._update_results = AsyncMutex::new(results);
        self
    }
}

#[async_trait]
impl AbsOrderRepo for MockOrderRepo {
    async fn create(&self, order: OrderModel) -> DefaultResult<(), AppError> {
        self._created.lock().unwrap().push(order);
        Ok(())
    }

    async fn fetch(&self, _oid: &str) -> DefaultResult<Option<OrderModel>, AppError> {
        let guard = self._saved.lock().await;
        Ok(guard.clone())
    }

    async fn update_status(
        &self,
        _updated: &OrderModel,
        _expect_version: u32,
    ) -> DefaultResult<(), AppError> {
        let mut guard = self._update_results.lock().await;
        if guard.is_empty() {
            Ok(())
        } else {
            guard.remove(0)
        }
    }

    async fn fetch_by_user(
        &self,
        _usr_id: u32,
        _role: OrderAccessRole,
    ) -> DefaultResult<Vec<OrderModel>, AppError> {
        let guard = self._history.lock().await;
        Ok(guard.clone())
    }
}

pub(super) struct MockBoxRepo {
    _saved: AsyncMutex<Vec<MysteryBoxModel>>,
}

impl MockBoxRepo {
    pub(super) fn build(saved: Vec<MysteryBoxModel>) -> Self {
        Self {
            _saved: AsyncMutex::new(saved),
        }
    }
}

#[async_trait]
impl AbsMysteryBoxRepo for MockBoxRepo {
    async fn fetch(&self, box_id: &str) -> DefaultResult<Option<MysteryBoxModel>, AppError> {
        let guard = self._saved.lock().await;
        Ok(guard.iter().find(|m| m.id_ == box_id).cloned())
    }

    async fn save(&self, mbox: MysteryBoxModel) -> DefaultResult<(), AppError> {
        let mut guard = self._saved.lock().await;
        guard.retain(|m| m.id_ != mbox.id_);
        guard.push(mbox);
        Ok(())
    }
}

pub(super) struct MockCartRepo {
    _store: UtCartStore,
}

impl MockCartRepo {
    pub(super) fn build(store: UtCartStore) -> Self {
        Self { _store: store }
    }
}

#[async_trait]
impl AbsCartRepo for MockCartRepo {
    async fn update(&self, cart: CartModel) -> DefaultResult<usize, AppError> {
        let num = cart.num_lines();
        let mut guard = self._store.lock().await;
        *guard = Some(cart);
        Ok(num)
    }

    async fn fetch_cart(&self, owner: u32, seq_num: u8) -> DefaultResult<CartModel, AppError> {
        let guard = self._store.lock().await;
        let out = guard
            .clone()
            .unwrap_or_else(|| CartModel::new(owner, seq_num));
        Ok(out)
    }

    async fn num_lines_saved(&self, _owner: u32, _seq_num: u8) -> DefaultResult<usize, AppError> {
        let guard = self._store.lock().await;
        Ok(guard.as_ref().map(|c| c.num_lines()).unwrap_or(0))
    }

    async fn discard(&self, _owner: u32, _seq_num: u8) -> DefaultResult<(), AppError> {
        let mut guard = self._store.lock().await;
        *guard = None;
        Ok(())
    }
}

pub(super) struct MockOrderNotify {
    _sent: UtSentMessages,
    _fail: bool,
}

impl MockOrderNotify {
    pub(super) fn build(sent: UtSentMessages, fail: bool) -> Box<dyn AbstOrderNotify> {
        Box::new(Self { _sent: sent, _fail: fail })
    }
}

#[async_trait]
impl AbstOrderNotify for MockOrderNotify {
    async fn send_order_message(
        &self,
        from_usr: u32,
        to_usr: u32,
        content: String,
        _oid: &str,
    ) -> DefaultResult<(), AppError> {
        if self._fail {
            Err(AppError {
                code: AppErrorCode::Unknown,
                detail: Some("utest".to_string()),
            })
        } else {
            self._sent.lock().unwrap().push((from_usr, to_usr, content));
            Ok(())
        }
    }
}
