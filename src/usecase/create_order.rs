use std::result::Result as DefaultResult;
use std::sync::Arc;

use crate::api::web::dto::{
    BoxErrorDto, BoxErrorReason, OrderCreateReqData, OrderCreateRespErrorDto, OrderCreateRespOkDto,
};
use crate::error::AppError;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::OrderModel;
use crate::notify::AbstOrderNotify;
use crate::repository::{AbsMysteryBoxRepo, AbsOrderRepo};

pub enum CreateOrderUcError {
    ReqContent(OrderCreateRespErrorDto),
    Server(AppError),
}

pub struct CreateOrderUseCase {
    pub usr_id: u32,
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub repo_box: Box<dyn AbsMysteryBoxRepo>,
    pub notify: Arc<Box<dyn AbstOrderNotify>>,
    pub logctx: Arc<AppLogContext>,
}

impl CreateOrderUseCase {
    pub async fn execute(
        self,
        req: OrderCreateReqData,
    ) -> DefaultResult<OrderCreateRespOkDto, CreateOrderUcError> {
        let mbox = self
            .repo_box
            .fetch(req.box_id.as_str())
            .await
            .map_err(CreateOrderUcError::Server)?;
        let mbox = match mbox {
            Some(v) => v,
            None => {
                let e = OrderCreateRespErrorDto {
                    box_: Some(BoxErrorDto {
                        reason: BoxErrorReason::NotExist,
                    }),
                    ..Default::default()
                };
                return Err(CreateOrderUcError::ReqContent(e));
            }
        };
        let order = OrderModel::try_from_checkout(self.usr_id, req, &mbox)
            .map_err(CreateOrderUcError::ReqContent)?;
        self.repo_order
            .create(order.clone())
            .await
            .map_err(CreateOrderUcError::Server)?;
        let content = order.compose_summary(mbox.title.as_str());
        let result = self
            .notify
            .send_order_message(order.buyer_id, order.seller_id, content, order.id_.as_str())
            .await;
        if let Err(e) = result {
            // the message is best-effort, the persisted order stays valid
            let logctx = &self.logctx;
            app_log_event!(
                logctx,
                AppLogLevel::WARNING,
                "order:{}, notify failure:{}",
                order.id_.as_str(),
                e
            );
        }
        Ok(OrderCreateRespOkDto {
            order_id: order.id_,
            time: order.create_time.timestamp() as u64,
        })
    } // end of fn execute
} // end of impl CreateOrderUseCase
