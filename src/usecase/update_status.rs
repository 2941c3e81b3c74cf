use std::result::Result as DefaultResult;
use std::sync::Arc;

use crate::api::web::dto::{
    OrderStatusUpdateReqDto, StatusUpdateErrorDto, StatusUpdateErrorReason,
};
use crate::error::{AppError, AppErrorCode};
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::{OrderAccessRole, OrderStatus, TransitionDenyReason};
use crate::notify::AbstOrderNotify;
use crate::repository::AbsOrderRepo;

pub enum OrderStatusUpdateUcOutput {
    Success,
    NotExist,
    PermissionDeny,
    InvalidTransition(StatusUpdateErrorDto),
    VersionConflict,
}

pub struct OrderStatusUpdateUseCase {
    pub usr_id: u32,
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub notify: Arc<Box<dyn AbstOrderNotify>>,
    pub logctx: Arc<AppLogContext>,
}

impl OrderStatusUpdateUseCase {
    pub async fn execute(
        self,
        oid: String,
        req: OrderStatusUpdateReqDto,
    ) -> DefaultResult<OrderStatusUpdateUcOutput, AppError> {
        let saved = self.repo_order.fetch(oid.as_str()).await?;
        let mut order = match saved {
            Some(v) => v,
            None => return Ok(OrderStatusUpdateUcOutput::NotExist),
        };
        let role = match order.viewer_role(self.usr_id) {
            Some(r) => r,
            None => return Ok(OrderStatusUpdateUcOutput::PermissionDeny),
        };
        let target = OrderStatus::from(req.new_status);
        let tracking = req.tracking_number.filter(|t| !t.is_empty());
        if let Err(deny) = order.validate_transition(role, target, tracking.as_deref()) {
            // role violations are access denials, not malformed transitions
            let reason = match deny {
                TransitionDenyReason::SellerOnly
                | TransitionDenyReason::BuyerCancelWindowClosed => {
                    return Ok(OrderStatusUpdateUcOutput::PermissionDeny)
                }
                TransitionDenyReason::TerminalState => StatusUpdateErrorReason::TerminalState,
                TransitionDenyReason::NotNextStep => StatusUpdateErrorReason::NotNextStep,
                TransitionDenyReason::TrackingNumberRequired => {
                    StatusUpdateErrorReason::TrackingNumberRequired
                }
            };
            let e = StatusUpdateErrorDto {
                reason,
                current: Some(order.status.into()),
            };
            return Ok(OrderStatusUpdateUcOutput::InvalidTransition(e));
        }
        let expect_version = order.version;
        order.apply_transition(self.usr_id, target, tracking, req.note);
        match self.repo_order.update_status(&order, expect_version).await {
            Ok(()) => {
                self.notify_counterpart(&order, role, target).await;
                Ok(OrderStatusUpdateUcOutput::Success)
            }
            Err(e) if matches!(e.code, AppErrorCode::VersionConflict) => {
                Ok(OrderStatusUpdateUcOutput::VersionConflict)
            }
            Err(e) if matches!(e.code, AppErrorCode::OrderNotExist) => {
                Ok(OrderStatusUpdateUcOutput::NotExist)
            }
            Err(e) => Err(e),
        }
    } // end of fn execute

    async fn notify_counterpart(
        &self,
        order: &crate::model::OrderModel,
        role: OrderAccessRole,
        target: OrderStatus,
    ) {
        let to_usr = match role {
            OrderAccessRole::Buyer => order.seller_id,
            OrderAccessRole::Seller => order.buyer_id,
        };
        let content = format!("order {} moved to {}", order.id_, target.as_str());
        let result = self
            .notify
            .send_order_message(self.usr_id, to_usr, content, order.id_.as_str())
            .await;
        if let Err(e) = result {
            let logctx = &self.logctx;
            app_log_event!(
                logctx,
                AppLogLevel::WARNING,
                "order:{}, notify failure:{}",
                order.id_.as_str(),
                e
            );
        }
    }
} // end of impl OrderStatusUpdateUseCase
