use std::result::Result as DefaultResult;

use crate::api::web::dto::{OrderDetailDto, OrderSummaryDto};
use crate::error::AppError;
use crate::model::OrderAccessRole;
use crate::repository::{AbsMysteryBoxRepo, AbsOrderRepo};

pub enum OrderDetailUcOutput {
    Found(Box<OrderDetailDto>),
    NotExist,
    PermissionDeny,
}

pub struct OrderDetailUseCase {
    pub usr_id: u32,
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub repo_box: Box<dyn AbsMysteryBoxRepo>,
}

impl OrderDetailUseCase {
    pub async fn execute(self, oid: String) -> DefaultResult<OrderDetailUcOutput, AppError> {
        let saved = self.repo_order.fetch(oid.as_str()).await?;
        let order = match saved {
            Some(v) => v,
            None => return Ok(OrderDetailUcOutput::NotExist),
        };
        let role = match order.viewer_role(self.usr_id) {
            Some(r) => r,
            None => return Ok(OrderDetailUcOutput::PermissionDeny),
        };
        // the catalog entry may have been retired since checkout, the
        // detail view degrades to the snapshot kept in the order
        let mbox = self.repo_box.fetch(order.box_id.as_str()).await?;
        let (box_title, free_shipping) = match mbox {
            Some(b) => (Some(b.title), b.free_shipping),
            None => (None, false),
        };
        let detail = order.into_detail_dto(role, box_title, free_shipping);
        Ok(OrderDetailUcOutput::Found(Box::new(detail)))
    } // end of fn execute
} // end of impl OrderDetailUseCase

pub struct ListOrdersUseCase {
    pub usr_id: u32,
    pub repo_order: Box<dyn AbsOrderRepo>,
}

impl ListOrdersUseCase {
    pub async fn execute(
        self,
        role: OrderAccessRole,
    ) -> DefaultResult<Vec<OrderSummaryDto>, AppError> {
        let ms = self.repo_order.fetch_by_user(self.usr_id, role).await?;
        let out = ms.into_iter().map(|m| m.into_summary_dto()).collect();
        Ok(out)
    }
}
