use std::result::Result as DefaultResult;
use std::sync::Arc;

use crate::api::web::dto::CartDto;
use crate::constant::hard_limit;
use crate::error::AppError;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::repository::{AbsCartRepo, AbsMysteryBoxRepo};

pub enum ModifyCartLinesUcOutput {
    Success(usize),
    ExceedLimit(usize),
}

pub struct ModifyCartLinesUseCase {
    pub usr_id: u32,
    pub repo_cart: Box<dyn AbsCartRepo>,
    pub repo_box: Box<dyn AbsMysteryBoxRepo>,
    pub logctx: Arc<AppLogContext>,
}

impl ModifyCartLinesUseCase {
    pub async fn execute(
        self,
        seq_num: u8,
        data: CartDto,
    ) -> DefaultResult<ModifyCartLinesUcOutput, AppError> {
        let mut cart = self.repo_cart.fetch_cart(self.usr_id, seq_num).await?;
        cart.update(data);
        let limit = hard_limit::MAX_CART_LINES_PER_USER;
        if cart.num_lines() > limit {
            return Ok(ModifyCartLinesUcOutput::ExceedLimit(limit));
        }
        // staging is permissive, stock shortage only gets a warning here,
        // the hard check happens at checkout
        for line in cart.saved_lines.iter() {
            if let Some(mbox) = self.repo_box.fetch(line.box_id.as_str()).await? {
                if line.quantity > mbox.quantity {
                    let logctx = &self.logctx;
                    app_log_event!(
                        logctx,
                        AppLogLevel::WARNING,
                        "usr:{}, box:{}, staged:{}, in-stock:{}",
                        self.usr_id,
                        line.box_id.as_str(),
                        line.quantity,
                        mbox.quantity
                    );
                }
            }
        }
        let num_saved = self.repo_cart.update(cart).await?;
        Ok(ModifyCartLinesUcOutput::Success(num_saved))
    } // end of fn execute
} // end of impl ModifyCartLinesUseCase

pub struct RetrieveCartUseCase {
    pub usr_id: u32,
    pub repo_cart: Box<dyn AbsCartRepo>,
}

impl RetrieveCartUseCase {
    pub async fn execute(self, seq_num: u8) -> DefaultResult<CartDto, AppError> {
        let cart = self.repo_cart.fetch_cart(self.usr_id, seq_num).await?;
        Ok(cart.into())
    }
}

pub struct DiscardCartUseCase {
    pub usr_id: u32,
    pub repo_cart: Box<dyn AbsCartRepo>,
}

impl DiscardCartUseCase {
    pub async fn execute(self, seq_num: u8) -> DefaultResult<(), AppError> {
        self.repo_cart.discard(self.usr_id, seq_num).await
    }
}
