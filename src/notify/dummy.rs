use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppError;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};

use super::AbstOrderNotify;

// placeholder adapter for local development and test, it only records
// the message to the log stream
pub struct AppDummyOrderNotify {
    logctx: Arc<AppLogContext>,
}

impl AppDummyOrderNotify {
    pub fn build(logctx: Arc<AppLogContext>) -> Box<dyn AbstOrderNotify> {
        Box::new(Self { logctx })
    }
}

#[async_trait]
impl AbstOrderNotify for AppDummyOrderNotify {
    async fn send_order_message(
        &self,
        from_usr: u32,
        to_usr: u32,
        content: String,
        oid: &str,
    ) -> DefaultResult<(), AppError> {
        let logctx = &self.logctx;
        app_log_event!(
            logctx,
            AppLogLevel::INFO,
            "order:{}, from:{}, to:{}, content:{}",
            oid,
            from_usr,
            to_usr,
            content
        );
        Ok(())
    }
}
