mod dummy;

use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppError;
use crate::logging::AppLogContext;

pub use dummy::AppDummyOrderNotify;

// the real transport belongs to a separate messaging service, the
// only adapter shipped here is the logging dummy
pub(crate) fn app_notify_context(logctx: Arc<AppLogContext>) -> Box<dyn AbstOrderNotify> {
    AppDummyOrderNotify::build(logctx)
}

// outbound message to the counterparty of an order, the transport
// behind this trait belongs to another service
#[async_trait]
pub trait AbstOrderNotify: Send + Sync {
    async fn send_order_message(
        &self,
        from_usr: u32,
        to_usr: u32,
        content: String,
        oid: &str,
    ) -> DefaultResult<(), AppError>;
}
