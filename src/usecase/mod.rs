mod create_order;
mod manage_cart;
mod update_status;
mod view_order;

pub use create_order::{CreateOrderUcError, CreateOrderUseCase};
pub use manage_cart::{
    DiscardCartUseCase, ModifyCartLinesUcOutput, ModifyCartLinesUseCase, RetrieveCartUseCase,
};
pub use update_status::{OrderStatusUpdateUcOutput, OrderStatusUpdateUseCase};
pub use view_order::{ListOrdersUseCase, OrderDetailUcOutput, OrderDetailUseCase};
