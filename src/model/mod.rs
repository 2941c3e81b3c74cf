mod cart;
mod mystery_box;
mod order;

pub use cart::{CartLineModel, CartModel};
pub use mystery_box::{BoxStatus, MysteryBoxModel};
pub use order::{
    FulfillmentNoteModel, OrderAccessRole, OrderModel, OrderStatus, OrderTimelineModel,
    OrderTotalsModel, PaymentMethodModel, PaymentModel, ShippingAddressModel, TimelineStepState,
    TransitionDenyReason,
};
