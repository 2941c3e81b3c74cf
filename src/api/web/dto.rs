use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::dto::{CryptoCurrencyDto, OrderStatusDto, PhoneNumberDto};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ShippingReqDto {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: PhoneNumberDto,
    pub country: String,
    pub city: String,
    pub street: String,
    pub detail: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum PaymentMethodReqDto {
    Cod { phone: String },
    Crypto { currency: CryptoCurrencyDto, wallet_address: String },
}

#[derive(Deserialize)]
pub struct OrderCreateReqData {
    pub box_id: String,
    pub quantity: u32,
    pub shipping: ShippingReqDto,
    pub payment: PaymentMethodReqDto,
}

#[derive(Serialize)]
pub struct OrderCreateRespOkDto {
    pub order_id: String,
    pub time: u64,
}

#[derive(Serialize, Debug, PartialEq)]
pub enum BoxErrorReason {
    NotExist,
    NotActive,
    SelfPurchase,
}

#[derive(Serialize, Debug)]
pub struct BoxErrorDto {
    pub reason: BoxErrorReason,
}

#[derive(Serialize, Debug)]
pub struct QuantityErrorDto {
    pub max_: u32,
    pub given: u32,
}

#[derive(Serialize, Debug, PartialEq)]
pub enum ContactErrorReason {
    Empty,
    InvalidChar,
}

#[derive(Serialize, Debug, PartialEq)]
pub enum PhoneNumNationErrorReason {
    InvalidCode,
}

#[derive(Serialize, Debug)]
pub struct PhoneNumberErrorDto {
    pub nation: Option<PhoneNumNationErrorReason>,
    pub number: Option<ContactErrorReason>,
}

#[derive(Serialize, Debug)]
pub struct ShippingErrorDto {
    pub first_name: Option<ContactErrorReason>,
    pub last_name: Option<ContactErrorReason>,
    pub email: Option<ContactErrorReason>,
    pub phone: Option<PhoneNumberErrorDto>,
    pub country: Option<ContactErrorReason>,
    pub city: Option<ContactErrorReason>,
    pub street: Option<ContactErrorReason>,
    pub detail: Option<ContactErrorReason>,
}

#[derive(Serialize, Debug, PartialEq)]
pub enum PaymentErrorReason {
    PhoneMissing,
    PhoneInvalidChar,
    WalletMissing,
    SellerWalletUnsupported,
}

#[derive(Serialize, Debug)]
pub struct PaymentErrorDto {
    pub reason: PaymentErrorReason,
}

#[derive(Serialize, Debug, Default)]
pub struct OrderCreateRespErrorDto {
    #[serde(rename = "box")]
    pub box_: Option<BoxErrorDto>,
    pub quantity: Option<QuantityErrorDto>,
    pub shipping: Option<ShippingErrorDto>,
    pub payment: Option<PaymentErrorDto>,
}

#[derive(Deserialize)]
pub struct OrderStatusUpdateReqDto {
    pub new_status: OrderStatusDto,
    pub tracking_number: Option<String>,
    pub note: Option<String>,
}

#[derive(Serialize, Debug, PartialEq)]
pub enum StatusUpdateErrorReason {
    TerminalState,
    NotNextStep,
    TrackingNumberRequired,
}

#[derive(Serialize, Debug)]
pub struct StatusUpdateErrorDto {
    pub reason: StatusUpdateErrorReason,
    pub current: Option<OrderStatusDto>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OrderRoleDto {
    Buyer,
    Seller,
}

#[derive(Deserialize)]
pub struct OrderListQueryDto {
    pub role: Option<OrderRoleDto>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TimelineStepStateDto {
    Completed,
    Current,
    Upcoming,
}

#[derive(Serialize, Debug)]
pub struct TimelineStepDto {
    pub status: OrderStatusDto,
    pub state: TimelineStepStateDto,
}

#[derive(Serialize, Debug)]
pub struct TimelineDto {
    pub steps: Vec<TimelineStepDto>,
    pub branch: Option<OrderStatusDto>,
}

#[derive(Serialize, Debug)]
pub struct OrderTotalsDto {
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
}

#[derive(Serialize, Debug)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum PaymentRespDto {
    Cod {
        phone: String,
        est_delivery_days: u8,
    },
    Crypto {
        currency: CryptoCurrencyDto,
        buyer_wallet: String,
        seller_wallet: String,
    },
}

#[derive(Serialize, Debug)]
pub struct FulfillmentDto {
    pub tracking_number: Option<String>,
    pub note: Option<String>,
    pub updated_by: Option<u32>,
    pub updated_at: Option<String>,
}

#[derive(Serialize)]
pub struct OrderDetailDto {
    pub order_id: String,
    pub box_id: String,
    pub box_title: Option<String>,
    pub buyer_id: u32,
    pub seller_id: u32,
    pub quantity: u32,
    pub status: OrderStatusDto,
    pub amount: Decimal,
    pub payment: PaymentRespDto,
    pub shipping: ShippingReqDto,
    pub fulfillment: FulfillmentDto,
    pub timeline: TimelineDto,
    pub totals: OrderTotalsDto,
    pub viewer_role: OrderRoleDto,
    pub create_time: String,
    pub last_update: String,
}

#[derive(Serialize)]
pub struct OrderSummaryDto {
    pub order_id: String,
    pub box_id: String,
    pub quantity: u32,
    pub status: OrderStatusDto,
    pub amount: Decimal,
    pub create_time: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CartLineDto {
    pub box_id: String,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub added_at: Option<DateTime<FixedOffset>>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CartDto {
    pub title: String,
    pub lines: Vec<CartLineDto>,
}
