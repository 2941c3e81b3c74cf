use std::cmp::min;
use std::result::Result as DefaultResult;

use chrono::{DateTime, FixedOffset, Local};
use regex::Regex;
use rust_decimal::Decimal;

use crate::api::dto::{CryptoCurrencyDto, OrderStatusDto, PhoneNumberDto};
use crate::api::web::dto::{
    BoxErrorDto, BoxErrorReason, ContactErrorReason, FulfillmentDto, OrderCreateReqData,
    OrderCreateRespErrorDto, OrderDetailDto, OrderRoleDto, OrderSummaryDto, OrderTotalsDto,
    PaymentErrorDto, PaymentErrorReason, PaymentRespDto, PhoneNumNationErrorReason,
    PhoneNumberErrorDto, QuantityErrorDto, ShippingErrorDto, ShippingReqDto, TimelineDto,
    TimelineStepDto, TimelineStepStateDto,
};
use crate::constant::{checkout as CheckoutConst, hard_limit, REGEX_EMAIL_RFC5322};

use super::MysteryBoxModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Disputed,
}

impl OrderStatus {
    pub const HAPPY_PATH: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
    ];

    // position on the happy path, branch states return None
    pub fn happy_index(&self) -> Option<usize> {
        Self::HAPPY_PATH.iter().position(|s| s == self)
    }

    pub fn next_forward(&self) -> Option<Self> {
        self.happy_index()
            .and_then(|idx| Self::HAPPY_PATH.get(idx + 1).copied())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Disputed => "disputed",
        }
    }

    pub(crate) fn try_from_str(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "processing" => Some(Self::Processing),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            "disputed" => Some(Self::Disputed),
            _others => None,
        }
    }
} // end of impl OrderStatus

impl From<OrderStatusDto> for OrderStatus {
    fn from(value: OrderStatusDto) -> Self {
        match value {
            OrderStatusDto::Pending => Self::Pending,
            OrderStatusDto::Confirmed => Self::Confirmed,
            OrderStatusDto::Processing => Self::Processing,
            OrderStatusDto::Shipped => Self::Shipped,
            OrderStatusDto::Delivered => Self::Delivered,
            OrderStatusDto::Cancelled => Self::Cancelled,
            OrderStatusDto::Disputed => Self::Disputed,
        }
    }
}
impl From<OrderStatus> for OrderStatusDto {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Pending => Self::Pending,
            OrderStatus::Confirmed => Self::Confirmed,
            OrderStatus::Processing => Self::Processing,
            OrderStatus::Shipped => Self::Shipped,
            OrderStatus::Delivered => Self::Delivered,
            OrderStatus::Cancelled => Self::Cancelled,
            OrderStatus::Disputed => Self::Disputed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAccessRole {
    Buyer,
    Seller,
}

impl From<OrderAccessRole> for OrderRoleDto {
    fn from(value: OrderAccessRole) -> Self {
        match value {
            OrderAccessRole::Buyer => Self::Buyer,
            OrderAccessRole::Seller => Self::Seller,
        }
    }
}
impl From<OrderRoleDto> for OrderAccessRole {
    fn from(value: OrderRoleDto) -> Self {
        match value {
            OrderRoleDto::Buyer => Self::Buyer,
            OrderRoleDto::Seller => Self::Seller,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDenyReason {
    TerminalState,
    NotNextStep,
    SellerOnly,
    BuyerCancelWindowClosed,
    TrackingNumberRequired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethodModel {
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

impl PaymentMethodModel {
    pub fn try_from_req(
        data: &crate::api::web::dto::PaymentMethodReqDto,
        mbox: &MysteryBoxModel,
    ) -> DefaultResult<Self, PaymentErrorDto> {
        use crate::api::web::dto::PaymentMethodReqDto as ReqDto;
        match data {
            ReqDto::Cod { phone } => {
                if phone.is_empty() {
                    Err(PaymentErrorDto {
                        reason: PaymentErrorReason::PhoneMissing,
                    })
                } else if !phone.chars().all(|c| c.is_ascii_digit()) {
                    Err(PaymentErrorDto {
                        reason: PaymentErrorReason::PhoneInvalidChar,
                    })
                } else {
                    Ok(Self::Cod {
                        phone: phone.clone(),
                        est_delivery_days: CheckoutConst::COD_EST_DELIVERY_DAYS,
                    })
                }
            }
            ReqDto::Crypto {
                currency,
                wallet_address,
            } => {
                if wallet_address.is_empty() {
                    Err(PaymentErrorDto {
                        reason: PaymentErrorReason::WalletMissing,
                    })
                } else if let Some(swallet) = mbox.wallet_for(*currency) {
                    Ok(Self::Crypto {
                        currency: *currency,
                        buyer_wallet: wallet_address.clone(),
                        seller_wallet: swallet.to_string(),
                    })
                } else {
                    Err(PaymentErrorDto {
                        reason: PaymentErrorReason::SellerWalletUnsupported,
                    })
                }
            }
        }
    } // end of fn try_from_req
} // end of impl PaymentMethodModel

impl From<PaymentMethodModel> for PaymentRespDto {
    fn from(value: PaymentMethodModel) -> Self {
        match value {
            PaymentMethodModel::Cod {
                phone,
                est_delivery_days,
            } => Self::Cod {
                phone,
                est_delivery_days,
            },
            PaymentMethodModel::Crypto {
                currency,
                buyer_wallet,
                seller_wallet,
            } => Self::Crypto {
                currency,
                buyer_wallet,
                seller_wallet,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentModel {
    pub amount: Decimal,
    pub method: PaymentMethodModel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShippingAddressModel {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: PhoneNumberDto,
    pub country: String,
    pub city: String,
    pub street: String,
    pub detail: String,
}

impl ShippingAddressModel {
    fn check_name(value: &str) -> Option<ContactErrorReason> {
        if value.is_empty() {
            Some(ContactErrorReason::Empty)
        } else if value.chars().any(|c| !c.is_alphabetic()) {
            Some(ContactErrorReason::InvalidChar)
        } else {
            None
        }
    }

    fn check_email(value: &str) -> Option<ContactErrorReason> {
        if value.is_empty() {
            return Some(ContactErrorReason::Empty);
        }
        // the regex pattern is a constant verified at development time
        let re = Regex::new(REGEX_EMAIL_RFC5322).unwrap();
        match re.find(value) {
            Some(m) => {
                if m.start() == 0 && m.end() == value.len() {
                    None
                } else {
                    Some(ContactErrorReason::InvalidChar)
                }
            }
            None => Some(ContactErrorReason::InvalidChar),
        }
    }

    fn check_phone(value: &PhoneNumberDto) -> Option<PhoneNumberErrorDto> {
        let nation_err = if (1..=999).contains(&value.nation) {
            None
        } else {
            Some(PhoneNumNationErrorReason::InvalidCode)
        };
        let number_err = if value.number.is_empty() {
            Some(ContactErrorReason::Empty)
        } else if !value.number.chars().all(|c| c.is_ascii_digit()) {
            Some(ContactErrorReason::InvalidChar)
        } else {
            None
        };
        if nation_err.is_some() || number_err.is_some() {
            Some(PhoneNumberErrorDto {
                nation: nation_err,
                number: number_err,
            })
        } else {
            None
        }
    }

    fn check_addr_field(value: &str) -> Option<ContactErrorReason> {
        if value.trim().is_empty() {
            Some(ContactErrorReason::Empty)
        } else if value.chars().any(char::is_control) {
            Some(ContactErrorReason::InvalidChar)
        } else {
            None
        }
    }
} // end of impl ShippingAddressModel

impl TryFrom<ShippingReqDto> for ShippingAddressModel {
    type Error = ShippingErrorDto;

    fn try_from(value: ShippingReqDto) -> DefaultResult<Self, Self::Error> {
        let error = ShippingErrorDto {
            first_name: Self::check_name(value.first_name.as_str()),
            last_name: Self::check_name(value.last_name.as_str()),
            email: Self::check_email(value.email.as_str()),
            phone: Self::check_phone(&value.phone),
            country: Self::check_addr_field(value.country.as_str()),
            city: Self::check_addr_field(value.city.as_str()),
            street: Self::check_addr_field(value.street.as_str()),
            detail: Self::check_addr_field(value.detail.as_str()),
        };
        let any_err = error.first_name.is_some()
            || error.last_name.is_some()
            || error.email.is_some()
            || error.phone.is_some()
            || error.country.is_some()
            || error.city.is_some()
            || error.street.is_some()
            || error.detail.is_some();
        if any_err {
            Err(error)
        } else {
            Ok(Self {
                first_name: value.first_name,
                last_name: value.last_name,
                email: value.email,
                phone: value.phone,
                country: value.country,
                city: value.city,
                street: value.street,
                detail: value.detail,
            })
        }
    } // end of fn try_from
} // end of impl TryFrom for ShippingAddressModel

impl From<ShippingAddressModel> for ShippingReqDto {
    fn from(value: ShippingAddressModel) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            phone: value.phone,
            country: value.country,
            city: value.city,
            street: value.street,
            detail: value.detail,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FulfillmentNoteModel {
    pub tracking_number: Option<String>,
    pub note: Option<String>,
    pub updated_by: Option<u32>,
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl From<FulfillmentNoteModel> for FulfillmentDto {
    fn from(value: FulfillmentNoteModel) -> Self {
        Self {
            tracking_number: value.tracking_number,
            note: value.note,
            updated_by: value.updated_by,
            updated_at: value.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineStepState {
    Completed,
    Current,
    Upcoming,
}

impl From<TimelineStepState> for TimelineStepStateDto {
    fn from(value: TimelineStepState) -> Self {
        match value {
            TimelineStepState::Completed => Self::Completed,
            TimelineStepState::Current => Self::Current,
            TimelineStepState::Upcoming => Self::Upcoming,
        }
    }
}

pub struct OrderTimelineModel {
    pub steps: Vec<(OrderStatus, TimelineStepState)>,
    pub branch: Option<OrderStatus>,
}

impl From<OrderTimelineModel> for TimelineDto {
    fn from(value: OrderTimelineModel) -> Self {
        let steps = value
            .steps
            .into_iter()
            .map(|(status, state)| TimelineStepDto {
                status: status.into(),
                state: state.into(),
            })
            .collect();
        Self {
            steps,
            branch: value.branch.map(OrderStatusDto::from),
        }
    }
}

pub struct OrderTotalsModel {
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
}

impl From<OrderTotalsModel> for OrderTotalsDto {
    fn from(value: OrderTotalsModel) -> Self {
        Self {
            subtotal: value.subtotal,
            shipping_cost: value.shipping_cost,
            total: value.total,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderModel {
    pub id_: String,
    pub box_id: String,
    pub buyer_id: u32,
    pub seller_id: u32,
    pub quantity: u32,
    pub status: OrderStatus,
    // furthest happy-path stage ever reached, kept separately so the
    // timeline of a cancelled or disputed order still shows where the
    // interruption happened
    pub progress: OrderStatus,
    pub payment: PaymentModel,
    pub shipping: ShippingAddressModel,
    pub fulfillment: FulfillmentNoteModel,
    pub create_time: DateTime<FixedOffset>,
    pub last_update: DateTime<FixedOffset>,
    pub version: u32,
}

impl OrderModel {
    pub fn generate_id(machine_code: u8) -> String {
        let oid = crate::generate_custom_uid(machine_code);
        oid.simple().to_string()
    }

    pub fn try_from_checkout(
        buyer_id: u32,
        data: OrderCreateReqData,
        mbox: &MysteryBoxModel,
    ) -> DefaultResult<Self, OrderCreateRespErrorDto> {
        let mut error = OrderCreateRespErrorDto::default();
        if mbox.seller_id == buyer_id {
            error.box_ = Some(BoxErrorDto {
                reason: BoxErrorReason::SelfPurchase,
            });
        } else if !mbox.purchasable() {
            error.box_ = Some(BoxErrorDto {
                reason: BoxErrorReason::NotActive,
            });
        }
        let max_q = min(mbox.quantity, hard_limit::MAX_ORDER_QUANTITY_PER_REQ);
        if data.quantity == 0 || data.quantity > max_q {
            error.quantity = Some(QuantityErrorDto {
                max_: max_q,
                given: data.quantity,
            });
        }
        let shipping = match ShippingAddressModel::try_from(data.shipping) {
            Ok(v) => Some(v),
            Err(e) => {
                error.shipping = Some(e);
                None
            }
        };
        let method = match PaymentMethodModel::try_from_req(&data.payment, mbox) {
            Ok(v) => Some(v),
            Err(e) => {
                error.payment = Some(e);
                None
            }
        };
        let any_err = error.box_.is_some() || error.quantity.is_some();
        if let (false, Some(shipping), Some(method)) = (any_err, shipping, method) {
            let amount = mbox.price * Decimal::from(data.quantity);
            let now = Local::now().fixed_offset();
            Ok(Self {
                id_: Self::generate_id(crate::constant::app_meta::MACHINE_CODE),
                box_id: data.box_id,
                buyer_id,
                seller_id: mbox.seller_id,
                quantity: data.quantity,
                status: OrderStatus::Pending,
                progress: OrderStatus::Pending,
                payment: PaymentModel { amount, method },
                shipping,
                fulfillment: FulfillmentNoteModel::default(),
                create_time: now,
                last_update: now,
                version: 0,
            })
        } else {
            Err(error)
        }
    } // end of fn try_from_checkout

    pub fn viewer_role(&self, usr_id: u32) -> Option<OrderAccessRole> {
        if usr_id == self.buyer_id {
            Some(OrderAccessRole::Buyer)
        } else if usr_id == self.seller_id {
            Some(OrderAccessRole::Seller)
        } else {
            None
        }
    }

    pub fn validate_transition(
        &self,
        role: OrderAccessRole,
        target: OrderStatus,
        tracking: Option<&str>,
    ) -> DefaultResult<(), TransitionDenyReason> {
        if self.status.is_terminal() {
            return Err(TransitionDenyReason::TerminalState);
        }
        match target {
            OrderStatus::Cancelled => match role {
                OrderAccessRole::Seller => Ok(()),
                OrderAccessRole::Buyer => {
                    if matches!(self.status, OrderStatus::Pending) {
                        Ok(())
                    } else {
                        Err(TransitionDenyReason::BuyerCancelWindowClosed)
                    }
                }
            },
            OrderStatus::Disputed => {
                // either party may open a dispute, but not twice
                if matches!(self.status, OrderStatus::Disputed) {
                    Err(TransitionDenyReason::NotNextStep)
                } else {
                    Ok(())
                }
            }
            OrderStatus::Pending => Err(TransitionDenyReason::NotNextStep),
            _forward => {
                if matches!(role, OrderAccessRole::Buyer) {
                    Err(TransitionDenyReason::SellerOnly)
                } else if self.status.next_forward() != Some(target) {
                    Err(TransitionDenyReason::NotNextStep)
                } else if matches!(target, OrderStatus::Shipped)
                    && tracking.filter(|t| !t.is_empty()).is_none()
                    && self.fulfillment.tracking_number.is_none()
                {
                    Err(TransitionDenyReason::TrackingNumberRequired)
                } else {
                    Ok(())
                }
            }
        }
    } // end of fn validate_transition

    pub fn apply_transition(
        &mut self,
        usr_id: u32,
        target: OrderStatus,
        tracking: Option<String>,
        note: Option<String>,
    ) {
        let now = Local::now().fixed_offset();
        self.status = target;
        if target.happy_index().is_some() {
            self.progress = target;
        }
        if tracking.is_some() {
            self.fulfillment.tracking_number = tracking;
        }
        if note.is_some() {
            self.fulfillment.note = note;
        }
        self.fulfillment.updated_by = Some(usr_id);
        self.fulfillment.updated_at = Some(now);
        self.last_update = now;
        self.version += 1;
    }

    pub fn timeline(&self) -> OrderTimelineModel {
        let branch = match self.status {
            OrderStatus::Cancelled | OrderStatus::Disputed => Some(self.status),
            _on_happy_path => None,
        };
        let reached = self.progress.happy_index().unwrap_or(0);
        let steps = OrderStatus::HAPPY_PATH
            .iter()
            .enumerate()
            .map(|(idx, s)| {
                let state = if branch.is_some() {
                    if idx <= reached {
                        TimelineStepState::Completed
                    } else {
                        TimelineStepState::Upcoming
                    }
                } else if idx < reached {
                    TimelineStepState::Completed
                } else if idx == reached {
                    TimelineStepState::Current
                } else {
                    TimelineStepState::Upcoming
                };
                (*s, state)
            })
            .collect::<Vec<_>>();
        OrderTimelineModel { steps, branch }
    } // end of fn timeline

    pub fn totals(&self, free_shipping: bool) -> OrderTotalsModel {
        let subtotal = self.payment.amount;
        let shipping_cost = if free_shipping {
            Decimal::ZERO
        } else {
            let (mantissa, scale) = CheckoutConst::FLAT_SHIPPING_FEE;
            Decimal::new(mantissa, scale)
        };
        OrderTotalsModel {
            subtotal,
            shipping_cost,
            total: subtotal + shipping_cost,
        }
    }

    pub fn compose_summary(&self, box_title: &str) -> String {
        let paym_desc = match &self.payment.method {
            PaymentMethodModel::Cod {
                phone,
                est_delivery_days,
            } => format!(
                "cash on delivery, contact {}, estimated within {} days",
                phone, est_delivery_days
            ),
            PaymentMethodModel::Crypto {
                currency,
                buyer_wallet,
                ..
            } => format!("{} from wallet {}", currency.label(), buyer_wallet),
        };
        format!(
            "new order {} : {} x {}, amount {}, payment: {}, ship to {} {}, {}, {}, {}",
            self.id_,
            self.quantity,
            box_title,
            self.payment.amount,
            paym_desc,
            self.shipping.first_name,
            self.shipping.last_name,
            self.shipping.street,
            self.shipping.city,
            self.shipping.country,
        )
    } // end of fn compose_summary

    pub fn into_detail_dto(
        self,
        viewer: OrderAccessRole,
        box_title: Option<String>,
        free_shipping: bool,
    ) -> OrderDetailDto {
        let timeline = self.timeline().into();
        let totals = self.totals(free_shipping).into();
        OrderDetailDto {
            order_id: self.id_,
            box_id: self.box_id,
            box_title,
            buyer_id: self.buyer_id,
            seller_id: self.seller_id,
            quantity: self.quantity,
            status: self.status.into(),
            amount: self.payment.amount,
            payment: self.payment.method.into(),
            shipping: self.shipping.into(),
            fulfillment: self.fulfillment.into(),
            timeline,
            totals,
            viewer_role: viewer.into(),
            create_time: self.create_time.to_rfc3339(),
            last_update: self.last_update.to_rfc3339(),
        }
    }

    pub fn into_summary_dto(self) -> OrderSummaryDto {
        OrderSummaryDto {
            order_id: self.id_,
            box_id: self.box_id,
            quantity: self.quantity,
            status: self.status.into(),
            amount: self.payment.amount,
            create_time: self.create_time.to_rfc3339(),
        }
    }
} // end of impl OrderModel
