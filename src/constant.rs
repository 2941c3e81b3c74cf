pub mod app_meta {
    pub const LABEL: &str = "mmart-order";
    pub const MACHINE_CODE: u8 = 1;
    // TODO, machine code to UUID generator should be configurable
}

pub const ENV_VAR_SYS_BASE_PATH: &str = "SYS_BASE_PATH";
pub const ENV_VAR_SERVICE_BASE_PATH: &str = "SERVICE_BASE_PATH";
pub const ENV_VAR_CONFIG_FILE_PATH: &str = "CONFIG_FILE_PATH";

pub const EXPECTED_ENV_VAR_LABELS: [&str; 3] = [
    ENV_VAR_SYS_BASE_PATH,
    ENV_VAR_SERVICE_BASE_PATH,
    ENV_VAR_CONFIG_FILE_PATH,
];

pub mod hard_limit {
    pub const MAX_ITEMS_STORED_PER_MODEL: u32 = 2200u32;
    pub const MAX_ORDER_QUANTITY_PER_REQ: u32 = 1000u32;
    pub const MAX_CART_LINES_PER_USER: usize = 100;
}

pub mod checkout {
    // flat shipping fee charged unless the box offers free shipping,
    // represented as (mantissa, scale) of a `Decimal`
    pub const FLAT_SHIPPING_FEE: (i64, u32) = (499, 2);
    // delivery estimate attached to cash-on-delivery orders
    pub const COD_EST_DELIVERY_DAYS: u8 = 7;
}

// the cart table reserves one sequence number for the wishlist, so both
// collections share the same staging storage keyed by (owner, seq)
pub const WISHLIST_SEQ_NUM: u8 = u8::MAX;

pub(crate) mod api {
    use crate::WebApiHdlrLabel;

    #[allow(non_camel_case_types)]
    pub(crate) struct web {}

    impl web {
        pub(crate) const CREATE_NEW_ORDER: WebApiHdlrLabel = "create_new_order";
        pub(crate) const UPDATE_ORDER_STATUS: WebApiHdlrLabel = "update_order_status";
        pub(crate) const READ_ORDER_DETAIL: WebApiHdlrLabel = "read_order_detail";
        pub(crate) const LIST_USER_ORDERS: WebApiHdlrLabel = "list_user_orders";
        pub(crate) const MODIFY_CART_LINES: WebApiHdlrLabel = "modify_cart_lines";
        pub(crate) const RETRIEVE_CART_LINES: WebApiHdlrLabel = "retrieve_cart_lines";
        pub(crate) const DISCARD_CART: WebApiHdlrLabel = "discard_cart";
    }
}

pub(crate) const HTTP_CONTENT_TYPE_JSON: &str = "application/json";

pub(crate) const REGEX_EMAIL_RFC5322 : &str = r#"(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?|\[(?:(?:(2(5[0-5]|[0-4][0-9])|1[0-9][0-9]|[1-9]?[0-9]))\.){3}(?:(2(5[0-5]|[0-4][0-9])|1[0-9][0-9]|[1-9]?[0-9])|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])"#;

pub mod logging {
    use serde::Deserialize;

    #[derive(Deserialize, Clone, Copy)]
    pub enum Level {
        TRACE,
        DEBUG,
        INFO,
        WARNING,
        ERROR,
        FATAL,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Destination {
        CONSOLE,
        LOCALFS,
    }
}
