use std::collections::HashMap;

use axum::http::{header as HttpHeader, HeaderMap as HttpHeaderMap, HeaderValue as HttpHeaderValue};
use axum::routing::{delete, get, patch, post, MethodRouter};
use http_body::Body as HttpBody;

use crate::constant::api::web as WebConst;
use crate::{AppSharedState, WebApiHdlrLabel};

pub(super) const SERIAL_FAIL_BODY: &str = r#"{"reason":"serialization-failure"}"#;
pub(super) const INTERNAL_ERR_BODY: &str = r#"{"reason":"internal-error"}"#;

pub(super) fn json_resp_headers() -> HttpHeaderMap {
    let resp_ctype_val = HttpHeaderValue::from_static(crate::constant::HTTP_CONTENT_TYPE_JSON);
    let mut hdr_map = HttpHeaderMap::new();
    hdr_map.insert(HttpHeader::CONTENT_TYPE, resp_ctype_val);
    hdr_map
}

mod cart;
pub mod dto;
mod order;

// type parameter `B` for http body of the method router has to match the same
// type parameter in `axum::Router`
pub type ApiRouteType<HB> = MethodRouter<AppSharedState, HB>;
pub type ApiRouteTableType<HB> = HashMap<WebApiHdlrLabel, ApiRouteType<HB>>;

pub fn route_table<HB>() -> ApiRouteTableType<HB>
where
    HB: HttpBody + Send + 'static,
    <HB as HttpBody>::Data: Send,
    <HB as HttpBody>::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let mut out: ApiRouteTableType<HB> = HashMap::new();
    out.insert(WebConst::CREATE_NEW_ORDER, post(order::create_handler));
    out.insert(
        WebConst::UPDATE_ORDER_STATUS,
        patch(order::update_status_handler),
    );
    out.insert(WebConst::READ_ORDER_DETAIL, get(order::read_detail_handler));
    out.insert(WebConst::LIST_USER_ORDERS, get(order::list_handler));
    out.insert(WebConst::MODIFY_CART_LINES, patch(cart::modify_lines));
    out.insert(WebConst::DISCARD_CART, delete(cart::discard));
    out.insert(WebConst::RETRIEVE_CART_LINES, get(cart::retrieve));
    out
}
