use axum::debug_handler;
use axum::extract::{
    Json as ExtractJson, Path as ExtractPath, Query as ExtractQuery, State as ExtractState,
};
use axum::http::StatusCode as HttpStatusCode;
use axum::response::IntoResponse;

use crate::api::web::dto::{OrderCreateReqData, OrderListQueryDto, OrderStatusUpdateReqDto};
use crate::auth::AppAuthedClaim;
use crate::logging::{app_log_event, AppLogLevel};
use crate::model::OrderAccessRole;
use crate::repository::{app_repo_mystery_box, app_repo_order};
use crate::usecase::{
    CreateOrderUcError, CreateOrderUseCase, ListOrdersUseCase, OrderDetailUcOutput,
    OrderDetailUseCase, OrderStatusUpdateUcOutput, OrderStatusUpdateUseCase,
};
use crate::AppSharedState;

use super::{json_resp_headers, INTERNAL_ERR_BODY, SERIAL_FAIL_BODY};

// always to specify state type explicitly to the debug macro
#[debug_handler(state = AppSharedState)]
pub(super) async fn create_handler(
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
    _wrapped_req_body: ExtractJson<OrderCreateReqData>,
) -> impl IntoResponse {
    let usr_id = authed.profile;
    let ExtractJson(req_body) = _wrapped_req_body;
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let results = (
        app_repo_order(ds.clone()).await,
        app_repo_mystery_box(ds).await,
    );
    let (resp_status_code, serial_resp_body) = if let (Ok(repo_order), Ok(repo_box)) = results {
        let uc = CreateOrderUseCase {
            usr_id,
            repo_order,
            repo_box,
            notify: _appstate.order_notify(),
            logctx: log_ctx.clone(),
        };
        match uc.execute(req_body).await {
            Ok(value) => match serde_json::to_string(&value) {
                Ok(s) => (HttpStatusCode::CREATED, s),
                Err(_) => (
                    HttpStatusCode::INTERNAL_SERVER_ERROR,
                    SERIAL_FAIL_BODY.to_string(),
                ),
            },
            Err(CreateOrderUcError::ReqContent(value)) => match serde_json::to_string(&value) {
                Ok(s) => (HttpStatusCode::BAD_REQUEST, s),
                Err(_) => (
                    HttpStatusCode::INTERNAL_SERVER_ERROR,
                    SERIAL_FAIL_BODY.to_string(),
                ),
            },
            Err(CreateOrderUcError::Server(e)) => {
                app_log_event!(log_ctx, AppLogLevel::ERROR, "user:{}, {:?}", usr_id, e);
                (
                    HttpStatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERR_BODY.to_string(),
                )
            }
        }
    } else {
        app_log_event!(
            log_ctx,
            AppLogLevel::ERROR,
            "repository init failure, user:{}",
            usr_id
        );
        (
            HttpStatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_ERR_BODY.to_string(),
        )
    };
    (resp_status_code, json_resp_headers(), serial_resp_body)
} // end of create_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn update_status_handler(
    ExtractPath(oid): ExtractPath<String>,
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<OrderStatusUpdateReqDto>,
) -> impl IntoResponse {
    let usr_id = authed.profile;
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let (resp_status_code, serial_resp_body) = match app_repo_order(ds).await {
        Ok(repo_order) => {
            let uc = OrderStatusUpdateUseCase {
                usr_id,
                repo_order,
                notify: _appstate.order_notify(),
                logctx: log_ctx.clone(),
            };
            match uc.execute(oid, req_body).await {
                Ok(OrderStatusUpdateUcOutput::Success) => (HttpStatusCode::OK, "{}".to_string()),
                Ok(OrderStatusUpdateUcOutput::NotExist) => (
                    HttpStatusCode::NOT_FOUND,
                    r#"{"reason":"order-not-exist"}"#.to_string(),
                ),
                Ok(OrderStatusUpdateUcOutput::PermissionDeny) => (
                    HttpStatusCode::FORBIDDEN,
                    r#"{"reason":"permission-denied"}"#.to_string(),
                ),
                Ok(OrderStatusUpdateUcOutput::InvalidTransition(value)) => {
                    match serde_json::to_string(&value) {
                        Ok(s) => (HttpStatusCode::BAD_REQUEST, s),
                        Err(_) => (
                            HttpStatusCode::INTERNAL_SERVER_ERROR,
                            SERIAL_FAIL_BODY.to_string(),
                        ),
                    }
                }
                Ok(OrderStatusUpdateUcOutput::VersionConflict) => (
                    HttpStatusCode::CONFLICT,
                    r#"{"reason":"version-conflict"}"#.to_string(),
                ),
                Err(e) => {
                    app_log_event!(log_ctx, AppLogLevel::ERROR, "user:{}, {:?}", usr_id, e);
                    (
                        HttpStatusCode::INTERNAL_SERVER_ERROR,
                        INTERNAL_ERR_BODY.to_string(),
                    )
                }
            }
        }
        Err(e) => {
            app_log_event!(
                log_ctx,
                AppLogLevel::ERROR,
                "repository init failure, user:{}, {:?}",
                usr_id,
                e
            );
            (
                HttpStatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERR_BODY.to_string(),
            )
        }
    };
    (resp_status_code, json_resp_headers(), serial_resp_body)
} // end of update_status_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn read_detail_handler(
    ExtractPath(oid): ExtractPath<String>,
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let usr_id = authed.profile;
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let results = (
        app_repo_order(ds.clone()).await,
        app_repo_mystery_box(ds).await,
    );
    let (resp_status_code, serial_resp_body) = if let (Ok(repo_order), Ok(repo_box)) = results {
        let uc = OrderDetailUseCase {
            usr_id,
            repo_order,
            repo_box,
        };
        match uc.execute(oid).await {
            Ok(OrderDetailUcOutput::Found(value)) => match serde_json::to_string(&value) {
                Ok(s) => (HttpStatusCode::OK, s),
                Err(_) => (
                    HttpStatusCode::INTERNAL_SERVER_ERROR,
                    SERIAL_FAIL_BODY.to_string(),
                ),
            },
            Ok(OrderDetailUcOutput::NotExist) => (
                HttpStatusCode::NOT_FOUND,
                r#"{"reason":"order-not-exist"}"#.to_string(),
            ),
            Ok(OrderDetailUcOutput::PermissionDeny) => (
                HttpStatusCode::FORBIDDEN,
                r#"{"reason":"permission-denied"}"#.to_string(),
            ),
            Err(e) => {
                app_log_event!(log_ctx, AppLogLevel::ERROR, "user:{}, {:?}", usr_id, e);
                (
                    HttpStatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERR_BODY.to_string(),
                )
            }
        }
    } else {
        app_log_event!(
            log_ctx,
            AppLogLevel::ERROR,
            "repository init failure, user:{}",
            usr_id
        );
        (
            HttpStatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_ERR_BODY.to_string(),
        )
    };
    (resp_status_code, json_resp_headers(), serial_resp_body)
} // end of read_detail_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn list_handler(
    authed: AppAuthedClaim,
    ExtractQuery(query): ExtractQuery<OrderListQueryDto>,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let usr_id = authed.profile;
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let role = query
        .role
        .map(OrderAccessRole::from)
        .unwrap_or(OrderAccessRole::Buyer);
    let (resp_status_code, serial_resp_body) = match app_repo_order(ds).await {
        Ok(repo_order) => {
            let uc = ListOrdersUseCase { usr_id, repo_order };
            match uc.execute(role).await {
                Ok(value) => match serde_json::to_string(&value) {
                    Ok(s) => (HttpStatusCode::OK, s),
                    Err(_) => (
                        HttpStatusCode::INTERNAL_SERVER_ERROR,
                        SERIAL_FAIL_BODY.to_string(),
                    ),
                },
                Err(e) => {
                    app_log_event!(log_ctx, AppLogLevel::ERROR, "user:{}, {:?}", usr_id, e);
                    (
                        HttpStatusCode::INTERNAL_SERVER_ERROR,
                        INTERNAL_ERR_BODY.to_string(),
                    )
                }
            }
        }
        Err(e) => {
            app_log_event!(
                log_ctx,
                AppLogLevel::ERROR,
                "repository init failure, user:{}, {:?}",
                usr_id,
                e
            );
            (
                HttpStatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERR_BODY.to_string(),
            )
        }
    };
    (resp_status_code, json_resp_headers(), serial_resp_body)
} // end of list_handler
