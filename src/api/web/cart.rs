use axum::debug_handler;
use axum::extract::{Json as ExtractJson, Path as ExtractPath, State as ExtractState};
use axum::http::StatusCode as HttpStatusCode;
use axum::response::IntoResponse;

use crate::api::web::dto::CartDto;
use crate::auth::AppAuthedClaim;
use crate::logging::{app_log_event, AppLogLevel};
use crate::repository::{app_repo_cart, app_repo_mystery_box};
use crate::usecase::{
    DiscardCartUseCase, ModifyCartLinesUcOutput, ModifyCartLinesUseCase, RetrieveCartUseCase,
};
use crate::AppSharedState;

use super::{json_resp_headers, INTERNAL_ERR_BODY, SERIAL_FAIL_BODY};

#[debug_handler(state = AppSharedState)]
pub(super) async fn modify_lines(
    ExtractPath(seq_num): ExtractPath<u8>,
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<CartDto>,
) -> impl IntoResponse {
    let usr_id = authed.profile;
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let results = (app_repo_cart(ds.clone()).await, app_repo_mystery_box(ds).await);
    let (resp_status_code, serial_resp_body) = if let (Ok(repo_cart), Ok(repo_box)) = results {
        let uc = ModifyCartLinesUseCase {
            usr_id,
            repo_cart,
            repo_box,
            logctx: log_ctx.clone(),
        };
        match uc.execute(seq_num, req_body).await {
            Ok(ModifyCartLinesUcOutput::Success(num_lines)) => (
                HttpStatusCode::OK,
                format!(r#"{{"num_lines":{}}}"#, num_lines),
            ),
            Ok(ModifyCartLinesUcOutput::ExceedLimit(limit)) => (
                HttpStatusCode::BAD_REQUEST,
                format!(r#"{{"reason":"exceeding-max-limit","limit":{}}}"#, limit),
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
} // end of modify_lines

#[debug_handler(state = AppSharedState)]
pub(super) async fn retrieve(
    ExtractPath(seq_num): ExtractPath<u8>,
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let usr_id = authed.profile;
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let (resp_status_code, serial_resp_body) = match app_repo_cart(ds).await {
        Ok(repo_cart) => {
            let uc = RetrieveCartUseCase { usr_id, repo_cart };
            match uc.execute(seq_num).await {
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
} // end of retrieve

#[debug_handler(state = AppSharedState)]
pub(super) async fn discard(
    ExtractPath(seq_num): ExtractPath<u8>,
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let usr_id = authed.profile;
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let (resp_status_code, serial_resp_body) = match app_repo_cart(ds).await {
        Ok(repo_cart) => {
            let uc = DiscardCartUseCase { usr_id, repo_cart };
            match uc.execute(seq_num).await {
                Ok(()) => (HttpStatusCode::NO_CONTENT, String::new()),
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
} // end of discard
