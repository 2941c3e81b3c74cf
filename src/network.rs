use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs};
use std::result::Result as DefaultResult;

use axum::Router;
use http_body::Body as HttpBody;
use hyper::server::conn::AddrIncoming;
use hyper::server::Builder as HyperSrvBuilder;

use crate::api::web::{ApiRouteTableType, ApiRouteType};
use crate::config::{WebApiListenCfg, WebApiRouteCfg};
use crate::error::{AppError, AppErrorCode};
use crate::AppSharedState;

pub type WebServiceRoute<HB> = Router<(), HB>;

// Due to the issues #1110 and discussion #1818 in Axum v0.6.x,
// the generic type parameter of the final router depends on all the
// middleware layers added to it, they wrap the original http request
// and response body layer by layer, so the type parameter `HB` has to
// match at compile time

pub fn app_web_service<HB>(
    cfg: &WebApiListenCfg,
    rtable: ApiRouteTableType<HB>,
    shr_state: AppSharedState,
) -> (WebServiceRoute<HB>, u16)
where
    HB: HttpBody + Send + 'static,
    <HB as HttpBody>::Data: Send,
    <HB as HttpBody>::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    // the type parameters for shared state and http body should be explicitly
    // annotated, this function creates a router first then specifies type of
    // the shared state later at the end of the same function
    let mut router: Router<AppSharedState, HB> = Router::new();
    let iterator = cfg.routes.iter();
    let filt_fn = |item: &&WebApiRouteCfg| -> bool {
        let hdlr_label = item.handler.as_str();
        rtable.contains_key(hdlr_label)
    };
    let filtered = iterator.filter(filt_fn);
    let mut num_applied: u16 = 0;
    for item in filtered {
        let hdlr_label = item.handler.as_str();
        if let Some(route) = rtable.get(hdlr_label) {
            let route_cpy: ApiRouteType<HB> = route.clone();
            router = router.route(item.path.as_str(), route_cpy);
            num_applied += 1u16;
        } // 2 different paths might be linked to the same handler
    }
    let router = if num_applied > 0 {
        let api_ver_path = String::from("/") + &cfg.api_version;
        Router::new().nest(api_ver_path.as_str(), router)
    } else {
        router
    };
    // DO NOT specify state type at here, Axum converts a router to a leaf
    // service ONLY when the type parameter `S` in `Router` becomes the empty
    // tuple `()`, the `S` actually means "state type that is missing in the
    // router"
    let router = router.with_state(shr_state);
    (router, num_applied)
} // end of fn app_web_service

pub fn net_server_listener(
    mut domain_host: String,
    port: u16,
) -> DefaultResult<HyperSrvBuilder<AddrIncoming>, AppError> {
    if !domain_host.contains(':') {
        domain_host += ":0";
    }
    match domain_host.to_socket_addrs() {
        Ok(mut iterator) => loop {
            match iterator.next() {
                Some(a) => {
                    let mut addr: SocketAddr = a;
                    addr.set_port(port);
                    if let Ok(b) = axum::Server::try_bind(&addr) {
                        break Ok(b);
                    }
                }
                None => {
                    break Err(AppError {
                        detail: Some("failed to bind with all resolved IPs".to_string()),
                        code: AppErrorCode::IOerror(ErrorKind::AddrInUse),
                    })
                }
            }
        },
        Err(e) => Err(AppError {
            // IP not found after domain name resolution
            detail: Some(e.to_string() + ", domain_host:" + &domain_host),
            code: AppErrorCode::IOerror(ErrorKind::AddrNotAvailable),
        }),
    }
} // end of fn net_server_listener

pub mod middleware {
    use std::fs::File;
    use std::time::Duration;

    use axum::http;
    use serde::Deserialize;
    use tower::limit::RateLimitLayer;
    use tower_http::cors::CorsLayer;
    use tower_http::limit::RequestBodyLimitLayer;

    use super::{AppError, AppErrorCode, DefaultResult};

    #[derive(Deserialize)]
    struct CorsAllowedOrigin {
        order: String,
    }

    #[allow(non_snake_case)]
    #[derive(Deserialize)]
    struct CorsConfig {
        ALLOWED_ORIGIN: CorsAllowedOrigin,
        ALLOWED_METHODS: Vec<String>,
        ALLOWED_HEADERS: Vec<String>,
        ALLOW_CREDENTIALS: bool,
        PREFLIGHT_MAX_AGE: u64,
    }

    pub fn rate_limit(max_conn: u32) -> RateLimitLayer {
        let num = max_conn as u64;
        let period = Duration::from_secs(1);
        RateLimitLayer::new(num, period)
    }

    pub fn cors(cfg_path: String) -> DefaultResult<CorsLayer, AppError> {
        let f = File::open(cfg_path).map_err(|e| AppError {
            detail: Some(e.to_string()),
            code: AppErrorCode::IOerror(e.kind()),
        })?;
        let val = serde_json::from_reader::<File, CorsConfig>(f).map_err(|e| AppError {
            detail: Some(e.to_string()),
            code: AppErrorCode::InvalidJsonFormat,
        })?;
        let mut methods = Vec::new();
        for m in val.ALLOWED_METHODS.iter() {
            let m = m.parse::<http::Method>().map_err(|_e| AppError {
                detail: Some(format!("invalid-allowed-method: {}", m)),
                code: AppErrorCode::InvalidInput,
            })?;
            methods.push(m);
        }
        let mut headers = Vec::new();
        for h in val.ALLOWED_HEADERS.iter() {
            let h = h.parse::<http::HeaderName>().map_err(|_e| AppError {
                detail: Some(format!("invalid-allowed-header: {}", h)),
                code: AppErrorCode::InvalidInput,
            })?;
            headers.push(h);
        }
        let origin = val
            .ALLOWED_ORIGIN
            .order
            .parse::<http::HeaderValue>()
            .map_err(|e| AppError {
                detail: Some(format!("invalid-origin-header: {}", e)),
                code: AppErrorCode::InvalidInput,
            })?;
        let co = CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(val.ALLOW_CREDENTIALS)
            .max_age(Duration::from_secs(val.PREFLIGHT_MAX_AGE));
        Ok(co)
    } // end of fn cors

    pub fn req_body_limit(limit: usize) -> RequestBodyLimitLayer {
        RequestBodyLimitLayer::new(limit)
    }
} // end of inner-module middleware
