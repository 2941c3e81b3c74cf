use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::BufReader;

use http_body::Limited;
use hyper::Body as HyperBody;
use tokio::runtime::Builder as RuntimeBuilder;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use mmart_order::api::web::route_table;
use mmart_order::config::AppConfig;
use mmart_order::constant::EXPECTED_ENV_VAR_LABELS;
use mmart_order::logging::{app_log_event, AppLogContext, AppLogLevel};
use mmart_order::model::MysteryBoxModel;
use mmart_order::network::{app_web_service, middleware, net_server_listener};
use mmart_order::repository::app_repo_mystery_box;
use mmart_order::AppSharedState;

type AppFinalHttpBody = Limited<HyperBody>;

// the catalog source of truth is the product service upstream, the
// local replica may be pre-filled from a JSON file at startup
async fn seed_catalog(shr_state: &AppSharedState) {
    let log_ctx_p = shr_state.log_context().clone();
    let cfg = shr_state.config().clone();
    let seed_relpath = match cfg.api_server.catalog_seed.as_ref() {
        Some(p) => p.clone(),
        None => return,
    };
    let fullpath = cfg.basepath.service.clone() + seed_relpath.as_str();
    let boxes = match File::open(fullpath.as_str()) {
        Ok(f) => {
            let rdr = BufReader::new(f);
            match serde_json::from_reader::<BufReader<File>, Vec<MysteryBoxModel>>(rdr) {
                Ok(v) => v,
                Err(e) => {
                    app_log_event!(
                        log_ctx_p,
                        AppLogLevel::ERROR,
                        "catalog seed parse error, {}",
                        e
                    );
                    return;
                }
            }
        }
        Err(e) => {
            app_log_event!(
                log_ctx_p,
                AppLogLevel::ERROR,
                "catalog seed open error, {}, {}",
                fullpath,
                e
            );
            return;
        }
    };
    match app_repo_mystery_box(shr_state.datastore()).await {
        Ok(repo) => {
            let mut num_loaded = 0usize;
            for mbox in boxes {
                match repo.save(mbox).await {
                    Ok(()) => {
                        num_loaded += 1;
                    }
                    Err(e) => {
                        app_log_event!(
                            log_ctx_p,
                            AppLogLevel::WARNING,
                            "catalog seed entry skipped, {:?}",
                            e
                        );
                    }
                }
            }
            app_log_event!(
                log_ctx_p,
                AppLogLevel::INFO,
                "catalog seed loaded, {} entries",
                num_loaded
            );
        }
        Err(e) => {
            app_log_event!(log_ctx_p, AppLogLevel::ERROR, "{:?}", e);
        }
    }
} // end of fn seed_catalog

async fn start_server(shr_state: AppSharedState) {
    let log_ctx_p = shr_state.log_context().clone();
    let cfg = shr_state.config().clone();
    seed_catalog(&shr_state).await;
    let routes = route_table::<AppFinalHttpBody>();
    let listener = &cfg.api_server.listen;
    let (service, num_applied) = app_web_service::<AppFinalHttpBody>(listener, routes, shr_state);
    if num_applied == 0 {
        app_log_event!(
            log_ctx_p,
            AppLogLevel::ERROR,
            "no route created, web API server failed to start"
        );
        return;
    }
    let result = net_server_listener(listener.host.clone(), listener.port);
    match result {
        Ok(b) => {
            let ratelm = middleware::rate_limit(listener.max_connections);
            let reqlm = middleware::req_body_limit(cfg.api_server.limit_req_body_in_bytes);
            let co =
                match middleware::cors(cfg.basepath.system.clone() + "/" + listener.cors.as_str()) {
                    Ok(v) => v,
                    Err(e) => {
                        app_log_event!(
                            log_ctx_p,
                            AppLogLevel::ERROR,
                            "cors layer init error, detail: {:?}",
                            e
                        );
                        CorsLayer::new()
                    }
                };
            let middlewares1 = ServiceBuilder::new().layer(reqlm).layer(co);
            let service = service.layer(middlewares1);
            let middlewares2 = ServiceBuilder::new()
                .layer(ratelm) // rate-limit not allowed to clone
                .service(service.into_make_service());
            let sr = b.serve(middlewares2).with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            });
            let _ = sr.await;
            app_log_event!(log_ctx_p, AppLogLevel::WARNING, "API server terminating");
        }
        Err(e) => {
            app_log_event!(
                log_ctx_p,
                AppLogLevel::ERROR,
                "API server failed to start, {} ",
                e
            );
        }
    }
} // end of fn start_server

fn start_async_runtime(cfg: AppConfig) {
    let log_ctx = AppLogContext::new(&cfg.basepath, &cfg.api_server.logging);
    let shr_state = AppSharedState::new(cfg, log_ctx);
    let cfg = shr_state.config();
    let log_ctx = shr_state.log_context().clone();
    let log_ctx2 = log_ctx.clone();
    let stack_nbytes: usize = (cfg.api_server.stack_sz_kb as usize) << 10;
    let result = RuntimeBuilder::new_multi_thread()
        .worker_threads(cfg.api_server.num_workers as usize)
        .on_thread_start(move || {
            // this `Fn()` closure will be invoked several times by new thread,
            // depending on number of worker threads in the application, all
            // variables moved into this closure have to be clonable
            let log_cpy = log_ctx.clone();
            app_log_event!(log_cpy, AppLogLevel::INFO, "[API server] worker started");
        })
        .on_thread_stop(move || {
            let log_cpy = log_ctx2.clone();
            app_log_event!(log_cpy, AppLogLevel::INFO, "[API server] worker terminating");
        })
        .thread_stack_size(stack_nbytes)
        .thread_name("web-api-worker")
        // manage low-level I/O drivers used by network types
        .enable_io()
        // rate limiter in crate `tower` requires the timer in the runtime builder
        .enable_time()
        .build();
    match result {
        Ok(rt) => {
            // new worker threads spawned
            rt.block_on(async move {
                start_server(shr_state).await;
            }); // runtime started
        }
        Err(e) => {
            let log_ctx_p = shr_state.log_context();
            app_log_event!(
                log_ctx_p,
                AppLogLevel::ERROR,
                "async runtime failed to build, {} ",
                e
            );
        }
    };
} // end of fn start_async_runtime

fn main() {
    let iter = env::vars().filter(|(k, _v)| EXPECTED_ENV_VAR_LABELS.contains(&k.as_str()));
    let arg_map: HashMap<String, String, RandomState> = HashMap::from_iter(iter);
    match AppConfig::new(arg_map) {
        Ok(cfg) => start_async_runtime(cfg),
        Err(e) => {
            println!("app failed to configure, error code: {} ", e);
        }
    };
} // end of main
