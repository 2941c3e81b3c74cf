mod auth;
mod config;
mod logging;
mod usecase;

use std::sync::Arc;

use mmart_order::config::{ApiServerCfg, AppBasepathCfg, AppConfig, AppLoggingCfg};
use mmart_order::logging::AppLogContext;
use mmart_order::AppSharedState;

fn ut_logging_cfg_value() -> serde_json::Value {
    serde_json::json!({
        "handlers": [
            {"alias": "std-output", "min_level": "INFO",
             "destination": "console", "path": null}
        ],
        "loggers": [
            {"alias": "utest", "handlers": ["std-output"], "level": "INFO"}
        ]
    })
}

pub(crate) fn ut_setup_log_context() -> Arc<AppLogContext> {
    let cfg = serde_json::from_value::<AppLoggingCfg>(ut_logging_cfg_value()).unwrap();
    let basepath = AppBasepathCfg {
        system: ".".to_string(),
        service: ".".to_string(),
    };
    Arc::new(AppLogContext::new(&basepath, &cfg))
}

pub(crate) fn ut_api_server_cfg_value() -> serde_json::Value {
    serde_json::json!({
        "logging": ut_logging_cfg_value(),
        "listen": {
            "api_version": "1.1",
            "host": "localhost",
            "port": 8012,
            "max_connections": 127,
            "cors": "cors.json",
            "routes": [
                {"path": "/order", "handler": "create_new_order"},
                {"path": "/order/:oid", "handler": "read_order_detail"},
                {"path": "/order/:oid/status", "handler": "update_order_status"},
                {"path": "/orders", "handler": "list_user_orders"},
                {"path": "/cart/:seq_num", "handler": "modify_cart_lines"}
            ]
        },
        "limit_req_body_in_bytes": 131072,
        "num_workers": 2,
        "stack_sz_kb": 256,
        "data_store": [
            {"_type": "InMemory", "alias": "utest", "max_items": 200}
        ]
    })
}

pub(crate) fn ut_setup_share_state() -> AppSharedState {
    let api_server =
        serde_json::from_value::<ApiServerCfg>(ut_api_server_cfg_value()).unwrap();
    let cfg = AppConfig {
        basepath: AppBasepathCfg {
            system: ".".to_string(),
            service: ".".to_string(),
        },
        api_server,
    };
    let logctx = AppLogContext::new(&cfg.basepath, &cfg.api_server.logging);
    AppSharedState::new(cfg, logctx)
}
