use mmart_order::config::{AppBasepathCfg, AppLoggingCfg};
use mmart_order::logging::{to_3rdparty_level, AppLogContext, AppLogLevel};

fn ut_setup_context(logger_aliases: &[&str]) -> AppLogContext {
    let loggers = logger_aliases
        .iter()
        .map(|alias| {
            serde_json::json!({"alias": alias, "handlers": ["std-output"], "level": "INFO"})
        })
        .collect::<Vec<_>>();
    let value = serde_json::json!({
        "handlers": [
            {"alias": "std-output", "min_level": "INFO",
             "destination": "console", "path": null}
        ],
        "loggers": loggers
    });
    let cfg = serde_json::from_value::<AppLoggingCfg>(value).unwrap();
    let basepath = AppBasepathCfg {
        system: ".".to_string(),
        service: ".".to_string(),
    };
    AppLogContext::new(&basepath, &cfg)
}

#[test]
fn dispatcher_exact_module_path() {
    let ctx = ut_setup_context(&["mmart_order::usecase::create_order"]);
    let result = ctx.dispatcher_for("mmart_order::usecase::create_order");
    assert!(result.is_some());
}

#[test]
fn dispatcher_falls_back_to_parent_module() {
    let ctx = ut_setup_context(&["mmart_order"]);
    // one root entry covers every module underneath
    assert!(ctx.dispatcher_for("mmart_order::usecase::create_order").is_some());
    assert!(ctx.dispatcher_for("mmart_order::repository").is_some());
    assert!(ctx.dispatcher_for("mmart_order").is_some());
}

#[test]
fn dispatcher_unknown_subtree() {
    let ctx = ut_setup_context(&["mmart_order::usecase"]);
    assert!(ctx.dispatcher_for("mmart_order::repository::in_mem").is_none());
    assert!(ctx.dispatcher_for("other_crate::module").is_none());
}

#[test]
fn level_mapping_const_usable() {
    const LVL: tracing::Level = to_3rdparty_level(&AppLogLevel::ERROR);
    assert_eq!(LVL, tracing::Level::ERROR);
    assert_eq!(
        to_3rdparty_level(&AppLogLevel::FATAL),
        tracing::Level::ERROR
    );
    assert_eq!(
        to_3rdparty_level(&AppLogLevel::WARNING),
        tracing::Level::WARN
    );
    assert_eq!(to_3rdparty_level(&AppLogLevel::TRACE), tracing::Level::TRACE);
}
