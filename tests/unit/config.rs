use std::collections::HashMap;
use std::fs;

use mmart_order::config::AppConfig;
use mmart_order::error::AppErrorCode;

use super::ut_api_server_cfg_value;

fn ut_write_cfg_file(fname: &str, value: &serde_json::Value) -> String {
    let path = std::env::temp_dir().join(fname);
    fs::write(&path, serde_json::to_vec(value).unwrap()).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn parse_from_file_ok() {
    let value = ut_api_server_cfg_value();
    let fullpath = ut_write_cfg_file("mmart_order_utest_cfg_ok.json", &value);
    let cfg = AppConfig::parse_from_file(fullpath).unwrap();
    assert_eq!(cfg.listen.port, 8012);
    assert_eq!(cfg.listen.api_version.as_str(), "1.1");
    assert_eq!(cfg.listen.routes.len(), 5);
    assert_eq!(cfg.num_workers, 2);
    assert!(cfg.catalog_seed.is_none());
}

#[test]
fn parse_no_route() {
    let mut value = ut_api_server_cfg_value();
    value["listen"]["routes"] = serde_json::json!([]);
    let fullpath = ut_write_cfg_file("mmart_order_utest_cfg_noroute.json", &value);
    let error = AppConfig::parse_from_file(fullpath).err().unwrap();
    assert_eq!(error.code, AppErrorCode::NoRouteApiServerCfg);
}

#[test]
fn parse_bad_api_version() {
    let mut value = ut_api_server_cfg_value();
    value["listen"]["api_version"] = serde_json::json!("v1.beta");
    let fullpath = ut_write_cfg_file("mmart_order_utest_cfg_badver.json", &value);
    let error = AppConfig::parse_from_file(fullpath).err().unwrap();
    assert_eq!(error.code, AppErrorCode::InvalidVersion);
}

#[test]
fn parse_dangling_log_handler() {
    let mut value = ut_api_server_cfg_value();
    value["logging"]["loggers"][0]["handlers"] = serde_json::json!(["no-such-handler"]);
    let fullpath = ut_write_cfg_file("mmart_order_utest_cfg_badlog.json", &value);
    let error = AppConfig::parse_from_file(fullpath).err().unwrap();
    assert_eq!(error.code, AppErrorCode::InvalidHandlerLoggerCfg);
}

#[test]
fn parse_datastore_limit_exceeded() {
    let mut value = ut_api_server_cfg_value();
    value["data_store"][0]["max_items"] = serde_json::json!(5000);
    let fullpath = ut_write_cfg_file("mmart_order_utest_cfg_badds.json", &value);
    let error = AppConfig::parse_from_file(fullpath).err().unwrap();
    assert_eq!(error.code, AppErrorCode::ExceedingMaxLimit);
}

#[test]
fn parse_malformed_json() {
    let path = std::env::temp_dir().join("mmart_order_utest_cfg_malformed.json");
    fs::write(&path, b"{not-json").unwrap();
    let error = AppConfig::parse_from_file(path.to_string_lossy().into_owned()).err().unwrap();
    assert_eq!(error.code, AppErrorCode::InvalidJsonFormat);
}

#[test]
fn parse_file_not_found() {
    let fullpath = "/no/such/path/mmart-order-cfg.json".to_string();
    let error = AppConfig::parse_from_file(fullpath).err().unwrap();
    assert!(matches!(error.code, AppErrorCode::IOerror(_)));
}

#[test]
fn new_missing_env_vars() {
    let error = AppConfig::new(HashMap::new()).err().unwrap();
    assert_eq!(error.code, AppErrorCode::MissingSysBasePath);
    let args = HashMap::from([("SYS_BASE_PATH".to_string(), "/tmp".to_string())]);
    let error = AppConfig::new(args).err().unwrap();
    assert_eq!(error.code, AppErrorCode::MissingAppBasePath);
    let args = HashMap::from([
        ("SYS_BASE_PATH".to_string(), "/tmp".to_string()),
        ("SERVICE_BASE_PATH".to_string(), "/tmp".to_string()),
    ]);
    let error = AppConfig::new(args).err().unwrap();
    assert_eq!(error.code, AppErrorCode::MissingConfigPath);
}
