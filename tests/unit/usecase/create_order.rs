use std::sync::{Arc, Mutex as StdMutex};

use rust_decimal::Decimal;

use mmart_order::api::dto::CryptoCurrencyDto;
use mmart_order::api::web::dto::{BoxErrorReason, OrderCreateReqData, PaymentMethodReqDto};
use mmart_order::usecase::{CreateOrderUcError, CreateOrderUseCase};

use super::super::model::{ut_setup_mystery_box, ut_shipping_req};
use super::super::ut_setup_log_context;
use super::{MockBoxRepo, MockOrderNotify, MockOrderRepo, UtCreatedOrders, UtSentMessages};

fn ut_valid_req() -> OrderCreateReqData {
    OrderCreateReqData {
        box_id: "b0951".to_string(),
        quantity: 3,
        shipping: ut_shipping_req(),
        payment: PaymentMethodReqDto::Crypto {
            currency: CryptoCurrencyDto::BTC,
            wallet_address: "bc1qbuyer90util".to_string(),
        },
    }
}

fn ut_setup_usecase(
    boxes: Vec<mmart_order::model::MysteryBoxModel>,
    notify_fail: bool,
) -> (CreateOrderUseCase, UtCreatedOrders, UtSentMessages) {
    let created: UtCreatedOrders = Arc::new(StdMutex::new(Vec::new()));
    let sent: UtSentMessages = Arc::new(StdMutex::new(Vec::new()));
    let uc = CreateOrderUseCase {
        usr_id: 101,
        repo_order: Box::new(MockOrderRepo::build(None, created.clone())),
        repo_box: Box::new(MockBoxRepo::build(boxes)),
        notify: Arc::new(MockOrderNotify::build(sent.clone(), notify_fail)),
        logctx: ut_setup_log_context(),
    };
    (uc, created, sent)
}

#[tokio::test]
async fn create_ok() {
    let mbox = ut_setup_mystery_box("b0951", 202, 40);
    let (uc, created, sent) = ut_setup_usecase(vec![mbox], false);
    let result = uc.execute(ut_valid_req()).await;
    let resp = match result {
        Ok(v) => v,
        Err(_e) => panic!("expect order created"),
    };
    assert!(!resp.order_id.is_empty());
    assert!(resp.time > 0);
    let created = created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].payment.amount, Decimal::new(7797, 2));
    assert_eq!(created[0].buyer_id, 101);
    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, 101);
    assert_eq!(sent[0].1, 202);
    assert!(sent[0].2.contains("retro handheld surprise"));
}

#[tokio::test]
async fn create_box_not_exist() {
    let (uc, created, _sent) = ut_setup_usecase(Vec::new(), false);
    let result = uc.execute(ut_valid_req()).await;
    match result {
        Err(CreateOrderUcError::ReqContent(e)) => {
            assert_eq!(e.box_.unwrap().reason, BoxErrorReason::NotExist);
        }
        _others => panic!("expect request content error"),
    }
    assert!(created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_invalid_quantity() {
    let mbox = ut_setup_mystery_box("b0951", 202, 40);
    let (uc, created, sent) = ut_setup_usecase(vec![mbox], false);
    let mut req = ut_valid_req();
    req.quantity = 0;
    let result = uc.execute(req).await;
    match result {
        Err(CreateOrderUcError::ReqContent(e)) => {
            assert!(e.quantity.is_some());
            assert!(e.box_.is_none());
        }
        _others => panic!("expect request content error"),
    }
    assert!(created.lock().unwrap().is_empty());
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_ok_notify_failure_tolerated() {
    let mbox = ut_setup_mystery_box("b0951", 202, 40);
    let (uc, created, sent) = ut_setup_usecase(vec![mbox], true);
    let result = uc.execute(ut_valid_req()).await;
    assert!(result.is_ok());
    assert_eq!(created.lock().unwrap().len(), 1);
    assert!(sent.lock().unwrap().is_empty());
}
