use std::sync::{Arc, Mutex as StdMutex};

use rust_decimal::Decimal;

use mmart_order::api::dto::OrderStatusDto;
use mmart_order::api::web::dto::OrderRoleDto;
use mmart_order::model::{OrderAccessRole, OrderStatus};
use mmart_order::usecase::{ListOrdersUseCase, OrderDetailUcOutput, OrderDetailUseCase};

use super::super::model::{ut_setup_mystery_box, ut_setup_order};
use super::{MockBoxRepo, MockOrderRepo};

const MOCK_CREATE_TIME: &str = "2024-05-17T09:15:00+08:00";

#[tokio::test]
async fn detail_found_with_catalog_entry() {
    let order = ut_setup_order("oid-1", 101, 202, OrderStatus::Processing, MOCK_CREATE_TIME);
    let mut mbox = ut_setup_mystery_box("b0951", 202, 40);
    mbox.free_shipping = true;
    let uc = OrderDetailUseCase {
        usr_id: 101,
        repo_order: Box::new(MockOrderRepo::build(
            Some(order),
            Arc::new(StdMutex::new(Vec::new())),
        )),
        repo_box: Box::new(MockBoxRepo::build(vec![mbox])),
    };
    let result = uc.execute("oid-1".to_string()).await.unwrap();
    let detail = match result {
        OrderDetailUcOutput::Found(d) => d,
        _others => panic!("expect order detail"),
    };
    assert_eq!(detail.order_id.as_str(), "oid-1");
    assert_eq!(detail.box_title.as_deref(), Some("retro handheld surprise"));
    assert_eq!(detail.viewer_role, OrderRoleDto::Buyer);
    assert_eq!(detail.status, OrderStatusDto::Processing);
    assert_eq!(detail.totals.shipping_cost, Decimal::ZERO);
    assert_eq!(detail.totals.total, detail.totals.subtotal);
    assert_eq!(detail.timeline.steps.len(), 5);
    assert!(detail.timeline.branch.is_none());
}

#[tokio::test]
async fn detail_catalog_entry_gone() {
    let order = ut_setup_order("oid-1", 101, 202, OrderStatus::Pending, MOCK_CREATE_TIME);
    let uc = OrderDetailUseCase {
        usr_id: 202,
        repo_order: Box::new(MockOrderRepo::build(
            Some(order),
            Arc::new(StdMutex::new(Vec::new())),
        )),
        repo_box: Box::new(MockBoxRepo::build(Vec::new())),
    };
    let result = uc.execute("oid-1".to_string()).await.unwrap();
    let detail = match result {
        OrderDetailUcOutput::Found(d) => d,
        _others => panic!("expect order detail"),
    };
    // the view falls back to the snapshot kept in the order
    assert!(detail.box_title.is_none());
    assert_eq!(detail.viewer_role, OrderRoleDto::Seller);
    assert_eq!(detail.totals.shipping_cost, Decimal::new(499, 2));
}

#[tokio::test]
async fn detail_outsider_denied() {
    let order = ut_setup_order("oid-1", 101, 202, OrderStatus::Pending, MOCK_CREATE_TIME);
    let uc = OrderDetailUseCase {
        usr_id: 999,
        repo_order: Box::new(MockOrderRepo::build(
            Some(order),
            Arc::new(StdMutex::new(Vec::new())),
        )),
        repo_box: Box::new(MockBoxRepo::build(Vec::new())),
    };
    let result = uc.execute("oid-1".to_string()).await.unwrap();
    assert!(matches!(result, OrderDetailUcOutput::PermissionDeny));
}

#[tokio::test]
async fn detail_not_exist() {
    let uc = OrderDetailUseCase {
        usr_id: 101,
        repo_order: Box::new(MockOrderRepo::build(
            None,
            Arc::new(StdMutex::new(Vec::new())),
        )),
        repo_box: Box::new(MockBoxRepo::build(Vec::new())),
    };
    let result = uc.execute("oid-miss".to_string()).await.unwrap();
    assert!(matches!(result, OrderDetailUcOutput::NotExist));
}

#[tokio::test]
async fn list_maps_summaries() {
    let history = vec![
        ut_setup_order("oid-2", 101, 203, OrderStatus::Shipped, "2024-05-14T10:00:00+08:00"),
        ut_setup_order("oid-1", 101, 202, OrderStatus::Delivered, "2024-05-11T10:00:00+08:00"),
    ];
    let repo = MockOrderRepo::build(None, Arc::new(StdMutex::new(Vec::new())))
        .with_history(history);
    let uc = ListOrdersUseCase {
        usr_id: 101,
        repo_order: Box::new(repo),
    };
    let result = uc.execute(OrderAccessRole::Buyer).await.unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].order_id.as_str(), "oid-2");
    assert_eq!(result[0].status, OrderStatusDto::Shipped);
    assert_eq!(result[1].order_id.as_str(), "oid-1");
    assert_eq!(result[1].amount, Decimal::new(5198, 2));
}
