use std::sync::Arc;

use rust_decimal::Decimal;

use mmart_order::api::dto::CryptoCurrencyDto;
use mmart_order::error::AppErrorCode;
use mmart_order::model::{
    OrderAccessRole, OrderStatus, PaymentMethodModel, PaymentModel,
};
use mmart_order::repository::{app_repo_mystery_box, app_repo_order};

use super::super::model::{ut_setup_mystery_box, ut_setup_order};
use super::in_mem_ds_ctx_setup;

#[tokio::test]
async fn create_fetch_roundtrip() {
    let ds_ctx = in_mem_ds_ctx_setup(40);
    let repo = app_repo_order(ds_ctx).await.unwrap();
    let mut order = ut_setup_order("oid-r1", 101, 202, OrderStatus::Pending, "2024-05-17T09:15:00+08:00");
    order.payment = PaymentModel {
        amount: Decimal::new(7797, 2),
        method: PaymentMethodModel::Crypto {
            currency: CryptoCurrencyDto::USDT,
            buyer_wallet: "0xbuyer5512".to_string(),
            seller_wallet: "0x5fa9e8d20cc31b77".to_string(),
        },
    };
    repo.create(order.clone()).await.unwrap();
    let fetched = repo.fetch("oid-r1").await.unwrap().unwrap();
    assert_eq!(fetched.id_, order.id_);
    assert_eq!(fetched.box_id, order.box_id);
    assert_eq!(fetched.buyer_id, 101);
    assert_eq!(fetched.seller_id, 202);
    assert_eq!(fetched.quantity, order.quantity);
    assert_eq!(fetched.status, OrderStatus::Pending);
    assert_eq!(fetched.version, 0);
    assert_eq!(fetched.payment, order.payment);
    assert_eq!(fetched.shipping, order.shipping);
    assert_eq!(fetched.fulfillment, order.fulfillment);
    assert_eq!(fetched.create_time, order.create_time);
}

#[tokio::test]
async fn fetch_unknown_id() {
    let ds_ctx = in_mem_ds_ctx_setup(40);
    let repo = app_repo_order(ds_ctx).await.unwrap();
    let result = repo.fetch("oid-miss").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn amount_snapshot_survives_price_change() {
    let ds_ctx = in_mem_ds_ctx_setup(40);
    let repo_order = app_repo_order(ds_ctx.clone()).await.unwrap();
    let repo_box = app_repo_mystery_box(ds_ctx).await.unwrap();
    let mbox = ut_setup_mystery_box("b0951", 202, 40);
    repo_box.save(mbox.clone()).await.unwrap();
    let order = ut_setup_order("oid-s1", 101, 202, OrderStatus::Pending, "2024-05-17T09:15:00+08:00");
    let amount_before = order.payment.amount;
    repo_order.create(order).await.unwrap();
    // a later price change in the catalog replica must not leak into
    // the amount recorded at checkout time
    let mut repriced = mbox;
    repriced.price = Decimal::new(9999, 2);
    repo_box.save(repriced).await.unwrap();
    let fetched = repo_order.fetch("oid-s1").await.unwrap().unwrap();
    assert_eq!(fetched.payment.amount, amount_before);
}

#[tokio::test]
async fn update_status_persists_fulfillment() {
    let ds_ctx = in_mem_ds_ctx_setup(40);
    let repo = app_repo_order(ds_ctx).await.unwrap();
    let order = ut_setup_order("oid-u1", 101, 202, OrderStatus::Processing, "2024-05-17T09:15:00+08:00");
    repo.create(order).await.unwrap();
    let mut updated = repo.fetch("oid-u1").await.unwrap().unwrap();
    let expect_version = updated.version;
    updated.apply_transition(
        202,
        OrderStatus::Shipped,
        Some("JP20240517X".to_string()),
        Some("fragile".to_string()),
    );
    repo.update_status(&updated, expect_version).await.unwrap();
    let fetched = repo.fetch("oid-u1").await.unwrap().unwrap();
    assert_eq!(fetched.status, OrderStatus::Shipped);
    assert_eq!(fetched.progress, OrderStatus::Shipped);
    assert_eq!(fetched.version, 1);
    assert_eq!(
        fetched.fulfillment.tracking_number.as_deref(),
        Some("JP20240517X")
    );
    assert_eq!(fetched.fulfillment.note.as_deref(), Some("fragile"));
    assert_eq!(fetched.fulfillment.updated_by, Some(202));
}

#[tokio::test]
async fn update_status_unknown_id() {
    let ds_ctx = in_mem_ds_ctx_setup(40);
    let repo = app_repo_order(ds_ctx).await.unwrap();
    let mut order = ut_setup_order("oid-miss", 101, 202, OrderStatus::Pending, "2024-05-17T09:15:00+08:00");
    order.apply_transition(202, OrderStatus::Confirmed, None, None);
    let error = repo.update_status(&order, 0).await.unwrap_err();
    assert_eq!(error.code, AppErrorCode::OrderNotExist);
}

#[tokio::test]
async fn update_status_version_conflict() {
    let ds_ctx = in_mem_ds_ctx_setup(40);
    let repo = app_repo_order(ds_ctx).await.unwrap();
    let order = ut_setup_order("oid-c1", 101, 202, OrderStatus::Pending, "2024-05-17T09:15:00+08:00");
    repo.create(order).await.unwrap();
    // two writers load the same version, only the first commit wins
    let mut seller_view = repo.fetch("oid-c1").await.unwrap().unwrap();
    let mut buyer_view = repo.fetch("oid-c1").await.unwrap().unwrap();
    seller_view.apply_transition(202, OrderStatus::Confirmed, None, None);
    repo.update_status(&seller_view, 0).await.unwrap();
    buyer_view.apply_transition(101, OrderStatus::Cancelled, None, None);
    let error = repo.update_status(&buyer_view, 0).await.unwrap_err();
    assert_eq!(error.code, AppErrorCode::VersionConflict);
}

#[tokio::test]
async fn update_status_concurrent_single_winner() {
    let ds_ctx = in_mem_ds_ctx_setup(40);
    let repo = Arc::new(app_repo_order(ds_ctx).await.unwrap());
    let order = ut_setup_order("oid-c2", 101, 202, OrderStatus::Pending, "2024-05-17T09:15:00+08:00");
    repo.create(order).await.unwrap();
    let mut handles = Vec::new();
    for (usr_id, target) in [
        (202u32, OrderStatus::Confirmed),
        (101u32, OrderStatus::Cancelled),
    ] {
        let repo_cpy = repo.clone();
        let handle = tokio::spawn(async move {
            let mut m = repo_cpy.fetch("oid-c2").await.unwrap().unwrap();
            let expect_version = 0u32;
            m.apply_transition(usr_id, target, None, None);
            m.version = expect_version + 1;
            repo_cpy.update_status(&m, expect_version).await
        });
        handles.push(handle);
    }
    let mut num_ok = 0usize;
    let mut num_conflict = 0usize;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => {
                num_ok += 1;
            }
            Err(e) => {
                assert_eq!(e.code, AppErrorCode::VersionConflict);
                num_conflict += 1;
            }
        }
    }
    assert_eq!(num_ok, 1);
    assert_eq!(num_conflict, 1);
}

#[tokio::test]
async fn fetch_by_user_role_and_order() {
    let ds_ctx = in_mem_ds_ctx_setup(40);
    let repo = app_repo_order(ds_ctx).await.unwrap();
    let fixtures = [
        ("oid-h1", 101u32, 202u32, "2024-05-11T10:00:00+08:00"),
        ("oid-h2", 101u32, 203u32, "2024-05-14T10:00:00+08:00"),
        ("oid-h3", 104u32, 101u32, "2024-05-12T10:00:00+08:00"),
        ("oid-h4", 105u32, 202u32, "2024-05-13T10:00:00+08:00"),
    ];
    for (oid, buyer, seller, ctime) in fixtures {
        let m = ut_setup_order(oid, buyer, seller, OrderStatus::Pending, ctime);
        repo.create(m).await.unwrap();
    }
    let bought = repo
        .fetch_by_user(101, OrderAccessRole::Buyer)
        .await
        .unwrap();
    let oids = bought.iter().map(|m| m.id_.as_str()).collect::<Vec<_>>();
    assert_eq!(oids, vec!["oid-h2", "oid-h1"]);
    let sold = repo
        .fetch_by_user(101, OrderAccessRole::Seller)
        .await
        .unwrap();
    assert_eq!(sold.len(), 1);
    assert_eq!(sold[0].id_.as_str(), "oid-h3");
    let none = repo
        .fetch_by_user(999, OrderAccessRole::Buyer)
        .await
        .unwrap();
    assert!(none.is_empty());
}
