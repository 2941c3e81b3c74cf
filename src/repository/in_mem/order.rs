use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::datastore::{AbstInMemoryDStore, AppInMemFetchedSingleRow};
use crate::error::{AppError, AppErrorCode};
use crate::model::{OrderAccessRole, OrderModel};

use super::super::AbsOrderRepo;

fn corrupt_error(detail: String) -> AppError {
    AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(detail),
    }
}

mod _order_toplvl {
    use std::result::Result as DefaultResult;

    use super::{corrupt_error, AppError, AppInMemFetchedSingleRow, OrderModel};
    use crate::datastore::AbsDStoreFilterKeyOp;
    use crate::model::OrderStatus;
    use chrono::{DateTime, FixedOffset};

    pub(super) const TABLE_LABEL: &str = "order_toplvl";

    pub(super) enum InMemColIdx {
        BoxId,
        BuyerId,
        SellerId,
        Quantity,
        Status,
        Progress,
        Version,
        CreateTime,
        LastUpdate,
        TotNumColumns,
    }
    impl From<InMemColIdx> for usize {
        fn from(value: InMemColIdx) -> usize {
            match value {
                InMemColIdx::BoxId => 0,
                InMemColIdx::BuyerId => 1,
                InMemColIdx::SellerId => 2,
                InMemColIdx::Quantity => 3,
                InMemColIdx::Status => 4,
                InMemColIdx::Progress => 5,
                InMemColIdx::Version => 6,
                InMemColIdx::CreateTime => 7,
                InMemColIdx::LastUpdate => 8,
                InMemColIdx::TotNumColumns => 9,
            }
        }
    }

    pub(super) fn to_inmem_tbl(value: &OrderModel) -> (String, AppInMemFetchedSingleRow) {
        let mut row = (0..InMemColIdx::TotNumColumns.into())
            .map(|_n| String::new())
            .collect::<Vec<String>>();
        let _ = [
            (InMemColIdx::BoxId, value.box_id.clone()),
            (InMemColIdx::BuyerId, value.buyer_id.to_string()),
            (InMemColIdx::SellerId, value.seller_id.to_string()),
            (InMemColIdx::Quantity, value.quantity.to_string()),
            (InMemColIdx::Status, value.status.as_str().to_string()),
            (InMemColIdx::Progress, value.progress.as_str().to_string()),
            (InMemColIdx::Version, value.version.to_string()),
            (InMemColIdx::CreateTime, value.create_time.to_rfc3339()),
            (InMemColIdx::LastUpdate, value.last_update.to_rfc3339()),
        ]
        .into_iter()
        .map(|(idx, v)| {
            let idx: usize = idx.into();
            row[idx] = v;
        })
        .count();
        (value.id_.clone(), row)
    } // end of fn to_inmem_tbl

    pub(super) fn get_cell<'a>(
        row: &'a AppInMemFetchedSingleRow,
        idx: InMemColIdx,
    ) -> DefaultResult<&'a str, AppError> {
        let pos: usize = idx.into();
        row.get(pos)
            .map(String::as_str)
            .ok_or_else(|| corrupt_error(format!("{}, missing column {}", TABLE_LABEL, pos)))
    }

    pub(super) fn parse_version(row: &AppInMemFetchedSingleRow) -> DefaultResult<u32, AppError> {
        get_cell(row, InMemColIdx::Version)?
            .parse::<u32>()
            .map_err(|e| corrupt_error(format!("{}, version, {}", TABLE_LABEL, e)))
    }

    pub(super) fn parse_status(raw: &str) -> DefaultResult<OrderStatus, AppError> {
        OrderStatus::try_from_str(raw)
            .ok_or_else(|| corrupt_error(format!("{}, status, {}", TABLE_LABEL, raw)))
    }

    pub(super) fn parse_time(raw: &str) -> DefaultResult<DateTime<FixedOffset>, AppError> {
        DateTime::parse_from_rfc3339(raw)
            .map_err(|e| corrupt_error(format!("{}, time, {}", TABLE_LABEL, e)))
    }

    pub(super) fn parse_u32(raw: &str) -> DefaultResult<u32, AppError> {
        raw.parse::<u32>()
            .map_err(|e| corrupt_error(format!("{}, number, {}", TABLE_LABEL, e)))
    }

    // matches the rows whose buyer or seller column equals the given user
    pub(super) struct InMemFilterByUserOp {
        pub usr_id: String,
        pub col_idx: usize,
    }
    impl AbsDStoreFilterKeyOp for InMemFilterByUserOp {
        fn filter(&self, _key: &String, row: &Vec<String>) -> bool {
            row.get(self.col_idx)
                .map(|v| v == &self.usr_id)
                .unwrap_or(false)
        }
    }
} // end of inner module _order_toplvl

mod _order_payment {
    use std::result::Result as DefaultResult;

    use rust_decimal::Decimal;

    use super::{corrupt_error, AppError, AppInMemFetchedSingleRow, OrderModel};
    use crate::api::dto::CryptoCurrencyDto;
    use crate::model::{PaymentMethodModel, PaymentModel};

    pub(super) const TABLE_LABEL: &str = "order_payment";
    const METHOD_COD: &str = "cod";
    const METHOD_CRYPTO: &str = "crypto";

    pub(super) fn to_inmem_tbl(value: &OrderModel) -> (String, AppInMemFetchedSingleRow) {
        let amount = value.payment.amount.to_string();
        let row = match &value.payment.method {
            PaymentMethodModel::Cod {
                phone,
                est_delivery_days,
            } => vec![
                amount,
                METHOD_COD.to_string(),
                phone.clone(),
                est_delivery_days.to_string(),
            ],
            PaymentMethodModel::Crypto {
                currency,
                buyer_wallet,
                seller_wallet,
            } => vec![
                amount,
                METHOD_CRYPTO.to_string(),
                currency.label().to_string(),
                buyer_wallet.clone(),
                seller_wallet.clone(),
            ],
        };
        (value.id_.clone(), row)
    }

    pub(super) fn parse(row: &AppInMemFetchedSingleRow) -> DefaultResult<PaymentModel, AppError> {
        let mut it = row.iter();
        let amount = it
            .next()
            .ok_or_else(|| corrupt_error(format!("{}, missing amount", TABLE_LABEL)))?
            .parse::<Decimal>()
            .map_err(|e| corrupt_error(format!("{}, amount, {}", TABLE_LABEL, e)))?;
        let mthd_tag = it
            .next()
            .ok_or_else(|| corrupt_error(format!("{}, missing method", TABLE_LABEL)))?;
        let mut remain = it.cloned().collect::<Vec<String>>().into_iter();
        let method = match mthd_tag.as_str() {
            METHOD_COD => {
                let phone = remain
                    .next()
                    .ok_or_else(|| corrupt_error(format!("{}, missing phone", TABLE_LABEL)))?;
                let days = remain
                    .next()
                    .ok_or_else(|| corrupt_error(format!("{}, missing est-days", TABLE_LABEL)))?
                    .parse::<u8>()
                    .map_err(|e| corrupt_error(format!("{}, est-days, {}", TABLE_LABEL, e)))?;
                PaymentMethodModel::Cod {
                    phone,
                    est_delivery_days: days,
                }
            }
            METHOD_CRYPTO => {
                let label = remain
                    .next()
                    .ok_or_else(|| corrupt_error(format!("{}, missing currency", TABLE_LABEL)))?;
                let currency = CryptoCurrencyDto::try_from_label(label.as_str())
                    .ok_or_else(|| corrupt_error(format!("{}, currency, {}", TABLE_LABEL, label)))?;
                let buyer_wallet = remain
                    .next()
                    .ok_or_else(|| corrupt_error(format!("{}, missing buyer wallet", TABLE_LABEL)))?;
                let seller_wallet = remain.next().ok_or_else(|| {
                    corrupt_error(format!("{}, missing seller wallet", TABLE_LABEL))
                })?;
                PaymentMethodModel::Crypto {
                    currency,
                    buyer_wallet,
                    seller_wallet,
                }
            }
            _others => {
                return Err(corrupt_error(format!(
                    "{}, method, {}",
                    TABLE_LABEL, mthd_tag
                )))
            }
        };
        Ok(PaymentModel { amount, method })
    } // end of fn parse
} // end of inner module _order_payment

mod _order_shipping {
    use std::result::Result as DefaultResult;

    use super::{corrupt_error, AppError, AppInMemFetchedSingleRow, OrderModel};
    use crate::api::dto::PhoneNumberDto;
    use crate::model::ShippingAddressModel;

    pub(super) const TABLE_LABEL: &str = "order_shipping";

    pub(super) fn to_inmem_tbl(value: &OrderModel) -> (String, AppInMemFetchedSingleRow) {
        let s = &value.shipping;
        let row = vec![
            s.first_name.clone(),
            s.last_name.clone(),
            s.email.clone(),
            s.phone.nation.to_string(),
            s.phone.number.clone(),
            s.country.clone(),
            s.city.clone(),
            s.street.clone(),
            s.detail.clone(),
        ];
        (value.id_.clone(), row)
    }

    pub(super) fn parse(
        row: &AppInMemFetchedSingleRow,
    ) -> DefaultResult<ShippingAddressModel, AppError> {
        if row.len() < 9 {
            return Err(corrupt_error(format!(
                "{}, expect 9 columns, got {}",
                TABLE_LABEL,
                row.len()
            )));
        }
        let nation = row[3]
            .parse::<u16>()
            .map_err(|e| corrupt_error(format!("{}, phone nation, {}", TABLE_LABEL, e)))?;
        Ok(ShippingAddressModel {
            first_name: row[0].clone(),
            last_name: row[1].clone(),
            email: row[2].clone(),
            phone: PhoneNumberDto {
                nation,
                number: row[4].clone(),
            },
            country: row[5].clone(),
            city: row[6].clone(),
            street: row[7].clone(),
            detail: row[8].clone(),
        })
    }
} // end of inner module _order_shipping

mod _order_fulfillment {
    use std::result::Result as DefaultResult;

    use super::{corrupt_error, AppError, AppInMemFetchedSingleRow, OrderModel};
    use crate::model::FulfillmentNoteModel;
    use chrono::DateTime;

    pub(super) const TABLE_LABEL: &str = "order_fulfillment";

    // absent optional values are stored as empty cells
    fn opt_cell(value: Option<&String>) -> String {
        value.cloned().unwrap_or_default()
    }

    pub(super) fn to_inmem_tbl(value: &OrderModel) -> (String, AppInMemFetchedSingleRow) {
        let f = &value.fulfillment;
        let row = vec![
            opt_cell(f.tracking_number.as_ref()),
            opt_cell(f.note.as_ref()),
            f.updated_by.map(|u| u.to_string()).unwrap_or_default(),
            f.updated_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ];
        (value.id_.clone(), row)
    }

    pub(super) fn parse(
        row: &AppInMemFetchedSingleRow,
    ) -> DefaultResult<FulfillmentNoteModel, AppError> {
        if row.len() < 4 {
            return Err(corrupt_error(format!(
                "{}, expect 4 columns, got {}",
                TABLE_LABEL,
                row.len()
            )));
        }
        let updated_by = if row[2].is_empty() {
            None
        } else {
            let u = row[2]
                .parse::<u32>()
                .map_err(|e| corrupt_error(format!("{}, updated-by, {}", TABLE_LABEL, e)))?;
            Some(u)
        };
        let updated_at = if row[3].is_empty() {
            None
        } else {
            let t = DateTime::parse_from_rfc3339(row[3].as_str())
                .map_err(|e| corrupt_error(format!("{}, updated-at, {}", TABLE_LABEL, e)))?;
            Some(t)
        };
        Ok(FulfillmentNoteModel {
            tracking_number: Some(row[0].clone()).filter(|v| !v.is_empty()),
            note: Some(row[1].clone()).filter(|v| !v.is_empty()),
            updated_by,
            updated_at,
        })
    }
} // end of inner module _order_fulfillment

pub(crate) struct OrderInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl OrderInMemRepo {
    pub async fn build(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(_order_toplvl::TABLE_LABEL).await?;
        m.create_table(_order_payment::TABLE_LABEL).await?;
        m.create_table(_order_shipping::TABLE_LABEL).await?;
        m.create_table(_order_fulfillment::TABLE_LABEL).await?;
        Ok(Self { datastore: m })
    }

    fn rows_to_model(
        oid: &str,
        toplvl: AppInMemFetchedSingleRow,
        payment: AppInMemFetchedSingleRow,
        shipping: AppInMemFetchedSingleRow,
        fulfillment: AppInMemFetchedSingleRow,
    ) -> DefaultResult<OrderModel, AppError> {
        use _order_toplvl::InMemColIdx;
        let status = _order_toplvl::parse_status(_order_toplvl::get_cell(
            &toplvl,
            InMemColIdx::Status,
        )?)?;
        let progress = _order_toplvl::parse_status(_order_toplvl::get_cell(
            &toplvl,
            InMemColIdx::Progress,
        )?)?;
        let create_time =
            _order_toplvl::parse_time(_order_toplvl::get_cell(&toplvl, InMemColIdx::CreateTime)?)?;
        let last_update =
            _order_toplvl::parse_time(_order_toplvl::get_cell(&toplvl, InMemColIdx::LastUpdate)?)?;
        Ok(OrderModel {
            id_: oid.to_string(),
            box_id: _order_toplvl::get_cell(&toplvl, InMemColIdx::BoxId)?.to_string(),
            buyer_id: _order_toplvl::parse_u32(_order_toplvl::get_cell(
                &toplvl,
                InMemColIdx::BuyerId,
            )?)?,
            seller_id: _order_toplvl::parse_u32(_order_toplvl::get_cell(
                &toplvl,
                InMemColIdx::SellerId,
            )?)?,
            quantity: _order_toplvl::parse_u32(_order_toplvl::get_cell(
                &toplvl,
                InMemColIdx::Quantity,
            )?)?,
            status,
            progress,
            payment: _order_payment::parse(&payment)?,
            shipping: _order_shipping::parse(&shipping)?,
            fulfillment: _order_fulfillment::parse(&fulfillment)?,
            create_time,
            last_update,
            version: _order_toplvl::parse_version(&toplvl)?,
        })
    } // end of fn rows_to_model
} // end of impl OrderInMemRepo

#[async_trait]
impl AbsOrderRepo for OrderInMemRepo {
    async fn create(&self, order: OrderModel) -> DefaultResult<(), AppError> {
        let rows = [
            (_order_toplvl::TABLE_LABEL, _order_toplvl::to_inmem_tbl(&order)),
            (
                _order_payment::TABLE_LABEL,
                _order_payment::to_inmem_tbl(&order),
            ),
            (
                _order_shipping::TABLE_LABEL,
                _order_shipping::to_inmem_tbl(&order),
            ),
            (
                _order_fulfillment::TABLE_LABEL,
                _order_fulfillment::to_inmem_tbl(&order),
            ),
        ];
        let data = rows
            .into_iter()
            .map(|(label, (pkey, row))| (label.to_string(), HashMap::from([(pkey, row)])))
            .collect();
        let _num = self.datastore.save(data).await?;
        Ok(())
    }

    async fn fetch(&self, oid: &str) -> DefaultResult<Option<OrderModel>, AppError> {
        let tbl_labels = [
            _order_toplvl::TABLE_LABEL,
            _order_payment::TABLE_LABEL,
            _order_shipping::TABLE_LABEL,
            _order_fulfillment::TABLE_LABEL,
        ];
        let info = tbl_labels
            .iter()
            .map(|label| (label.to_string(), vec![oid.to_string()]))
            .collect();
        let mut data = self.datastore.fetch(info).await?;
        let mut take_row = |label: &str| {
            data.get_mut(label).and_then(|t| t.remove(oid))
        };
        let toplvl = match take_row(_order_toplvl::TABLE_LABEL) {
            Some(r) => r,
            None => return Ok(None),
        };
        let missing = |label: &str| corrupt_error(format!("missing row, {}, {}", label, oid));
        let payment = take_row(_order_payment::TABLE_LABEL)
            .ok_or_else(|| missing(_order_payment::TABLE_LABEL))?;
        let shipping = take_row(_order_shipping::TABLE_LABEL)
            .ok_or_else(|| missing(_order_shipping::TABLE_LABEL))?;
        let fulfillment = take_row(_order_fulfillment::TABLE_LABEL)
            .ok_or_else(|| missing(_order_fulfillment::TABLE_LABEL))?;
        let m = Self::rows_to_model(oid, toplvl, payment, shipping, fulfillment)?;
        Ok(Some(m))
    } // end of fn fetch

    async fn update_status(
        &self,
        updated: &OrderModel,
        expect_version: u32,
    ) -> DefaultResult<(), AppError> {
        let oid = updated.id_.as_str();
        let info = HashMap::from([(
            _order_toplvl::TABLE_LABEL.to_string(),
            vec![oid.to_string()],
        )]);
        let (mut rawdata, lock) = self.datastore.fetch_acquire(info).await?;
        let row = rawdata
            .get_mut(_order_toplvl::TABLE_LABEL)
            .and_then(|t| t.remove(oid))
            .ok_or(AppError {
                code: AppErrorCode::OrderNotExist,
                detail: Some(oid.to_string()),
            })?;
        let stored_version = _order_toplvl::parse_version(&row)?;
        if stored_version != expect_version {
            return Err(AppError {
                code: AppErrorCode::VersionConflict,
                detail: Some(format!(
                    "expect:{}, stored:{}",
                    expect_version, stored_version
                )),
            });
        }
        let rows = [
            (_order_toplvl::TABLE_LABEL, _order_toplvl::to_inmem_tbl(updated)),
            (
                _order_fulfillment::TABLE_LABEL,
                _order_fulfillment::to_inmem_tbl(updated),
            ),
        ];
        let data = rows
            .into_iter()
            .map(|(label, (pkey, row))| (label.to_string(), HashMap::from([(pkey, row)])))
            .collect();
        let _num = self.datastore.save_release(data, lock)?;
        Ok(())
    } // end of fn update_status

    async fn fetch_by_user(
        &self,
        usr_id: u32,
        role: OrderAccessRole,
    ) -> DefaultResult<Vec<OrderModel>, AppError> {
        let col_idx: usize = match role {
            OrderAccessRole::Buyer => _order_toplvl::InMemColIdx::BuyerId.into(),
            OrderAccessRole::Seller => _order_toplvl::InMemColIdx::SellerId.into(),
        };
        let op = _order_toplvl::InMemFilterByUserOp {
            usr_id: usr_id.to_string(),
            col_idx,
        };
        let keys = self
            .datastore
            .filter_keys(_order_toplvl::TABLE_LABEL.to_string(), &op)
            .await?;
        let mut out = Vec::with_capacity(keys.len());
        for oid in keys {
            if let Some(m) = self.fetch(oid.as_str()).await? {
                out.push(m);
            }
        }
        out.sort_by(|a, b| b.create_time.cmp(&a.create_time));
        Ok(out)
    } // end of fn fetch_by_user
} // end of impl AbsOrderRepo for OrderInMemRepo
