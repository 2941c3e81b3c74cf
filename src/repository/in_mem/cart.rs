use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::datastore::AbstInMemoryDStore;
use crate::error::AppError;
use crate::model::CartModel;

use super::super::AbsCartRepo;

mod _cart_toplvl {
    use crate::datastore::AppInMemFetchedSingleRow;
    use crate::model::CartModel;

    pub(super) const TABLE_LABEL: &str = "cart_toplvl";

    pub(super) fn inmem_pkey(owner: u32, seq_num: u8) -> String {
        format!("{}-{}", owner, seq_num)
    }

    pub(super) fn to_inmem_tbl(value: &CartModel) -> (String, AppInMemFetchedSingleRow) {
        (
            inmem_pkey(value.owner, value.seq_num),
            vec![value.title.clone()],
        )
    }
}

mod _cart_line {
    use std::result::Result as DefaultResult;

    use chrono::DateTime;
    use rust_decimal::Decimal;

    use crate::datastore::{AbsDStoreFilterKeyOp, AppInMemFetchedSingleRow};
    use crate::error::{AppError, AppErrorCode};
    use crate::model::CartLineModel;

    pub(super) const TABLE_LABEL: &str = "cart_line";

    pub(super) fn inmem_pkey(owner: u32, seq_num: u8, box_id: &str) -> String {
        format!("{}-{}-{}", owner, seq_num, box_id)
    }

    pub(super) fn pkey_prefix(owner: u32, seq_num: u8) -> String {
        format!("{}-{}-", owner, seq_num)
    }

    pub(super) struct InMemFilterPrefixOp {
        pub prefix: String,
    }
    impl AbsDStoreFilterKeyOp for InMemFilterPrefixOp {
        fn filter(&self, key: &String, _row: &Vec<String>) -> bool {
            key.starts_with(self.prefix.as_str())
        }
    }

    pub(super) fn to_inmem_tbl(
        owner: u32,
        seq_num: u8,
        value: &CartLineModel,
    ) -> (String, AppInMemFetchedSingleRow) {
        let row = vec![
            value.title.clone(),
            value.unit_price.to_string(),
            value.quantity.to_string(),
            value.added_at.to_rfc3339(),
        ];
        (inmem_pkey(owner, seq_num, value.box_id.as_str()), row)
    }

    pub(super) fn parse(
        key: &str,
        prefix: &str,
        row: &AppInMemFetchedSingleRow,
    ) -> DefaultResult<CartLineModel, AppError> {
        let corrupt = |msg: String| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(msg),
        };
        if row.len() < 4 {
            return Err(corrupt(format!(
                "{}, expect 4 columns, got {}",
                TABLE_LABEL,
                row.len()
            )));
        }
        let box_id = key
            .strip_prefix(prefix)
            .ok_or_else(|| corrupt(format!("{}, key, {}", TABLE_LABEL, key)))?;
        let unit_price = row[1]
            .parse::<Decimal>()
            .map_err(|e| corrupt(format!("{}, unit-price, {}", TABLE_LABEL, e)))?;
        let quantity = row[2]
            .parse::<u32>()
            .map_err(|e| corrupt(format!("{}, quantity, {}", TABLE_LABEL, e)))?;
        let added_at = DateTime::parse_from_rfc3339(row[3].as_str())
            .map_err(|e| corrupt(format!("{}, added-at, {}", TABLE_LABEL, e)))?;
        Ok(CartLineModel {
            box_id: box_id.to_string(),
            title: row[0].clone(),
            unit_price,
            quantity,
            added_at,
        })
    } // end of fn parse
} // end of inner module _cart_line

pub(crate) struct CartInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl CartInMemRepo {
    pub async fn build(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(_cart_toplvl::TABLE_LABEL).await?;
        m.create_table(_cart_line::TABLE_LABEL).await?;
        Ok(Self { datastore: m })
    }

    async fn saved_line_keys(
        &self,
        owner: u32,
        seq_num: u8,
    ) -> DefaultResult<Vec<String>, AppError> {
        let op = _cart_line::InMemFilterPrefixOp {
            prefix: _cart_line::pkey_prefix(owner, seq_num),
        };
        self.datastore
            .filter_keys(_cart_line::TABLE_LABEL.to_string(), &op)
            .await
    }
} // end of impl CartInMemRepo

#[async_trait]
impl AbsCartRepo for CartInMemRepo {
    async fn update(&self, cart: CartModel) -> DefaultResult<usize, AppError> {
        // lines removed from the model have to disappear from the store,
        // so stale keys are dropped before the fresh rows are written
        let stale_keys = self.saved_line_keys(cart.owner, cart.seq_num).await?;
        if !stale_keys.is_empty() {
            let info = HashMap::from([(_cart_line::TABLE_LABEL.to_string(), stale_keys)]);
            let _num = self.datastore.delete(info).await?;
        }
        let num_lines = cart.saved_lines.len();
        let (t_pkey, t_row) = _cart_toplvl::to_inmem_tbl(&cart);
        let lines = cart
            .saved_lines
            .iter()
            .map(|line| _cart_line::to_inmem_tbl(cart.owner, cart.seq_num, line))
            .collect::<HashMap<String, Vec<String>>>();
        let data = HashMap::from([
            (
                _cart_toplvl::TABLE_LABEL.to_string(),
                HashMap::from([(t_pkey, t_row)]),
            ),
            (_cart_line::TABLE_LABEL.to_string(), lines),
        ]);
        let _num = self.datastore.save(data).await?;
        Ok(num_lines)
    } // end of fn update

    async fn fetch_cart(&self, owner: u32, seq_num: u8) -> DefaultResult<CartModel, AppError> {
        let t_pkey = _cart_toplvl::inmem_pkey(owner, seq_num);
        let line_keys = self.saved_line_keys(owner, seq_num).await?;
        let info = HashMap::from([
            (_cart_toplvl::TABLE_LABEL.to_string(), vec![t_pkey.clone()]),
            (_cart_line::TABLE_LABEL.to_string(), line_keys),
        ]);
        let mut data = self.datastore.fetch(info).await?;
        let mut out = CartModel::new(owner, seq_num);
        let toplvl = data
            .get_mut(_cart_toplvl::TABLE_LABEL)
            .and_then(|t| t.remove(t_pkey.as_str()));
        if let Some(row) = toplvl {
            if let Some(title) = row.first() {
                out.title = title.clone();
            }
        }
        let prefix = _cart_line::pkey_prefix(owner, seq_num);
        if let Some(rows) = data.remove(_cart_line::TABLE_LABEL) {
            for (key, row) in rows {
                let line = _cart_line::parse(key.as_str(), prefix.as_str(), &row)?;
                out.saved_lines.push(line);
            }
        }
        out.saved_lines.sort_by(|a, b| a.added_at.cmp(&b.added_at));
        Ok(out)
    } // end of fn fetch_cart

    async fn num_lines_saved(&self, owner: u32, seq_num: u8) -> DefaultResult<usize, AppError> {
        let keys = self.saved_line_keys(owner, seq_num).await?;
        Ok(keys.len())
    }

    async fn discard(&self, owner: u32, seq_num: u8) -> DefaultResult<(), AppError> {
        let line_keys = self.saved_line_keys(owner, seq_num).await?;
        let info = HashMap::from([
            (
                _cart_toplvl::TABLE_LABEL.to_string(),
                vec![_cart_toplvl::inmem_pkey(owner, seq_num)],
            ),
            (_cart_line::TABLE_LABEL.to_string(), line_keys),
        ]);
        let _num = self.datastore.delete(info).await?;
        Ok(())
    }
} // end of impl AbsCartRepo for CartInMemRepo
