use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::datastore::AbstInMemoryDStore;
use crate::error::{AppError, AppErrorCode};
use crate::model::MysteryBoxModel;

use super::super::AbsMysteryBoxRepo;

mod _mystery_box {
    use std::collections::HashMap;
    use std::result::Result as DefaultResult;

    use rust_decimal::Decimal;

    use crate::api::dto::CryptoCurrencyDto;
    use crate::datastore::AppInMemFetchedSingleRow;
    use crate::error::{AppError, AppErrorCode};
    use crate::model::{BoxStatus, MysteryBoxModel};

    pub(super) const TABLE_LABEL: &str = "mystery_box";
    const WALLET_PAIR_DELIM: &str = "&";
    const WALLET_KV_DELIM: &str = "=";

    fn corrupt_error(detail: String) -> AppError {
        AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(detail),
        }
    }

    fn wallets_to_cell(src: &HashMap<CryptoCurrencyDto, String>) -> String {
        src.iter()
            .map(|(currency, addr)| format!("{}{}{}", currency.label(), WALLET_KV_DELIM, addr))
            .collect::<Vec<String>>()
            .join(WALLET_PAIR_DELIM)
    }

    fn cell_to_wallets(
        raw: &str,
    ) -> DefaultResult<HashMap<CryptoCurrencyDto, String>, AppError> {
        if raw.is_empty() {
            return Ok(HashMap::new());
        }
        let mut out = HashMap::new();
        for pair in raw.split(WALLET_PAIR_DELIM) {
            let (label, addr) = pair
                .split_once(WALLET_KV_DELIM)
                .ok_or_else(|| corrupt_error(format!("{}, wallet pair, {}", TABLE_LABEL, pair)))?;
            let currency = CryptoCurrencyDto::try_from_label(label)
                .ok_or_else(|| corrupt_error(format!("{}, currency, {}", TABLE_LABEL, label)))?;
            out.insert(currency, addr.to_string());
        }
        Ok(out)
    }

    pub(super) fn to_inmem_tbl(value: &MysteryBoxModel) -> (String, AppInMemFetchedSingleRow) {
        let row = vec![
            value.seller_id.to_string(),
            value.title.clone(),
            value.price.to_string(),
            value.quantity.to_string(),
            value.status.as_str().to_string(),
            if value.free_shipping { "1" } else { "0" }.to_string(),
            wallets_to_cell(&value.crypto_wallets),
        ];
        (value.id_.clone(), row)
    }

    pub(super) fn parse(
        id_: &str,
        row: &AppInMemFetchedSingleRow,
    ) -> DefaultResult<MysteryBoxModel, AppError> {
        if row.len() < 7 {
            return Err(corrupt_error(format!(
                "{}, expect 7 columns, got {}",
                TABLE_LABEL,
                row.len()
            )));
        }
        let seller_id = row[0]
            .parse::<u32>()
            .map_err(|e| corrupt_error(format!("{}, seller-id, {}", TABLE_LABEL, e)))?;
        let price = row[2]
            .parse::<Decimal>()
            .map_err(|e| corrupt_error(format!("{}, price, {}", TABLE_LABEL, e)))?;
        let quantity = row[3]
            .parse::<u32>()
            .map_err(|e| corrupt_error(format!("{}, quantity, {}", TABLE_LABEL, e)))?;
        let status = BoxStatus::try_from_str(row[4].as_str())
            .ok_or_else(|| corrupt_error(format!("{}, status, {}", TABLE_LABEL, row[4])))?;
        Ok(MysteryBoxModel {
            id_: id_.to_string(),
            seller_id,
            title: row[1].clone(),
            price,
            quantity,
            status,
            free_shipping: row[5].as_str() == "1",
            crypto_wallets: cell_to_wallets(row[6].as_str())?,
        })
    } // end of fn parse
} // end of inner module _mystery_box

pub(crate) struct MysteryBoxInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl MysteryBoxInMemRepo {
    pub async fn build(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(_mystery_box::TABLE_LABEL).await?;
        Ok(Self { datastore: m })
    }
}

#[async_trait]
impl AbsMysteryBoxRepo for MysteryBoxInMemRepo {
    async fn fetch(&self, box_id: &str) -> DefaultResult<Option<MysteryBoxModel>, AppError> {
        let info = HashMap::from([(
            _mystery_box::TABLE_LABEL.to_string(),
            vec![box_id.to_string()],
        )]);
        let mut data = self.datastore.fetch(info).await?;
        let row = data
            .get_mut(_mystery_box::TABLE_LABEL)
            .and_then(|t| t.remove(box_id));
        match row {
            Some(r) => {
                let m = _mystery_box::parse(box_id, &r)?;
                Ok(Some(m))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, mbox: MysteryBoxModel) -> DefaultResult<(), AppError> {
        if mbox.id_.is_empty() {
            return Err(AppError {
                code: AppErrorCode::EmptyInputData,
                detail: Some("box-id".to_string()),
            });
        }
        let (pkey, row) = _mystery_box::to_inmem_tbl(&mbox);
        let data = HashMap::from([(
            _mystery_box::TABLE_LABEL.to_string(),
            HashMap::from([(pkey, row)]),
        )]);
        let _num = self.datastore.save(data).await?;
        Ok(())
    }
} // end of impl AbsMysteryBoxRepo for MysteryBoxInMemRepo
