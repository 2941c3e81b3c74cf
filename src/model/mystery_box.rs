use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::dto::CryptoCurrencyDto;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BoxStatus {
    Active,
    Paused,
    SoldOut,
    Retired,
}

impl BoxStatus {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::SoldOut => "soldout",
            Self::Retired => "retired",
        }
    }
    pub(crate) fn try_from_str(raw: &str) -> Option<Self> {
        match raw {
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            "soldout" => Some(Self::SoldOut),
            "retired" => Some(Self::Retired),
            _others => None,
        }
    }
}

// local replica of a catalog entry, the product service upstream owns
// the source of truth
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MysteryBoxModel {
    pub id_: String,
    pub seller_id: u32,
    pub title: String,
    pub price: Decimal,
    pub quantity: u32,
    pub status: BoxStatus,
    pub free_shipping: bool,
    pub crypto_wallets: HashMap<CryptoCurrencyDto, String>,
}

impl MysteryBoxModel {
    pub fn purchasable(&self) -> bool {
        matches!(self.status, BoxStatus::Active) && self.quantity > 0
    }

    pub fn wallet_for(&self, currency: CryptoCurrencyDto) -> Option<&str> {
        self.crypto_wallets.get(&currency).map(String::as_str)
    }
}
