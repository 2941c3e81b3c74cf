use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum CryptoCurrencyDto {
    BTC,
    ETH,
    USDT,
}

impl CryptoCurrencyDto {
    pub fn label(&self) -> &'static str {
        match self {
            Self::BTC => "BTC",
            Self::ETH => "ETH",
            Self::USDT => "USDT",
        }
    }
    pub fn try_from_label(raw: &str) -> Option<Self> {
        match raw {
            "BTC" => Some(Self::BTC),
            "ETH" => Some(Self::ETH),
            "USDT" => Some(Self::USDT),
            _others => None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusDto {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Disputed,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PhoneNumberDto {
    pub nation: u16,
    pub number: String,
}
