use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{default_color, Identifiable, NamedEntity, OwnedByUser, RecordId};

/// An account or balance container. Transactions reference wallets loosely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: RecordId,
    pub user_id: RecordId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: WalletKind,
    #[serde(default)]
    pub initial_balance: f64,
    #[serde(default = "default_color")]
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(user_id: RecordId, name: impl Into<String>, kind: WalletKind) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::generate(),
            user_id,
            name: name.into(),
            kind,
            initial_balance: 0.0,
            color: default_color(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Identifiable for Wallet {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl OwnedByUser for Wallet {
    fn user_id(&self) -> &RecordId {
        &self.user_id
    }
}

impl NamedEntity for Wallet {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WalletKind {
    Cash,
    Bank,
    Credit,
    Wallet,
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WalletKind::Cash => "cash",
            WalletKind::Bank => "bank",
            WalletKind::Credit => "credit",
            WalletKind::Wallet => "wallet",
        };
        f.write_str(label)
    }
}

impl FromStr for WalletKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(WalletKind::Cash),
            "bank" => Ok(WalletKind::Bank),
            "credit" => Ok(WalletKind::Credit),
            "wallet" => Ok(WalletKind::Wallet),
            other => Err(format!("unknown wallet type `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewWallet {
    pub name: String,
    pub kind: WalletKind,
    pub initial_balance: Option<f64>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct WalletPatch {
    pub name: Option<String>,
    pub kind: Option<WalletKind>,
    pub initial_balance: Option<f64>,
    pub color: Option<String>,
}
