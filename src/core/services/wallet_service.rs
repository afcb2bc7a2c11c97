use chrono::Utc;
use tracing::info;

use crate::core::errors::{FinanceError, Result};
use crate::core::services::{require_finite, require_text, require_user};
use crate::domain::{Ledger, NewWallet, RecordId, Wallet, WalletPatch};

/// CRUD helpers for wallets. Removing a wallet leaves transactions that
/// reference it untouched.
pub struct WalletService;

impl WalletService {
    pub fn create(ledger: &mut Ledger, user_id: &RecordId, input: NewWallet) -> Result<Wallet> {
        require_user(ledger, user_id)?;
        let name = require_text("name", &input.name)?;
        let initial_balance = input.initial_balance.unwrap_or(0.0);
        require_finite("initial balance", initial_balance)?;

        let mut wallet = Wallet::new(user_id.clone(), name, input.kind);
        wallet.initial_balance = initial_balance;
        if let Some(color) = input.color.filter(|c| !c.trim().is_empty()) {
            wallet.color = color;
        }
        ledger.wallets.push(wallet.clone());
        ledger.touch();
        info!(wallet_id = %wallet.id, kind = %wallet.kind, "wallet created");
        Ok(wallet)
    }

    pub fn update(
        ledger: &mut Ledger,
        user_id: &RecordId,
        id: &RecordId,
        patch: WalletPatch,
    ) -> Result<Wallet> {
        let name = patch
            .name
            .as_deref()
            .map(|name| require_text("name", name))
            .transpose()?;
        if let Some(balance) = patch.initial_balance {
            require_finite("initial balance", balance)?;
        }

        let wallet = ledger
            .wallet_mut(user_id, id)
            .ok_or_else(|| FinanceError::WalletNotFound(id.clone()))?;
        if let Some(name) = name {
            wallet.name = name;
        }
        if let Some(kind) = patch.kind {
            wallet.kind = kind;
        }
        if let Some(balance) = patch.initial_balance {
            wallet.initial_balance = balance;
        }
        if let Some(color) = patch.color {
            wallet.color = color;
        }
        wallet.updated_at = Utc::now();
        let updated = wallet.clone();
        ledger.touch();
        Ok(updated)
    }

    pub fn remove(ledger: &mut Ledger, user_id: &RecordId, id: &RecordId) -> Result<Wallet> {
        let position = ledger
            .wallets
            .iter()
            .position(|wallet| &wallet.id == id && &wallet.user_id == user_id)
            .ok_or_else(|| FinanceError::WalletNotFound(id.clone()))?;
        let removed = ledger.wallets.remove(position);
        ledger.touch();
        Ok(removed)
    }

    pub fn list(ledger: &Ledger, user_id: &RecordId) -> Vec<Wallet> {
        ledger.wallets_for(user_id).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{User, WalletKind};

    #[test]
    fn wallet_lifecycle() {
        let mut ledger = Ledger::new();
        let user = User::new("w@example.com", "Wes", "hash");
        let user_id = user.id.clone();
        ledger.users.push(user);

        let wallet = WalletService::create(
            &mut ledger,
            &user_id,
            NewWallet {
                name: "Checking".into(),
                kind: WalletKind::Bank,
                initial_balance: Some(250.0),
                color: None,
            },
        )
        .unwrap();
        assert_eq!(wallet.initial_balance, 250.0);

        let renamed = WalletService::update(
            &mut ledger,
            &user_id,
            &wallet.id,
            WalletPatch {
                name: Some("Main".into()),
                kind: Some(WalletKind::Cash),
                ..WalletPatch::default()
            },
        )
        .unwrap();
        assert_eq!(renamed.name, "Main");
        assert_eq!(renamed.kind, WalletKind::Cash);

        WalletService::remove(&mut ledger, &user_id, &wallet.id).unwrap();
        assert!(WalletService::list(&ledger, &user_id).is_empty());
        let err = WalletService::remove(&mut ledger, &user_id, &wallet.id).unwrap_err();
        assert!(matches!(err, FinanceError::WalletNotFound(_)));
    }
}
