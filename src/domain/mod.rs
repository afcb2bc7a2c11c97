//! Finance record types and the persisted ledger snapshot.

pub mod category;
pub mod common;
pub mod goal;
pub mod ledger;
pub mod recurring;
pub mod transaction;
pub mod user;
pub mod wallet;

pub use category::{Category, CategoryPatch, NewCategory, DEFAULT_CATEGORIES};
pub use common::{EntryKind, Identifiable, NamedEntity, OwnedByUser, RecordId, DEFAULT_COLOR};
pub use goal::{Goal, GoalPatch, NewGoal};
pub use ledger::{Ledger, CURRENT_SCHEMA_VERSION};
pub use recurring::{NewRecurringTransaction, RecurringTransaction};
pub use transaction::{ImportRow, NewTransaction, Transaction, TransactionPatch};
pub use user::{LoginRecord, User, UserPatch};
pub use wallet::{NewWallet, Wallet, WalletKind, WalletPatch};
