//! The ledger collaborator the controller mints and burns through.

use crate::LedgerError;
use qcat_types::{AccountId, Amount, TokenKind};

/// Balance ledger for the three token kinds.
///
/// Every call is atomic on its own: a failed `burn` or `mint` leaves all
/// balances untouched.
pub trait Ledger: Send + Sync {
    /// Credit `amount` of `kind` to `account`, growing the supply.
    fn mint(&self, account: &AccountId, kind: TokenKind, amount: Amount) -> Result<(), LedgerError>;

    /// Debit `amount` of `kind` from `account`, shrinking the supply. Fails
    /// with [`LedgerError::InsufficientBalance`] if the balance is short.
    fn burn(&self, account: &AccountId, kind: TokenKind, amount: Amount) -> Result<(), LedgerError>;

    fn balance_of(&self, account: &AccountId, kind: TokenKind) -> Amount;

    fn total_supply(&self, kind: TokenKind) -> Amount;
}
