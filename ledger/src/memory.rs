//! In-memory ledger backend.

use crate::{Genesis, Ledger, LedgerError};
use qcat_types::{AccountId, Amount, TokenKind};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Balances {
    accounts: HashMap<AccountId, [Amount; 3]>,
    supply: [Amount; 3],
}

/// Aggregate view of the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub super_supply: Amount,
    pub alive_supply: Amount,
    pub dead_supply: Amount,
    /// Accounts with at least one non-zero balance.
    pub holders: usize,
}

/// Thread-safe in-memory [`Ledger`].
#[derive(Default)]
pub struct MemoryLedger {
    inner: Mutex<Balances>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger with the genesis SUPER supply minted to its holder.
    pub fn from_genesis(genesis: &Genesis) -> Result<Self, LedgerError> {
        genesis.validate()?;
        let ledger = Self::new();
        ledger.mint(&genesis.holder, TokenKind::Super, genesis.initial_supply)?;
        tracing::info!(
            holder = %genesis.holder,
            supply = %genesis.initial_supply,
            "ledger seeded from genesis"
        );
        Ok(ledger)
    }

    fn balances(&self) -> MutexGuard<'_, Balances> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move `amount` of `kind` between two holders. Supply is unchanged.
    pub fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        kind: TokenKind,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        let mut state = self.balances();
        let idx = kind.index();
        let available = state
            .accounts
            .get(from)
            .map(|b| b[idx])
            .unwrap_or(Amount::ZERO);
        let debited = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                account: *from,
                kind,
                needed: amount,
                available,
            })?;
        if from == to {
            return Ok(());
        }
        let recipient = state.accounts.get(to).map(|b| b[idx]).unwrap_or(Amount::ZERO);
        // Cannot overflow while supply fits, but stay checked.
        let credited = recipient
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow { kind })?;
        state.accounts.entry(*from).or_default()[idx] = debited;
        state.accounts.entry(*to).or_default()[idx] = credited;
        Ok(())
    }

    pub fn summary(&self) -> LedgerSummary {
        let state = self.balances();
        LedgerSummary {
            super_supply: state.supply[TokenKind::Super.index()],
            alive_supply: state.supply[TokenKind::Alive.index()],
            dead_supply: state.supply[TokenKind::Dead.index()],
            holders: state
                .accounts
                .values()
                .filter(|b| b.iter().any(|a| !a.is_zero()))
                .count(),
        }
    }
}

impl Ledger for MemoryLedger {
    fn mint(&self, account: &AccountId, kind: TokenKind, amount: Amount) -> Result<(), LedgerError> {
        if account.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        let mut state = self.balances();
        let idx = kind.index();
        let supply = state.supply[idx]
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow { kind })?;
        let balance = state.accounts.get(account).map(|b| b[idx]).unwrap_or(Amount::ZERO);
        let balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow { kind })?;
        state.supply[idx] = supply;
        state.accounts.entry(*account).or_default()[idx] = balance;
        Ok(())
    }

    fn burn(&self, account: &AccountId, kind: TokenKind, amount: Amount) -> Result<(), LedgerError> {
        let mut state = self.balances();
        let idx = kind.index();
        let available = state
            .accounts
            .get(account)
            .map(|b| b[idx])
            .unwrap_or(Amount::ZERO);
        let remaining = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                account: *account,
                kind,
                needed: amount,
                available,
            })?;
        // Supply is the sum of balances, so it covers any balance.
        state.supply[idx] = state.supply[idx].saturating_sub(amount);
        state.accounts.entry(*account).or_default()[idx] = remaining;
        Ok(())
    }

    fn balance_of(&self, account: &AccountId, kind: TokenKind) -> Amount {
        self.balances()
            .accounts
            .get(account)
            .map(|b| b[kind.index()])
            .unwrap_or(Amount::ZERO)
    }

    fn total_supply(&self, kind: TokenKind) -> Amount {
        self.balances().supply[kind.index()]
    }
}
