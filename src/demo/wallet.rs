use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

use super::DemoError;
use crate::entity::Token;
use crate::solana::tokens::constants::SOL_SYMBOL;

pub const INITIAL_DEMO_BALANCE: f64 = 100.0;

// Positions smaller than this are treated as fully sold
const DUST: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoTxKind {
    Buy,
    Sell,
    Send,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoTransaction {
    pub id: String,
    pub kind: DemoTxKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    pub symbol: String,
    pub amount: f64,
    /// SOL moved by this entry; zero for token sends
    pub sol_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl DemoTransaction {
    fn new(kind: DemoTxKind, symbol: &str, amount: f64, sol_amount: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            token_id: None,
            symbol: symbol.to_string(),
            amount,
            sol_amount,
            recipient: None,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoPosition {
    pub token_id: String,
    pub symbol: String,
    pub amount: f64,
    pub average_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoWallet {
    pub sol_balance: f64,
    pub positions: Vec<DemoPosition>,
    pub history: Vec<DemoTransaction>,
}

impl Default for DemoWallet {
    fn default() -> Self {
        Self {
            sol_balance: INITIAL_DEMO_BALANCE,
            positions: Vec::new(),
            history: Vec::new(),
        }
    }
}

fn validate_amount(amount: f64) -> Result<(), DemoError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(DemoError::InvalidAmount)
    }
}

impl DemoWallet {
    pub fn position(&self, token_id: &str) -> Option<&DemoPosition> {
        self.positions.iter().find(|p| p.token_id == token_id)
    }

    pub fn holding(&self, token_id: &str) -> f64 {
        self.position(token_id).map_or(0.0, |p| p.amount)
    }

    /// Buy `amount` of `token` at its current value. Checks happen before
    /// any field is touched, so a failed buy leaves the wallet unchanged.
    pub fn buy(&mut self, token: &Token, amount: f64) -> Result<&DemoTransaction, DemoError> {
        validate_amount(amount)?;
        let cost = amount * token.current_value;
        if cost > self.sol_balance {
            return Err(DemoError::InsufficientBalance {
                needed: cost,
                available: self.sol_balance,
            });
        }

        self.sol_balance -= cost;
        match self.positions.iter_mut().find(|p| p.token_id == token.id) {
            Some(position) => {
                let total = position.amount + amount;
                position.average_price =
                    (position.amount * position.average_price + cost) / total;
                position.amount = total;
            }
            None => self.positions.push(DemoPosition {
                token_id: token.id.clone(),
                symbol: token.symbol.clone(),
                amount,
                average_price: token.current_value,
            }),
        }

        let mut tx = DemoTransaction::new(DemoTxKind::Buy, &token.symbol, amount, cost);
        tx.token_id = Some(token.id.clone());
        Ok(self.record(tx))
    }

    pub fn sell(&mut self, token: &Token, amount: f64) -> Result<&DemoTransaction, DemoError> {
        validate_amount(amount)?;
        let index = self.held_index(token, amount)?;

        let proceeds = amount * token.current_value;
        self.take_from_position(index, amount);
        self.sol_balance += proceeds;

        let mut tx = DemoTransaction::new(DemoTxKind::Sell, &token.symbol, amount, proceeds);
        tx.token_id = Some(token.id.clone());
        Ok(self.record(tx))
    }

    /// Simulated transfer. `token = None` sends SOL.
    pub fn send(
        &mut self,
        recipient: &str,
        amount: f64,
        token: Option<&Token>,
    ) -> Result<&DemoTransaction, DemoError> {
        validate_amount(amount)?;
        if Pubkey::from_str(recipient).is_err() {
            return Err(DemoError::InvalidRecipient(recipient.to_string()));
        }

        let mut tx = match token {
            None => {
                if amount > self.sol_balance {
                    return Err(DemoError::InsufficientBalance {
                        needed: amount,
                        available: self.sol_balance,
                    });
                }
                self.sol_balance -= amount;
                DemoTransaction::new(DemoTxKind::Send, SOL_SYMBOL, amount, amount)
            }
            Some(token) => {
                let index = self.held_index(token, amount)?;
                self.take_from_position(index, amount);
                let mut tx = DemoTransaction::new(DemoTxKind::Send, &token.symbol, amount, 0.0);
                tx.token_id = Some(token.id.clone());
                tx
            }
        };

        tx.recipient = Some(recipient.to_string());
        Ok(self.record(tx))
    }

    fn held_index(&self, token: &Token, amount: f64) -> Result<usize, DemoError> {
        let available = self.holding(&token.id);
        match self.positions.iter().position(|p| p.token_id == token.id) {
            Some(index) if available >= amount => Ok(index),
            _ => Err(DemoError::InsufficientHoldings {
                symbol: token.symbol.clone(),
                needed: amount,
                available,
            }),
        }
    }

    fn take_from_position(&mut self, index: usize, amount: f64) {
        let position = &mut self.positions[index];
        position.amount -= amount;
        if position.amount < DUST {
            self.positions.remove(index);
        }
    }

    fn record(&mut self, tx: DemoTransaction) -> &DemoTransaction {
        self.history.push(tx);
        &self.history[self.history.len() - 1]
    }
}

/// Demo mode flag plus the wallet it drives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoState {
    pub active: bool,
    pub wallet: DemoWallet,
}

impl DemoState {
    /// Returns false when already active; the running session is kept.
    pub fn enter(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.wallet = DemoWallet::default();
        true
    }

    pub fn exit(&mut self) {
        self.active = false;
        self.wallet = DemoWallet::default();
    }

    pub fn wallet_mut(&mut self) -> Result<&mut DemoWallet, DemoError> {
        if self.active {
            Ok(&mut self.wallet)
        } else {
            Err(DemoError::Inactive)
        }
    }
}
