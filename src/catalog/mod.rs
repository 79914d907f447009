//! Reference table of platform tokens.

use anyhow::{Context, Result};

use crate::entity::Token;

/// Matches every sector
pub const ALL_SECTORS: &str = "all";

const BUILTIN_TOKENS: &str = include_str!("../../data/tokens.json");

/// Immutable token table, loaded once at startup.
#[derive(Debug, Clone)]
pub struct TokenCatalog {
    tokens: Vec<Token>,
}

impl TokenCatalog {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Catalog shipped with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_TOKENS).context("Failed to parse built-in token table")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn all(&self) -> &[Token] {
        &self.tokens
    }

    pub fn find(&self, id: &str) -> Option<&Token> {
        self.tokens.iter().find(|token| token.id == id)
    }

    /// Tokens in `sector`, in table order. `"all"` returns the whole table;
    /// any other value must match a token's sector exactly.
    pub fn filter_by_sector(&self, sector: &str) -> Vec<&Token> {
        if sector == ALL_SECTORS {
            return self.tokens.iter().collect();
        }

        self.tokens
            .iter()
            .filter(|token| token.sector == sector)
            .collect()
    }

    /// Distinct sectors in first-seen order
    pub fn sectors(&self) -> Vec<&str> {
        let mut sectors: Vec<&str> = Vec::new();
        for token in &self.tokens {
            if !sectors.contains(&token.sector.as_str()) {
                sectors.push(&token.sector);
            }
        }
        sectors
    }
}
