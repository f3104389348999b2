//! Blink data model.
//!
//! A `BlinkList` lives in one PDA per wallet and is owned by the on-chain
//! program; the structs below mirror its borsh layout field for field.

use crate::error::{BlinkError, BlinkResult};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// Label stored with every Blink; the GET payload shows it on the wallet button.
pub const DEFAULT_LABEL: &str = "Transfer";
pub const MAX_PRESET_AMOUNTS: usize = 9;
const MAX_AMOUNT_DECIMALS: i32 = 3;

#[derive(BorshSerialize, BorshDeserialize, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Blink {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub description: String,
    pub label: String,
    pub to_pubkey: String,
    pub link: String,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BlinkList {
    pub blinks: Vec<Blink>,
    pub is_initialized: bool,
}

impl BlinkList {
    pub fn find(&self, id: &str) -> Option<&Blink> {
        self.blinks.iter().find(|blink| blink.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}

/// Next free id: one past the largest numeric id, `0` for a missing or empty list.
pub fn next_blink_id(list: Option<&BlinkList>) -> BlinkResult<u64> {
    let max = list.and_then(|l| l.blinks.iter().filter_map(|b| b.id.parse::<u64>().ok()).max());
    match max {
        None => Ok(0),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| BlinkError::InvalidDraft("blink id space exhausted".to_string())),
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PresetAmount {
    pub value: f64,
}

/// The `link` column of a Blink: preset amounts plus the manual-amount switch.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BlinkLink {
    #[serde(rename = "a")]
    pub amounts: Vec<PresetAmount>,
    #[serde(rename = "m")]
    pub manual_send: bool,
}

/// One button of an Actions GET payload.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LinkedAction {
    pub label: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ActionParameter>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ActionParameter {
    pub name: String,
    pub label: String,
    pub required: bool,
}

impl BlinkLink {
    pub fn parse(raw: &str) -> BlinkResult<Self> {
        serde_json::from_str(raw).map_err(|e| BlinkError::InvalidLink(e.to_string()))
    }

    pub fn to_json(&self) -> String {
        serde_json::json!({
            "a": self.amounts.iter().map(|p| serde_json::json!({ "value": p.value })).collect::<Vec<_>>(),
            "m": self.manual_send,
        })
        .to_string()
    }

    /// Expands the link into action buttons rooted at `base_href`.
    ///
    /// `base_href` already carries a query string (`...?to=<pubkey>`), so the
    /// amount is appended with `&`.
    pub fn actions(&self, base_href: &str, symbol: &str) -> Vec<LinkedAction> {
        let mut actions: Vec<LinkedAction> = self
            .amounts
            .iter()
            .map(|preset| LinkedAction {
                label: format!("Send {} {}", preset.value, symbol),
                href: format!("{}&amount={}", base_href, preset.value),
                parameters: Vec::new(),
            })
            .collect();

        if self.manual_send {
            actions.push(LinkedAction {
                label: format!("Send {}", symbol),
                href: format!("{}&amount={{amount}}", base_href),
                parameters: vec![ActionParameter {
                    name: "amount".to_string(),
                    label: format!("Enter the amount of {} to send", symbol),
                    required: true,
                }],
            });
        }
        actions
    }
}

/// User input for a new Blink, before an id is assigned.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BlinkDraft {
    pub title: String,
    pub icon: String,
    pub description: String,
    pub to_pubkey: String,
    pub amounts: Vec<f64>,
    pub manual_send: bool,
}

fn has_at_most_decimals(value: f64, decimals: i32) -> bool {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    (value - rounded).abs() <= 4.0 * f64::EPSILON * value.abs().max(1.0)
}

impl BlinkDraft {
    pub fn validate(&self) -> BlinkResult<()> {
        for (field, value) in [
            ("title", &self.title),
            ("icon", &self.icon),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                return Err(BlinkError::InvalidDraft(format!("{} is required", field)));
            }
        }

        Pubkey::from_str(self.to_pubkey.trim()).map_err(|_| {
            BlinkError::InvalidDraft(format!("to_pubkey is not a valid address: {}", self.to_pubkey))
        })?;

        if self.amounts.is_empty() || self.amounts.len() > MAX_PRESET_AMOUNTS {
            return Err(BlinkError::InvalidDraft(format!(
                "between 1 and {} preset amounts are required, got {}",
                MAX_PRESET_AMOUNTS,
                self.amounts.len()
            )));
        }
        for amount in &self.amounts {
            if !amount.is_finite() || *amount <= 0.0 {
                return Err(BlinkError::InvalidDraft(format!("amount must be positive: {}", amount)));
            }
            if !has_at_most_decimals(*amount, MAX_AMOUNT_DECIMALS) {
                return Err(BlinkError::InvalidDraft(format!(
                    "amount allows at most {} decimals: {}",
                    MAX_AMOUNT_DECIMALS, amount
                )));
            }
        }
        Ok(())
    }

    pub fn link(&self) -> BlinkLink {
        BlinkLink {
            amounts: self.amounts.iter().map(|value| PresetAmount { value: *value }).collect(),
            manual_send: self.manual_send,
        }
    }

    /// Validates the draft and turns it into the record stored on-chain.
    pub fn into_blink(self, id: u64) -> BlinkResult<Blink> {
        self.validate()?;
        let link = self.link().to_json();
        Ok(Blink {
            id: id.to_string(),
            title: self.title.trim().to_string(),
            icon: self.icon.trim().to_string(),
            description: self.description.trim().to_string(),
            label: DEFAULT_LABEL.to_string(),
            to_pubkey: self.to_pubkey.trim().to_string(),
            link,
        })
    }
}
