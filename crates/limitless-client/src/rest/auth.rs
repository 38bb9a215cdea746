//! Login types for POST /auth/login
//!
//! # Client modes
//! The `client` field selects which address must have produced the login
//! signature (and later, order signatures):
//! - `eoa`: a standard private-key address signs for itself
//! - `smart-wallet`: the owner key signs on behalf of the smart-wallet
//!   address that holds the funds
//!
//! Picking the wrong mode for a given address yields HTTP 400
//! "Signer does not match" (`ApiError::SignerMismatch`); the fix is to
//! re-authenticate with the correct mode, not to retry.
//!
//! Wallet signing itself is out of scope here: callers supply a
//! pre-computed signature string.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Authentication client mode
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClientMode {
    /// Externally owned account: the address itself signs
    #[serde(rename = "eoa")]
    Eoa,
    /// Smart-wallet account: the owner key signs for the wallet address
    #[serde(rename = "smart-wallet")]
    SmartWallet,
}

impl ClientMode {
    /// Wire value for the `client` field
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientMode::Eoa => "eoa",
            ClientMode::SmartWallet => "smart-wallet",
        }
    }

    /// Parse from string (CLI input)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "eoa" => Some(ClientMode::Eoa),
            "smart-wallet" | "smart_wallet" | "smartwallet" => Some(ClientMode::SmartWallet),
            _ => None,
        }
    }
}

/// Request body for POST /auth/login
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Client mode: decides which address must sign
    pub client: ClientMode,

    /// Account address (EOA address, or smart-wallet address in
    /// smart-wallet mode)
    pub address: String,

    /// Signature over `message`, produced outside this crate
    pub signature: String,

    /// The signed login message
    pub message: String,
}

/// Session token returned by POST /auth/login
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    /// Bearer token for authenticated calls
    pub token: String,

    /// Address the session is bound to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Extra fields for forward compatibility
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionToken")
            .field(
                "token",
                &format!("{}...", self.token.chars().take(8).collect::<String>()),
            )
            .field("address", &self.address)
            .finish()
    }
}
