//! # Ticket token format
//!
//! Ticket holders present a token at the door (usually rendered as a QR code). The token is a compact JSON object that
//! identifies the ticket, the event it admits to, and the buyer:
//!
//! ```text
//!    {"ticketId":"tkt_…","eventId":"evt_…","buyerId":"usr_…"}
//! ```
//!
//! Keys are always written in the order above, so encoding is deterministic. Codes printed by older clients used
//! `partyId` and `userId` for the event and buyer fields; those keys are still accepted when decoding.
//!
//! ## Signed tokens
//!
//! An unsigned token carries no integrity check: anyone who knows the shape can build one. When the codec is
//! constructed with [`TokenCodec::signed`], an additional `sig` field is appended, holding the url-safe base64
//! encoding of
//!
//! ```text
//!    HMAC-SHA256(secret, len(ticketId) ‖ ticketId ‖ len(eventId) ‖ eventId ‖ len(buyerId) ‖ buyerId)
//! ```
//!
//! where each `len` is the big-endian `u64` byte length of the field. A signing codec rejects tokens with a missing or
//! invalid signature.
use hmac::{Hmac, Mac};
use log::trace;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::db_types::{BuyerId, EventId, TicketId};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Malformed ticket token. {0}")]
    Malformed(String),
    #[error("The ticket token signature is missing or invalid")]
    BadSignature,
    #[error("The token signing key is not usable. {0}")]
    InvalidKey(String),
}

/// The three identifiers carried by a ticket token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketToken {
    pub ticket_id: TicketId,
    pub event_id: EventId,
    pub buyer_id: BuyerId,
}

impl TicketToken {
    pub fn new(ticket_id: TicketId, event_id: EventId, buyer_id: BuyerId) -> Self {
        Self { ticket_id, event_id, buyer_id }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenPayload<'a> {
    ticket_id: &'a str,
    event_id: &'a str,
    buyer_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sig: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawToken {
    ticket_id: Option<String>,
    #[serde(alias = "partyId")]
    event_id: Option<String>,
    #[serde(alias = "userId")]
    buyer_id: Option<String>,
    sig: Option<String>,
}

/// Encodes and decodes [`TicketToken`]s, optionally signing them.
#[derive(Clone, Default)]
pub struct TokenCodec {
    mac: Option<HmacSha256>,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = if self.mac.is_some() { "signed" } else { "unsigned" };
        write!(f, "TokenCodec({mode})")
    }
}

impl TokenCodec {
    /// A codec that neither writes nor checks signatures.
    pub fn unsigned() -> Self {
        Self { mac: None }
    }

    /// A codec that signs every token it encodes and only accepts correctly signed tokens.
    pub fn signed(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidKey("The signing secret is empty".into()));
        }
        let mac = HmacSha256::new_from_slice(secret).map_err(|e| TokenError::InvalidKey(e.to_string()))?;
        Ok(Self { mac: Some(mac) })
    }

    pub fn is_signing(&self) -> bool {
        self.mac.is_some()
    }

    pub fn encode(&self, ticket_id: &TicketId, event_id: &EventId, buyer_id: &BuyerId) -> String {
        let sig = self
            .mac
            .as_ref()
            .map(|mac| base64::encode_config(digest(mac, ticket_id, event_id, buyer_id), base64::URL_SAFE_NO_PAD));
        let payload = TokenPayload {
            ticket_id: ticket_id.as_str(),
            event_id: event_id.as_str(),
            buyer_id: buyer_id.as_str(),
            sig,
        };
        // Serializing a struct of strings cannot fail
        serde_json::to_string(&payload).unwrap_or_default()
    }

    pub fn decode(&self, token: &str) -> Result<TicketToken, TokenError> {
        let raw: RawToken = serde_json::from_str(token.trim()).map_err(|e| {
            trace!("🎫️ Could not parse ticket token. {e}");
            TokenError::Malformed(e.to_string())
        })?;
        let ticket_id = raw
            .ticket_id
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TokenError::Malformed("The ticket id is missing".into()))?;
        let event_id = raw.event_id.ok_or_else(|| TokenError::Malformed("The event id is missing".into()))?;
        let buyer_id = raw.buyer_id.ok_or_else(|| TokenError::Malformed("The buyer id is missing".into()))?;
        let token = TicketToken::new(ticket_id.into(), event_id.into(), buyer_id.into());
        if let Some(mac) = &self.mac {
            let sig = raw.sig.ok_or(TokenError::BadSignature)?;
            let sig = base64::decode_config(sig, base64::URL_SAFE_NO_PAD).map_err(|_| TokenError::BadSignature)?;
            let mut mac = mac.clone();
            feed(&mut mac, &token.ticket_id, &token.event_id, &token.buyer_id);
            mac.verify_slice(&sig).map_err(|_| TokenError::BadSignature)?;
        }
        Ok(token)
    }
}

fn feed(mac: &mut HmacSha256, ticket_id: &TicketId, event_id: &EventId, buyer_id: &BuyerId) {
    for field in [ticket_id.as_str(), event_id.as_str(), buyer_id.as_str()] {
        mac.update(&(field.len() as u64).to_be_bytes());
        mac.update(field.as_bytes());
    }
}

fn digest(mac: &HmacSha256, ticket_id: &TicketId, event_id: &EventId, buyer_id: &BuyerId) -> Vec<u8> {
    let mut mac = mac.clone();
    feed(&mut mac, ticket_id, event_id, buyer_id);
    mac.finalize().into_bytes().to_vec()
}
