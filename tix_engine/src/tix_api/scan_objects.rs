use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::db_types::{PaymentState, RedemptionState, TicketId};

/// The outcome of presenting a token at the door.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ScanResult {
    Admitted(Admission),
    Rejected(ScanRejection),
}

impl ScanResult {
    pub fn is_admitted(&self) -> bool {
        matches!(self, ScanResult::Admitted(_))
    }

    /// The text shown to the door attendant.
    pub fn message(&self) -> String {
        match self {
            ScanResult::Admitted(a) => a.to_string(),
            ScanResult::Rejected(r) => r.to_string(),
        }
    }
}

impl From<ScanRejection> for ScanResult {
    fn from(reason: ScanRejection) -> Self {
        ScanResult::Rejected(reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admission {
    pub ticket_id: TicketId,
    /// 1-based. Equal to the number of admissions used on the ticket so far, including this one.
    pub scan_number: i64,
    pub total_tickets: i64,
    pub remaining: i64,
    pub buyer_name: String,
    /// The ticket's state after this admission.
    pub redemption_state: RedemptionState,
}

impl Display for Admission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Welcome {}! Entry {} of {}. {} remaining",
            self.buyer_name, self.scan_number, self.total_tickets, self.remaining
        )
    }
}

/// Every reason a scan can be turned away. None of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ScanRejection {
    Malformed,
    BadSignature,
    NotFound,
    WrongEvent { ticket_event: String, scanning_event: String },
    PaymentIncomplete { payment_state: PaymentState },
    FullyRedeemed { quantity_purchased: i64 },
}

impl Display for ScanRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanRejection::Malformed => write!(f, "Invalid code format"),
            ScanRejection::BadSignature => write!(f, "Invalid code signature"),
            ScanRejection::NotFound => write!(f, "Ticket not found"),
            ScanRejection::WrongEvent { ticket_event, scanning_event } => {
                write!(f, "This ticket is for \"{ticket_event}\" not \"{scanning_event}\"")
            },
            ScanRejection::PaymentIncomplete { .. } => write!(f, "Ticket payment not completed"),
            ScanRejection::FullyRedeemed { quantity_purchased } => {
                write!(f, "All {quantity_purchased} entries have been used")
            },
        }
    }
}
