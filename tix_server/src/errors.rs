use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use thiserror::Error;
use tix_engine::{helpers::Transient, AvailabilityError, CheckInError, EventSetupError, PurchaseError, StorageError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("{0}")]
    Purchase(#[from] PurchaseError),
    #[error("{0}")]
    CheckIn(#[from] CheckInError),
    #[error("{0}")]
    EventSetup(#[from] EventSetupError),
    #[error("{0}")]
    Availability(#[from] AvailabilityError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Purchase(e) => match e {
                PurchaseError::InvalidQuantity(_) => StatusCode::BAD_REQUEST,
                PurchaseError::TierNotFound(_) => StatusCode::NOT_FOUND,
                PurchaseError::TierInactive(_) => StatusCode::CONFLICT,
                PurchaseError::SoldOut { .. } => StatusCode::CONFLICT,
                PurchaseError::PriceOverflow => StatusCode::BAD_REQUEST,
                PurchaseError::StorageFailure(e) => storage_status(e),
            },
            Self::CheckIn(CheckInError::StorageFailure(e)) => storage_status(e),
            Self::EventSetup(e) => match e {
                EventSetupError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                EventSetupError::EventNotFound(_) => StatusCode::NOT_FOUND,
                EventSetupError::TierNotFound(_) => StatusCode::NOT_FOUND,
                EventSetupError::EventLocked(_) => StatusCode::CONFLICT,
                EventSetupError::StorageFailure(e) => storage_status(e),
            },
            Self::Availability(e) => match e {
                AvailabilityError::TierNotFound(_) => StatusCode::NOT_FOUND,
                AvailabilityError::EventNotFound(_) => StatusCode::NOT_FOUND,
                AvailabilityError::TicketNotFound(_) => StatusCode::NOT_FOUND,
                AvailabilityError::StorageFailure(e) => storage_status(e),
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

/// A busy database is worth retrying later. Anything else is a fault on our side.
fn storage_status(e: &StorageError) -> StatusCode {
    if e.is_transient() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
