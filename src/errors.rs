//! Unified error type for the order desk core.
//!
//! Every fallible operation returns [`Result`]. Variants fall into two groups:
//! caller-facing failures (authentication, authorization, lookups, validation),
//! which carry a user-safe message, and internal failures (store, hashing,
//! signing, configuration), which are logged in full and surfaced generically.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Message shown to callers for any internal failure.
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Errors produced by the order desk core
#[derive(Debug, Error)]
pub enum Error {
    /// No bearer credential was supplied.
    #[error("No token provided")]
    Unauthenticated,

    /// The token is malformed, expired, or its signature does not verify.
    #[error("Invalid token: {reason}")]
    InvalidToken { reason: String },

    /// Unknown email or wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Correct credentials, but the client account has not been approved yet.
    #[error("Not approved yet")]
    PendingApproval,

    /// Authenticated, but the role or ownership check failed.
    #[error("Access denied: {reason}")]
    Forbidden { reason: String },

    /// A resource id did not resolve.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: i64 },

    /// The product referenced by a new order does not exist.
    #[error("Product not found: {id}")]
    ProductNotFound { id: i64 },

    /// Registration attempted with an email that is already in use.
    #[error("Email already exists: {email}")]
    EmailTaken { email: String },

    /// Input failed a shape or range check.
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// A monetary amount is out of range.
    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: Decimal },

    /// The configuration file or environment is missing or invalid.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The store rejected or failed a query.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Hashing or parsing a stored password hash failed.
    #[error("Password hashing error: {message}")]
    PasswordHash { message: String },

    /// Signing a token failed.
    #[error("Token signing error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::Forbidden`] with the given reason.
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    /// True for failures the caller cannot act on (store, hashing, signing, config).
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::Database(_)
                | Self::PasswordHash { .. }
                | Self::Token(_)
        )
    }

    /// HTTP-equivalent status classification of this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated | Self::InvalidCredentials => 401,
            Self::InvalidToken { .. } | Self::PendingApproval | Self::Forbidden { .. } => 403,
            Self::NotFound { .. } | Self::ProductNotFound { .. } => 404,
            Self::EmailTaken { .. } => 409,
            Self::Validation { .. } | Self::InvalidAmount { .. } => 400,
            Self::Config { .. }
            | Self::Database(_)
            | Self::PasswordHash { .. }
            | Self::Token(_) => 500,
        }
    }

    /// Converts the error into what a caller is allowed to see.
    ///
    /// Internal errors are logged here with full detail and replaced by
    /// [`INTERNAL_MESSAGE`]; token failures collapse to a fixed message so the
    /// verification reason stays server-side.
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        let message = if self.is_internal() {
            tracing::error!(error = %self, "Unhandled internal error");
            INTERNAL_MESSAGE.to_string()
        } else if matches!(self, Self::InvalidToken { .. }) {
            "Invalid token".to_string()
        } else {
            self.to_string()
        };

        ErrorResponse {
            status: self.status_code(),
            message,
        }
    }
}

/// Caller-safe rendering of an [`Error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// Status classification (401, 403, 404, 409, 400 or 500)
    pub status: u16,
    /// User-safe message
    pub message: String,
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
