//! Error types and handling for the Ramadan app backend

use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum IftarError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// External API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Persistence errors
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Every prayer-time lookup of a request failed
    #[error("No prayer times could be retrieved")]
    NoTimingsAvailable,

    /// HTTP transport errors
    #[error("HTTP error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl IftarError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-facing (Arabic) error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            IftarError::Config { .. } => "خطأ في إعدادات الخادم".to_string(),
            IftarError::Api { .. } | IftarError::Http { .. } => {
                "تعذر الاتصال بالخدمات الخارجية".to_string()
            }
            IftarError::Storage { .. } => "فشل حفظ البيانات في قاعدة البيانات".to_string(),
            IftarError::NoTimingsAvailable => "لم يتم الحصول على أي مواعيد".to_string(),
            IftarError::General { message } => format!("حدث خطأ غير متوقع: {message}"),
        }
    }
}

impl From<sqlx::Error> for IftarError {
    fn from(err: sqlx::Error) -> Self {
        IftarError::storage(err.to_string())
    }
}
