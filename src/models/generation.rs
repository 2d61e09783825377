//! Stored image generations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row of the `generations` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Generation {
    pub id: u64,
    pub prompt: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl Generation {
    /// Whether the image is served by this backend rather than an external host
    #[must_use]
    pub fn is_local_image(&self) -> bool {
        is_local_image_url(&self.image_url)
    }
}

#[must_use]
pub fn is_local_image_url(url: &str) -> bool {
    !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_image_detection() {
        assert!(is_local_image_url("/static/generated/abc.png"));
        assert!(!is_local_image_url("https://via.placeholder.com/512"));
        assert!(!is_local_image_url("http://example.com/x.png"));
        assert!(!is_local_image_url(""));
    }
}
