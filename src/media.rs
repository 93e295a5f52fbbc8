//! Entry model - watched movies and dramas
//!
//! Every record belongs to exactly one of two categories:
//! - `Movie`: a single feature
//! - `Drama`: a series

use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Category of a watched entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Drama,
}

impl MediaType {
    /// Get the string representation stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Drama => "drama",
        }
    }

    /// Resolve a pair of `--movie` / `--drama` switches.
    ///
    /// Returns `None` when neither is set and an error when both are.
    pub fn from_flags(movie: bool, drama: bool) -> Result<Option<Self>> {
        match (movie, drama) {
            (true, true) => Err(Error::Validation(
                "Cannot specify both --movie and --drama".to_string(),
            )),
            (true, false) => Ok(Some(MediaType::Movie)),
            (false, true) => Ok(Some(MediaType::Drama)),
            (false, false) => Ok(None),
        }
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(MediaType::Movie),
            "drama" => Ok(MediaType::Drama),
            _ => Err(Error::Validation(format!("Unknown media type: {}", s))),
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored record of something watched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaEntry {
    /// Store-assigned identifier, never reused
    pub id: i64,
    pub title: String,
    pub media_type: MediaType,
    pub rating: f64,
    pub comment: String,
    /// Drives year grouping
    pub watched_date: NaiveDateTime,
    /// Informational only; the epoch when the stored value is unreadable
    pub created_at: NaiveDateTime,
}

/// Caller-supplied fields for creating or updating an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub title: String,
    pub media_type: MediaType,
    pub rating: f64,
    pub comment: String,
}

impl NewEntry {
    pub fn new(
        title: impl Into<String>,
        media_type: MediaType,
        rating: f64,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            media_type,
            rating,
            comment: comment.into(),
        }
    }

    /// Check the entry against the configured rating ceiling.
    pub fn validate(&self, rating_scale: f64) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("Title must not be empty".to_string()));
        }
        validate_rating(self.rating, rating_scale)
    }
}

/// Reject ratings outside `[0, rating_scale]`.
pub fn validate_rating(rating: f64, rating_scale: f64) -> Result<()> {
    if !rating.is_finite() || rating < 0.0 || rating > rating_scale {
        return Err(Error::Validation(format!(
            "Rating must be between 0 and {:.1}",
            rating_scale
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_parse() {
        assert_eq!("movie".parse::<MediaType>().unwrap(), MediaType::Movie);
        assert_eq!("DRAMA".parse::<MediaType>().unwrap(), MediaType::Drama);
        assert!("anime".parse::<MediaType>().is_err());
        assert_eq!(MediaType::Drama.to_string(), "drama");
    }

    #[test]
    fn test_from_flags() {
        assert_eq!(MediaType::from_flags(true, false).unwrap(), Some(MediaType::Movie));
        assert_eq!(MediaType::from_flags(false, true).unwrap(), Some(MediaType::Drama));
        assert_eq!(MediaType::from_flags(false, false).unwrap(), None);
        assert!(matches!(
            MediaType::from_flags(true, true),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rating_bounds() {
        assert!(validate_rating(0.0, 5.0).is_ok());
        assert!(validate_rating(5.0, 5.0).is_ok());
        assert!(validate_rating(3.7, 5.0).is_ok());
        assert!(validate_rating(-0.1, 5.0).is_err());
        assert!(validate_rating(5.01, 5.0).is_err());
        assert!(validate_rating(f64::NAN, 5.0).is_err());
        assert!(validate_rating(4.5, 4.0).is_err());
    }

    #[test]
    fn test_blank_title_rejected() {
        let entry = NewEntry::new("   ", MediaType::Movie, 3.0, "");
        assert!(matches!(entry.validate(5.0), Err(Error::Validation(_))));
    }
}
