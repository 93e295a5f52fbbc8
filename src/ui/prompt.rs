//! Interactive input for ratings, comments and confirmations

use crate::media::validate_rating;
use crate::{Error, Result};
use dialoguer::{Confirm, Input};

/// Parse a typed rating and check it against the scale
pub fn parse_rating(input: &str, rating_scale: f64) -> Result<f64> {
    let rating: f64 = input
        .trim()
        .parse()
        .map_err(|_| Error::Validation("Invalid number".to_string()))?;
    validate_rating(rating, rating_scale)?;
    Ok(rating)
}

/// Ask for a rating, re-prompting until it is valid
pub fn rating(rating_scale: f64, current: Option<f64>) -> Result<f64> {
    let mut input = Input::<String>::new()
        .with_prompt(format!("Rate (0-{:.1})", rating_scale))
        .validate_with(move |value: &String| -> std::result::Result<(), String> {
            parse_rating(value, rating_scale)
                .map(|_| ())
                .map_err(|e| e.to_string())
        });
    if let Some(current) = current {
        input = input.default(format!("{:.1}", current));
    }

    let raw = input
        .interact_text()
        .map_err(|e| Error::UserInput(format!("Failed to get rating input: {}", e)))?;
    parse_rating(&raw, rating_scale)
}

/// Ask for a one-line comment; empty is allowed
pub fn comment(current: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new()
        .with_prompt("Comment")
        .allow_empty(true);
    if let Some(current) = current.filter(|c| !c.is_empty()) {
        input = input.default(current.to_string());
    }

    input
        .interact_text()
        .map(|c| c.trim().to_string())
        .map_err(|e| Error::UserInput(format!("Failed to get comment input: {}", e)))
}

pub fn confirm(question: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact()
        .map_err(|e| Error::UserInput(format!("Failed to get confirmation: {}", e)))
}
