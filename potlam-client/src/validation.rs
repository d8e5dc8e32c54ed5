//! Client-side form validation
//!
//! Runs before any request is sent. Every failure is a
//! `ClientError::InvalidInput` carrying the message the form shows.

use chrono::{NaiveDate, NaiveTime};

use crate::error::{ClientError, ClientResult};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: category, product, recipe, session type, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes and descriptions
pub const MAX_NOTE_LEN: usize = 2000;

/// Short identifiers: phone, postal code
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LEN: usize = 6;

// ── Text ────────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
/// Returns the trimmed value.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> ClientResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(format!("{field} is required")));
    }
    if trimmed.chars().count() > max_len {
        return Err(invalid(format!(
            "{field} is too long ({} chars, max {max_len})",
            trimmed.chars().count()
        )));
    }
    Ok(trimmed.to_string())
}

/// Optional text: blank becomes `None`, anything else is length-checked.
pub fn validate_optional_text(
    value: &str,
    field: &str,
    max_len: usize,
) -> ClientResult<Option<String>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max_len {
        return Err(invalid(format!("{field} is too long (max {max_len})")));
    }
    Ok(Some(trimmed.to_string()))
}

pub fn validate_email(value: &str) -> ClientResult<String> {
    let email = validate_required_text(value, "Email", MAX_EMAIL_LEN)?;
    if !email.contains('@') {
        return Err(invalid("Please enter a valid email address"));
    }
    Ok(email)
}

// ── Numbers ─────────────────────────────────────────────────────────

/// Parse a non-negative decimal amount (price, opening/closing cash).
pub fn parse_amount(value: &str, field: &str) -> ClientResult<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(format!("{field} is required")));
    }
    let amount: f64 = trimmed
        .parse()
        .map_err(|_| invalid(format!("{field} must be a number")))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(invalid(format!("{field} must be 0 or more")));
    }
    Ok(amount)
}

/// Parse a non-negative whole number (stock, serves, minutes).
pub fn parse_count(value: &str, field: &str) -> ClientResult<u32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(format!("{field} is required")));
    }
    match trimmed.parse::<i64>() {
        Ok(n) if n < 0 => Err(invalid(format!("{field} must be 0 or more"))),
        Ok(n) => u32::try_from(n).map_err(|_| invalid(format!("{field} is too large"))),
        Err(_) => Err(invalid(format!("{field} must be a whole number"))),
    }
}

/// Optional whole number: blank becomes `None`.
pub fn parse_optional_count(value: &str, field: &str) -> ClientResult<Option<u32>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_count(value, field).map(Some)
}

// ── Dates ───────────────────────────────────────────────────────────

/// `YYYY-MM-DD`
pub fn parse_date(value: &str, field: &str) -> ClientResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| invalid(format!("{field} must be a date (YYYY-MM-DD)")))
}

/// `HH:MM`
pub fn parse_time(value: &str, field: &str) -> ClientResult<NaiveTime> {
    shared::util::hhmm::parse(value.trim())
        .map_err(|_| invalid(format!("{field} must be a time (HH:MM)")))
}

fn invalid(message: impl Into<String>) -> ClientError {
    ClientError::InvalidInput(message.into())
}
