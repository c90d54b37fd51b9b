//! Field-level constraints for profile edits.
//!
//! Every validator receives the already-trimmed value and reports the first
//! rule it breaks as a [`ProfileError::InvalidField`].

use plaza_model::chrono::NaiveDate;
use url::Url;

use crate::error::{ProfileError, Result};

pub const DISPLAY_NAME_MAX_CHARS: usize = 50;
pub const BIO_MAX_CHARS: usize = 160;
pub const STATUS_MAX_CHARS: usize = 140;
pub const SECTION_ITEM_LIMIT: usize = 10;
pub const LABEL_MAX_CHARS: usize = 80;

pub fn display_name(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ProfileError::invalid("display_name", "Name is required"));
    }
    max_chars("display_name", value, DISPLAY_NAME_MAX_CHARS)
}

pub fn bio(value: &str) -> Result<()> {
    max_chars("bio", value, BIO_MAX_CHARS)
}

/// Optional http(s) URL. Empty means "cleared".
pub fn website(value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    http_url("website", value)
}

pub fn email(value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(ProfileError::invalid("email", "Enter a valid email"));
    };
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.');
    if local.is_empty() || !domain_ok || value.chars().any(char::is_whitespace)
    {
        return Err(ProfileError::invalid("email", "Enter a valid email"));
    }
    Ok(())
}

pub fn birthday(value: NaiveDate, today: NaiveDate) -> Result<()> {
    if value > today {
        return Err(ProfileError::invalid(
            "birthday",
            "Birthday cannot be in the future",
        ));
    }
    Ok(())
}

pub fn required_label(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ProfileError::invalid(field, "This field is required"));
    }
    max_chars(field, value.trim(), LABEL_MAX_CHARS)
}

pub fn year_range(start: Option<i32>, end: Option<i32>) -> Result<()> {
    for year in [start, end].into_iter().flatten() {
        if !(1900..=2100).contains(&year) {
            return Err(ProfileError::invalid(
                "year",
                format!("{year} is not a plausible year"),
            ));
        }
    }
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        return Err(ProfileError::invalid(
            "year",
            "End year cannot be before start year",
        ));
    }
    Ok(())
}

pub fn link_url(value: &str) -> Result<()> {
    http_url("url", value.trim())
}

pub fn status_text(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ProfileError::invalid("status", "Status cannot be empty"));
    }
    max_chars("status", value, STATUS_MAX_CHARS)
}

fn max_chars(field: &'static str, value: &str, max: usize) -> Result<()> {
    let count = value.chars().count();
    if count > max {
        return Err(ProfileError::invalid(
            field,
            format!("Keep it under {max} characters ({count} used)"),
        ));
    }
    Ok(())
}

fn http_url(field: &'static str, value: &str) -> Result<()> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            Ok(())
        }
        _ => Err(ProfileError::invalid(
            field,
            "Enter a full link starting with http:// or https://",
        )),
    }
}
