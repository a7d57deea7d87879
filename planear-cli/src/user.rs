//! The demo record type.

use planear::Key;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    pub name: String,
    pub points: i64,
    #[serde(default)]
    pub demerit_points: Option<i64>,
    #[serde(default)]
    pub profile_photo: Option<String>,
}

pub fn extract_key(user: &UserRecord) -> Key {
    user.email.clone()
}

pub fn validate_user(user: &UserRecord) -> Result<(), String> {
    if user.points < 0 {
        return Err("points cannot be negative".to_string());
    }
    if user.demerit_points.is_some_and(|d| d < 0) {
        return Err("demerit points cannot be negative".to_string());
    }
    match user.profile_photo.as_deref() {
        Some(photo) if !photo.is_empty() && !is_request_uri(photo) => {
            Err("invalid profile photo URL".to_string())
        }
        _ => Ok(()),
    }
}

pub fn format_user(user: &UserRecord) -> String {
    let demerit = user
        .demerit_points
        .map_or_else(|| "nil".to_string(), |d| d.to_string());
    let photo = user.profile_photo.as_deref().unwrap_or("nil");
    format!(
        "Email: {}, Name: {}, Points: {}, DemeritPoints: {}, ProfilePhoto: {}",
        user.email, user.name, user.points, demerit, photo
    )
}

pub fn format_key(key: &str) -> String {
    format!("Email: {key}")
}

/// Accepts what an HTTP request line may carry: an absolute URI with a
/// scheme (any scheme, opaque forms included) or an absolute path. Control
/// characters anywhere and whitespace in the authority are rejected.
fn is_request_uri(s: &str) -> bool {
    if s.chars().any(|c| c.is_ascii_control()) {
        return false;
    }
    if s.starts_with('/') {
        return true;
    }
    match s.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => match rest.strip_prefix("//") {
            Some(authority) => !authority
                .split(['/', '?', '#'])
                .next()
                .unwrap_or("")
                .contains(char::is_whitespace),
            None => true,
        },
        _ => false,
    }
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
