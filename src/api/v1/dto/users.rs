/*
 * Responsibility
 * - Users の request/response DTO
 * - validate() で形式チェック (email / role / phone の長さなど)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::repos::user_repo::UserRow;

const MAX_NAME_LEN: usize = 128;
const MAX_EMAIL_LEN: usize = 254;
const MAX_ROLE_LEN: usize = 64;
const MAX_PHONE_LEN: usize = 32;

// Distinguishes a missing field (None) from an explicit null (Some(None)).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("user_name is required");
    }
    if name.len() > MAX_NAME_LEN {
        return Err("user_name must be <= 128 chars");
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), &'static str> {
    let email = email.trim();
    if email.len() > MAX_EMAIL_LEN {
        return Err("email must be <= 254 chars");
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err("email is invalid"),
    }
}

fn validate_role(role: &str) -> Result<(), &'static str> {
    if role.trim().is_empty() {
        return Err("role is required");
    }
    if role.len() > MAX_ROLE_LEN {
        return Err("role must be <= 64 chars");
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if phone.len() > MAX_PHONE_LEN {
        return Err("phone must be <= 32 chars");
    }
    Ok(())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub user_name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_name(&self.user_name)?;
        validate_email(&self.email)?;
        validate_role(&self.role)?;
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    // Tri-state:
    // - None: field missing (do not update)
    // - Some(None): null (set NULL)
    // - Some(Some(v)): set value
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.user_name {
            validate_name(name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(role) = &self.role {
            validate_role(role)?;
        }
        if let Some(Some(phone)) = &self.phone {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            user_name: row.user_name,
            email: row.email,
            role: row.role,
            phone: row.phone,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}
