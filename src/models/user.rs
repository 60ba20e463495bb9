use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};
use crate::format::validate_email;

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "doctor" => Some(Role::Doctor),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Form checks run before any network call.
    pub fn validate(&self) -> ClientResult<()> {
        validate_email_field(&self.email)?;
        validate_password_field(&self.password)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

impl RegisterData {
    pub fn validate(&self) -> ClientResult<()> {
        if self.name.trim().is_empty() {
            return Err(ClientError::validation("name", "El nombre es obligatorio"));
        }
        validate_email_field(&self.email)?;
        validate_password_field(&self.password)
    }
}

/// Payload of a successful login, register or refresh call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: Option<User>,
}

fn validate_email_field(email: &str) -> ClientResult<()> {
    if email.trim().is_empty() {
        return Err(ClientError::validation("email", "El email es obligatorio"));
    }
    if !validate_email(email) {
        return Err(ClientError::validation("email", "Email inválido"));
    }
    Ok(())
}

fn validate_password_field(password: &str) -> ClientResult<()> {
    if password.is_empty() {
        return Err(ClientError::validation("password", "La contraseña es obligatoria"));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ClientError::validation(
            "password",
            format!("La contraseña debe tener al menos {} caracteres", MIN_PASSWORD_LENGTH),
        ));
    }
    Ok(())
}
