//! User record types as served by the remote endpoint.
//!
//! Records keep any JSON members the screen does not edit (`address`,
//! `company.catchPhrase`, ...) in `extra` maps so updates send them back
//! untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::FieldError;

/// Record identifier. `0` marks a record the remote side has not assigned yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl UserId {
    pub const UNASSIGNED: UserId = UserId(0);

    pub fn is_unassigned(&self) -> bool {
        self.0 == 0
    }

    pub fn next(self) -> Self {
        UserId(self.0.saturating_add(1))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Company {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    #[serde(skip_serializing_if = "UserId::is_unassigned")]
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub company: Company,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// The record a create form starts from: unassigned id, empty fields.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Return a copy with `path` set to `value`; every other field is kept.
    pub fn with_field(self, path: FieldPath, value: impl Into<String>) -> Self {
        let value = value.into();
        match path {
            FieldPath::Name => Self { name: value, ..self },
            FieldPath::Username => Self { username: value, ..self },
            FieldPath::Email => Self { email: value, ..self },
            FieldPath::Phone => Self { phone: value, ..self },
            FieldPath::Website => Self { website: value, ..self },
            FieldPath::CompanyName => Self {
                company: Company { name: value, ..self.company },
                ..self
            },
        }
    }

    pub fn with_id(self, id: UserId) -> Self {
        Self { id, ..self }
    }

    pub fn field(&self, path: FieldPath) -> &str {
        match path {
            FieldPath::Name => &self.name,
            FieldPath::Username => &self.username,
            FieldPath::Email => &self.email,
            FieldPath::Phone => &self.phone,
            FieldPath::Website => &self.website,
            FieldPath::CompanyName => &self.company.name,
        }
    }
}

/// Editable field, addressed by a dot-qualified path such as `company.name`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Name,
    Username,
    Email,
    Phone,
    Website,
    CompanyName,
}

impl FieldPath {
    /// Form order.
    pub const ALL: [FieldPath; 6] = [
        FieldPath::Name,
        FieldPath::Username,
        FieldPath::Email,
        FieldPath::Phone,
        FieldPath::Website,
        FieldPath::CompanyName,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldPath::Name => "name",
            FieldPath::Username => "username",
            FieldPath::Email => "email",
            FieldPath::Phone => "phone",
            FieldPath::Website => "website",
            FieldPath::CompanyName => "company.name",
        }
    }

    /// Placeholder text shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            FieldPath::Name => "Name",
            FieldPath::Username => "Username",
            FieldPath::Email => "Email",
            FieldPath::Phone => "Phone",
            FieldPath::Website => "Website",
            FieldPath::CompanyName => "Company Name",
        }
    }
}

impl FromStr for FieldPath {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = s.trim().split('.');
        let head = segments.next().unwrap_or("");
        let tail = segments.next();
        if segments.next().is_some() {
            return Err(FieldError::UnknownField(s.to_string()));
        }
        match (head, tail) {
            ("name", None) => Ok(FieldPath::Name),
            ("username", None) => Ok(FieldPath::Username),
            ("email", None) => Ok(FieldPath::Email),
            ("phone", None) => Ok(FieldPath::Phone),
            ("website", None) => Ok(FieldPath::Website),
            ("company", Some("name")) => Ok(FieldPath::CompanyName),
            _ => Err(FieldError::UnknownField(s.to_string())),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
