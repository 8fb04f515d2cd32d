use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::storage::{RecordParseError, SnapshotRecord, parse_field};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Login account. The password field only ever holds a bcrypt hash.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    pub id: EntityId,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl SnapshotRecord for Account {
    const KIND: &'static str = "account";
    const HEADER: &'static [&'static str] = &["id", "username", "password", "role"];

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.username.clone(),
            self.password_hash.clone(),
            self.role.to_string(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, RecordParseError> {
        if fields.len() != 4 {
            return Err(RecordParseError::FieldCount {
                expected: "4",
                got: fields.len(),
            });
        }
        Ok(Account {
            id: parse_field("id", fields[0])?,
            username: fields[1].to_string(),
            password_hash: fields[2].to_string(),
            role: parse_field("role", fields[3])?,
        })
    }
}
