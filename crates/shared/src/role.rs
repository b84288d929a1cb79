use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role carried in the `role` claim of a backend-issued token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Parent,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Teacher, Role::Student, Role::Parent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Teacher => "TEACHER",
            Role::Student => "STUDENT",
            Role::Parent => "PARENT",
        }
    }

    /// Name shown in the top bar for a logged-in user
    pub fn display_name(&self, username: &str) -> String {
        match self {
            Role::Admin => "Director".to_string(),
            Role::Teacher => format!("Prof. {}", username),
            Role::Student => format!("Elev {}", username),
            Role::Parent => format!("Părinte {}", username),
        }
    }

    pub fn avatar(&self) -> &'static str {
        match self {
            Role::Admin => "👨‍💼",
            Role::Teacher => "👨‍🏫",
            Role::Student => "🎓",
            Role::Parent => "👨‍👩‍👧",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "TEACHER" => Ok(Role::Teacher),
            "STUDENT" => Ok(Role::Student),
            "PARENT" => Ok(Role::Parent),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
