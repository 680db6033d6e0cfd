use serde::{Deserialize, Serialize};

/// Broadcast topic every elevated principal listens on.
pub const ADMIN_TOPIC: &str = "admin.notifications";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Employe,
    Client,
}

impl Role {
    /// Elevated roles use the admin-scoped endpoints and the admin broadcast topic.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::SuperAdmin => write!(f, "super_admin"),
            Role::Admin => write!(f, "admin"),
            Role::Employe => write!(f, "employe"),
            Role::Client => write!(f, "client"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "employe" => Ok(Role::Employe),
            "client" => Ok(Role::Client),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// The authenticated user this engine synchronizes an inbox for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub role: Role,
}

impl Principal {
    pub fn personal_topic(&self) -> String {
        format!("user.{}", self.user_id)
    }

    /// Topics this principal subscribes to, personal first.
    pub fn topics(&self) -> Vec<String> {
        let mut topics = vec![self.personal_topic()];
        if self.role.is_elevated() {
            topics.push(ADMIN_TOPIC.to_string());
        }
        topics
    }
}
