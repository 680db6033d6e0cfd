use crate::principal::{Principal, Role};

/// Environment-driven configuration for the inbox tail binary.
#[derive(Clone)]
pub struct Config {
    pub api_base_url: String,
    pub ws_url: String,
    pub api_token: String,
    pub principal: Principal,
}

impl Config {
    pub fn from_env() -> Self {
        let role: Role = std::env::var("ROLE")
            .unwrap_or_else(|_| "admin".to_string())
            .parse()
            .expect("ROLE must be one of super_admin, admin, employe, client");
        let user_id = std::env::var("USER_ID")
            .expect("USER_ID must be set")
            .parse()
            .expect("USER_ID must be a number");

        Self {
            api_base_url: std::env::var("API_BASE_URL").expect("API_BASE_URL must be set"),
            ws_url: std::env::var("WS_URL").expect("WS_URL must be set"),
            api_token: std::env::var("API_TOKEN").expect("API_TOKEN must be set"),
            principal: Principal { user_id, role },
        }
    }
}
