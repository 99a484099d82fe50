//! Paths of the backend endpoints, relative to the API base URL.

pub mod auth {
    pub const LOGIN: &str = "auth/login";
    pub const REGISTER: &str = "auth/register";
    pub const REFRESH: &str = "auth/refresh";
    pub const LOGOUT: &str = "auth/logout";
    pub const ME: &str = "auth/me";
}

pub mod users {
    pub const PROFILE: &str = "users/profile";

    pub fn by_id(id: impl std::fmt::Display) -> String {
        format!("users/{id}")
    }
}

pub mod text {
    pub const PROCESS: &str = "text/process";
    pub const HISTORY: &str = "text/history";
    pub const SAVE: &str = "text/save";
    pub const TRANSCRIBE: &str = "text/transcribe";

    pub fn by_id(id: impl std::fmt::Display) -> String {
        format!("text/{id}")
    }
}

pub mod ar {
    pub const SCENES: &str = "ar/scenes";
    pub const LAUNCH: &str = "ar/launch";
    pub const PREFERENCES: &str = "ar/preferences";

    pub fn scene(id: impl std::fmt::Display) -> String {
        format!("ar/scenes/{id}")
    }
}

pub mod feedback {
    pub const ROOT: &str = "feedback";
    pub const HISTORY: &str = "feedback/history";

    pub fn by_id(id: impl std::fmt::Display) -> String {
        format!("feedback/{id}")
    }
}

pub mod notifications {
    pub const ROOT: &str = "notifications";

    pub fn by_id(id: impl std::fmt::Display) -> String {
        format!("notifications/{id}")
    }
}

pub mod analytics {
    pub const DASHBOARD: &str = "analytics/dashboard";
    pub const USAGE: &str = "analytics/usage";
}
