use serde::Deserialize;

use crate::policy::PolicyProfile;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// The only state this sidecar owns: the per-user policy record injected
/// via `profile.set`. Validation itself is stateless.
#[derive(Default)]
pub struct AppState {
    pub profile: Option<PolicyProfile>,
}
