use serde_derive::Serialize;
use utoipa::ToSchema;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentEnvironment {
    Local,
    Dev,
    Staging,
    Prod,
}

impl DeploymentEnvironment {
    /// Reads `CURR_ENV`; unknown values fall back to `Local`, unset to `Prod`.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some(s) => match s.trim().to_ascii_lowercase().as_str() {
                "local" | "localhost" => DeploymentEnvironment::Local,
                "dev" | "develop" | "development" => DeploymentEnvironment::Dev,
                "staging" | "stage" | "stg" => DeploymentEnvironment::Staging,
                "prd" | "prod" | "production" => DeploymentEnvironment::Prod,
                _ => DeploymentEnvironment::Local,
            },
            None => DeploymentEnvironment::Prod,
        }
    }
}
