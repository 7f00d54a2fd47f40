use core_config::{server::ServerConfig, FromEnv};
use domain_accounts::{JwtConfig, SuperadminConfig};

pub use core_config::Environment;

/// Application configuration, composed from the shared and domain configs
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub superadmin: SuperadminConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?, // HOST=0.0.0.0, PORT=8080 by default
            jwt: JwtConfig::from_env()?,
            superadmin: SuperadminConfig::from_env()?,
        })
    }
}
