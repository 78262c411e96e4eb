use crate::di::DependenciesInject;
use anyhow::Result;
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::DynJwtService,
    config::{Config, ConnectionPool, JwtConfig},
};
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub registry: Arc<Registry>,
    pub jwt_service: DynJwtService,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("di_container", &self.di_container)
            .field("jwt_service", &"DynJwtService")
            .finish()
    }
}

impl AppState {
    pub fn new(pool: ConnectionPool, config: &Config) -> Result<Self> {
        let mut registry = Registry::default();

        let jwt_service: DynJwtService = Arc::new(JwtConfig::new(&config.jwt_secret));

        let di_container = DependenciesInject::new(pool, config.pricing.clone(), &mut registry);

        Ok(Self {
            di_container,
            registry: Arc::new(registry),
            jwt_service,
        })
    }
}
