use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use simcheck::{Engine, EngineConfig};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Engine instance (shared across requests)
    pub engine: Arc<Engine>,
}

impl ServerState {
    /// Create new server state, loading the engine configuration file when
    /// one is configured.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let engine_config = match &config.engine_config {
            Some(path) => EngineConfig::from_file(path)
                .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?,
            None => EngineConfig::default(),
        };
        let engine = Engine::from_config(engine_config)
            .map_err(|e| ServerError::Config(e.to_string()))?;

        Ok(Self::with_engine(config, engine))
    }

    /// State around an already built engine.
    pub fn with_engine(config: ServerConfig, engine: Engine) -> Self {
        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_engine_config_file_is_a_config_error() {
        let config = ServerConfig {
            engine_config: Some("/no/such/engine.yaml".into()),
            ..Default::default()
        };
        match ServerState::new(config) {
            Err(ServerError::Config(msg)) => assert!(msg.contains("engine.yaml")),
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("expected a config error"),
        }
    }

    #[test]
    fn default_state_builds() {
        let state = ServerState::new(ServerConfig::default()).unwrap();
        assert_eq!(state.engine.config().version, "1.0");
    }
}
