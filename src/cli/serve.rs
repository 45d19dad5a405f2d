//! Serve CLI command.

use super::llm_factory::build_analysis_service;
use crate::config::{ScamguardConfig, redact_api_key};
use crate::observability::{MetricsConfig, install_prometheus};
use crate::server::{router, serve};
use crate::{Error, Result};
use std::sync::Arc;

/// Runs the HTTP server until ctrl-c.
///
/// Fails before binding when no API key is configured.
pub fn cmd_serve(config: &ScamguardConfig) -> Result<()> {
    let api_key = config.llm.resolve_api_key(|name| std::env::var(name).ok())?;
    tracing::info!(
        key_env = config.llm.provider.api_key_env(),
        "Loaded API key: {}",
        redact_api_key(&api_key)
    );

    let addr = config.server.socket_addr()?;
    let service = Arc::new(build_analysis_service(config, &api_key));
    let app = router(Arc::clone(&service), config.server.max_body_bytes);

    let rt = tokio::runtime::Runtime::new().map_err(|e| Error::OperationFailed {
        operation: "create_runtime".to_string(),
        cause: e.to_string(),
    })?;

    let result = rt.block_on(async {
        install_prometheus(&MetricsConfig::from_settings(&config.metrics))?;

        let listener =
            tokio::net::TcpListener::bind(addr)
                .await
                .map_err(|e| Error::OperationFailed {
                    operation: "bind".to_string(),
                    cause: e.to_string(),
                })?;

        serve(listener, app).await
    });

    // The blocking HTTP clients inside the service must be dropped outside
    // the runtime.
    drop(rt);
    drop(service);
    result
}
