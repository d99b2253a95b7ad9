//
//  serve.rs
//  Flow
//

use anyhow::Result;
use std::path::Path;

use crate::config::FlowConfig;
use crate::daemon::start_daemon;

/// Run the server in the foreground, applying command-line overrides.
pub async fn handle(
    root: &Path,
    mut config: FlowConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    start_daemon(root, config).await
}
