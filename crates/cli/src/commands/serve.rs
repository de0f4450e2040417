use std::path::PathBuf;

use certdesk_core::Secret;
use certdesk_server::ServerConfig;

pub(crate) struct ServeOptions {
    pub port: u16,
    pub data: Option<PathBuf>,
    pub admin_password: Option<String>,
    pub tls_cert: Option<PathBuf>,
    pub tls_key: Option<PathBuf>,
}

/// `certdesk serve`: run the reference API until Ctrl+C.
pub(crate) async fn cmd_serve(options: ServeOptions) -> Result<(), String> {
    // Both TLS paths or neither.
    if options.tls_cert.is_some() != options.tls_key.is_some() {
        return Err("--tls-cert and --tls-key must both be provided".to_string());
    }

    let mut config = ServerConfig::new(
        options.port,
        Secret::new(options.admin_password.unwrap_or_default()),
    );
    config.data_file = options.data;
    config.tls_cert = options.tls_cert;
    config.tls_key = options.tls_key;

    certdesk_server::start_server(config)
        .await
        .map_err(|e| format!("server error: {}", e))
}
