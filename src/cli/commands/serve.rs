//! Web server command.

use console::style;

use crate::config::Settings;

/// Start the web server.
pub async fn cmd_serve(
    mut settings: Settings,
    bind: Option<&str>,
    init_schema: bool,
) -> anyhow::Result<()> {
    if let Some(bind) = bind {
        let (host, port) = parse_bind_address(bind, &settings.host, settings.port)?;
        settings.host = host;
        settings.port = port;
    }

    println!(
        "{} Starting review-insight server at http://{}:{}",
        style("→").cyan(),
        settings.host,
        settings.port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(&settings, init_schema).await
}

/// Parse a bind address that can be:
/// - Just a port: "9090" -> default host, port 9090
/// - Just a host: "127.0.0.1" -> 127.0.0.1, default port
/// - Host and port: "127.0.0.1:9090"
fn parse_bind_address(
    bind: &str,
    default_host: &str,
    default_port: u16,
) -> anyhow::Result<(String, u16)> {
    let bind = bind.trim();
    if bind.is_empty() {
        anyhow::bail!("Empty bind address");
    }

    // Try parsing as just a port number
    if let Ok(port) = bind.parse::<u16>() {
        return Ok((default_host.to_string(), port));
    }

    // Try parsing as host:port
    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
        anyhow::bail!("Invalid port in bind address: {}", bind);
    }

    // Must be just a host, use default port
    Ok((bind.to_string(), default_port))
}
