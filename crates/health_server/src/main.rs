//! Health records HTTP server entry point.

use clap::Parser;
use health_core::{init_logging, init_stderr_logging, AppConfig};
use health_server::{serve, ApiContext};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "health_server", version, about = "Health records JSON API")]
struct Cli {
    /// Optional TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    /// Directory holding the JSON collections.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    #[arg(long)]
    log_level: Option<String>,
    /// Write rolling log files here instead of stderr.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Cli {
    /// Command-line flags win over file values.
    fn apply(self, config: &mut AppConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        if let Some(log_dir) = self.log_dir {
            config.log_dir = Some(log_dir);
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("health_server: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let mut config = AppConfig::load(cli.config.as_deref()).map_err(|err| err.to_string())?;
    cli.apply(&mut config);
    config.validate().map_err(|err| err.to_string())?;

    match &config.log_dir {
        Some(dir) => {
            let dir = std::path::absolute(dir).map_err(|err| err.to_string())?;
            init_logging(&config.log_level, &dir.to_string_lossy())?;
        }
        None => init_stderr_logging(&config.log_level)?,
    }
    info!(
        "event=server_config module=server status=ok data_dir={} addr={}",
        config.data_dir.display(),
        config.listen_addr()
    );

    serve(ApiContext::new(config.data_dir), &config.host, config.port)
        .await
        .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use health_core::AppConfig;
    use std::path::PathBuf;

    #[test]
    fn flags_override_file_values() {
        let mut config = AppConfig::from_toml_str("port = 9000\nhost = \"0.0.0.0\"").unwrap();
        let cli = Cli::parse_from(["health_server", "--port", "8100", "--data-dir", "/tmp/h"]);
        cli.apply(&mut config);

        assert_eq!(config.port, 8100);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/h"));
    }
}
