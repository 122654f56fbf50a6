//! REST server entry point.

use anyhow::{anyhow, Context};
use clap::Parser;
use litecrud_api::{ApiServer, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "litecrud_api", version, about = "REST API over the LiteCrud document store")]
struct Args {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:5000.
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Store file path.
    #[arg(long)]
    db: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ServerConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(db) = self.db {
            config.db_path = db;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        Ok(config)
    }
}

fn init_logging(config: &ServerConfig) -> anyhow::Result<()> {
    let result = match &config.log_dir {
        Some(dir) => {
            let dir = dir
                .to_str()
                .ok_or_else(|| anyhow!("log_dir must be valid UTF-8"))?;
            litecrud_core::init_logging(&config.log_level, dir)
        }
        None => litecrud_core::init_console_logging(&config.log_level),
    };
    result.map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Args::parse().into_config()?;
    init_logging(&config)?;

    ApiServer::new(config).serve().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;
    use std::net::SocketAddr;
    use std::path::PathBuf;

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("litecrud.toml");
        std::fs::write(
            &config_path,
            "bind_addr = \"0.0.0.0:8080\"\ndb_path = \"from-file.db\"\nlog_level = \"warn\"\n",
        )
        .unwrap();

        let args = Args::try_parse_from([
            "litecrud_api",
            "--config",
            config_path.to_str().unwrap(),
            "--db",
            "from-flag.db",
        ])
        .unwrap();
        let config = args.into_config().unwrap();

        assert_eq!(config.db_path, PathBuf::from("from-flag.db"));
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn missing_config_file_is_reported() {
        let args =
            Args::try_parse_from(["litecrud_api", "--config", "/nonexistent/litecrud.toml"])
                .unwrap();
        assert!(args.into_config().is_err());
    }
}
