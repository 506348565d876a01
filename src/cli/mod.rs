use clap::Parser;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "taskboard-api")]
#[command(about = "Task board API server - workspaces, boards, lists, tasks and sessions")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Address to bind (overrides SERVER_HOST)")]
    pub host: Option<String>,

    #[arg(long, help = "Port to listen on (overrides SERVER_PORT)")]
    pub port: Option<u16>,
}

impl Cli {
    /// Flags win over the environment.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
