//! Callback Gateway
//!
//! A content-aware reverse proxy for messaging-platform webhook callbacks.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                 CALLBACK GATEWAY                 │
//!                         │                                                  │
//!     Callback POST       │  ┌─────────┐    ┌──────────┐    ┌────────────┐   │
//!     ────────────────────┼─▶│  http   │───▶│ payload  │───▶│  routing   │   │
//!                         │  │ server  │    │ decoder  │    │ route table│   │
//!                         │  └─────────┘    └──────────┘    └─────┬──────┘   │
//!                         │                                       │          │
//!                         │                                       ▼          │
//!     Response            │  ┌─────────┐                   ┌────────────┐    │
//!     ◀───────────────────┼──│  http   │◀──────────────────│  rewrite   │────┼──▶ Backend
//!                         │  │ client  │                   │ + forward  │    │   (or default
//!                         │  └─────────┘                   └────────────┘    │    upstream)
//!                         │                                                  │
//!                         │  ┌───────────┐ ┌───────────────┐ ┌───────────┐   │
//!                         │  │  config   │ │ observability │ │ lifecycle │   │
//!                         │  └───────────┘ └───────────────┘ └───────────┘   │
//!                         └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "callback-gateway")]
#[command(about = "Routes messaging-platform callbacks to backends by callback id", long_about = None)]
struct Cli {
    /// Config directory (containing config.toml or config.json) or config file.
    #[arg(short, long)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    callback_gateway::lifecycle::start(&cli.config).await?;
    Ok(())
}
