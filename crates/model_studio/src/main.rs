use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::info;

use model_edit::{CustomizerConfig, CycleMode, Customizer, MatchStrategy};

use crate::models::ModelStore;

mod api;
mod models;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CycleModeArg {
    /// One load and one save per request.
    Shared,
    /// A load and a save for every edit in a request.
    PerEdit,
}

impl From<CycleModeArg> for CycleMode {
    fn from(value: CycleModeArg) -> Self {
        match value {
            CycleModeArg::Shared => CycleMode::Shared,
            CycleModeArg::PerEdit => CycleMode::PerEdit,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MatchStrategyArg {
    FirstDeclared,
    LongestKey,
}

impl From<MatchStrategyArg> for MatchStrategy {
    fn from(value: MatchStrategyArg) -> Self {
        match value {
            MatchStrategyArg::FirstDeclared => MatchStrategy::FirstDeclared,
            MatchStrategyArg::LongestKey => MatchStrategy::LongestKey,
        }
    }
}

#[derive(Parser)]
struct Options {
    #[arg(long, default_value = "127.0.0.1:5000")]
    pub api_bind: String,
    #[arg(long, default_value = "static/models")]
    pub models_dir: PathBuf,
    #[arg(long, default_value = "sofa.glb")]
    pub default_model: String,
    #[arg(long, default_value_t = 16 * 1024 * 1024)]
    pub max_upload_bytes: usize,
    #[arg(long, value_enum, default_value_t = CycleModeArg::Shared)]
    pub cycle_mode: CycleModeArg,
    #[arg(long, value_enum, default_value_t = MatchStrategyArg::FirstDeclared)]
    pub match_strategy: MatchStrategyArg,
    /// Makes the random texture fallback reproducible.
    #[arg(long)]
    pub seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let options = Options::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let api_addr: SocketAddr = options.api_bind.parse()?;
    std::fs::create_dir_all(&options.models_dir)?;

    let customizer = Customizer::new(CustomizerConfig {
        cycle_mode: options.cycle_mode.into(),
        match_strategy: options.match_strategy.into(),
        seed: options.seed,
    });
    let store = ModelStore::new(&options.models_dir, options.default_model);
    let api_state = api::ApiState::new(customizer, store, options.max_upload_bytes);
    let app = api::new_api(options.max_upload_bytes).with_state(api_state);

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(api_addr).await?;
        info!(
            "serving models from {} on {}",
            options.models_dir.display(),
            api_addr
        );
        axum::serve(listener, app).await?;
        anyhow::Ok(())
    })
}
