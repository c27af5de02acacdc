mod app;
mod config;

use anyhow::{Context, Result};
use lumen_engine::device::GpuInit;
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::shader::ShaderSources;
use lumen_engine::window::Runtime;

use crate::app::QuadApp;
use crate::config::ShellConfig;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = ShellConfig::from_args(std::env::args().skip(1))?;

    // Fail before opening a window if the sources are missing.
    ShaderSources::load(&config.shaders).context("cannot start without a shader pair")?;

    log::info!("press R to reload shaders, Escape to quit");

    let runtime_config = config.runtime.clone();
    Runtime::run(runtime_config, GpuInit::default(), QuadApp::new(config))
}
