//! Spinning-cube viewer built on `tumble-engine`.

use anyhow::Result;
use winit::dpi::LogicalSize;

use tumble_engine::device::GpuInit;
use tumble_engine::logging::{init_logging, LoggingConfig};
use tumble_engine::window::{Runtime, RuntimeConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "tumble".to_string(),
        initial_size: LogicalSize::new(800.0, 600.0),
    };

    Runtime::run(config, GpuInit::default())
}
