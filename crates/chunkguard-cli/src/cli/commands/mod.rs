//! CLI command handlers. Each command is in its own file.

mod config;
mod fallback;
mod simulate;

use anyhow::Result;
use chunkguard_core::page::{Link, StaticDocument};

use super::PageArgs;

pub use config::run_config;
pub use fallback::run_fallback;
pub use simulate::{run_simulate, SimulateOverrides};
#[cfg(test)]
pub use simulate::options as simulate_options;

fn document(page: &PageArgs) -> Result<StaticDocument> {
    let links = page.css.iter().map(Link::stylesheet).collect();
    StaticDocument::new(&page.origin, links)
}
