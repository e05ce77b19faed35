mod catalog;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use tessera_engine::logging::{init_logging, LoggingConfig};

use session::Session;

fn main() -> Result<()> {
    init_logging(LoggingConfig::from_env_var("TESSERA_LOG"));

    println!();
    println!("  ╔════════════════════════════════════════╗");
    println!("  ║           TESSERA STUDIO v0.1          ║");
    println!("  ║   headless popup walkthrough           ║");
    println!("  ╚════════════════════════════════════════╝");
    println!();

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let cards = catalog::load(path.as_deref())?;
    log::info!("catalog: {} cards", cards.len());

    let mut session = Session::new(cards)?;
    let outcome = session.run_script()?;

    let show = |v: Option<String>| v.unwrap_or_else(|| "(none)".to_owned());
    println!("  Trainer  {}", show(outcome.trainer));
    println!("  Region   {}", show(outcome.region));
    println!("  Starter  {}", show(outcome.starter));
    if outcome.cancelled > 0 {
        println!("  ({} popups cancelled)", outcome.cancelled);
    }
    println!();
    Ok(())
}
