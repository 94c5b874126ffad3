//! Example: Preview or apply an `installed` state for one feature
//!
//! Usage: ensure_feature <name> [--apply] [--recurse] [--force]

#[cfg(windows)]
use winfeature::{installed, ExecutionContext, ServerManager};

#[cfg(windows)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let name = args.first().ok_or("usage: ensure_feature <name> [--apply] [--recurse] [--force]")?;
    let flag = |f: &str| args.iter().any(|a| a == f);

    let manager = ServerManager::connect()?;
    let ctx = ExecutionContext {
        test: !flag("--apply"),
    };

    let report = installed(&manager, &ctx, name, flag("--recurse"), flag("--force"));
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

#[cfg(not(windows))]
fn main() {
    eprintln!("This example only runs on Windows Server with the ServerManager module.");
}
