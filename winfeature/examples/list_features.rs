//! Example: List installed Windows features

#[cfg(windows)]
use winfeature::{FeatureManager, ServerManager};

#[cfg(windows)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manager = ServerManager::connect()?;

    println!("=== Installed features ===");
    for (name, info) in manager.list_installed()? {
        println!("  {:<40} {}", name, info.display_name);
        for sub in &info.sub_features {
            println!("      └ {}", sub);
        }
    }

    Ok(())
}

#[cfg(not(windows))]
fn main() {
    eprintln!("This example only runs on Windows Server with the ServerManager module.");
}
