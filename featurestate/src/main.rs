//! Apply Windows feature states declared in a TOML document
//!
//! Configuration is loaded from featurestate.toml in the current directory
//! unless `--config` names another file.

use featurestate::{args, init_tracing, Config};

fn main() {
    let args = args::parse_args();

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);
    config.log_source();

    std::process::exit(run(&args, &config));
}

#[cfg(windows)]
fn run(args: &args::Arguments, config: &Config) -> i32 {
    use featurestate::Summary;
    use winfeature::{ExecutionContext, ServerManager};

    let manager = match ServerManager::connect() {
        Ok(manager) => manager,
        Err(e) => {
            tracing::error!("{}", e);
            return 1;
        }
    };

    let ctx = ExecutionContext {
        test: args.test || config.run.test,
    };
    tracing::info!(
        states = config.features.len(),
        test = ctx.test,
        "applying feature states from {}",
        args.config
    );

    let outcomes = featurestate::run(&manager, &ctx, &config.features);
    match serde_json::to_string_pretty(&outcomes) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            tracing::error!("Failed to serialize reports: {}", e);
            return 1;
        }
    }

    let summary = Summary::from_outcomes(&outcomes);
    println!("{}", summary);

    if summary.has_failures() {
        1
    } else {
        0
    }
}

#[cfg(not(windows))]
fn run(_args: &args::Arguments, _config: &Config) -> i32 {
    eprintln!("featurestate only runs on Windows Server with the ServerManager module.");
    1
}
