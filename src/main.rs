use clap::Parser;

use snaplink::cli::Cli;
use snaplink::config::{StaticConfig, init_config_from};
use snaplink::runtime::run_server;
use snaplink::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Some(path) = cli.generate_config {
        StaticConfig::write_sample_config(&path)?;
        println!("Sample configuration written to {}", path);
        return Ok(());
    }

    let config = match init_config_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    let _guard = init_logging(&config.logging)?;

    run_server(config).await
}
