use clap::Parser;
use tinylink::cli::{Cli, Commands};
use tinylink::config::{StaticConfig, get_config, init_config_from};
use tinylink::errors::RegistryError;
use tinylink::runtime;
use tinylink::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Some(path) = cli.generate_config.as_deref() {
        if let Err(e) = StaticConfig::default().save_to_file(path) {
            eprintln!("Failed to write config to {}: {}", path, e);
            std::process::exit(1);
        }
        println!("Sample configuration written to {}", path);
        return Ok(());
    }

    init_config_from(cli.config.as_deref());
    let config = get_config();

    match cli.command {
        None | Some(Commands::Serve) => {
            let _guard = init_logging(&config.logging)?;
            if let Err(e) = runtime::run_server().await {
                // 启动失败：打印彩色错误信息
                match e.downcast_ref::<RegistryError>() {
                    Some(registry_err) => eprintln!("{}", registry_err.format_colored()),
                    None => eprintln!("{:#}", e),
                }
                std::process::exit(1);
            }
        }
        Some(command) => {
            if runtime::run_cli(command).await.is_err() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
