use clap::Parser;
use contact_form::app::server;
use contact_form::config::Command;
use contact_form::utils::{logger, validation::Validate};
use contact_form::{CliConfig, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let (config_path, bind) = match &cli.command {
        Command::Serve { config, bind } => (config.clone(), bind.clone()),
        Command::CheckConfig { config } => (config.clone(), None),
    };
    let loaded = TomlConfig::from_file(&config_path).and_then(|c| c.validate().map(|_| c));

    // 初始化日誌；設定檔的 [logging] json 也能開啟 JSON 格式
    let json_logs = match &loaded {
        Ok(config) => config.json_logs(cli.json_logs),
        Err(_) => cli.json_logs,
    };
    if json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration {} is invalid: {}", config_path, e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Command::CheckConfig { .. } => {
            println!("✅ {} is valid (mailbox: {})", config_path, config.mail.to);
            Ok(())
        }
        Command::Serve { .. } => {
            if let Err(e) = server::run(config, bind).await {
                tracing::error!("❌ Server stopped: {}", e);
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                return Err(e.into());
            }
            Ok(())
        }
    }
}
