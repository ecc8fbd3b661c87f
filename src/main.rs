use clap::Parser;
use parcel_depot::app::{execute, run_shell, Cli, Command};
use parcel_depot::domain::ports::ConfigProvider;
use parcel_depot::utils::error::{DepotError, ErrorSeverity};
use parcel_depot::utils::{logger, validation::Validate};
use parcel_depot::{CliConfig, DepotService, DepotSettings, FileAuditLog, LocalStorage, TomlConfig};
use std::io::Write;

fn load_provider(cli: &CliConfig) -> Result<Box<dyn ConfigProvider>, DepotError> {
    let provider: Box<dyn ConfigProvider> = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let config = TomlConfig::from_file(path)?;
            config.validate()?;
            tracing::debug!("Depot: {}", config.depot.name);
            Box::new(config)
        }
        None => {
            cli.validate()?;
            Box::new(cli.clone())
        }
    };
    Ok(provider)
}

fn run(cli: &Cli) -> Result<(), DepotError> {
    let provider = load_provider(&cli.config)?;

    let storage = LocalStorage::new(provider.data_dir().to_string());
    let audit = FileAuditLog::open(storage.resolve(provider.audit_log_path()))?;
    let settings = DepotSettings::from_config(provider.as_ref());
    let mut service = DepotService::with_settings(storage, audit, settings);

    let summary = service.load_from_config(provider.as_ref())?;
    if !summary.rejected.is_empty() {
        eprintln!("⚠️  Skipped {} malformed line(s)", summary.rejected.len());
    }

    let result = match &cli.command {
        Command::Shell => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            run_shell(&mut service, stdin.lock(), stdout.lock(), provider.report_path())
                .map(|executed| tracing::debug!("Shell executed {} command(s)", executed))
        }
        command => execute(&mut service, command, provider.report_path()).and_then(|text| {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            Ok(())
        }),
    };

    // 無論指令成功與否都要把日誌寫出
    service.shutdown()?;
    result
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.config.verbose);
    }

    tracing::info!("Starting depot CLI");
    if cli.config.verbose {
        tracing::debug!("CLI config: {:?}", cli.config);
    }

    if let Err(e) = run(&cli) {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
