use clap::Parser;
use tasador::app::bootstrap::build_appraiser;
use tasador::utils::error::{ErrorSeverity, ValuationError};
use tasador::utils::{logger, validation::Validate};
use tasador::CliConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_logger(&config.log_settings(cli.verbose));

    tracing::info!("Starting tasador");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let appraiser = match build_appraiser(&config).await {
        Ok(appraiser) => appraiser,
        Err(e) => exit_with(e),
    };

    if cli.list_districts {
        println!("{}", serde_json::to_string_pretty(appraiser.context().stats())?);
        return Ok(());
    }

    let Some(request) = cli.request() else {
        eprintln!("❌ Nothing to do: pass --district to valuate or --list-districts");
        std::process::exit(1);
    };

    match appraiser.appraise(&request).await {
        Ok(result) => {
            tracing::info!(
                "✅ {} valuated: {} - {} {}",
                result.district,
                result.range.min,
                result.range.max,
                config.currency.primary
            );
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn exit_with(e: ValuationError) -> ! {
    tracing::error!(
        "❌ Valuation failed: {} (Category: {:?}, Severity: {:?})",
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
    std::process::exit(exit_code);
}
