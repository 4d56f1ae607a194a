use imagelab::{config::Config, env_file, logger, server};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Runs before any worker thread exists; variables already set win over the file.
    let env_path = env_file::env_file_path();
    let env_report = env_file::load_env_file(&env_path);

    if let Err(e) = logger::init_with_config(logger::LoggerConfig::from_env()) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match env_report {
        Ok(report) if report.found => {
            log::info!(
                "✅ Loaded {} ({} applied, {} already set, {} malformed)",
                env_path,
                report.applied.len(),
                report.kept_from_env.len(),
                report.malformed.len()
            );
            for line in &report.malformed {
                log::debug!("Skipped malformed env line: {}", line);
            }
        }
        Ok(_) => log::info!("No {} file found, using process environment", env_path),
        Err(e) => log::warn!("⚠️  Could not read {}: {}", env_path, e),
    }

    let config = Config::from_env();
    logger::log_startup_info(&config);

    if !config.genai.api_key_present() {
        log::warn!(
            "⚠️  {} is not set. Image generation requests will fail.",
            config.genai.api_key_var
        );
    }

    match actix_web::rt::System::new().block_on(server::run(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("❌ Server failed to start: {}", e);
            ExitCode::FAILURE
        }
    }
}
