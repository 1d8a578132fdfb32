// src/main.rs

use scriptrelay::{cli, logging, run};

#[tokio::main]
async fn main() {
    let code = match run_main().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("scriptrelay error: {err}");
            err.downcast_ref::<scriptrelay::errors::LauncherError>()
                .map(|e| e.exit_code())
                .unwrap_or(1)
        }
    };
    std::process::exit(code);
}

async fn run_main() -> anyhow::Result<i32> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    Ok(run(args).await?)
}
