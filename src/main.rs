use std::process::ExitCode;

use devserve::config::Config;
use devserve::error::StartupError;
use devserve::logger;
use devserve::server::Server;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), StartupError> {
    let cfg = Config::load()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(StartupError::Runtime)?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), StartupError> {
    let server = Server::bind(cfg)?;
    let addr = server.local_addr().map_err(StartupError::Runtime)?;

    logger::log_server_start(&addr);
    server.run().await;
    Ok(())
}
