use std::process::ExitCode;

use jyutquiz::config::Config;
use jyutquiz::startup::{create_app_state, create_web_server};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    std_logger::Config::logfmt().init();

    let config = match Config::get() {
        Ok(config) => config,
        Err(error) => {
            log::error!("Unable to read the configuration. Error: '{error}'.");
            return ExitCode::FAILURE;
        }
    };
    let address = format!("{}:{}", config.application.host, config.application.port);

    let app_state = match create_app_state(config) {
        Ok(app_state) => app_state,
        Err(error) => {
            log::error!("Unable to start the quiz. Error: '{error}'.");
            return ExitCode::FAILURE;
        }
    };

    let listener = match TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(error) => {
            log::error!("Failed to bind address '{address}'. Error: '{error}'.");
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = create_web_server(app_state, listener).await {
        log::error!("The web server stopped. Error: '{error}'.");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
