use beauty_studio::config::{StudioConfig, setup_logging};
use clap::Parser;
use tracing::error;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = beauty_studio::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return;
    }

    let config = match StudioConfig::try_from(&cli) {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid API base URL {:?}: {}", cli.api_base_url, err);
            return;
        }
    };

    if let Err(err) =
        beauty_studio::web::setup_server(&cli.listen_address, cli.port, &config).await
    {
        error!("Application error: {}", err);
    }
}
