#[tokio::main]
async fn main() -> cosmobot::error::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("cosmobot=info,serenity=warn"),
    )
    .init();
    log::info!("Starting cosmobot forum responder");

    match cosmobot::run().await {
        Ok(()) => {
            log::info!("Bot shut down successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Bot encountered an error: {e}");
            Err(e)
        }
    }
}
