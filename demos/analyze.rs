use pose_coach::{Config, PoseClient, PoseGateway, PoseSession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv_override().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(image) = args.next() else {
        anyhow::bail!("usage: analyze <image> [simple|full|overlay] [mode]");
    };
    let variant = args.next().unwrap_or_else(|| "simple".to_string());
    let mode = args.next();

    let config = Config::from_env();
    println!("pose server: {}", config.base_url());

    let session = PoseSession::new(PoseGateway::new(PoseClient::new(config)?));
    let mut states = session.subscribe();

    match variant.as_str() {
        "full" => session.start_full(&image, mode.as_deref()),
        "overlay" => session.start_overlay(&image, mode.as_deref()),
        _ => session.start_simple(&image, mode.as_deref()),
    }

    while let Ok(state) = states.recv().await {
        println!("{state:?}");
        if state.is_terminal() {
            break;
        }
    }
    Ok(())
}
