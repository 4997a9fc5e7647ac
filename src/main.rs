use anyhow::Result;
use tracing_subscriber::EnvFilter;

use sign_replay::config::Config;
use sign_replay::corpus::Corpus;
use sign_replay::player::{Player, PlayerOptions};
use sign_replay::render::MinifbRenderer;

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = Config::load_or_default(CONFIG_PATH);
    // 引数でキーワードを上書きできる
    if let Some(keyword) = std::env::args().nth(1) {
        config.player.keyword = keyword;
    }

    println!("Sign Replay ({})", env!("SIGN_REPLAY_GIT_VERSION"));
    println!("Keywords: {}", config.data.keywords_dir.display());
    println!("Keyword: {}", config.player.keyword);
    println!("FPS: {}", config.player.fps);
    println!("Layout: {:?}, bounds: {:?}, end: {:?}",
        config.player.layout, config.player.bounds, config.player.end);
    println!("Press ESC to exit");
    println!();

    let corpus = Corpus::build(config.data.clone())?;
    let table = corpus.lookup(&config.player.keyword)?;

    let mut renderer = MinifbRenderer::new(
        &config.window.title,
        config.window.width,
        config.window.height,
    )?;
    let mut player = Player::new(table, PlayerOptions::from_config(&config.player));
    player.play(config.player.fps, &mut renderer)?;

    println!("Shutting down...");
    Ok(())
}
