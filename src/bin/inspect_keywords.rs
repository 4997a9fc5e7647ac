//! 全キーワードを集計して結果を一覧表示する (ウィンドウは開かない)

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use sign_replay::config::Config;
use sign_replay::corpus::Corpus;

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = Config::load_or_default(CONFIG_PATH);
    let corpus = Corpus::build(config.data)?;

    println!("{:<20} {:>6} {:>9} {:>9} {:>7} {:>7}  bounds",
        "keyword", "recs", "hand", "averaged", "kept", "frames");
    for keyword in corpus.keywords() {
        let Some(s) = corpus.summary(keyword) else { continue };
        let bounds = match corpus.get(keyword) {
            Some(table) => {
                let b = table.bounds();
                format!("x[{:.3}, {:.3}] y[{:.3}, {:.3}] z[{:.3}, {:.3}]",
                    b.min[0], b.max[0], b.min[1], b.max[1], b.min[2], b.max[2])
            }
            None => "(no data)".to_string(),
        };
        println!("{:<20} {:>6} {:>9} {:>9} {:>7} {:>7}  {}",
            keyword, s.recordings, s.hand_rows, s.averaged_rows, s.kept_rows, s.frames, bounds);
    }
    Ok(())
}
