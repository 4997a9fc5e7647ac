use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

/// 欠損座標の扱い
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// 欠損座標を 0 で埋める
    #[default]
    Zero,
    /// 欠損座標を含む行ごと捨てる
    Drop,
}

/// 平均を取るときのグループキー
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    /// row_id のみ (全フレーム・全録画をまとめて平均)
    #[default]
    RowId,
    /// (row_id, frame)
    RowIdAndFrame,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// キーワードごとのサブディレクトリを持つルート
    #[serde(default = "default_keywords_dir")]
    pub keywords_dir: PathBuf,
    /// 処理するキーワード数の上限 (None = 全部)
    #[serde(default)]
    pub max_keywords: Option<usize>,
    /// キーワードあたりの録画数の上限 (None = 全部)
    #[serde(default)]
    pub max_recordings: Option<usize>,
    #[serde(default)]
    pub missing: MissingPolicy,
    #[serde(default)]
    pub grouping: GroupKey,
}

fn default_keywords_dir() -> PathBuf { PathBuf::from("keywords") }

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            keywords_dir: default_keywords_dir(),
            max_keywords: None,
            max_recordings: None,
            missing: MissingPolicy::default(),
            grouping: GroupKey::default(),
        }
    }
}

/// 画面構成
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// 左手・右手を別ペインに
    #[default]
    Dual,
    /// 両手を1ペインに
    Single,
}

/// 軸範囲の決め方
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// 現フレームのデータ範囲
    #[default]
    PerFrame,
    /// テーブル全体の範囲で固定
    Global,
}

/// 最終フレーム到達後の動作
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EndPolicy {
    #[default]
    Loop,
    Stop,
}

/// 骨格線の定義
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EdgeSet {
    /// 小指を 17-18, 18-19, 19-20 で結ぶ
    #[default]
    Corrected,
    /// 小指の 17-18 を二重に持つ旧定義 (描画結果を揃えたい場合)
    Original,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlayerConfig {
    /// 再生するキーワード
    #[serde(default = "default_keyword")]
    pub keyword: String,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub bounds: BoundsPolicy,
    #[serde(default)]
    pub end: EndPolicy,
    #[serde(default)]
    pub edges: EdgeSet,
}

fn default_keyword() -> String { "blue".to_string() }
fn default_fps() -> u32 { 60 }

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            keyword: default_keyword(),
            fps: default_fps(),
            layout: Layout::default(),
            bounds: BoundsPolicy::default(),
            end: EndPolicy::default(),
            edges: EdgeSet::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
}

fn default_title() -> String { "Sign Replay".to_string() }
fn default_width() -> usize { 1000 }
fn default_height() -> usize { 500 }

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// 読めなければデフォルト設定
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}; using default config", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data.keywords_dir, PathBuf::from("keywords"));
        assert_eq!(config.data.max_recordings, None);
        assert_eq!(config.data.missing, MissingPolicy::Zero);
        assert_eq!(config.data.grouping, GroupKey::RowId);
        assert_eq!(config.player.keyword, "blue");
        assert_eq!(config.player.fps, 60);
        assert_eq!(config.player.layout, Layout::Dual);
        assert_eq!(config.player.end, EndPolicy::Loop);
        assert_eq!(config.player.edges, EdgeSet::Corrected);
        assert_eq!(config.window.width, 1000);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.player.fps, 60);
        assert_eq!(config.window.height, 500);
    }

    #[test]
    fn test_parse_partial_sections() {
        let config = Config::parse(
            r#"
            [data]
            keywords_dir = "/data/asl"
            max_recordings = 5
            missing = "drop"
            grouping = "row_id_and_frame"

            [player]
            keyword = "red"
            layout = "single"
            bounds = "global"
            end = "stop"
            edges = "original"
            "#,
        )
        .unwrap();
        assert_eq!(config.data.keywords_dir, PathBuf::from("/data/asl"));
        assert_eq!(config.data.max_recordings, Some(5));
        assert_eq!(config.data.max_keywords, None);
        assert_eq!(config.data.missing, MissingPolicy::Drop);
        assert_eq!(config.data.grouping, GroupKey::RowIdAndFrame);
        assert_eq!(config.player.keyword, "red");
        assert_eq!(config.player.fps, 60);
        assert_eq!(config.player.layout, Layout::Single);
        assert_eq!(config.player.bounds, BoundsPolicy::Global);
        assert_eq!(config.player.end, EndPolicy::Stop);
        assert_eq!(config.player.edges, EdgeSet::Original);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(Config::parse("[data]\nmissing = \"interpolate\"").is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("config.toml"));
        assert_eq!(config.player.keyword, "blue");
    }

    #[test]
    fn test_load_or_default_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[player]\nfps = \"fast\"").unwrap();
        assert!(Config::load(&path).is_err());
        assert_eq!(Config::load_or_default(&path).player.fps, 60);
    }
}
