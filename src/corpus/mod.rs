//! キーワードごとの録画を読み込み、平均・トリムしたテーブルを保持する。

pub mod aggregate;
pub mod decode;
#[cfg(test)]
pub(crate) mod fixture;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::DataConfig;
use crate::landmark::{KeywordTable, LandmarkTable};

pub use aggregate::{average, clean_recording, trim};
pub use decode::read_recording;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("keyword {0:?} was not loaded")]
    MissingKeyword(String),

    #[error("keyword {0:?} has no non-zero frames to animate")]
    EmptyTrim(String),
}

impl CorpusError {
    pub(crate) fn decode(path: &Path, reason: impl Into<String>) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// キーワード1件の集計結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeywordSummary {
    /// 読み込んだ録画数
    pub recordings: usize,
    /// クリーニング後の手の行数 (全録画合計)
    pub hand_rows: usize,
    /// 平均後の行数
    pub averaged_rows: usize,
    /// トリム後に残った行数
    pub kept_rows: usize,
    /// トリム後に残ったフレーム数
    pub frames: usize,
}

struct KeywordEntry {
    summary: KeywordSummary,
    table: Option<KeywordTable>,
}

pub struct Corpus {
    config: DataConfig,
    entries: BTreeMap<String, KeywordEntry>,
}

impl Corpus {
    pub fn new(config: DataConfig) -> Self {
        Self {
            config,
            entries: BTreeMap::new(),
        }
    }

    /// `keywords_dir` 直下の全キーワード (上限あり) を読み込む
    pub fn build(config: DataConfig) -> Result<Self, CorpusError> {
        let mut corpus = Self::new(config);
        for keyword in corpus.discover_keywords()? {
            corpus.ingest(&keyword)?;
        }
        Ok(corpus)
    }

    /// 指定したキーワードだけを読み込む
    pub fn build_keywords<S: AsRef<str>>(config: DataConfig, keywords: &[S]) -> Result<Self, CorpusError> {
        let mut corpus = Self::new(config);
        for keyword in keywords {
            corpus.ingest(keyword.as_ref())?;
        }
        Ok(corpus)
    }

    pub fn config(&self) -> &DataConfig {
        &self.config
    }

    /// サブディレクトリ名をキーワードとして名前順に列挙
    pub fn discover_keywords(&self) -> Result<Vec<String>, CorpusError> {
        let root = &self.config.keywords_dir;
        let mut keywords = Vec::new();
        for entry in fs::read_dir(root).map_err(|e| CorpusError::io(root, e))? {
            let entry = entry.map_err(|e| CorpusError::io(root, e))?;
            let path = entry.path();
            if !path.is_dir() {
                debug!("skipping non-directory {}", path.display());
                continue;
            }
            keywords.push(entry.file_name().to_string_lossy().into_owned());
        }
        keywords.sort();
        if let Some(max) = self.config.max_keywords {
            keywords.truncate(max);
        }
        Ok(keywords)
    }

    /// キーワードの録画ファイル一覧 (名前順、上限適用済み)
    pub fn recording_paths(&self, keyword: &str) -> Result<Vec<PathBuf>, CorpusError> {
        let dir = self.config.keywords_dir.join(keyword);
        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| CorpusError::io(&dir, e))? {
            let path = entry.map_err(|e| CorpusError::io(&dir, e))?.path();
            if path.is_file() {
                paths.push(path);
            } else {
                debug!("skipping non-file {}", path.display());
            }
        }
        paths.sort();
        if let Some(max) = self.config.max_recordings {
            paths.truncate(max);
        }
        Ok(paths)
    }

    /// キーワードの録画をすべて読み込んでクリーニングする。
    ///
    /// 録画が0件なら空。1ファイルでも読めなければキーワード全体をエラーにする
    pub fn load(&self, keyword: &str) -> Result<Vec<LandmarkTable>, CorpusError> {
        self.recording_paths(keyword)?
            .iter()
            .map(|path| {
                debug!("reading {}", path.display());
                let raw = read_recording(path)?;
                Ok(clean_recording(raw, self.config.missing))
            })
            .collect()
    }

    /// load → average → trim を実行して結果を保持する
    pub fn ingest(&mut self, keyword: &str) -> Result<Option<&KeywordTable>, CorpusError> {
        info!("processing keyword {:?}", keyword);
        let recordings = self.load(keyword)?;
        let hand_rows = recordings.iter().map(LandmarkTable::len).sum();
        let averaged = average(&recordings, self.config.grouping);
        let averaged_rows = averaged.len();
        let table = trim(keyword, averaged);

        let summary = KeywordSummary {
            recordings: recordings.len(),
            hand_rows,
            averaged_rows,
            kept_rows: table.as_ref().map_or(0, |t| t.rows().len()),
            frames: table.as_ref().map_or(0, |t| t.table().frames().len()),
        };
        match &table {
            Some(t) => info!(
                "averaged keyword {:?}: {} recordings, {} rows, frames 0..={}",
                keyword, summary.recordings, summary.kept_rows, t.last_frame()
            ),
            None => warn!(
                "keyword {:?} has no non-zero frames ({} recordings)",
                keyword, summary.recordings
            ),
        }

        self.entries
            .insert(keyword.to_string(), KeywordEntry { summary, table });
        Ok(self.get(keyword))
    }

    /// トリム済みテーブル。未読み込み・データなしは None
    pub fn get(&self, keyword: &str) -> Option<&KeywordTable> {
        self.entries.get(keyword).and_then(|e| e.table.as_ref())
    }

    /// `get` と同じだが、未読み込みとデータなしを区別する
    pub fn lookup(&self, keyword: &str) -> Result<&KeywordTable, CorpusError> {
        match self.entries.get(keyword) {
            None => Err(CorpusError::MissingKeyword(keyword.to_string())),
            Some(KeywordEntry { table: None, .. }) => Err(CorpusError::EmptyTrim(keyword.to_string())),
            Some(KeywordEntry { table: Some(t), .. }) => Ok(t),
        }
    }

    pub fn summary(&self, keyword: &str) -> Option<KeywordSummary> {
        self.entries.get(keyword).map(|e| e.summary)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
