use std::collections::{BTreeSet, HashSet};

use super::row::{LandmarkRow, LandmarkType};

/// 3軸の値域
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Bounds3 {
    /// 点列から値域を求める。空なら None
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = [f64; 3]>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self { min: first, max: first };
        for p in iter {
            bounds.include(p);
        }
        Some(bounds)
    }

    pub fn include(&mut self, p: [f64; 3]) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(p[axis]);
            self.max[axis] = self.max[axis].max(p[axis]);
        }
    }

    pub fn span(&self, axis: usize) -> f64 {
        self.max[axis] - self.min[axis]
    }

    pub fn center(&self, axis: usize) -> f64 {
        (self.max[axis] + self.min[axis]) * 0.5
    }
}

/// 行の並び。録画1本分 (フレーム順) にも平均済みテーブルにも使う
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkTable {
    pub rows: Vec<LandmarkRow>,
}

impl LandmarkTable {
    pub fn new(rows: Vec<LandmarkRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn max_frame(&self) -> Option<i64> {
        self.rows.iter().map(|r| r.frame).max()
    }

    /// 重複なし・昇順のフレーム番号
    pub fn frames(&self) -> Vec<i64> {
        let set: BTreeSet<i64> = self.rows.iter().map(|r| r.frame).collect();
        set.into_iter().collect()
    }

    pub fn distinct_row_ids(&self) -> usize {
        self.rows.iter().map(|r| r.row_id.as_str()).collect::<HashSet<_>>().len()
    }

    pub fn rows_of(&self, kind: LandmarkType) -> impl Iterator<Item = &LandmarkRow> {
        self.rows.iter().filter(move |r| r.kind == kind)
    }

    pub fn bounds(&self) -> Option<Bounds3> {
        Bounds3::from_points(self.rows.iter().map(LandmarkRow::position))
    }

    /// フレーム順に安定ソート
    pub fn sort_by_frame(&mut self) {
        self.rows.sort_by_key(|r| r.frame);
    }
}

/// トリム済みの平均テーブル。必ず1行以上を持つ
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordTable {
    keyword: String,
    table: LandmarkTable,
    last_frame: i64,
}

impl KeywordTable {
    /// `last_frame` はテーブル内の最大フレームであること
    pub(crate) fn new(keyword: impl Into<String>, table: LandmarkTable, last_frame: i64) -> Self {
        debug_assert!(!table.is_empty());
        debug_assert_eq!(table.max_frame(), Some(last_frame));
        Self {
            keyword: keyword.into(),
            table,
            last_frame,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn table(&self) -> &LandmarkTable {
        &self.table
    }

    pub fn rows(&self) -> &[LandmarkRow] {
        &self.table.rows
    }

    pub fn last_frame(&self) -> i64 {
        self.last_frame
    }

    /// テーブル全体の値域 (空にならないので常に Some)
    pub fn bounds(&self) -> Bounds3 {
        self.table.bounds().unwrap_or(Bounds3 {
            min: [0.0; 3],
            max: [0.0; 3],
        })
    }
}
