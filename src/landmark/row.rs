use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// ランドマーク種別 (`type` 列)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkType {
    Face,
    Pose,
    LeftHand,
    RightHand,
}

impl LandmarkType {
    pub fn as_str(self) -> &'static str {
        match self {
            LandmarkType::Face => "face",
            LandmarkType::Pose => "pose",
            LandmarkType::LeftHand => "left_hand",
            LandmarkType::RightHand => "right_hand",
        }
    }

    /// 手のランドマークか (face / pose は集計前に除外される)
    pub fn is_hand(self) -> bool {
        matches!(self, LandmarkType::LeftHand | LandmarkType::RightHand)
    }
}

impl FromStr for LandmarkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "face" => Ok(LandmarkType::Face),
            "pose" => Ok(LandmarkType::Pose),
            "left_hand" => Ok(LandmarkType::LeftHand),
            "right_hand" => Ok(LandmarkType::RightHand),
            other => Err(format!("unknown landmark type {:?}", other)),
        }
    }
}

impl fmt::Display for LandmarkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1録画の1フレームにおける1点
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkRow {
    /// 録画をまたいで「同じ点」を表す識別子
    pub row_id: String,
    pub frame: i64,
    pub kind: LandmarkType,
    pub landmark_index: Option<usize>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// 座標以外の列 (row_id ごとに一定であるべき値)
    pub passengers: BTreeMap<String, String>,
}

impl LandmarkRow {
    pub fn new(row_id: impl Into<String>, frame: i64, kind: LandmarkType, xyz: [f64; 3]) -> Self {
        Self {
            row_id: row_id.into(),
            frame,
            kind,
            landmark_index: None,
            x: xyz[0],
            y: xyz[1],
            z: xyz[2],
            passengers: BTreeMap::new(),
        }
    }

    pub fn with_landmark_index(mut self, index: usize) -> Self {
        self.landmark_index = Some(index);
        self
    }

    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// 未検出 (全座標が 0) か
    pub fn is_all_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

/// デコード直後の行。座標は欠損 (None / NaN) を含みうる
#[derive(Debug, Clone, PartialEq)]
pub struct RawLandmarkRow {
    pub row_id: String,
    pub frame: i64,
    pub kind: LandmarkType,
    pub landmark_index: Option<usize>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub passengers: BTreeMap<String, String>,
}

impl RawLandmarkRow {
    /// NaN も欠損として扱う
    fn coordinate(value: Option<f64>) -> Option<f64> {
        value.filter(|v| !v.is_nan())
    }

    pub fn has_missing(&self) -> bool {
        [self.x, self.y, self.z]
            .into_iter()
            .any(|v| Self::coordinate(v).is_none())
    }

    /// 欠損座標を 0 で埋める
    pub fn zero_filled(self) -> LandmarkRow {
        LandmarkRow {
            x: Self::coordinate(self.x).unwrap_or(0.0),
            y: Self::coordinate(self.y).unwrap_or(0.0),
            z: Self::coordinate(self.z).unwrap_or(0.0),
            row_id: self.row_id,
            frame: self.frame,
            kind: self.kind,
            landmark_index: self.landmark_index,
            passengers: self.passengers,
        }
    }

    /// 欠損座標が1つでもあれば None
    pub fn complete(self) -> Option<LandmarkRow> {
        if self.has_missing() {
            return None;
        }
        Some(self.zero_filled())
    }
}
