use super::row::LandmarkType;

/// 手の左右
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const BOTH: [Hand; 2] = [Hand::Left, Hand::Right];

    /// 対応するランドマーク種別
    pub fn landmark_type(self) -> LandmarkType {
        match self {
            Hand::Left => LandmarkType::LeftHand,
            Hand::Right => LandmarkType::RightHand,
        }
    }

    pub fn from_landmark_type(kind: LandmarkType) -> Option<Self> {
        match kind {
            LandmarkType::LeftHand => Some(Hand::Left),
            LandmarkType::RightHand => Some(Hand::Right),
            LandmarkType::Face | LandmarkType::Pose => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Hand::Left => "Left Hand",
            Hand::Right => "Right Hand",
        }
    }
}

/// 手の 21 ランドマークインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    pub const COUNT: usize = 21;

    pub fn from_index(index: usize) -> Option<Self> {
        use HandLandmark::*;
        const ALL: [HandLandmark; HandLandmark::COUNT] = [
            Wrist, ThumbCmc, ThumbMcp, ThumbIp, ThumbTip,
            IndexMcp, IndexPip, IndexDip, IndexTip,
            MiddleMcp, MiddlePip, MiddleDip, MiddleTip,
            RingMcp, RingPip, RingDip, RingTip,
            PinkyMcp, PinkyPip, PinkyDip, PinkyTip,
        ];
        ALL.get(index).copied()
    }
}

/// 1フレーム分の手の点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPoint {
    /// ランドマークインデックス (0〜20)
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl HandPoint {
    pub fn new(index: usize, x: f64, y: f64, z: f64) -> Self {
        Self { index, x, y, z }
    }

    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_landmark_count() {
        assert_eq!(HandLandmark::COUNT, 21);
    }

    #[test]
    fn test_hand_landmark_from_index() {
        assert_eq!(HandLandmark::from_index(0), Some(HandLandmark::Wrist));
        assert_eq!(HandLandmark::from_index(18), Some(HandLandmark::PinkyPip));
        assert_eq!(HandLandmark::from_index(20), Some(HandLandmark::PinkyTip));
        assert_eq!(HandLandmark::from_index(21), None);
    }

    #[test]
    fn test_from_index_matches_discriminant() {
        for i in 0..HandLandmark::COUNT {
            let lm = HandLandmark::from_index(i).unwrap();
            assert_eq!(lm as usize, i);
        }
    }

    #[test]
    fn test_hand_type_mapping() {
        assert_eq!(Hand::Left.landmark_type(), LandmarkType::LeftHand);
        assert_eq!(Hand::from_landmark_type(LandmarkType::RightHand), Some(Hand::Right));
        assert_eq!(Hand::from_landmark_type(LandmarkType::Face), None);
    }
}
