use crate::config::EdgeSet;
use crate::landmark::{Hand, HandLandmark};
use crate::landmark::HandLandmark::*;

use super::scene::Rgb;

/// 名前付きの骨格線グループ
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub name: &'static str,
    pub edges: &'static [(HandLandmark, HandLandmark)],
}

const THUMB: Segment = Segment {
    name: "thumb",
    edges: &[(Wrist, ThumbCmc), (ThumbCmc, ThumbMcp), (ThumbMcp, ThumbIp), (ThumbIp, ThumbTip)],
};

const PALM: Segment = Segment {
    name: "palm",
    edges: &[
        (Wrist, IndexMcp),
        (IndexMcp, MiddleMcp),
        (IndexMcp, RingMcp),
        (RingMcp, PinkyMcp),
        (Wrist, PinkyMcp),
    ],
};

const INDEX: Segment = Segment {
    name: "index",
    edges: &[(IndexMcp, IndexPip), (IndexPip, IndexDip), (IndexDip, IndexTip)],
};

const MIDDLE: Segment = Segment {
    name: "middle",
    edges: &[(MiddleMcp, MiddlePip), (MiddlePip, MiddleDip), (MiddleDip, MiddleTip)],
};

const RING: Segment = Segment {
    name: "ring",
    edges: &[(RingMcp, RingPip), (RingPip, RingDip), (RingDip, RingTip)],
};

const PINKY: Segment = Segment {
    name: "pinky",
    edges: &[(PinkyMcp, PinkyPip), (PinkyPip, PinkyDip), (PinkyDip, PinkyTip)],
};

// 17-18 が二重に入っている旧定義
const PINKY_ORIGINAL: Segment = Segment {
    name: "pinky",
    edges: &[
        (PinkyMcp, PinkyPip),
        (PinkyMcp, PinkyPip),
        (PinkyPip, PinkyDip),
        (PinkyDip, PinkyTip),
    ],
};

/// 手の骨格定義 (親指, 手のひら, 人差し指, 中指, 薬指, 小指)
pub const HAND_SEGMENTS: [Segment; 6] = [THUMB, PALM, INDEX, MIDDLE, RING, PINKY];

pub const HAND_SEGMENTS_ORIGINAL: [Segment; 6] = [THUMB, PALM, INDEX, MIDDLE, RING, PINKY_ORIGINAL];

pub fn segments(edges: EdgeSet) -> &'static [Segment; 6] {
    match edges {
        EdgeSet::Corrected => &HAND_SEGMENTS,
        EdgeSet::Original => &HAND_SEGMENTS_ORIGINAL,
    }
}

/// 最初のグループの線の濃さ
pub const SEGMENT_BASE_INTENSITY: f32 = 0.2;

/// グループごとの濃さの増分
pub const SEGMENT_INTENSITY_STEP: f32 = 0.15;

/// 骨格線の色。左手は青系、右手は赤系でグループごとに明るくなる
pub fn segment_color(hand: Hand, segment: usize) -> Rgb {
    let s = (SEGMENT_BASE_INTENSITY + SEGMENT_INTENSITY_STEP * segment as f32).min(1.0);
    match hand {
        Hand::Left => Rgb::new(0.0, 0.0, s),
        Hand::Right => Rgb::new(s, 0.0, 0.0),
    }
}

/// キーポイントの色
pub fn point_color(hand: Hand) -> Rgb {
    match hand {
        Hand::Left => Rgb::new(0.0, 0.0, 1.0),
        Hand::Right => Rgb::new(1.0, 0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge_count(segments: &[Segment]) -> usize {
        segments.iter().map(|s| s.edges.len()).sum()
    }

    #[test]
    fn test_edge_counts() {
        assert_eq!(edge_count(&HAND_SEGMENTS), 21);
        assert_eq!(edge_count(&HAND_SEGMENTS_ORIGINAL), 22);
    }

    #[test]
    fn test_corrected_pinky_chain() {
        let pinky: Vec<(usize, usize)> = HAND_SEGMENTS[5]
            .edges
            .iter()
            .map(|&(a, b)| (a as usize, b as usize))
            .collect();
        assert_eq!(pinky, vec![(17, 18), (18, 19), (19, 20)]);
    }

    #[test]
    fn test_segment_names() {
        let names: Vec<&str> = segments(EdgeSet::Corrected).iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["thumb", "palm", "index", "middle", "ring", "pinky"]);
    }

    #[test]
    fn test_all_edges_within_hand() {
        for seg in HAND_SEGMENTS_ORIGINAL.iter() {
            for &(a, b) in seg.edges {
                assert!((a as usize) < HandLandmark::COUNT);
                assert!((b as usize) < HandLandmark::COUNT);
            }
        }
    }

    #[test]
    fn test_segment_color_ramp() {
        let first = segment_color(Hand::Left, 0);
        assert_eq!((first.r, first.g), (0.0, 0.0));
        assert!((first.b - 0.2).abs() < 1e-6);

        let last = segment_color(Hand::Right, 5);
        assert!((last.r - 0.95).abs() < 1e-6);
        assert_eq!((last.g, last.b), (0.0, 0.0));
    }
}
