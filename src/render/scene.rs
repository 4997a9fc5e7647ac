//! 1フレーム分の描画内容。
//!
//! フレームの手の点列から描画コマンド列を作る純粋関数で、描画バックエンドには依存しない。

use crate::config::{BoundsPolicy, EdgeSet, Layout, PlayerConfig};
use crate::landmark::{Bounds3, Hand, HandLandmark, HandPoint};

use super::projection::ViewAngle;
use super::skeleton::{point_color, segment_color, segments};

/// 0.0〜1.0 の RGB
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// minifb のバッファ形式 (0RGB)
    pub fn to_u32(self) -> u32 {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (c(self.r) << 16) | (c(self.g) << 8) | c(self.b)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Point { at: [f64; 3], color: Rgb },
    Line { from: [f64; 3], to: [f64; 3], color: Rgb },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pane {
    pub title: &'static str,
    pub view: ViewAngle,
    pub bounds: Bounds3,
    pub commands: Vec<DrawCommand>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub frame: i64,
    pub panes: Vec<Pane>,
}

pub const LEFT_VIEW: ViewAngle = ViewAngle::new(-24.0, -170.0, 90.0);
pub const RIGHT_VIEW: ViewAngle = ViewAngle::new(-156.0, 170.0, 90.0);
pub const SINGLE_VIEW: ViewAngle = LEFT_VIEW;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneOptions {
    pub layout: Layout,
    pub bounds: BoundsPolicy,
    pub edges: EdgeSet,
}

impl SceneOptions {
    pub fn from_config(config: &PlayerConfig) -> Self {
        Self {
            layout: config.layout,
            bounds: config.bounds,
            edges: config.edges,
        }
    }
}

/// 1フレームのシーンを作る。
///
/// `left` / `right` はそのフレームの各手の点 (空なら描かない)、
/// `global` はテーブル全体の値域
pub fn build_scene(
    frame: i64,
    left: &[HandPoint],
    right: &[HandPoint],
    global: Bounds3,
    options: SceneOptions,
) -> Scene {
    let panes = match options.layout {
        Layout::Dual => vec![
            Pane {
                title: Hand::Left.label(),
                view: LEFT_VIEW,
                bounds: pane_bounds(&[left], options.bounds, global),
                commands: hand_commands(Hand::Left, left, options.edges),
            },
            Pane {
                title: Hand::Right.label(),
                view: RIGHT_VIEW,
                bounds: pane_bounds(&[right], options.bounds, global),
                commands: hand_commands(Hand::Right, right, options.edges),
            },
        ],
        Layout::Single => {
            let mut commands = hand_commands(Hand::Left, left, options.edges);
            commands.extend(hand_commands(Hand::Right, right, options.edges));
            vec![Pane {
                title: "Hand Landmarks",
                view: SINGLE_VIEW,
                bounds: pane_bounds(&[left, right], options.bounds, global),
                commands,
            }]
        }
    };

    Scene { frame, panes }
}

/// ペインの値域。点がなければ全体の値域
fn pane_bounds(points: &[&[HandPoint]], policy: BoundsPolicy, global: Bounds3) -> Bounds3 {
    match policy {
        BoundsPolicy::Global => global,
        BoundsPolicy::PerFrame => {
            Bounds3::from_points(points.iter().flat_map(|p| p.iter().map(HandPoint::position)))
                .unwrap_or(global)
        }
    }
}

/// 片手分の点と骨格線
fn hand_commands(hand: Hand, points: &[HandPoint], edges: EdgeSet) -> Vec<DrawCommand> {
    if points.is_empty() {
        return Vec::new();
    }

    let mut by_index: [Option<[f64; 3]>; HandLandmark::COUNT] = [None; HandLandmark::COUNT];
    for p in points {
        if let Some(slot) = by_index.get_mut(p.index) {
            slot.get_or_insert(p.position());
        }
    }

    let color = point_color(hand);
    let mut commands: Vec<DrawCommand> = points
        .iter()
        .map(|p| DrawCommand::Point { at: p.position(), color })
        .collect();

    for (k, segment) in segments(edges).iter().enumerate() {
        let color = segment_color(hand, k);
        for &(a, b) in segment.edges {
            // 欠けている点を含む線は描かない
            if let (Some(from), Some(to)) = (by_index[a as usize], by_index[b as usize]) {
                commands.push(DrawCommand::Line { from, to, color });
            }
        }
    }
    commands
}
