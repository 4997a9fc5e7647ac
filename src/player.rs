//! 平均テーブルのアニメーション再生。
//!
//! 左手・右手の行をフレームごとに索引し、1ティックごとに1フレーム分の
//! シーンを作って [`Surface`] に渡す。

use std::collections::HashMap;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use tracing::{debug, info};

use crate::config::{EndPolicy, PlayerConfig};
use crate::landmark::{Bounds3, Hand, HandPoint, KeywordTable};
use crate::render::{build_scene, Scene, SceneOptions, Surface};

/// 再生状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Idle,
    Playing { frame: i64 },
    /// `EndPolicy::Stop` で最終フレームに到達した
    Finished { frame: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerOptions {
    pub scene: SceneOptions,
    pub end: EndPolicy,
}

impl PlayerOptions {
    pub fn from_config(config: &PlayerConfig) -> Self {
        Self {
            scene: SceneOptions::from_config(config),
            end: config.end,
        }
    }
}

type FrameIndex = HashMap<i64, Vec<HandPoint>>;

pub struct Player {
    keyword: String,
    last_frame: i64,
    left: FrameIndex,
    right: FrameIndex,
    global_bounds: Bounds3,
    options: PlayerOptions,
    state: Playback,
}

impl Player {
    pub fn new(table: &KeywordTable, options: PlayerOptions) -> Self {
        let mut left = FrameIndex::new();
        let mut right = FrameIndex::new();

        for row in table.rows() {
            let index = match Hand::from_landmark_type(row.kind) {
                Some(Hand::Left) => &mut left,
                Some(Hand::Right) => &mut right,
                None => continue,
            };
            let points = index.entry(row.frame).or_default();
            // landmark_index がなければ行順をそのまま使う
            let landmark = row.landmark_index.unwrap_or(points.len());
            points.push(HandPoint::new(landmark, row.x, row.y, row.z));
        }
        for points in left.values_mut().chain(right.values_mut()) {
            points.sort_by_key(|p| p.index);
        }

        Self {
            keyword: table.keyword().to_string(),
            last_frame: table.last_frame(),
            left,
            right,
            global_bounds: table.bounds(),
            options,
            state: Playback::Idle,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn last_frame(&self) -> i64 {
        self.last_frame
    }

    pub fn state(&self) -> Playback {
        self.state
    }

    pub fn current_frame(&self) -> Option<i64> {
        match self.state {
            Playback::Idle => None,
            Playback::Playing { frame } | Playback::Finished { frame } => Some(frame),
        }
    }

    /// 指定フレームの片手の点 (ランドマーク番号順)。行がなければ空
    pub fn frame_data(&self, hand: Hand, frame: i64) -> &[HandPoint] {
        let index = match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        };
        index.get(&frame).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 指定フレームのシーン
    pub fn scene(&self, frame: i64) -> Scene {
        build_scene(
            frame,
            self.frame_data(Hand::Left, frame),
            self.frame_data(Hand::Right, frame),
            self.global_bounds,
            self.options.scene,
        )
    }

    /// フレーム 0 から再生を始める
    pub fn start(&mut self) -> i64 {
        self.state = Playback::Playing { frame: 0 };
        0
    }

    /// 1フレーム進めて描くべきフレームを返す。停止済みなら None
    pub fn tick(&mut self) -> Option<i64> {
        match self.state {
            Playback::Idle => Some(self.start()),
            Playback::Playing { frame } if frame < self.last_frame => {
                self.state = Playback::Playing { frame: frame + 1 };
                Some(frame + 1)
            }
            Playback::Playing { frame } => match self.options.end {
                EndPolicy::Loop => Some(self.start()),
                EndPolicy::Stop => {
                    self.state = Playback::Finished { frame };
                    None
                }
            },
            Playback::Finished { .. } => None,
        }
    }

    /// `1000 / fps` ミリ秒ごとに1フレームずつ描画する。
    ///
    /// `surface` が閉じられるまで戻らない。停止後は最終フレームを表示し続ける
    pub fn play<S: Surface>(&mut self, fps: u32, surface: &mut S) -> Result<()> {
        if fps == 0 {
            bail!("fps must be positive");
        }
        let frame_duration = Duration::from_secs_f64(1.0 / fps as f64);
        info!(
            "playing {:?}: frames 0..={} at {} fps",
            self.keyword, self.last_frame, fps
        );

        let first = self.start();
        let mut scene = self.scene(first);
        while surface.is_open() {
            let loop_start = Instant::now();
            surface.present(&scene)?;

            let was_playing = matches!(self.state, Playback::Playing { .. });
            match self.tick() {
                Some(frame) => scene = self.scene(frame),
                None if was_playing => info!("reached final frame {}", self.last_frame),
                None => {}
            }

            if let Some(rest) = frame_duration.checked_sub(loop_start.elapsed()) {
                thread::sleep(rest);
            }
        }

        debug!("surface closed at {:?}", self.state);
        Ok(())
    }
}
