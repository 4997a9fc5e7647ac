use anyhow::Result;
use minifb::{Key, Window, WindowOptions};

use super::projection::{Projector, Viewport};
use super::scene::{DrawCommand, Pane, Scene};
use super::Surface;
use crate::landmark::Bounds3;

const BACKGROUND_COLOR: u32 = 0xF4F4F4;
const BORDER_COLOR: u32 = 0xB0B0B0;
const TEXT_COLOR: u32 = 0x202020;
const AXIS_COLOR: u32 = 0x909090;
const POINT_RADIUS: i32 = 3;
const TITLE_HEIGHT: i32 = 16;

/// minifbを使用したレンダラー
pub struct MinifbRenderer {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl MinifbRenderer {
    /// ウィンドウを作成
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        let buffer = vec![BACKGROUND_COLOR; width * height];

        Ok(Self {
            window,
            buffer,
            width,
            height,
        })
    }

    /// ペインを横に等分したビューポート
    fn pane_viewports(&self, count: usize) -> Vec<Viewport> {
        let count = count.max(1) as i32;
        let pane_w = self.width as i32 / count;
        (0..count)
            .map(|i| Viewport {
                x: i * pane_w,
                y: TITLE_HEIGHT,
                width: pane_w,
                height: self.height as i32 - TITLE_HEIGHT,
            })
            .collect()
    }

    fn draw_pane(&mut self, pane: &Pane, viewport: Viewport) {
        self.draw_border(viewport.x, 0, viewport.width, self.height as i32, BORDER_COLOR);
        self.draw_text(pane.title, viewport.x + 6, 5, TEXT_COLOR);

        let projector = Projector::new(pane.view, pane.bounds, viewport);

        for (label, (x0, y0), (x1, y1)) in axis_lines(&projector, &pane.bounds) {
            self.draw_line(x0, y0, x1, y1, AXIS_COLOR);
            self.draw_text(label, x1 + 3, y1 - 2, AXIS_COLOR);
        }

        // 線を先に描き、点を上に重ねる
        for command in &pane.commands {
            if let DrawCommand::Line { from, to, color } = command {
                let (x1, y1) = projector.project(*from);
                let (x2, y2) = projector.project(*to);
                self.draw_line(x1, y1, x2, y2, color.to_u32());
            }
        }
        for command in &pane.commands {
            if let DrawCommand::Point { at, color } = command {
                let (px, py) = projector.project(*at);
                self.draw_circle(px, py, POINT_RADIUS, color.to_u32());
            }
        }
    }

    /// Bresenhamのアルゴリズムで線を描画
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// 円を描画（塗りつぶし）
    fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn draw_border(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        for col in x..x + w {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..y + h {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    /// 3×5 のビットマップフォントで文字列を描画
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            for (row, bits) in glyph(ch).iter().enumerate() {
                for col in 0..3 {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel(cx + col, y + row as i32, color);
                    }
                }
            }
            cx += 4;
        }
    }

    /// ピクセルをセット（境界チェック付き）
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }
}

impl Surface for MinifbRenderer {
    /// ウィンドウが開いているか
    fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    fn present(&mut self, scene: &Scene) -> Result<()> {
        self.buffer.fill(BACKGROUND_COLOR);

        let viewports = self.pane_viewports(scene.panes.len());
        for (pane, viewport) in scene.panes.iter().zip(viewports) {
            self.draw_pane(pane, viewport);
        }

        let label = format!("frame {}", scene.frame);
        let label_x = self.width as i32 - 4 * label.len() as i32 - 6;
        self.draw_text(&label, label_x, self.height as i32 - 10, TEXT_COLOR);

        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }
}

/// 値域の最小の角から各軸の最大まで伸ばした軸線 (ラベル, 始点, 終点)
fn axis_lines(
    projector: &Projector,
    bounds: &Bounds3,
) -> [(&'static str, (i32, i32), (i32, i32)); 3] {
    let origin = projector.project(bounds.min);
    let end = |axis: usize| {
        let mut p = bounds.min;
        p[axis] = bounds.max[axis];
        projector.project(p)
    };
    [("X", origin, end(0)), ("Y", origin, end(1)), ("Z", origin, end(2))]
}

/// 3×5 の字形 (行ごとに下位3ビット)
fn glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        _ => [0; 5],
    }
}
