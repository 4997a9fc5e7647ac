use nalgebra::{Rotation3, Unit, Vector3};

use crate::landmark::Bounds3;

/// 3Dビューの向き (度)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewAngle {
    /// 仰角
    pub elev: f64,
    /// 方位角
    pub azim: f64,
    /// 視線軸まわりの回転
    pub roll: f64,
}

impl ViewAngle {
    pub const fn new(elev: f64, azim: f64, roll: f64) -> Self {
        Self { elev, azim, roll }
    }
}

/// ピクセル上の描画領域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

// 正規化後の立方体 (辺長1) の対角線の半分 (√3/2) に少し余白を足したもの
const HALF_DIAGONAL: f64 = 0.9;

/// 正射影カメラ。点を値域の立方体に正規化してからビュー方向へ射影する
#[derive(Debug, Clone)]
pub struct Projector {
    right: Vector3<f64>,
    up: Vector3<f64>,
    bounds: Bounds3,
    viewport: Viewport,
    scale: f64,
}

impl Projector {
    pub fn new(view: ViewAngle, bounds: Bounds3, viewport: Viewport) -> Self {
        let elev = view.elev.to_radians();
        let azim = view.azim.to_radians();

        let eye = Vector3::new(elev.cos() * azim.cos(), elev.cos() * azim.sin(), elev.sin());
        let right = Vector3::new(-azim.sin(), azim.cos(), 0.0);
        let up = eye.cross(&right);

        let roll = Rotation3::from_axis_angle(&Unit::new_normalize(eye), view.roll.to_radians());
        let scale = 0.5 * viewport.width.min(viewport.height) as f64 / HALF_DIAGONAL;

        Self {
            right: roll * right,
            up: roll * up,
            bounds,
            viewport,
            scale,
        }
    }

    fn normalize(&self, p: [f64; 3]) -> Vector3<f64> {
        let axis = |i: usize| {
            let span = self.bounds.span(i);
            if span.abs() < f64::EPSILON {
                0.0
            } else {
                (p[i] - self.bounds.center(i)) / span
            }
        };
        Vector3::new(axis(0), axis(1), axis(2))
    }

    /// ピクセル座標に変換 (y は下向き)
    pub fn project(&self, p: [f64; 3]) -> (i32, i32) {
        let n = self.normalize(p);
        let (cx, cy) = self.viewport.center();
        let u = n.dot(&self.right) * self.scale;
        let v = n.dot(&self.up) * self.scale;
        (cx + u.round() as i32, cy - v.round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_bounds() -> Bounds3 {
        Bounds3 {
            min: [-1.0, -1.0, -1.0],
            max: [1.0, 1.0, 1.0],
        }
    }

    fn viewport() -> Viewport {
        Viewport { x: 0, y: 0, width: 200, height: 200 }
    }

    #[test]
    fn test_center_projects_to_viewport_center() {
        let p = Projector::new(ViewAngle::new(-24.0, -170.0, 90.0), unit_bounds(), viewport());
        assert_eq!(p.project([0.0, 0.0, 0.0]), (100, 100));
    }

    #[test]
    fn test_front_view_axes() {
        let p = Projector::new(ViewAngle::new(0.0, 0.0, 0.0), unit_bounds(), viewport());
        // +y は右、+z は上、+x は視線方向なので動かない
        let (yx, yy) = p.project([0.0, 1.0, 0.0]);
        assert!(yx > 100);
        assert_eq!(yy, 100);
        let (zx, zy) = p.project([0.0, 0.0, 1.0]);
        assert_eq!(zx, 100);
        assert!(zy < 100);
        assert_eq!(p.project([1.0, 0.0, 0.0]), (100, 100));
    }

    #[test]
    fn test_roll_turns_up_sideways() {
        let p = Projector::new(ViewAngle::new(0.0, 0.0, 90.0), unit_bounds(), viewport());
        let (zx, zy) = p.project([0.0, 0.0, 1.0]);
        assert!((zy - 100).abs() <= 1);
        assert!((zx - 100).abs() > 10);
    }

    #[test]
    fn test_points_stay_inside_viewport() {
        let vp = Viewport { x: 300, y: 0, width: 300, height: 200 };
        let p = Projector::new(ViewAngle::new(-156.0, 170.0, 90.0), unit_bounds(), vp);
        for corner in [[-1.0, -1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0], [-1.0, 1.0, -1.0]] {
            let (x, y) = p.project(corner);
            assert!(x >= vp.x && x < vp.x + vp.width);
            assert!(y >= vp.y && y < vp.y + vp.height);
        }
    }

    #[test]
    fn test_flat_axis_does_not_divide_by_zero() {
        let flat = Bounds3 { min: [0.0, 0.0, 0.5], max: [1.0, 1.0, 0.5] };
        let p = Projector::new(ViewAngle::new(0.0, 0.0, 0.0), flat, viewport());
        let (x, y) = p.project([0.5, 0.5, 0.5]);
        assert_eq!((x, y), (100, 100));
    }
}
