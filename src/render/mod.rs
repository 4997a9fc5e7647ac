pub mod projection;
pub mod scene;
pub mod skeleton;
pub mod window;

pub use projection::{Projector, ViewAngle, Viewport};
pub use scene::{build_scene, DrawCommand, Pane, Rgb, Scene, SceneOptions};
pub use skeleton::{HAND_SEGMENTS, HAND_SEGMENTS_ORIGINAL};
pub use window::MinifbRenderer;

/// シーンを表示する先 (ウィンドウなど)
pub trait Surface {
    /// false になったら再生を終える
    fn is_open(&self) -> bool;

    fn present(&mut self, scene: &Scene) -> anyhow::Result<()>;
}
