pub mod hand;
pub mod row;
pub mod table;

pub use hand::{Hand, HandLandmark, HandPoint};
pub use row::{LandmarkRow, LandmarkType, RawLandmarkRow};
pub use table::{Bounds3, KeywordTable, LandmarkTable};
