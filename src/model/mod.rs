// MODEL: Game data
pub mod camera;
pub mod level;
pub mod board;
pub mod room;

pub use camera::Camera;
pub use level::{Level, default_levels, normalize_answer};
pub use board::Board;
pub use room::{RoomBounds, RoomPiece, room_pieces};
