// 組ぷよ関連のドメイン層

pub mod decision;
pub mod kumipuyo;
pub mod moving_state;

pub use decision::Decision;
pub use kumipuyo::{Kumipuyo, KumipuyoPos};
pub use moving_state::KumipuyoMovingState;
