// 盤面関連のドメイン層

pub mod color;
pub mod core_field;
pub mod plain_field;
pub mod position;

pub use color::{PuyoColor, NUM_PUYO_COLORS};
pub use core_field::{CoreField, SCAN_CAPACITY};
pub use plain_field::PlainField;
pub use position::{FieldBits, Position};
