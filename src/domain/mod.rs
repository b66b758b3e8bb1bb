// ドメイン層 - 盤面・連鎖・組ぷよ・操作

pub mod chain;
pub mod control;
pub mod field;
pub mod piece;
