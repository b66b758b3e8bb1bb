// 操作（入力表記と経路探索）のドメイン層

pub mod controller;
pub(crate) mod dijkstra;
pub(crate) mod fastpath;
pub mod key;
pub(crate) mod online;

pub use controller::{
    find_key_stroke, is_reachable, passes_reachability_precheck, ControllerConfig, PuyoController,
};
pub use key::{Key, KeySet, KeySetSeq};
