// 連鎖関連のドメイン層

pub mod context;
pub mod result;
pub mod score;
pub mod simulator;
pub mod tracker;

pub use context::SimulationContext;
pub use result::{
    RensaCoefResult, RensaEvent, RensaResult, RensaTrackResult, RensaVanishingPositionResult,
};
pub use score::{calculate_rensa_bonus_coef, chain_bonus, color_bonus, long_bonus};
pub use tracker::{
    RensaCoefTracker, RensaEventRecorder, RensaNonTracker, RensaObserver, RensaTracker,
    RensaVanishingPositionTracker,
};
