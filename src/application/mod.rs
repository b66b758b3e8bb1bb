// アプリケーション層 - 置き場所評価と実時間の盤面進行

pub mod evaluation;
pub mod realtime;

pub use evaluation::{EvaluationConfig, PlacementEvaluator, PlacementOutcome};
pub use realtime::{FieldRealtime, FrameEvent};
