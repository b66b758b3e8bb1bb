// ぷよぷよ連鎖処理エンジンと操作経路探索 - ライブラリモジュール

pub mod constants;
pub mod domain;      // ドメイン層
pub mod application; // アプリケーション層
pub mod logging;

// 外部クレートの再エクスポート
pub use anyhow::{anyhow, Context, Result};

// 主要な型を再エクスポート
pub use application::{EvaluationConfig, FieldRealtime, FrameEvent, PlacementEvaluator, PlacementOutcome};
pub use constants::{H, W};
pub use domain::chain::{RensaObserver, RensaResult, SimulationContext};
pub use domain::control::{
    find_key_stroke, is_reachable, ControllerConfig, Key, KeySet, KeySetSeq, PuyoController,
};
pub use domain::field::{CoreField, PlainField, Position, PuyoColor};
pub use domain::piece::{Decision, Kumipuyo, KumipuyoMovingState, KumipuyoPos};
