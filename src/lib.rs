// ============================================================================
//  LANSMAN PLANLAYICI — Kütüphane Kökü
//
//  Uniswap likidite lansmanı için iki deterministik yapı taşı:
//    math   → spacing'e hizalı tick aralıkları (tek taraflı / dengeli)
//    miner  → hook + asset token için CREATE2 salt madenciliği
// ============================================================================

pub mod errors;
pub mod types;
pub mod math;
pub mod create2;
pub mod hook_flags;
pub mod miner;
pub mod state_sync;
pub mod planner;

pub use errors::{PlanError, PlanResult};
pub use math::{
    calculate_balanced_range, calculate_single_sided_range, tick_spacing_for_fee,
};
pub use miner::{
    mine_deployment_salt, mine_deployment_salt_parallel, mine_deployment_salt_with_cancel,
    KnownOccupancy, NeverOccupied, OccupancyOracle,
};
pub use types::{MiningParams, MiningResult, TickRange};
