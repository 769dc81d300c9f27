use serde::{Deserialize, Serialize};

/// Timing aggregated over every span recorded for one function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionStats {
    pub name: String,
    pub calls: u32,
    pub total_us: u64,
    pub avg_us: u64,
    pub p90_us: u64,
    pub max_us: u64,
}
