pub mod types;

pub use types::{
    AcquireReach, ConfidenceInput, EffortInput, ImpactInput, Initiative, OptimiseReach, ReachInput,
};
