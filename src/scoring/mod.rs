pub mod engine;
pub mod portfolio;
pub mod validation;

pub use engine::{
    compute_confidence, compute_effort_hours, compute_impact, compute_reach, compute_rice_score,
    score, ScoreResult, HOURS_PER_WEEK,
};
pub use portfolio::{rank, PortfolioTotals, RankedInitiative, WEEKS_PER_MONTH};
pub use validation::validate_initiative;
