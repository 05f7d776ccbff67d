pub mod analyzer;
pub mod charts;
pub mod h2h_stats;
pub mod key_factors;
pub mod performance_index;
pub mod probability;
pub mod score_projector;
pub mod team_stats;

pub use analyzer::*;
pub use charts::*;
pub use h2h_stats::*;
pub use key_factors::*;
pub use performance_index::*;
pub use probability::*;
pub use score_projector::*;
pub use team_stats::*;
