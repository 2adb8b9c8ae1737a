mod results;
mod returns;
mod weights;

pub use results::{BestPortfolio, FrontierPoint, PortfolioMetrics, ResultSet, TrialResult};
pub use returns::ReturnMatrix;
pub use weights::{WEIGHT_SUM_TOLERANCE, WeightVector};
