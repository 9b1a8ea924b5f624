pub mod evaluation;
pub mod insights;
pub mod nutrition;
pub mod quality;
pub mod query;
pub mod scoring;
pub mod similarity;
pub mod suggestions;

// Re-export the engine entry points
pub use evaluation::{evaluate, EvaluationResponse, EvaluationResult};
pub use nutrition::{summarize, NutritionSummary};
pub use query::{analyze_query, QueryAnalysis};
pub use scoring::{EvaluationWeights, Grade};
