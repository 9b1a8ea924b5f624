pub mod api;
pub mod commands;
pub mod config;
pub mod food;

// Re-export commonly used items
pub use food::analysis::{evaluate, EvaluationResponse, EvaluationResult};
pub use food::guidance::{guide, GuidanceResult};
pub use food::NutritionAdvisor;
