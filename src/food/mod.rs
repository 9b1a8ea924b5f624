pub mod advisor;
pub mod analysis;
pub mod api;
pub mod config;
pub mod guidance;
pub mod observer;
pub mod types;

pub use advisor::{NutritionAdvisor, NutritionLookup};
pub use analysis::{evaluate, EvaluationResponse, EvaluationResult};
pub use config::FoodConfig;
pub use guidance::{guide, GuidanceResult};
