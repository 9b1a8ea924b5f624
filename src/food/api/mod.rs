pub mod traits;
pub mod usda;

// Re-export common types
pub use traits::{FoodApiError, NutritionSearch, SearchQuery};
pub use usda::UsdaClient;
