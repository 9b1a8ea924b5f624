use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Deserializes `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// FoodData Central data type, declared from most to least authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum DataType {
    Foundation,
    #[serde(rename = "SR Legacy")]
    SrLegacy,
    #[serde(rename = "Survey (FNDDS)")]
    Survey,
    Branded,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DataType {
    pub const ALL: [DataType; 5] = [
        DataType::Foundation,
        DataType::SrLegacy,
        DataType::Survey,
        DataType::Branded,
        DataType::Unknown,
    ];

    /// Weight used when scoring the data-source quality of a batch.
    pub fn quality_weight(self) -> f64 {
        match self {
            DataType::Foundation => 1.0,
            DataType::SrLegacy => 0.8,
            DataType::Survey => 0.6,
            DataType::Branded => 0.4,
            DataType::Unknown => 0.2,
        }
    }

    pub fn is_high_quality(self) -> bool {
        matches!(self, DataType::Foundation | DataType::SrLegacy)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Foundation => "Foundation",
            DataType::SrLegacy => "SR Legacy",
            DataType::Survey => "Survey (FNDDS)",
            DataType::Branded => "Branded",
            DataType::Unknown => "Unknown",
        }
    }

    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
            .or_else(|| name.eq_ignore_ascii_case("survey").then_some(DataType::Survey))
            .unwrap_or(DataType::Unknown)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One nutrient amount on a food record.
///
/// Search responses use the flat `nutrientName`/`value` shape while detail
/// responses nest the name under `nutrient`; both deserialize into this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNutrient")]
pub struct FoodNutrient {
    #[serde(rename = "nutrientName")]
    pub name: String,
    #[serde(rename = "value")]
    pub amount: f64,
    #[serde(rename = "unitName", skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl FoodNutrient {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNutrient {
    nutrient_name: Option<String>,
    value: Option<f64>,
    unit_name: Option<String>,
    nutrient: Option<NestedNutrient>,
    amount: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NestedNutrient {
    name: Option<String>,
    unit_name: Option<String>,
}

impl From<RawNutrient> for FoodNutrient {
    fn from(raw: RawNutrient) -> Self {
        let (nested_name, nested_unit) = match raw.nutrient {
            Some(n) => (n.name, n.unit_name),
            None => (None, None),
        };
        Self {
            name: raw.nutrient_name.or(nested_name).unwrap_or_default(),
            amount: raw.value.or(raw.amount).unwrap_or(0.0),
            unit: raw.unit_name.or(nested_unit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelValue {
    #[serde(default)]
    pub value: Option<f64>,
}

/// A candidate food returned by the nutrition database.
///
/// Every field tolerates absence so one malformed record cannot fail a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub fdc_id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data_type: DataType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub food_nutrients: Vec<FoodNutrient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_nutrients: Option<BTreeMap<String, LabelValue>>,
}

impl FoodRecord {
    pub fn new(fdc_id: u64, description: impl Into<String>, data_type: DataType) -> Self {
        Self {
            fdc_id,
            description: description.into(),
            data_type,
            ..Default::default()
        }
    }

    pub fn with_nutrients(mut self, nutrients: Vec<FoodNutrient>) -> Self {
        self.food_nutrients = nutrients;
        self
    }

    pub fn nutrient(&self, name: &str) -> Option<&FoodNutrient> {
        self.food_nutrients.iter().find(|n| n.name == name)
    }
}

/// A page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBatch {
    #[serde(default, deserialize_with = "null_as_default")]
    pub foods: Vec<FoodRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_hits: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
}

impl SearchBatch {
    pub fn new(foods: Vec<FoodRecord>) -> Self {
        let total_hits = foods.len() as u64;
        Self {
            foods,
            total_hits,
            ..Default::default()
        }
    }
}

/// What the external search call produced: a batch or an error payload.
///
/// On the wire this is either `{"error": ...}` or a regular search body. Any
/// `error` key marks a failure, whatever its value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    Failed { error: String },
    Found(SearchBatch),
}

impl<'de> Deserialize<'de> for SearchOutcome {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if let Some(error) = value.get("error") {
            let error = match error {
                Value::String(message) => message.clone(),
                other => other.to_string(),
            };
            return Ok(SearchOutcome::Failed { error });
        }
        SearchBatch::deserialize(value)
            .map(SearchOutcome::Found)
            .map_err(de::Error::custom)
    }
}

impl SearchOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        SearchOutcome::Failed {
            error: error.into(),
        }
    }

    pub fn foods(&self) -> &[FoodRecord] {
        match self {
            SearchOutcome::Found(batch) => &batch.foods,
            SearchOutcome::Failed { .. } => &[],
        }
    }
}

impl From<SearchBatch> for SearchOutcome {
    fn from(batch: SearchBatch) -> Self {
        SearchOutcome::Found(batch)
    }
}

/// Script a query is written in. Japanese covers kana and CJK ideographs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Japanese,
    English,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Japanese => "japanese",
            Language::English => "english",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

/// Which quality dimension dominates the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationFocus {
    Accuracy,
    Completeness,
    Relevance,
    #[default]
    Balanced,
}

impl EvaluationFocus {
    /// Unrecognized names fall back to the balanced preset.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "accuracy" => EvaluationFocus::Accuracy,
            "completeness" => EvaluationFocus::Completeness,
            "relevance" => EvaluationFocus::Relevance,
            _ => EvaluationFocus::Balanced,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EvaluationFocus::Accuracy => "accuracy",
            EvaluationFocus::Completeness => "completeness",
            EvaluationFocus::Relevance => "relevance",
            EvaluationFocus::Balanced => "balanced",
        }
    }
}

/// Why the caller is searching; selects intent-specific guidance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchIntent {
    BasicNutrition,
    DetailedAnalysis,
    Comparison,
    HighProtein,
    LowCarb,
    Other(String),
}

impl SearchIntent {
    pub fn from_name(name: &str) -> Self {
        let normalized = name.trim().to_lowercase();
        match normalized.as_str() {
            "basic_nutrition" => SearchIntent::BasicNutrition,
            "detailed_analysis" => SearchIntent::DetailedAnalysis,
            "comparison" => SearchIntent::Comparison,
            "high_protein" => SearchIntent::HighProtein,
            "low_carb" => SearchIntent::LowCarb,
            _ => SearchIntent::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SearchIntent::BasicNutrition => "basic_nutrition",
            SearchIntent::DetailedAnalysis => "detailed_analysis",
            SearchIntent::Comparison => "comparison",
            SearchIntent::HighProtein => "high_protein",
            SearchIntent::LowCarb => "low_carb",
            SearchIntent::Other(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_outcome_distinguishes_error_payload() {
        let failed: SearchOutcome = serde_json::from_value(json!({"error": "timeout"})).unwrap();
        assert_eq!(failed, SearchOutcome::failed("timeout"));

        let found: SearchOutcome = serde_json::from_value(json!({
            "foods": [{"fdcId": 1, "description": "Apple, raw", "dataType": "Foundation"}],
            "totalHits": 12
        }))
        .unwrap();
        match found {
            SearchOutcome::Found(batch) => {
                assert_eq!(batch.total_hits, 12);
                assert_eq!(batch.foods[0].data_type, DataType::Foundation);
            }
            other => panic!("expected batch, got {:?}", other),
        }
    }

    #[test]
    fn test_any_error_value_marks_failure() {
        let structured: SearchOutcome =
            serde_json::from_value(json!({"error": {"code": 429, "message": "rate"}})).unwrap();
        match &structured {
            SearchOutcome::Failed { error } => assert!(error.contains("429")),
            other => panic!("expected failure, got {:?}", other),
        }

        let null: SearchOutcome = serde_json::from_value(json!({"error": null})).unwrap();
        assert_eq!(null, SearchOutcome::failed("null"));

        let with_foods: SearchOutcome =
            serde_json::from_value(json!({"foods": [], "error": "partial outage"})).unwrap();
        assert_eq!(with_foods, SearchOutcome::failed("partial outage"));
    }

    #[test]
    fn test_malformed_record_degrades_to_defaults() {
        let record: FoodRecord = serde_json::from_value(json!({
            "description": null,
            "dataType": "Experimental",
            "foodNutrients": null
        }))
        .unwrap();
        assert_eq!(record.description, "");
        assert_eq!(record.data_type, DataType::Unknown);
        assert!(record.food_nutrients.is_empty());
    }

    #[test]
    fn test_nutrient_accepts_search_and_detail_shapes() {
        let flat: FoodNutrient =
            serde_json::from_value(json!({"nutrientName": "Protein", "value": 31.02, "unitName": "G"}))
                .unwrap();
        assert_eq!(flat.name, "Protein");
        assert_eq!(flat.unit.as_deref(), Some("G"));

        let nested: FoodNutrient = serde_json::from_value(json!({
            "nutrient": {"name": "Energy", "unitName": "kcal"},
            "amount": 165.0
        }))
        .unwrap();
        assert_eq!(nested.name, "Energy");
        assert_eq!(nested.amount, 165.0);
    }

    #[test]
    fn test_data_type_order_is_authority_order() {
        assert!(DataType::Foundation < DataType::SrLegacy);
        assert!(DataType::Branded < DataType::Unknown);
        assert_eq!(DataType::from_name("sr legacy"), DataType::SrLegacy);
        assert_eq!(DataType::from_name("whatever"), DataType::Unknown);
    }

    #[test]
    fn test_focus_and_intent_names() {
        assert_eq!(EvaluationFocus::from_name("Accuracy"), EvaluationFocus::Accuracy);
        assert_eq!(EvaluationFocus::from_name("speed"), EvaluationFocus::Balanced);
        assert_eq!(SearchIntent::from_name("HIGH_PROTEIN"), SearchIntent::HighProtein);
        assert_eq!(
            SearchIntent::from_name("keto"),
            SearchIntent::Other("keto".to_string())
        );
    }
}
