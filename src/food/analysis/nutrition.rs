use serde::{Deserialize, Serialize};

use crate::food::types::{DataType, FoodRecord};

/// Key nutrients of one food. Amounts are per 100 g unless they came from
/// a branded label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientAmounts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_kcal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbohydrates_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiber_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sugars_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vitamin_c_mg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iron_mg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calcium_mg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sodium_mg: Option<f64>,
}

impl NutrientAmounts {
    fn fields_mut(&mut self) -> [&mut Option<f64>; 10] {
        [
            &mut self.energy_kcal,
            &mut self.protein_g,
            &mut self.fat_g,
            &mut self.carbohydrates_g,
            &mut self.fiber_g,
            &mut self.sugars_g,
            &mut self.vitamin_c_mg,
            &mut self.iron_mg,
            &mut self.calcium_mg,
            &mut self.sodium_mg,
        ]
    }

    pub fn scaled(mut self, factor: f64) -> Self {
        for field in self.fields_mut() {
            *field = field.map(|v| round2(v * factor));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    pub fdc_id: u64,
    pub description: String,
    pub data_type: DataType,
    #[serde(flatten)]
    pub amounts: NutrientAmounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_size_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_serving: Option<NutrientAmounts>,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn label_value(record: &FoodRecord, key: &str) -> Option<f64> {
    record
        .label_nutrients
        .as_ref()?
        .get(key)?
        .value
        .map(round2)
}

fn nutrient_value(record: &FoodRecord, name: &str) -> Option<f64> {
    record.nutrient(name).map(|n| round2(n.amount))
}

/// Energy is reported both in kJ and kcal; only the kcal entry counts.
fn energy_kcal(record: &FoodRecord) -> Option<f64> {
    record
        .food_nutrients
        .iter()
        .filter(|n| n.name == "Energy")
        .find(|n| match n.unit.as_deref() {
            Some(unit) => unit.eq_ignore_ascii_case("kcal"),
            None => true,
        })
        .map(|n| round2(n.amount))
}

fn is_grams(unit: &str) -> bool {
    unit.eq_ignore_ascii_case("g") || unit.eq_ignore_ascii_case("grm")
}

/// Builds the key-nutrient summary of a detailed record. Branded label
/// values take precedence over the per-100 g nutrient list.
pub fn summarize(record: &FoodRecord) -> NutritionSummary {
    let amounts = NutrientAmounts {
        energy_kcal: label_value(record, "calories").or_else(|| energy_kcal(record)),
        protein_g: label_value(record, "protein").or_else(|| nutrient_value(record, "Protein")),
        fat_g: label_value(record, "fat")
            .or_else(|| nutrient_value(record, "Total lipid (fat)")),
        carbohydrates_g: label_value(record, "carbohydrates")
            .or_else(|| nutrient_value(record, "Carbohydrate, by difference")),
        fiber_g: label_value(record, "fiber")
            .or_else(|| nutrient_value(record, "Fiber, total dietary")),
        sugars_g: label_value(record, "sugars")
            .or_else(|| nutrient_value(record, "Sugars, total including NLEA")),
        vitamin_c_mg: nutrient_value(record, "Vitamin C, total ascorbic acid"),
        iron_mg: label_value(record, "iron"),
        calcium_mg: label_value(record, "calcium"),
        sodium_mg: label_value(record, "sodium"),
    };

    let per_serving = match (record.serving_size, record.serving_size_unit.as_deref()) {
        (Some(size), Some(unit)) if size > 0.0 && is_grams(unit) => {
            Some(amounts.scaled(size / 100.0))
        }
        _ => None,
    };

    tracing::trace!(fdc_id = record.fdc_id, scaled = per_serving.is_some(), "summarized record");

    NutritionSummary {
        fdc_id: record.fdc_id,
        description: record.description.clone(),
        data_type: record.data_type,
        amounts,
        serving_size: record.serving_size,
        serving_size_unit: record.serving_size_unit.clone(),
        per_serving,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::types::{FoodNutrient, LabelValue};
    use std::collections::BTreeMap;

    fn roasted_chicken() -> FoodRecord {
        FoodRecord::new(171077, "Chicken, breast, roasted", DataType::SrLegacy).with_nutrients(vec![
            FoodNutrient::new("Energy", 690.0).with_unit("kJ"),
            FoodNutrient::new("Energy", 165.0).with_unit("kcal"),
            FoodNutrient::new("Protein", 31.024).with_unit("g"),
            FoodNutrient::new("Total lipid (fat)", 3.57).with_unit("g"),
            FoodNutrient::new("Vitamin C, total ascorbic acid", 0.0).with_unit("mg"),
        ])
    }

    #[test]
    fn test_summary_picks_kcal_and_rounds() {
        let summary = summarize(&roasted_chicken());
        assert_eq!(summary.amounts.energy_kcal, Some(165.0));
        assert_eq!(summary.amounts.protein_g, Some(31.02));
        assert_eq!(summary.amounts.fat_g, Some(3.57));
        assert_eq!(summary.amounts.carbohydrates_g, None);
        assert_eq!(summary.amounts.vitamin_c_mg, Some(0.0));
        assert!(summary.per_serving.is_none());
    }

    #[test]
    fn test_label_values_take_precedence() {
        let mut record = roasted_chicken();
        let mut label = BTreeMap::new();
        label.insert("protein".to_string(), LabelValue { value: Some(25.456) });
        label.insert("sodium".to_string(), LabelValue { value: Some(410.0) });
        label.insert("fat".to_string(), LabelValue { value: None });
        record.label_nutrients = Some(label);

        let summary = summarize(&record);
        assert_eq!(summary.amounts.protein_g, Some(25.46));
        assert_eq!(summary.amounts.sodium_mg, Some(410.0));
        assert_eq!(summary.amounts.fat_g, Some(3.57));
    }

    #[test]
    fn test_per_serving_scaling_for_grams() {
        let mut record = roasted_chicken();
        record.serving_size = Some(85.0);
        record.serving_size_unit = Some("g".to_string());

        let per_serving = summarize(&record).per_serving.expect("scaled");
        assert_eq!(per_serving.energy_kcal, Some(140.25));
        assert_eq!(per_serving.protein_g, Some(26.37));
        assert_eq!(per_serving.carbohydrates_g, None);
    }

    #[test]
    fn test_no_scaling_for_other_units() {
        let mut record = roasted_chicken();
        record.serving_size = Some(240.0);
        record.serving_size_unit = Some("ml".to_string());
        assert!(summarize(&record).per_serving.is_none());
    }

    #[test]
    fn test_summary_serializes_flat() {
        let value = serde_json::to_value(summarize(&roasted_chicken())).unwrap();
        assert_eq!(value["energy_kcal"], 165.0);
        assert_eq!(value["data_type"], "SR Legacy");
        assert!(value.get("sugars_g").is_none());
    }
}
