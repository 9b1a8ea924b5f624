use async_trait::async_trait;
use nutrition_ai_agent::food::analysis::query::{analyze_query, detect_language};
use nutrition_ai_agent::food::analysis::quality::NO_RESULTS_ISSUE;
use nutrition_ai_agent::food::analysis::suggestions::{MORE_SPECIFIC, TRY_ENGLISH};
use nutrition_ai_agent::food::analysis::{evaluate, EvaluationResponse, Grade};
use nutrition_ai_agent::food::api::{FoodApiError, NutritionSearch, SearchQuery};
use nutrition_ai_agent::food::guidance::generator::DECOMPOSE_DISH;
use nutrition_ai_agent::food::guidance::{guide, GuidanceGenerator, InputType};
use nutrition_ai_agent::food::observer::RecordingObserver;
use nutrition_ai_agent::food::types::{
    DataType, EvaluationFocus, FoodNutrient, FoodRecord, Language, SearchBatch, SearchOutcome,
};
use nutrition_ai_agent::food::NutritionAdvisor;
use std::collections::HashSet;
use std::sync::Arc;

fn roasted_breast() -> FoodRecord {
    FoodRecord::new(
        171077,
        "Chicken, broilers or fryers, breast, meat only, cooked, roasted",
        DataType::Foundation,
    )
}

fn batch(foods: Vec<FoodRecord>) -> SearchOutcome {
    SearchOutcome::Found(SearchBatch::new(foods))
}

#[test]
fn scenario_single_word_query_asks_for_specific_terms() {
    let response = evaluate("chicken", &batch(vec![roasted_breast()]), None, None);
    let result = response.result().expect("success");

    assert!(result.query_analysis.specificity_score < 0.5);
    assert!(result
        .improvement_suggestions
        .contains(&MORE_SPECIFIC.to_string()));
    assert_eq!(result.diversity_score, 1.0);
}

#[test]
fn scenario_japanese_query_without_results() {
    let response = evaluate("鶏肉", &batch(Vec::new()), None, None);
    let result = response.result().expect("empty batch is not an error");

    assert_eq!(result.query_analysis.language, Language::Japanese);
    assert_eq!(result.result_quality.quality_score, 0.0);
    assert!(result.result_quality.issues.contains(&NO_RESULTS_ISSUE.to_string()));
    assert!(result.improvement_suggestions.contains(&TRY_ENGLISH.to_string()));
    assert_eq!(result.overall_assessment.grade, Grade::D);
}

#[test]
fn scenario_composite_dish_guidance() {
    let result = guide(None, None, Some("チキンサラダ"));
    let analysis = result.input_analysis.expect("input analysis");
    assert_eq!(analysis.input_type, InputType::CompositeDish);

    let suggestions = result.specific_suggestions.expect("suggestions");
    assert!(suggestions.contains(&DECOMPOSE_DISH.to_string()));
}

#[test]
fn scenario_meat_category_guidance() {
    let result = GuidanceGenerator::default().guide(Some("meat"), None, None);
    let meat = result.category_specific.expect("category block");
    assert!(!meat.keywords.is_empty());
    assert!(meat.examples.iter().any(|e| e.contains("chicken")));
}

#[test]
fn upstream_error_never_scores() {
    for query in ["chicken", "", "鶏肉 breast"] {
        let response = evaluate(query, &SearchOutcome::failed("quota exceeded"), None, None);
        assert!(response.is_error());
        assert!(response.result().is_none());
    }
}

#[test]
fn scores_stay_in_unit_range_and_grade_follows_score() {
    let foods = vec![
        roasted_breast().with_nutrients(vec![
            FoodNutrient::new("Energy", 165.0),
            FoodNutrient::new("Protein", 31.0),
            FoodNutrient::new("Total lipid (fat)", 3.6),
        ]),
        FoodRecord::new(2, "Chicken nuggets", DataType::Branded),
        FoodRecord::new(3, "", DataType::Unknown),
    ];
    let queries = ["chicken", "chicken breast skinless boneless raw", "肉", "", "x y z w v u"];
    let focuses = [
        EvaluationFocus::Accuracy,
        EvaluationFocus::Completeness,
        EvaluationFocus::Relevance,
        EvaluationFocus::Balanced,
    ];

    for query in queries {
        let analysis = analyze_query(query);
        assert!((0.0..=1.0).contains(&analysis.specificity_score));
        for focus in focuses {
            let response = evaluate(query, &batch(foods.clone()), Some("chicken"), Some(focus));
            let assessment = &response.result().unwrap().overall_assessment;
            assert!((0.0..=1.0).contains(&assessment.score));
            assert_eq!(assessment.grade, Grade::from_score(assessment.score));
        }
    }
}

#[test]
fn language_detection_is_exhaustive() {
    assert_eq!(detect_language("サーモン"), Language::Japanese);
    assert_eq!(detect_language("豆腐"), Language::Japanese);
    assert_eq!(detect_language("tofu"), Language::English);
    assert_eq!(detect_language(&detect_language("鮭").to_string()), Language::English);
}

#[test]
fn exact_description_match_never_lowers_relevance() {
    let query = "apples raw";
    let with_match = batch(vec![FoodRecord::new(1, "Apples raw", DataType::SrLegacy)]);
    let without = batch(vec![FoodRecord::new(1, "Pears, canned", DataType::SrLegacy)]);

    let relevance = |outcome: &SearchOutcome| {
        evaluate(query, outcome, None, None)
            .result()
            .map(|r| r.relevance_score)
            .unwrap_or_default()
    };
    assert!(relevance(&with_match) >= relevance(&without));
    assert_eq!(relevance(&with_match), 1.0);
}

#[test]
fn suggestion_lists_have_no_duplicates() {
    for query in ["chicken", "鶏肉", "meat", "apple juice", ""] {
        for foods in [Vec::new(), vec![roasted_breast()]] {
            if let EvaluationResponse::Success(result) = evaluate(query, &batch(foods), None, None) {
                let unique: HashSet<_> = result.improvement_suggestions.iter().collect();
                assert_eq!(unique.len(), result.improvement_suggestions.len());
                let unique: HashSet<_> = result.recommendations.iter().collect();
                assert_eq!(unique.len(), result.recommendations.len());
            }
        }
    }
}

struct CannedSearch(Vec<FoodRecord>);

#[async_trait]
impl NutritionSearch for CannedSearch {
    async fn search(&self, _query: &SearchQuery) -> Result<SearchBatch, FoodApiError> {
        Ok(SearchBatch::new(self.0.clone()))
    }

    async fn get_details(&self, fdc_id: u64) -> Result<FoodRecord, FoodApiError> {
        self.0
            .iter()
            .find(|f| f.fdc_id == fdc_id)
            .cloned()
            .ok_or_else(|| FoodApiError::NotFound(fdc_id.to_string()))
    }
}

#[tokio::test]
async fn advisor_round_trip_with_observer() {
    let observer = Arc::new(RecordingObserver::default());
    let advisor = NutritionAdvisor::new(Arc::new(CannedSearch(vec![roasted_breast()])))
        .with_observer(observer.clone());

    let response = advisor
        .search_and_evaluate("chicken breast", Some("chicken breast"), Some(EvaluationFocus::Accuracy))
        .await;
    assert!(!response.is_error());

    let lookup = advisor.lookup("chicken breast", None, &[]).await.unwrap();
    assert_eq!(lookup.fdc_id, 171077);

    let counts = observer.counts();
    assert_eq!(counts.searches, 2);
    assert_eq!(counts.evaluations, 1);
    assert_eq!(counts.failures, 0);
}
