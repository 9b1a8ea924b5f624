use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::food::types::DataType;

pub const KNOWLEDGE_VERSION: &str = "2024.1";

lazy_static! {
    /// Built-in tables, constructed once and shared read-only.
    pub static ref BUILTIN_KNOWLEDGE: Arc<GuidanceKnowledge> = Arc::new(GuidanceKnowledge::builtin());
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralTips {
    pub effective_keywords: Vec<String>,
    pub search_strategies: Vec<String>,
    pub common_pitfalls: Vec<String>,
}

/// Japanese to English lookup used for translation suggestions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationPatterns {
    pub basic_foods: BTreeMap<String, String>,
    pub cooking_methods: BTreeMap<String, String>,
    pub parts_cuts: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FallbackStrategies {
    pub no_results: Vec<String>,
    pub too_many_results: Vec<String>,
    pub unknown_food: Vec<String>,
    pub api_errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryGuidance {
    pub category: String,
    pub known: bool,
    pub subcategories: Vec<String>,
    pub keywords: Vec<String>,
    pub modifiers: Vec<String>,
    pub examples: Vec<String>,
    pub tips: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_strategy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentGuidance {
    pub intent: String,
    pub known: bool,
    pub recommended_data_types: Vec<DataType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSolution {
    pub issue: String,
    pub solution: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComprehensiveExamples {
    pub excellent_queries_by_category: BTreeMap<String, Vec<String>>,
    pub problematic_inputs_and_solutions: BTreeMap<String, ProblemSolution>,
    pub excellent_queries: Vec<String>,
    pub good_queries: Vec<String>,
    pub poor_queries: Vec<String>,
}

/// Immutable guidance tables. Handed to the generator at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidanceKnowledge {
    pub version: String,
    pub general_tips: GeneralTips,
    pub data_type_guidance: BTreeMap<DataType, String>,
    pub recommended_data_types: Vec<DataType>,
    pub translations: TranslationPatterns,
    pub fallback_strategies: FallbackStrategies,
    pub categories: BTreeMap<String, CategoryGuidance>,
    pub intents: BTreeMap<String, IntentGuidance>,
    pub examples: ComprehensiveExamples,
    pub usage_tips: Vec<String>,
    /// Main ingredients of common composite dishes.
    pub dish_components: BTreeMap<String, Vec<String>>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn pairs(items: &[(&str, &str)]) -> BTreeMap<String, String> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

const BASIC_FOODS: &[(&str, &str)] = &[
    ("りんご", "apple"),
    ("バナナ", "banana"),
    ("オレンジ", "orange"),
    ("鶏肉", "chicken"),
    ("牛肉", "beef"),
    ("豚肉", "pork"),
    ("米", "rice"),
    ("パン", "bread"),
    ("卵", "egg"),
    ("牛乳", "milk"),
    ("チーズ", "cheese"),
    ("キャベツ", "cabbage"),
    ("レタス", "lettuce"),
    ("トマト", "tomato"),
    ("玉ねぎ", "onion"),
    ("人参", "carrot"),
    ("じゃがいも", "potato"),
    ("ブロッコリー", "broccoli"),
    ("ほうれん草", "spinach"),
    ("鮭", "salmon"),
    ("まぐろ", "tuna"),
    ("鯛", "sea bream"),
    ("えび", "shrimp"),
    ("いか", "squid"),
    ("たこ", "octopus"),
    ("大豆", "soybean"),
    ("小豆", "adzuki bean"),
    ("アーモンド", "almond"),
    ("くるみ", "walnut"),
    ("ピーナッツ", "peanut"),
    ("納豆", "natto fermented soybeans"),
    ("味噌", "miso soybean paste"),
    ("昆布", "kelp seaweed"),
    ("わかめ", "wakame seaweed"),
    ("こんにゃく", "konjac"),
    ("豆腐", "tofu"),
];

const COOKING_METHODS: &[(&str, &str)] = &[
    ("生", "raw"),
    ("茹でた", "boiled"),
    ("焼いた", "grilled"),
    ("蒸した", "steamed"),
    ("揚げた", "fried"),
    ("炒めた", "stir-fried"),
    ("煮た", "simmered"),
    ("炙った", "broiled"),
];

const PARTS_CUTS: &[(&str, &str)] = &[
    ("胸肉", "breast"),
    ("もも肉", "thigh"),
    ("手羽", "wing"),
    ("ひき肉", "ground"),
    ("骨なし", "boneless"),
    ("皮なし", "skinless"),
];

struct CategoryRow {
    name: &'static str,
    subcategories: &'static [&'static str],
    keywords: &'static [&'static str],
    modifiers: &'static [&'static str],
    examples: &'static [&'static str],
    tips: &'static [&'static str],
}

const CATEGORIES: &[CategoryRow] = &[
    CategoryRow {
        name: "meat",
        subcategories: &["poultry", "beef", "pork", "lamb", "game"],
        keywords: &["chicken", "beef", "pork", "turkey", "duck", "lamb"],
        modifiers: &["breast", "thigh", "ground", "lean", "skinless", "boneless", "raw", "cooked"],
        examples: &[
            "chicken breast skinless boneless raw",
            "beef ground 85% lean raw",
            "pork chop boneless cooked",
        ],
        tips: &[
            "Name the cut (breast, thigh, etc.)",
            "State whether the skin is included (skinless / with skin)",
            "State the cooking state (raw / cooked)",
            "Mind the fat content (lean, 85% lean, etc.)",
        ],
    },
    CategoryRow {
        name: "seafood",
        subcategories: &["fish", "shellfish", "mollusks"],
        keywords: &["salmon", "tuna", "cod", "shrimp", "crab", "oyster"],
        modifiers: &["fresh", "frozen", "raw", "cooked", "farmed", "wild"],
        examples: &[
            "salmon atlantic farmed raw",
            "tuna yellowfin fresh raw",
            "shrimp cooked moist heat",
        ],
        tips: &[
            "Name the species",
            "State whether it is farmed or wild",
            "State the cooking state",
        ],
    },
    CategoryRow {
        name: "nuts_seeds",
        subcategories: &["tree_nuts", "seeds", "legumes"],
        keywords: &["almond", "walnut", "peanut", "sunflower seed", "chia seed"],
        modifiers: &["raw", "roasted", "salted", "unsalted", "whole", "chopped"],
        examples: &["almonds raw", "walnuts english raw", "sunflower seeds dry roasted"],
        tips: &[
            "State the processing (raw / roasted)",
            "State whether salt was added",
        ],
    },
    CategoryRow {
        name: "beverages",
        subcategories: &["juices", "dairy_drinks", "plant_milks", "alcoholic"],
        keywords: &["orange juice", "milk", "almond milk", "coffee", "tea"],
        modifiers: &["fresh", "from concentrate", "unsweetened", "whole", "skim"],
        examples: &["orange juice fresh", "milk whole 3.25% milkfat", "almond milk unsweetened"],
        tips: &[
            "State whether it is fresh or from concentrate",
            "Check for added sugar",
        ],
    },
    CategoryRow {
        name: "oils_fats",
        subcategories: &["cooking_oils", "butter", "margarine"],
        keywords: &["olive oil", "coconut oil", "butter", "margarine"],
        modifiers: &["extra virgin", "refined", "salted", "unsalted"],
        examples: &["olive oil extra virgin", "coconut oil raw", "butter salted"],
        tips: &["State the refinement", "State whether it is salted"],
    },
    CategoryRow {
        name: "fruit",
        subcategories: &[],
        keywords: &["apple", "banana", "orange", "strawberry", "grape", "mango", "pineapple"],
        modifiers: &["fresh", "raw", "without skin", "with skin", "frozen"],
        examples: &["apple raw with skin", "banana raw", "strawberries raw"],
        tips: &[
            "Ask for the fresh state (fresh, raw)",
            "State whether the skin is included",
            "Name the variety when it matters",
        ],
    },
    CategoryRow {
        name: "vegetable",
        subcategories: &["leafy_greens", "root_vegetables", "cruciferous", "nightshades"],
        keywords: &["broccoli", "carrot", "spinach", "tomato", "potato", "onion", "bell pepper"],
        modifiers: &["raw", "cooked", "boiled", "steamed", "roasted", "without salt"],
        examples: &["broccoli raw", "carrot raw", "spinach raw"],
        tips: &[
            "State the cooking method (raw / cooked)",
            "Consider whether salt was added",
        ],
    },
    CategoryRow {
        name: "dairy",
        subcategories: &[],
        keywords: &["milk", "cheese", "yogurt", "butter", "cream"],
        modifiers: &["whole", "2%", "skim", "low fat", "plain", "greek"],
        examples: &["milk whole 3.25% milkfat", "yogurt plain whole milk", "cheese cheddar"],
        tips: &[
            "State the fat content",
            "State whether it is plain or flavored",
        ],
    },
    CategoryRow {
        name: "grain",
        subcategories: &["cereals", "pasta", "bread", "rice"],
        keywords: &["rice", "bread", "pasta", "oats", "quinoa", "wheat", "barley"],
        modifiers: &["white", "brown", "whole grain", "enriched", "cooked", "dry"],
        examples: &["rice white long-grain cooked", "bread whole wheat", "oats dry"],
        tips: &[
            "State the refinement (white / brown / whole grain)",
            "State the cooking state (cooked / dry)",
        ],
    },
];

struct IntentRow {
    name: &'static str,
    recommended: &'static [DataType],
    focus: &'static str,
    tips: &'static [&'static str],
}

const INTENTS: &[IntentRow] = &[
    IntentRow {
        name: "basic_nutrition",
        recommended: &[DataType::Foundation, DataType::SrLegacy],
        focus: "Core nutrients (calories, protein, fat, carbohydrates)",
        tips: &[
            "Prefer the Foundation data type",
            "Search with a common food name",
            "State the cooking state",
        ],
    },
    IntentRow {
        name: "detailed_analysis",
        recommended: &[DataType::Foundation],
        focus: "Detailed nutrient analysis (vitamins, minerals, amino acids)",
        tips: &[
            "Use Foundation data only",
            "Name the variety or cut",
            "Compare several similar foods",
        ],
    },
    IntentRow {
        name: "comparison",
        recommended: &[DataType::Foundation, DataType::SrLegacy],
        focus: "Comparing the nutritional value of several foods",
        tips: &[
            "Stick to one data type",
            "Compare foods in the same cooking state",
            "Normalize to values per 100 g",
        ],
    },
    IntentRow {
        name: "high_protein",
        recommended: &[DataType::Foundation, DataType::SrLegacy],
        focus: "Finding high-protein foods",
        tips: &[
            "Search meat, fish and legumes first",
            "Sort by protein content",
            "Account for changes from cooking",
        ],
    },
    IntentRow {
        name: "low_carb",
        recommended: &[DataType::Foundation, DataType::SrLegacy],
        focus: "Finding low-carbohydrate foods",
        tips: &[
            "Focus on vegetables, meat and fish",
            "Check the carbohydrate content",
            "Tell sugars apart from dietary fiber",
        ],
    },
];

const DISH_COMPONENTS: &[(&str, &[&str])] = &[
    ("チキンサラダ", &["chicken breast", "lettuce", "tomato"]),
    ("chicken salad", &["chicken breast", "lettuce", "tomato"]),
    ("野菜サラダ", &["lettuce raw", "tomato raw", "carrot raw"]),
    ("チキンカレー", &["chicken breast cooked", "rice white cooked"]),
    ("spaghetti carbonara", &["spaghetti pasta", "eggs", "pecorino cheese", "black pepper", "pancetta"]),
    ("japanese ramen", &["ramen noodles", "chicken broth", "soy sauce", "green onions"]),
    ("pizza", &["pizza dough", "tomato sauce", "mozzarella cheese"]),
];

impl GuidanceKnowledge {
    pub fn builtin() -> Self {
        let categories = CATEGORIES
            .iter()
            .map(|row| {
                let guidance = CategoryGuidance {
                    category: row.name.to_string(),
                    known: true,
                    subcategories: strings(row.subcategories),
                    keywords: strings(row.keywords),
                    modifiers: strings(row.modifiers),
                    examples: strings(row.examples),
                    tips: strings(row.tips),
                    fallback_strategy: None,
                };
                (row.name.to_string(), guidance)
            })
            .collect();

        let intents = INTENTS
            .iter()
            .map(|row| {
                let guidance = IntentGuidance {
                    intent: row.name.to_string(),
                    known: true,
                    recommended_data_types: row.recommended.to_vec(),
                    focus: Some(row.focus.to_string()),
                    tips: strings(row.tips),
                };
                (row.name.to_string(), guidance)
            })
            .collect();

        let dish_components = DISH_COMPONENTS
            .iter()
            .map(|(dish, parts)| (dish.to_string(), strings(parts)))
            .collect();

        Self {
            version: KNOWLEDGE_VERSION.to_string(),
            general_tips: GeneralTips {
                effective_keywords: strings(&[
                    "Use English food names (translate Japanese names first)",
                    "Include the specific cut or cooking method",
                    "Prefer generic food names over brand names",
                    "Try several synonyms (e.g. eggplant, aubergine)",
                    "Watch for regional naming differences (US vs UK English)",
                ]),
                search_strategies: strings(&[
                    "Start with the basic food name",
                    "Add modifiers when there are too many results",
                    "Try a broader term or a synonym when there are too few results",
                    "Split composite foods into their main ingredients",
                    "Prefer minimally processed basic foods",
                ]),
                common_pitfalls: strings(&[
                    "Overly specific searches (e.g. a particular brand name)",
                    "Overly vague searches (e.g. just \"vegetable\" or \"meat\")",
                    "Mixing up cooking states (raw vs cooked)",
                    "Leaving out the cut for meat",
                ]),
            },
            data_type_guidance: [
                (DataType::Foundation, "Most reliable basic food data"),
                (DataType::SrLegacy, "Legacy USDA Standard Reference database"),
                (DataType::Branded, "Branded product data (only for specific products)"),
                (DataType::Survey, "Survey data (not recommended for general searches)"),
            ]
            .into_iter()
            .map(|(data_type, text)| (data_type, text.to_string()))
            .collect(),
            recommended_data_types: vec![DataType::Foundation, DataType::SrLegacy],
            translations: TranslationPatterns {
                basic_foods: pairs(BASIC_FOODS),
                cooking_methods: pairs(COOKING_METHODS),
                parts_cuts: pairs(PARTS_CUTS),
            },
            fallback_strategies: FallbackStrategies {
                no_results: strings(&[
                    "Use a more general term (e.g. 'chicken breast' → 'chicken')",
                    "Try a synonym (e.g. 'eggplant' → 'aubergine')",
                    "Use the broader concept (e.g. 'salmon' → 'fish')",
                    "Change the data type (Foundation → SR Legacy → Branded)",
                ]),
                too_many_results: strings(&[
                    "Add more specific modifiers",
                    "State the cooking state (raw / cooked)",
                    "Name the cut (for meat)",
                    "Restrict the data type (Foundation only)",
                ]),
                unknown_food: strings(&[
                    "Substitute a similar, well-known food",
                    "Split it into its main ingredients",
                    "Replace a regional name with the common name",
                    "Try another English expression",
                ]),
                api_errors: strings(&[
                    "Check the network connection",
                    "Check whether the API rate limit was reached",
                    "Retry with a simpler query",
                    "Use previously fetched results",
                ]),
            },
            categories,
            intents,
            examples: builtin_examples(),
            usage_tips: strings(&[
                "🔤 Translate Japanese input to English before searching",
                "🎯 Split composite dishes into their main ingredients",
                "📊 Prefer the Foundation or SR Legacy data types",
                "🔍 Try synonyms or broader terms when nothing is found",
                "⚖️ Always state the cooking state (raw / cooked)",
                "🥩 For meat, name the cut and whether the skin is included",
                "🌟 Use generic food names instead of brand names",
                "🎨 Try several search patterns to find the best results",
            ]),
            dish_components,
        }
    }

    pub fn category(&self, name: &str) -> Option<&CategoryGuidance> {
        self.categories.get(&name.trim().to_lowercase())
    }

    pub fn intent(&self, name: &str) -> Option<&IntentGuidance> {
        self.intents.get(name)
    }
}

fn builtin_examples() -> ComprehensiveExamples {
    let by_category: &[(&str, &[&str])] = &[
        ("meat", &["chicken breast skinless boneless raw", "beef ground 85% lean raw", "pork chop bone-in cooked"]),
        ("seafood", &["salmon atlantic farmed raw", "shrimp cooked moist heat", "tuna yellowfin fresh raw"]),
        ("vegetables", &["broccoli raw", "carrot raw", "spinach raw"]),
        ("fruits", &["apple raw with skin", "banana raw", "orange raw all commercial varieties"]),
        ("grains", &["rice white long-grain cooked", "bread whole wheat", "oats dry"]),
        ("dairy", &["milk whole 3.25% milkfat", "cheese cheddar", "yogurt plain whole milk"]),
        ("nuts_seeds", &["almonds raw", "walnuts english raw", "sunflower seeds dry roasted"]),
    ];
    let problems: &[(&str, &str, &str)] = &[
        (
            "野菜サラダ",
            "Composite dish written in Japanese",
            "Search lettuce raw, tomato raw, carrot raw separately",
        ),
        (
            "チキンカレー",
            "Composite dish written in Japanese",
            "Search chicken breast cooked, rice white cooked separately",
        ),
        ("コカコーラ", "Brand name", "Search for cola carbonated"),
    ];

    ComprehensiveExamples {
        excellent_queries_by_category: by_category
            .iter()
            .map(|(category, queries)| (category.to_string(), strings(queries)))
            .collect(),
        problematic_inputs_and_solutions: problems
            .iter()
            .map(|(input, issue, solution)| {
                let entry = ProblemSolution {
                    issue: issue.to_string(),
                    solution: solution.to_string(),
                };
                (input.to_string(), entry)
            })
            .collect(),
        excellent_queries: strings(&[
            "chicken breast skinless boneless raw",
            "apple raw with skin",
            "rice white long-grain cooked",
            "salmon atlantic farmed raw",
            "broccoli raw",
        ]),
        good_queries: strings(&[
            "chicken breast",
            "apple fresh",
            "white rice cooked",
            "salmon raw",
            "broccoli",
        ]),
        poor_queries: strings(&["chicken", "apple juice", "rice", "fish", "vegetable"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_populated() {
        let knowledge = &*BUILTIN_KNOWLEDGE;
        assert_eq!(knowledge.version, KNOWLEDGE_VERSION);
        assert_eq!(knowledge.categories.len(), 9);
        assert_eq!(knowledge.intents.len(), 5);
        assert_eq!(knowledge.translations.basic_foods["鶏肉"], "chicken");
        assert_eq!(knowledge.translations.cooking_methods["生"], "raw");
        assert!(!knowledge.fallback_strategies.api_errors.is_empty());
    }

    #[test]
    fn test_category_lookup_is_case_insensitive() {
        let knowledge = GuidanceKnowledge::builtin();
        let meat = knowledge.category(" Meat ").expect("meat");
        assert!(meat.known);
        assert!(meat.examples.iter().any(|e| e.contains("chicken")));
        assert!(knowledge.category("candy").is_none());
    }

    #[test]
    fn test_detailed_analysis_recommends_foundation_only() {
        let knowledge = GuidanceKnowledge::builtin();
        let intent = knowledge.intent("detailed_analysis").unwrap();
        assert_eq!(intent.recommended_data_types, vec![DataType::Foundation]);
    }
}
