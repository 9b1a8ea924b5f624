use anyhow::{bail, Result};
use colored::Colorize;
use std::collections::HashMap;

use crate::food::analysis::nutrition::NutrientAmounts;
use crate::food::analysis::EvaluationResponse;
use crate::food::guidance::GuidanceResult;
use crate::food::types::{EvaluationFocus, SearchIntent};
use crate::food::{NutritionAdvisor, NutritionLookup};

const OPTION_KEYS: &[&str] = &["focus", "target", "category", "intent", "id", "page", "size"];

/// Free text plus `key=value` options taken out of a command line.
#[derive(Debug, Default, PartialEq)]
pub struct CommandArgs {
    pub text: String,
    pub options: HashMap<String, String>,
}

impl CommandArgs {
    pub fn parse(input: &str) -> Self {
        let mut words = Vec::new();
        let mut options = HashMap::new();
        for token in input.split_whitespace() {
            match token.split_once('=') {
                Some((key, value)) if OPTION_KEYS.contains(&key) && !value.is_empty() => {
                    options.insert(key.to_string(), value.to_string());
                }
                _ => words.push(token),
            }
        }
        Self {
            text: words.join(" "),
            options,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Underscores stand in for spaces in option values.
    pub fn phrase(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.replace('_', " "))
    }

    fn number<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            Some(value) => match value.parse() {
                Ok(n) => Ok(Some(n)),
                Err(_) => bail!("{} must be a number, got '{}'", key, value),
            },
            None => Ok(None),
        }
    }
}

pub async fn handle_command(input: &str, advisor: &NutritionAdvisor) -> Result<()> {
    let (command, rest) = input.split_once(' ').unwrap_or((input, ""));
    let args = CommandArgs::parse(rest);

    match command.to_lowercase().as_str() {
        "search" => search(&args, advisor).await,
        "evaluate" => evaluate(&args, advisor).await,
        "guide" => {
            guide(&args, advisor);
            Ok(())
        }
        "lookup" => lookup(&args, advisor).await,
        _ => bail!("Unknown command '{}'. Type 'help' for available commands.", command),
    }
}

async fn search(args: &CommandArgs, advisor: &NutritionAdvisor) -> Result<()> {
    if args.text.is_empty() {
        bail!("Please specify a food to search for. Usage: search <food> [size=N] [page=N]");
    }
    let mut query = advisor.search_query(&args.text);
    if let Some(size) = args.number("size")? {
        query = query.with_page_size(size);
    }
    if let Some(page) = args.number("page")? {
        query = query.with_page_number(page);
    }

    let batch = advisor.search(&query).await?;
    println!(
        "\n🔍 {} results for '{}' (showing {})",
        batch.total_hits.to_string().cyan(),
        args.text,
        batch.foods.len()
    );
    for food in &batch.foods {
        println!(
            "  {:>8}  {:<15} {}",
            food.fdc_id.to_string().yellow(),
            food.data_type.as_str().dimmed(),
            food.description
        );
    }
    println!();
    Ok(())
}

async fn evaluate(args: &CommandArgs, advisor: &NutritionAdvisor) -> Result<()> {
    if args.text.is_empty() {
        bail!("Please specify a query to evaluate. Usage: evaluate <query> [focus=accuracy] [target=chicken_breast]");
    }
    let focus = args.get("focus").map(EvaluationFocus::from_name);
    let target = args.phrase("target");
    let response = advisor
        .search_and_evaluate(&args.text, target.as_deref(), focus)
        .await;
    print_evaluation(&response);
    Ok(())
}

fn guide(args: &CommandArgs, advisor: &NutritionAdvisor) {
    let intent = args.get("intent").map(SearchIntent::from_name);
    let input = (!args.text.is_empty()).then_some(args.text.as_str());
    let result = advisor.guide(args.get("category"), intent.as_ref(), input);
    print_guidance(&result);
}

async fn lookup(args: &CommandArgs, advisor: &NutritionAdvisor) -> Result<()> {
    let fdc_id = args.number::<u64>("id")?;
    if args.text.is_empty() && fdc_id.is_none() {
        bail!("Please specify a food to look up. Usage: lookup <food> [id=FDC_ID]");
    }
    let lookup = advisor.lookup(&args.text, fdc_id, &[]).await?;
    print_lookup(&lookup);
    Ok(())
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{}", title.bold());
    for item in items {
        println!("  • {}", item);
    }
}

pub fn print_evaluation(response: &EvaluationResponse) {
    let result = match response {
        EvaluationResponse::Success(result) => result,
        EvaluationResponse::Error { message, error } => {
            println!("❌ {}: {}", message, error.red());
            return;
        }
    };

    let assessment = &result.overall_assessment;
    let grade = match assessment.score {
        s if s >= 0.7 => assessment.grade.to_string().green(),
        s if s >= 0.5 => assessment.grade.to_string().yellow(),
        _ => assessment.grade.to_string().red(),
    };
    println!("\n📊 {} [{}]", assessment.summary, grade);
    println!(
        "  relevance {:.2} | completeness {:.2} | diversity {:.2} | data quality {:.2}",
        result.relevance_score,
        result.completeness_score,
        result.diversity_score,
        result.result_quality.quality_score
    );
    println!(
        "  language: {} | specificity: {:.2} | focus: {}",
        result.query_analysis.language,
        result.query_analysis.specificity_score,
        assessment.focus.as_str()
    );
    println!();
    print_list("💡 Suggestions:", &result.improvement_suggestions);
    print_list("➡️  Next steps:", &result.next_steps);
    println!();
}

pub fn print_guidance(result: &GuidanceResult) {
    if let Some(analysis) = &result.input_analysis {
        println!(
            "\n🧭 Input: {:?}, {} word(s), language {}",
            analysis.input_type, analysis.word_count, analysis.detected_language
        );
        if !analysis.detected_food.is_empty() {
            println!("  Detected foods: {}", analysis.detected_food.join(", ").cyan());
        }
    }
    if let Some(suggestions) = &result.specific_suggestions {
        print_list("💡 Suggestions:", suggestions);
    }
    if let Some(category) = &result.category_specific {
        println!("\n🥗 Category: {}", category.category.cyan());
        if !category.keywords.is_empty() {
            println!("  Keywords: {}", category.keywords.join(", "));
        }
        print_list("  Examples:", &category.examples);
        print_list("  Tips:", &category.tips);
    }
    if let Some(intent) = &result.intent_specific {
        println!("\n🎯 Intent: {}", intent.intent.cyan());
        if let Some(focus) = &intent.focus {
            println!("  Focus: {}", focus);
        }
        print_list("  Tips:", &intent.tips);
    }
    println!();
    print_list("📌 Usage tips:", &result.usage_tips);
    println!();
}

fn print_amounts(amounts: &NutrientAmounts) {
    let rows = [
        ("Energy", amounts.energy_kcal, "kcal"),
        ("Protein", amounts.protein_g, "g"),
        ("Fat", amounts.fat_g, "g"),
        ("Carbohydrates", amounts.carbohydrates_g, "g"),
        ("Fiber", amounts.fiber_g, "g"),
        ("Sugars", amounts.sugars_g, "g"),
        ("Vitamin C", amounts.vitamin_c_mg, "mg"),
        ("Iron", amounts.iron_mg, "mg"),
        ("Calcium", amounts.calcium_mg, "mg"),
        ("Sodium", amounts.sodium_mg, "mg"),
    ];
    for (name, value, unit) in rows {
        if let Some(value) = value {
            println!("  - {}: {} {}", name, value, unit);
        }
    }
}

pub fn print_lookup(lookup: &NutritionLookup) {
    let info = &lookup.nutrition_info;
    println!(
        "\n🍽️  {} ({}, fdcId {})",
        info.description.bold(),
        info.data_type,
        lookup.fdc_id
    );
    print_amounts(&info.amounts);
    if let (Some(per_serving), Some(size)) = (&info.per_serving, info.serving_size) {
        println!("  Per serving ({} g):", size);
        print_amounts(per_serving);
    }
    println!("  Source: {}\n", lookup.source.dimmed());
}
