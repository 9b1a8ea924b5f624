use anyhow::{bail, Result};

use super::Flow;

pub fn handle_command(input: &str) -> Result<Flow> {
    match input.to_lowercase().as_str() {
        "help" => {
            println!("\n🥦 Nutrition Search Commands:");
            println!("  search <food> [size=N] [page=N]       - Search FoodData Central");
            println!("  evaluate <query> [focus=..] [target=..] - Search and grade the results");
            println!("  lookup <food> [id=FDC_ID]             - Key nutrients of the best match");
            println!("  Example: evaluate chicken breast raw focus=accuracy target=chicken_breast");
            println!();

            println!("🧭 Guidance Commands:");
            println!("  guide [text] [category=..] [intent=..] - Search tips and input analysis");
            println!("  Categories: meat, seafood, nuts_seeds, beverages, oils_fats, fruit, vegetable, dairy, grain");
            println!("  Intents: basic_nutrition, detailed_analysis, comparison, high_protein, low_carb");
            println!("  Example: guide チキンサラダ category=meat");
            println!();

            println!("⚖️ Evaluation focus:");
            println!("  accuracy, completeness, relevance, balanced (default)");
            println!("  Use underscores for spaces in option values");
            println!();

            println!("⚙️ System Commands:");
            println!("  help  - Show this help menu");
            println!("  exit  - Exit the program");
            Ok(Flow::Continue)
        }
        "exit" | "quit" => {
            println!("👋 Goodbye!");
            Ok(Flow::Exit)
        }
        _ => bail!("Unknown system command. Type 'help' for available commands."),
    }
}
