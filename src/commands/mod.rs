use anyhow::Result;

use crate::food::NutritionAdvisor;

pub mod food_cmd;
mod system;

/// Whether the REPL keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct CommandHandler {
    advisor: NutritionAdvisor,
}

impl CommandHandler {
    pub fn new(advisor: NutritionAdvisor) -> Self {
        Self { advisor }
    }

    pub async fn handle_command(&mut self, input: &str) -> Result<Flow> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Flow::Continue);
        }

        if matches!(input.to_lowercase().as_str(), "help" | "exit" | "quit") {
            return system::handle_command(input);
        }

        food_cmd::handle_command(input, &self.advisor).await?;
        Ok(Flow::Continue)
    }
}
