use crate::commands::{print_json, Context};
use anyhow::Result;
use clap::Args;
use leadquiz_core::domain::questions;

#[derive(Debug, Args)]
pub struct QuestionsArgs {}

pub fn list_questions(ctx: &Context<'_>, _args: QuestionsArgs) -> Result<()> {
    let all = questions();
    if ctx.json {
        return print_json(&all);
    }

    for question in all {
        println!("{}. {}", question.id, question.text);
        if let Some(description) = question.description {
            println!("   {}", description);
        }
        for option in question.options {
            println!("   [{}] {}", option.id, option.label);
        }
    }
    Ok(())
}
