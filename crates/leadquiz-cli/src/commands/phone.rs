use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use anyhow::Result;
use clap::Args;
use leadquiz_core::dto::PhoneCheckDto;

#[derive(Debug, Args)]
pub struct CheckPhoneArgs {
    /// Phone numbers exactly as a user would type them
    #[arg(required = true)]
    pub phones: Vec<String>,
}

pub fn check_phone(ctx: &Context<'_>, args: CheckPhoneArgs) -> Result<()> {
    let rules = &ctx.config.phone;
    let results: Vec<PhoneCheckDto> = args
        .phones
        .iter()
        .map(|raw| PhoneCheckDto::new(raw, rules.validate(raw)))
        .collect();
    let invalid = results.iter().filter(|item| !item.valid).count();

    if ctx.json {
        print_json(&results)?;
    } else {
        for item in &results {
            match &item.message {
                None => println!("{}: valid", item.input),
                Some(message) => println!("{}: invalid: {}", item.input, message),
            }
        }
    }

    if invalid > 0 {
        return Err(invalid_input(format!(
            "{invalid} of {} phone numbers rejected",
            results.len()
        )));
    }
    Ok(())
}
