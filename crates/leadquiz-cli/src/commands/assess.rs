use crate::commands::report_fmt::render_report;
use crate::commands::{print_json, Context};
use crate::util::{progress_bar, prompt_line, prompt_raw_line};
use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::Args;
use leadquiz_config::AppConfig;
use leadquiz_core::domain::{
    normalize_name, AssessmentResult, Lead, PreferredLanguage, QuizSession, Selections,
};
use leadquiz_core::dto::LeadPayload;
use leadquiz_core::rules::PhoneRules;
use leadquiz_core::CoreError;
use leadquiz_services::gemini::{GeminiClient, GeminiSettings};
use leadquiz_services::prompt::build_prompt;
use leadquiz_services::sheet::SheetWebhook;
use leadquiz_services::{AssessmentProvider, LeadSink};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::{debug, warn};

const PROGRESS_WIDTH: usize = 20;

#[derive(Debug, Args)]
pub struct AssessArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub language: Option<String>,
    /// Answer a question up front, e.g. `--answer 1=bachelor` (repeatable)
    #[arg(long = "answer", value_name = "QUESTION=OPTION")]
    pub answers: Vec<String>,
    /// Do not send the lead to the spreadsheet webhook
    #[arg(long)]
    pub skip_sheet: bool,
    /// Print the webhook payload and the prompt without contacting any service
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct DryRunDto<'a> {
    payload: &'a LeadPayload,
    prompt: String,
}

#[derive(Debug, Serialize)]
struct AssessmentReportDto<'a> {
    name: &'a str,
    assessment: &'a AssessmentResult,
}

pub fn assess(ctx: &Context<'_>, args: AssessArgs) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut prompts = io::stderr().lock();
    let lead = collect_lead(&args, &ctx.config.phone, &mut input, &mut prompts)?;
    let payload = LeadPayload::from_lead(&lead, Utc::now());

    if args.dry_run {
        let prompt = build_prompt(&lead.answers, &lead.name);
        if ctx.json {
            return print_json(&DryRunDto {
                payload: &payload,
                prompt,
            });
        }
        println!("Webhook payload:");
        println!("{}", serde_json::to_string_pretty(&payload)?);
        println!();
        println!("Assessment prompt:");
        println!("{prompt}");
        return Ok(());
    }

    let sink = lead_sink(ctx.config, args.skip_sheet);
    let provider = assessment_provider(ctx.config);
    let result = run_assessment(
        &lead,
        &payload,
        sink.as_ref().map(|sink| sink as &dyn LeadSink),
        &provider,
    )?;

    if ctx.json {
        return print_json(&AssessmentReportDto {
            name: &lead.name,
            assessment: &result,
        });
    }
    print!("{}", render_report(&result, Some(&lead.name)));
    Ok(())
}

fn lead_sink(config: &AppConfig, skip: bool) -> Option<SheetWebhook> {
    if skip {
        debug!("sheet save disabled by --skip-sheet");
        return None;
    }
    match &config.sheet.webhook_url {
        Some(url) => {
            debug!(url = %url, "sheet webhook configured");
            Some(SheetWebhook::new(
                url.clone(),
                Duration::from_secs(config.sheet.timeout_secs),
            ))
        }
        None => {
            warn!("skipping sheet save: no webhook url configured");
            None
        }
    }
}

fn assessment_provider(config: &AppConfig) -> GeminiClient {
    let settings = &config.assessment;
    let settings = GeminiSettings {
        endpoint: settings.endpoint.clone(),
        model: settings.model.clone(),
        api_key: settings.api_key(),
        api_key_env: settings.api_key_env.clone(),
        temperature: settings.temperature,
        timeout: Duration::from_secs(settings.timeout_secs),
    };
    debug!(url = %settings.generate_url(), "assessment endpoint resolved");
    GeminiClient::new(settings)
}

/// Records the lead (best effort) and asks the provider for the narrative.
pub(crate) fn run_assessment(
    lead: &Lead,
    payload: &LeadPayload,
    sink: Option<&dyn LeadSink>,
    provider: &dyn AssessmentProvider,
) -> Result<AssessmentResult> {
    if let Some(sink) = sink {
        match sink.save_lead(payload) {
            Ok(()) => debug!(sink = sink.sink_name(), "lead saved"),
            Err(err) => warn!(sink = sink.sink_name(), error = %err, "failed to save lead"),
        }
    }

    debug!(provider = provider.provider_name(), "requesting assessment");
    provider
        .assess(&lead.answers, &lead.name)
        .with_context(|| "unable to generate assessment")
}

/// Fills in whatever the flags left out by prompting on `out` and reading `input`.
/// Flag values are validated once; prompted values are asked again until valid.
pub(crate) fn collect_lead<R: BufRead, W: Write>(
    args: &AssessArgs,
    rules: &PhoneRules,
    input: &mut R,
    out: &mut W,
) -> Result<Lead> {
    let selections = Selections::parse(&args.answers)?;
    let mut session = QuizSession::new();
    session.apply(&selections)?;

    while let Some(question) = session.current_question() {
        writeln!(
            out,
            "\nStep {} of {} {}",
            session.display_step(),
            session.total_steps(),
            progress_bar(session.progress_percent(), PROGRESS_WIDTH)
        )?;
        writeln!(out, "{}", question.text)?;
        if let Some(description) = question.description {
            writeln!(out, "{description}")?;
        }
        for (index, option) in question.options.iter().enumerate() {
            writeln!(out, "  {}. {}", index + 1, option.label)?;
        }
        let choice = prompt_line(input, out, "Your choice: ")?;
        if let Err(err) = session.answer(&choice) {
            writeln!(out, "{err}")?;
        }
    }
    let answers = session.into_answers()?;

    let name = match &args.name {
        Some(name) => normalize_name(name)?,
        None => loop {
            let line = prompt_line(input, out, "Full name: ")?;
            match normalize_name(&line) {
                Ok(name) => break name,
                Err(err) => writeln!(out, "{err}")?,
            }
        },
    };

    let phone = match &args.phone {
        Some(phone) => {
            rules
                .validate(phone)
                .into_result()
                .map_err(CoreError::InvalidPhone)?;
            phone.clone()
        }
        None => loop {
            let line = prompt_raw_line(input, out, "Phone number: ")?;
            match rules.validate(&line).into_result() {
                Ok(()) => break line,
                Err(reason) => writeln!(out, "{reason}")?,
            }
        },
    };

    let language = match &args.language {
        Some(raw) => raw.parse::<PreferredLanguage>()?,
        None => {
            let choices = PreferredLanguage::ALL
                .iter()
                .map(|language| language.as_str())
                .collect::<Vec<_>>()
                .join("/");
            let label = format!("Preferred language ({choices}) [English]: ");
            loop {
                let line = prompt_line(input, out, &label)?;
                if line.is_empty() {
                    break PreferredLanguage::default();
                }
                match line.parse::<PreferredLanguage>() {
                    Ok(language) => break language,
                    Err(err) => writeln!(out, "{err}")?,
                }
            }
        }
    };

    Ok(Lead::with_rules(&name, &phone, language, answers, rules)?)
}
