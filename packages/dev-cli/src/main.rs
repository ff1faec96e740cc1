//! Operator CLI for the Medipost production workflow.
//!
//! Drives the same workflow layer the admin UI uses: select a post, inspect
//! its permitted stages, edit and commit the writing guide, perform
//! transitions, and watch the generation queue.

mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use medipost_client::MedipostClient;
use postflow::{
    permitted_stages, CanonicalStage, FieldGroup, KeywordSetKind, QueueMonitor, Snapshot,
    WorkflowAction, WorkflowOrchestrator, ALL_KEYWORD_SETS, ALL_STAGES,
};

use config::Config;

#[derive(Parser)]
#[command(name = "medipost-dev", about = "Drive the Medipost production workflow")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a post's workflow view and permitted stages
    View { post_id: String },

    /// Inspect and edit a post's writing guide
    Guide {
        post_id: String,
        #[command(subcommand)]
        command: GuideCommand,
    },

    /// Perform a workflow action on a post
    Action {
        post_id: String,
        #[command(subcommand)]
        action: ActionCommand,
    },

    /// Show the AI pipeline queue, optionally polling until interrupted
    Queue {
        #[arg(long)]
        watch: bool,
    },

    /// List the raw status codes the catalog knows and their stages
    Statuses,
}

#[derive(Subcommand)]
enum GuideCommand {
    /// Print the current draft
    Show,
    /// Add keywords to a set (region|hospital|symptom|procedure|treatment|target)
    AddKeyword { set: String, values: Vec<String> },
    /// Remove a keyword from a set
    RemoveKeyword { set: String, value: String },
    /// Replace the free-text writing guide
    SetGuide { text: String },
    /// Select a persona by id
    SetPersona { persona_id: String },
    /// Set the emoji-intensity level
    SetEmoji { level: u8 },
    /// Commit a field group (persona|keywords|emoji)
    Commit { group: String },
}

#[derive(Subcommand)]
enum ActionCommand {
    ApproveMaterial,
    RejectMaterial { reason: String },
    CompleteGuide,
    Generate,
    Regenerate,
    ApproveResult,
    RejectResult { reason: String },
    UpdateContent {
        content: String,
        #[arg(long)]
        title: Option<String>,
    },
    ClientApprove,
    ClientReject { reason: String },
    Schedule { date: NaiveDate, time: NaiveTime },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let client = MedipostClient::new(config.api_token).with_base_url(config.base_url);
    let orch = WorkflowOrchestrator::new(client);

    match cli.command {
        Command::View { post_id } => {
            orch.select_post(&post_id).await?;
            print_view(&orch.snapshot());
        }
        Command::Guide { post_id, command } => {
            orch.select_post(&post_id).await?;
            run_guide_command(&orch, command).await?;
        }
        Command::Action { post_id, action } => {
            orch.select_post(&post_id).await?;
            let action = to_workflow_action(action);
            let target = action.target_stage();
            orch.perform_action(action).await?;
            println!(
                "{} {}",
                "✓".bright_green(),
                format!("{} action applied", target.label()).bright_green()
            );
            print_view(&orch.snapshot());
        }
        Command::Queue { watch } => {
            run_queue(&orch, watch).await?;
        }
        Command::Statuses => {
            for code in CanonicalStage::known_raw_codes() {
                let stage = CanonicalStage::from_raw(code);
                println!("{:<28} {}", code, stage.label().bright_cyan());
            }
        }
    }

    Ok(())
}

async fn run_guide_command<B: postflow::WorkflowBackend>(
    orch: &WorkflowOrchestrator<B>,
    command: GuideCommand,
) -> Result<()> {
    match command {
        GuideCommand::Show => {
            orch.with_draft(|draft| {
                match draft.persona() {
                    Some(p) => println!("Persona: {} ({})", p.name.bright_white(), p.id),
                    None => println!("Persona: {}", "—".dimmed()),
                }
                match draft.emoji_level() {
                    Some(level) => {
                        let guide = draft.emoji_usage_guide(level).unwrap_or("?");
                        println!("Emoji level: {} ({})", level, guide);
                    }
                    None => println!("Emoji level: {}", "—".dimmed()),
                }
                for kind in ALL_KEYWORD_SETS {
                    let words: Vec<&str> =
                        draft.keywords(kind).iter().map(String::as_str).collect();
                    if words.is_empty() {
                        println!("{:<16} {}", kind.label(), "—".dimmed());
                    } else {
                        println!("{:<16} {}", kind.label(), words.join(", "));
                    }
                }
                let guide = draft.writing_guide();
                if guide.trim().is_empty() {
                    println!("Writing guide: {}", "—".dimmed());
                } else {
                    println!("Writing guide: {guide}");
                }
                if draft.is_complete() {
                    println!("{}", "Guide is complete".bright_green());
                } else {
                    println!("{}", "Guide is incomplete".yellow());
                }
            })?;
        }
        GuideCommand::AddKeyword { set, values } => {
            let kind = parse_keyword_set(&set)?;
            orch.with_draft(|draft| {
                for value in &values {
                    draft.add_keyword(kind, value);
                }
            })?;
            orch.commit(FieldGroup::Keywords).await?;
            println!("{}", "✓ keywords saved".bright_green());
        }
        GuideCommand::RemoveKeyword { set, value } => {
            let kind = parse_keyword_set(&set)?;
            orch.with_draft(|draft| draft.remove_keyword(kind, &value))?;
            orch.commit(FieldGroup::Keywords).await?;
            println!("{}", "✓ keywords saved".bright_green());
        }
        GuideCommand::SetGuide { text } => {
            orch.with_draft(|draft| draft.set_writing_guide(text))?;
            orch.commit(FieldGroup::Keywords).await?;
            println!("{}", "✓ writing guide saved".bright_green());
        }
        GuideCommand::SetPersona { persona_id } => {
            let found = orch.with_draft(|draft| draft.select_persona(&persona_id))?;
            if !found {
                bail!("persona '{persona_id}' is not offered for this post");
            }
            orch.commit(FieldGroup::Persona).await?;
            println!("{}", "✓ persona saved".bright_green());
        }
        GuideCommand::SetEmoji { level } => {
            orch.with_draft(|draft| draft.set_emoji_level(level))?;
            orch.commit(FieldGroup::Emoji).await?;
            println!("{}", "✓ emoji level saved".bright_green());
        }
        GuideCommand::Commit { group } => {
            orch.commit(parse_field_group(&group)?).await?;
            println!("{}", "✓ committed".bright_green());
        }
    }
    Ok(())
}

async fn run_queue<B: postflow::WorkflowBackend + 'static>(
    orch: &WorkflowOrchestrator<B>,
    watch: bool,
) -> Result<()> {
    if !watch {
        let status = orch.backend().fetch_queue_status().await?;
        print_queue(&status);
        return Ok(());
    }

    let monitor = QueueMonitor::start(Arc::clone(orch.backend()), Duration::from_secs(3));
    let mut rx = monitor.subscribe();
    println!("{}", "Watching queue (ctrl-c to stop)".dimmed());
    loop {
        tokio::select! {
            changed = rx.changed() => {
                changed?;
                if let Some(status) = rx.borrow_and_update().clone() {
                    print_queue(&status);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                monitor.stop();
                break;
            }
        }
    }
    Ok(())
}

fn print_view(snapshot: &Snapshot) {
    let Some(view) = &snapshot.view else {
        println!("{}", "no workflow data".dimmed());
        return;
    };

    let stage = snapshot.stage.unwrap_or(CanonicalStage::Unknown);
    println!(
        "{} {} [{}]",
        view.post_id.bright_white().bold(),
        view.title.as_deref().unwrap_or("—"),
        stage.label().bright_cyan()
    );
    println!("  raw status: {}", view.status);

    match &view.hospital {
        Some(h) => println!("  hospital: {} ({})", h.name, h.region.as_deref().unwrap_or("—")),
        None => println!("  hospital: {}", "no data".dimmed()),
    }
    match &view.campaign {
        Some(c) => println!("  campaign: {}", c.name),
        None => println!("  campaign: {}", "no data".dimmed()),
    }
    match &view.material {
        Some(m) => println!(
            "  treatment: {} ({} materials)",
            m.treatment_name,
            m.materials.len()
        ),
        None => println!("  treatment: {}", "no data".dimmed()),
    }

    println!("  stages:");
    let permitted = permitted_stages(stage);
    for ui in ALL_STAGES {
        let mark = if permitted.contains(&ui) {
            "✓".bright_green()
        } else {
            "✗".dimmed()
        };
        println!("    {} {}", mark, ui.label());
    }

    if let Some(err) = &snapshot.last_error {
        println!("  {} {}", "error:".bright_red(), err);
    }
}

fn print_queue(status: &medipost_client::QueueStatus) {
    println!(
        "waiting {} | processing {} | completed {} | failed {}",
        status.waiting.to_string().yellow(),
        status.processing.to_string().bright_cyan(),
        status.completed.to_string().bright_green(),
        status.failed.to_string().bright_red(),
    );
    for lane in &status.lanes {
        println!("  lane {:<12} {}/{}", lane.name, lane.active, lane.capacity);
    }
}

fn to_workflow_action(action: ActionCommand) -> WorkflowAction {
    match action {
        ActionCommand::ApproveMaterial => WorkflowAction::ApproveMaterial,
        ActionCommand::RejectMaterial { reason } => WorkflowAction::RejectMaterial { reason },
        ActionCommand::CompleteGuide => WorkflowAction::CompleteGuide,
        ActionCommand::Generate => WorkflowAction::TriggerGeneration,
        ActionCommand::Regenerate => WorkflowAction::Regenerate,
        ActionCommand::ApproveResult => WorkflowAction::ApproveResult,
        ActionCommand::RejectResult { reason } => WorkflowAction::RejectResult { reason },
        ActionCommand::UpdateContent { content, title } => {
            WorkflowAction::UpdateContent { title, content }
        }
        ActionCommand::ClientApprove => WorkflowAction::ClientApprove,
        ActionCommand::ClientReject { reason } => WorkflowAction::ClientReject { reason },
        ActionCommand::Schedule { date, time } => WorkflowAction::SchedulePublish { date, time },
    }
}

fn parse_keyword_set(s: &str) -> Result<KeywordSetKind> {
    let kind = match s {
        "region" => KeywordSetKind::Region,
        "hospital" => KeywordSetKind::Hospital,
        "symptom" => KeywordSetKind::Symptom,
        "procedure" => KeywordSetKind::Procedure,
        "treatment" => KeywordSetKind::Treatment,
        "target" => KeywordSetKind::Target,
        _ => bail!(
            "unknown keyword set '{s}' (expected region|hospital|symptom|procedure|treatment|target)"
        ),
    };
    Ok(kind)
}

fn parse_field_group(s: &str) -> Result<FieldGroup> {
    let group = match s {
        "persona" => FieldGroup::Persona,
        "keywords" => FieldGroup::Keywords,
        "emoji" => FieldGroup::Emoji,
        _ => bail!("unknown field group '{s}' (expected persona|keywords|emoji)"),
    };
    Ok(group)
}
