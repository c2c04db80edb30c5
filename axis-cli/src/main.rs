//! axis: terminal front end for AXIS interview prep
//!
//! # Subcommands
//! - `generate --company <name> [...]`   scrape + generate a brief
//! - `brief <id> [--tab <tab>] [--watch]` show a brief, optionally polling
//! - `link <id> [--copy]`                interviewee links (server-backed and token)
//! - `decode <token>`                    inspect a microsite token
//! - `copilot <id>`                      live walkthrough, then the debrief
//! - `debrief <id> --key-insights <..>`  submit a debrief without the walkthrough

mod console;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axis_core::models::SchemaSection;
use axis_core::{
    codec, AxisConfig, Backend, Banner, BriefSession, BriefTab, CoPilot, DebriefForm, FollowUp,
    Intake, IntakeForm, ReqwestHttpClient,
};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{fmt, EnvFilter};

use console::{ConsoleNavigator, StdoutClipboard};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "axis", version, about = "AXIS: AI interview briefs for university interviewers")]
struct Cli {
    /// Config file (TOML); missing files fall back to defaults
    #[arg(short, long, default_value = "axis.toml")]
    config: String,

    /// Backend base URL (overrides api.base_url)
    #[arg(long, env = "AXIS_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape a company and generate its interview brief
    Generate {
        #[arg(long)]
        company: String,
        #[arg(long, default_value = "")]
        url: String,
        #[arg(long, default_value = "")]
        interviewee_name: String,
        #[arg(long, default_value = "")]
        interviewee_title: String,
        #[arg(long, default_value = "")]
        sector: String,
        /// Interviewer's own notes for the brief
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Show a brief
    Brief {
        id: String,
        #[arg(long, value_enum, default_value_t = TabArg::Brief)]
        tab: TabArg,
        /// Keep polling until the debrief is completed
        #[arg(long)]
        watch: bool,
    },

    /// Print the interviewee links for a brief
    Link {
        id: String,
        /// Public origin the links point at (overrides microsite.origin)
        #[arg(long)]
        origin: Option<String>,
    },

    /// Decode a microsite token
    Decode { token: String },

    /// Run the live co-pilot over a brief's questions, then debrief
    Copilot { id: String },

    /// Submit a debrief directly
    Debrief {
        id: String,
        #[arg(long)]
        key_insights: String,
        #[arg(long, default_value = "")]
        what_ai_got_wrong: String,
        #[arg(long, default_value = "")]
        surprises: String,
        /// A question that worked well (repeatable)
        #[arg(long = "worked")]
        questions_that_worked: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TabArg {
    Brief,
    Schema,
    Email,
    Debrief,
}

impl From<TabArg> for BriefTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Brief => BriefTab::Brief,
            TabArg::Schema => BriefTab::Schema,
            TabArg::Email => BriefTab::Email,
            TabArg::Debrief => BriefTab::Debrief,
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn render_banner(banner: &Banner) -> String {
    match banner {
        Banner::DebriefCompleted => "✓ Debrief completed. Insights saved to the knowledge base.".to_string(),
        Banner::IntervieweeResponded {
            corrections,
            selected_questions,
            wildcard,
        } => {
            let mut line = format!(
                "✓ Interviewee responded! They flagged {} corrections and selected {} questions.",
                corrections, selected_questions
            );
            if *wildcard {
                line.push_str(" They also shared an unprompted insight.");
            }
            line
        }
    }
}

fn render_schema(sections: &[SchemaSection]) -> String {
    if sections.is_empty() {
        return "(no schema fields yet)".to_string();
    }
    let mut out = String::new();
    for section in sections {
        out.push_str(&format!("[{}]\n", section.category));
        for field in &section.fields {
            let marker = if field.needs_verification { "  ⚠ " } else { "    " };
            out.push_str(&format!("{}{}: {}\n", marker, field.name, field.value));
        }
    }
    out
}

fn render_tab(session: &BriefSession, tab: BriefTab) -> String {
    let Some(snapshot) = session.snapshot() else {
        return "Loading...".to_string();
    };
    match tab {
        BriefTab::Brief => {
            let mut out = snapshot.brief.clone();
            if !snapshot.questions.is_empty() {
                out.push_str("\n\nQuestions:\n");
                for (i, q) in snapshot.questions.iter().enumerate() {
                    out.push_str(&format!("{:>2}. {}\n", i + 1, q.question_text));
                }
            }
            out
        }
        BriefTab::Schema => render_schema(&session.schema_view()),
        BriefTab::Email => session
            .email()
            .unwrap_or_else(|| "(no interviewee email drafted)".to_string()),
        BriefTab::Debrief => {
            if session.is_completed() {
                "Debrief already submitted.".to_string()
            } else {
                format!(
                    "Debrief pending. {} question(s) rated so far. Run `axis copilot {}` or `axis debrief {}`.",
                    session.ratings().len(),
                    session.interview_id(),
                    session.interview_id()
                )
            }
        }
    }
}

// ============================================================================
// Co-pilot input
// ============================================================================

#[derive(Debug, PartialEq)]
enum CopilotCommand {
    Next,
    Rate(bool),
    FollowUp(FollowUp),
    Exit,
}

fn parse_copilot_command(line: &str) -> Option<CopilotCommand> {
    match line.trim().to_lowercase().as_str() {
        "" | "n" | "next" => Some(CopilotCommand::Next),
        "+" | "e" | "effective" => Some(CopilotCommand::Rate(true)),
        "-" | "i" | "ineffective" => Some(CopilotCommand::Rate(false)),
        "v" | "vague" => Some(CopilotCommand::FollowUp(FollowUp::Vague)),
        "d" | "deep" => Some(CopilotCommand::FollowUp(FollowUp::Deep)),
        "x" | "q" | "exit" | "quit" => Some(CopilotCommand::Exit),
        _ => None,
    }
}

fn print_question(copilot: &CoPilot) {
    if let (Some(i), Some(q)) = (copilot.current_index(), copilot.current()) {
        println!(
            "\n[{}] Question {}/{}: {}",
            copilot.elapsed_display(),
            i + 1,
            copilot.len(),
            q.question_text
        );
        if let Some(r) = &q.rationale {
            println!("    why: {}", r);
        }
    }
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> anyhow::Result<String> {
    eprint!("{}: ", label);
    Ok(lines.next_line().await?.unwrap_or_default())
}

// ============================================================================
// Commands
// ============================================================================

struct App {
    config: AxisConfig,
    backend: Backend,
}

impl App {
    fn brief_session(&self, id: &str) -> BriefSession {
        let limits = codec::PayloadLimits::new(
            self.config.microsite.max_facts,
            self.config.microsite.max_questions,
        );
        BriefSession::new(
            id,
            self.backend.clone(),
            Arc::new(ConsoleNavigator),
            Arc::new(StdoutClipboard),
        )
        .with_limits(limits)
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.config.polling.interval_seconds.max(1))
    }
}

async fn do_generate(app: &App, form: IntakeForm) -> anyhow::Result<()> {
    let intake = Intake::new(app.backend.clone(), Arc::new(ConsoleNavigator));
    eprintln!("AXIS is working... this can take a few minutes.");
    let handoff = intake
        .generate(&form)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    println!("{}", handoff.interview_id);
    Ok(())
}

async fn do_brief(app: &App, id: &str, tab: BriefTab, watch: bool) -> anyhow::Result<()> {
    let mut session = app.brief_session(id);
    session.select_tab(tab);
    session
        .load()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    if let Some(banner) = session.banner() {
        println!("{}\n", render_banner(&banner));
    }
    println!("{}", render_tab(&session, session.tab()));

    if !watch || session.is_completed() {
        return Ok(());
    }

    session.start_polling(app.poll_interval());
    let mut last_banner = session.banner();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = tokio::time::sleep(Duration::from_secs(1)) => {
                let banner = session.banner();
                if banner != last_banner {
                    if let Some(b) = &banner {
                        println!("{}", render_banner(b));
                    }
                    last_banner = banner;
                }
                if session.is_completed() {
                    break;
                }
            }
        }
    }
    session.stop_polling();
    Ok(())
}

fn do_link(app: &App, id: &str, origin: Option<String>) -> anyhow::Result<()> {
    let origin = origin.unwrap_or_else(|| app.config.microsite.origin.clone());
    let session = app.brief_session(id);
    println!("Interviewee page: {}", session.info_link(&origin));
    Ok(())
}

async fn do_link_microsite(app: &App, id: &str, origin: Option<String>) -> anyhow::Result<()> {
    let origin = origin.unwrap_or_else(|| app.config.microsite.origin.clone());
    let session = app.brief_session(id);
    session
        .load()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    eprint!("Microsite link:   ");
    session
        .copy_microsite_link(&origin)
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    Ok(())
}

fn do_decode(token: &str) -> anyhow::Result<()> {
    let payload = codec::decode(token).map_err(|e| anyhow::anyhow!(e.user_message()))?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

async fn do_copilot(app: &App, id: &str) -> anyhow::Result<()> {
    let mut session = app.brief_session(id);
    session
        .load()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let mut copilot = session
        .enter_copilot()
        .map_err(|e| anyhow::anyhow!(e.user_message()))?
        .on_complete(|| eprintln!("\nAll questions covered. On to the debrief."));

    eprintln!("Enter: next · e/i: rate effective/ineffective · v/d: follow-up · x: exit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_question(&copilot);

    while !copilot.is_complete() {
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_copilot_command(&line) {
            Some(CopilotCommand::Next) => {
                copilot.next();
                print_question(&copilot);
            }
            Some(CopilotCommand::Rate(effective)) => {
                copilot.rate(effective);
                eprintln!("  rated {}", if effective { "effective" } else { "ineffective" });
            }
            Some(CopilotCommand::FollowUp(kind)) => match copilot.show_follow_up(kind) {
                Some(text) => println!("  ↳ {}", text),
                None => eprintln!("  (no follow-up for this question)"),
            },
            Some(CopilotCommand::Exit) => break,
            None => eprintln!("  unknown command: {}", line.trim()),
        }
    }

    session.exit_copilot(copilot);
    if session.tab() != BriefTab::Debrief {
        eprintln!("Co-pilot exited early; ratings kept for this session only.");
        return Ok(());
    }

    loop {
        let form = DebriefForm {
            what_ai_got_wrong: prompt(&mut lines, "What did the AI get wrong").await?,
            key_insights: prompt(&mut lines, "Key insights (required)").await?,
            questions_that_worked: prompt(&mut lines, "Questions that worked (; separated)")
                .await?
                .split(';')
                .map(str::to_string)
                .collect(),
            surprises: prompt(&mut lines, "Surprises").await?,
            completed_schema: serde_json::Value::Null,
        };
        match session.submit_debrief(&form).await {
            Ok(()) => {
                println!("✓ Debrief submitted. Thank you!");
                session.reset();
                return Ok(());
            }
            Err(e) if e.is_validation() => eprintln!("{}", e.user_message()),
            Err(e) => return Err(anyhow::anyhow!(e.user_message())),
        }
    }
}

async fn do_debrief(app: &App, id: &str, form: DebriefForm) -> anyhow::Result<()> {
    let mut session = app.brief_session(id);
    // Metadata for the submission comes from the brief; carry on without it
    if let Err(e) = session.load().await {
        tracing::warn!(error = %e, "Could not load brief before debrief");
    }
    session
        .submit_debrief(&form)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    println!("✓ Debrief submitted.");
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AxisConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config))?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.service.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let http = ReqwestHttpClient::new(&config.api)?;
    let app = App {
        backend: Backend::new(Arc::new(http)),
        config,
    };

    match cli.command {
        Commands::Generate {
            company,
            url,
            interviewee_name,
            interviewee_title,
            sector,
            notes,
        } => {
            let form = IntakeForm {
                company_name: company,
                company_url: url,
                interviewee_name,
                interviewee_title,
                sector,
                notes,
            };
            do_generate(&app, form).await
        }
        Commands::Brief { id, tab, watch } => do_brief(&app, &id, tab.into(), watch).await,
        Commands::Link { id, origin } => {
            do_link(&app, &id, origin.clone())?;
            do_link_microsite(&app, &id, origin).await
        }
        Commands::Decode { token } => do_decode(&token),
        Commands::Copilot { id } => do_copilot(&app, &id).await,
        Commands::Debrief {
            id,
            key_insights,
            what_ai_got_wrong,
            surprises,
            questions_that_worked,
        } => {
            let form = DebriefForm {
                what_ai_got_wrong,
                key_insights,
                questions_that_worked,
                surprises,
                completed_schema: serde_json::Value::Null,
            };
            do_debrief(&app, &id, form).await
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
