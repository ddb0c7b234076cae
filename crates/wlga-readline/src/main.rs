mod render;

use std::borrow::Cow::{self, Borrowed, Owned};
use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use rustyline::history::DefaultHistory;
use tracing_subscriber::EnvFilter;

use wlga_core::config::ChatConfig;
use wlga_core::samples::{random_sample, welcome_sample};
use wlga_core::session::{ChatController, SendOutcome, SendRejection, SessionStore};
use wlga_infrastructure::{ConfigService, FileSessionStore, WlgaPaths};
use wlga_interaction::HttpChatTransport;

use crate::render::{ASSISTANT_NAME, DISCLAIMER, render_message, welcome_screen};

const COMMANDS: &[&str] = &["/help", "/new", "/random"];

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|cmd| cmd.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// What a line typed at the prompt asks for.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Quit,
    Help,
    NewSession,
    Random,
    Ask(String),
    Skip,
}

/// Interprets one prompt line. Numbers pick a welcome sample while the
/// conversation is still empty.
fn parse_command(line: &str, conversation_empty: bool) -> ReplCommand {
    let trimmed = line.trim();
    match trimmed {
        "" => ReplCommand::Skip,
        "quit" | "exit" => ReplCommand::Quit,
        "/help" => ReplCommand::Help,
        "/new" => ReplCommand::NewSession,
        "/random" => ReplCommand::Random,
        _ => {
            if conversation_empty
                && let Some(question) = trimmed.parse::<usize>().ok().and_then(welcome_sample)
            {
                return ReplCommand::Ask(question.to_string());
            }
            ReplCommand::Ask(line.to_string())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Builds a fresh controller that re-reads the persisted session id.
fn start_session(
    transport: &Arc<HttpChatTransport>,
    store: &Arc<FileSessionStore>,
    config: &ChatConfig,
) -> Result<Arc<ChatController>> {
    let transport: Arc<dyn wlga_core::transport::ChatTransport> = transport.clone();
    let store: Arc<dyn SessionStore> = store.clone();
    let controller = ChatController::new(transport, store, config.chat.clone());
    let session_id = controller
        .initialize()
        .context("Failed to initialize chat session")?;
    tracing::info!(session_id = %session_id, "Chat session ready");
    Ok(Arc::new(controller))
}

fn print_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn print_help() {
    println!("{}", "Commands:".bright_yellow());
    println!("  {}  show this help", "/help".bright_cyan());
    println!("  {}   start a new conversation", "/new".bright_cyan());
    println!("  {} ask a random sample question", "/random".bright_cyan());
    println!("  {}    leave", "quit".bright_cyan());
    println!();
}

/// Sends one question and writes whatever it added to the conversation.
async fn ask(
    controller: &ChatController,
    question: &str,
    out: &mut impl Write,
) -> io::Result<()> {
    let mut shown = controller.message_count();
    controller.set_pending_input(question);

    // The user's message is appended before the send first suspends
    let send = controller.send_pending();
    tokio::pin!(send);

    let outcome = tokio::select! {
        biased;
        outcome = &mut send => outcome,
        _ = tokio::task::yield_now() => {
            shown = print_new_messages(controller, shown, out)?;
            writeln!(out, "{}", format!("{} is typing...", ASSISTANT_NAME).bright_black())?;
            out.flush()?;
            send.await
        }
    };

    match outcome {
        SendOutcome::Rejected(SendRejection::InFlight) => {
            writeln!(out, "{}", "Still waiting for the previous reply.".yellow())?;
        }
        SendOutcome::Rejected(_) => {}
        SendOutcome::SessionReset { .. } => {
            writeln!(out, "{}", "The server started a new session.".bright_yellow())?;
            writeln!(out)?;
            print_lines(out, &welcome_screen())?;
        }
        SendOutcome::CannedReply | SendOutcome::Replied { .. } | SendOutcome::Failed(_) => {
            print_new_messages(controller, shown, out)?;
        }
    }
    Ok(())
}

/// Writes messages past `skip` and returns the new total.
fn print_new_messages(
    controller: &ChatController,
    skip: usize,
    out: &mut impl Write,
) -> io::Result<usize> {
    let messages = controller.messages();
    for message in messages.iter().skip(skip) {
        print_lines(out, &render_message(message))?;
        writeln!(out)?;
    }
    Ok(messages.len())
}

/// Entry point for the WLGA chat REPL.
///
/// 1. Loads configuration (config.toml + WLGA_* environment variables)
/// 2. Restores or creates the persisted session id
/// 3. Reads questions and renders formatted replies until `quit` or EOF
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    // ===== Backend Initialization =====
    let paths = WlgaPaths::new()?;
    let config_service = ConfigService::new(&paths);
    let config = config_service.load().context("Failed to load configuration")?;
    let transport = Arc::new(HttpChatTransport::from_config(&config));
    let store = Arc::new(FileSessionStore::for_key(&paths, &config.chat.session_key));
    let mut controller = start_session(&transport, &store, &config)?;

    tracing::info!(chat_url = %transport.chat_url(), "Using chat endpoint");
    tracing::debug!(
        config = %config_service.config_path().display(),
        session_file = %store.path().display(),
        "Using local files"
    );
    let mut stdout = io::stdout();

    // ===== REPL Setup =====
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", format!("=== {} ===", ASSISTANT_NAME).bright_magenta().bold());
    println!("{}", DISCLAIMER.bright_black());
    println!(
        "{}",
        "Type '/help' for commands, or 'quit' to exit.".bright_black()
    );
    println!();
    print_lines(&mut stdout, &welcome_screen())?;

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let command = parse_command(&line, controller.message_count() == 0);
                if command != ReplCommand::Skip {
                    let _ = rl.add_history_entry(line.trim());
                }

                match command {
                    ReplCommand::Skip => continue,
                    ReplCommand::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    ReplCommand::Help => print_help(),
                    ReplCommand::NewSession => {
                        controller = start_session(&transport, &store, &config)?;
                        println!("{}", "Started a new conversation.".bright_green());
                        println!();
                        print_lines(&mut stdout, &welcome_screen())?;
                    }
                    ReplCommand::Random => {
                        let question = random_sample(&mut rand::thread_rng());
                        ask(&controller, question, &mut stdout).await?;
                    }
                    ReplCommand::Ask(question) => {
                        ask(&controller, &question, &mut stdout).await?;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}
