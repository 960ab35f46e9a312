use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};
use std::path::Path;
use termbrain_core::{
    models::{self, ModelKind, ModelSpec},
    search::format_results,
    DirectiveOutcome, SessionEngine, Settings, TermbrainError, TurnOutcome,
};

use crate::commands::{self, Command};

// ── Startup prompts ─────────────────────────────────────────────────────

/// First-run credential capture. The one place a missing credential is
/// fatal: with no token there is nothing to run.
pub fn first_run_token(settings: &Settings) -> Result<String> {
    println!("{}", "FIRST-TIME SETUP".yellow().bold());
    println!("Please enter your Hugging Face token:");
    let token = read_line("Token: ").unwrap_or_default();
    if token.is_empty() {
        anyhow::bail!("a credential is required on first run");
    }
    match settings.save_token(&token) {
        Ok(()) => println!(
            "{} {}",
            "Token saved to".green(),
            settings.credential_path().display()
        ),
        Err(e) => eprintln!("{} {e}", "Failed to save config:".red()),
    }
    Ok(token)
}

pub fn pick_model(catalog: &[ModelSpec], settings: &Settings) -> Result<ModelSpec> {
    println!("{}", "TERMBRAIN ACTIVE".cyan().bold());
    println!("{}", format!("Workspace: {}", settings.workspace_dir.display()).dimmed());
    for (i, model) in catalog.iter().enumerate() {
        println!(
            "{} {} {}",
            format!("[{}]", i + 1).magenta().bold(),
            model.label,
            format!("({})", kind_label(model.kind)).dimmed()
        );
    }
    let choice = read_line("\nBrain ID: ").unwrap_or_default();
    models::select(catalog, &choice)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("model catalog is empty"))
}

fn kind_label(kind: ModelKind) -> &'static str {
    match kind {
        ModelKind::Chat => "chat",
        ModelKind::Vision => "vision",
        ModelKind::Image => "image",
    }
}

// ── Single-prompt mode ──────────────────────────────────────────────────

pub async fn run_single_prompt(mut engine: SessionEngine, prompt: &str) -> Result<()> {
    execute_turn(&mut engine, prompt, None).await;
    Ok(())
}

// ── Interactive REPL ────────────────────────────────────────────────────

pub async fn run_repl(
    mut engine: SessionEngine,
    catalog: Vec<ModelSpec>,
    token: String,
) -> Result<()> {
    loop {
        let Some(input) = read_line(&format!(
            "\n{} {}: ",
            "User".cyan().bold(),
            "(search/upload/role/status/switch/forget/wipe/exit)".dimmed()
        )) else {
            break;
        };
        if input.is_empty() {
            continue;
        }

        match commands::parse(&input) {
            Command::Exit => break,
            Command::Help => println!("{}", commands::help_text()),
            Command::Status => show_status(&engine, &token),
            Command::Switch => {
                let model = pick_model(&catalog, engine.settings())?;
                engine.switch_model(model);
            }
            Command::Role => {
                if let Some(role) = read_line(&format!("{}", "New system role: ".yellow().bold())) {
                    if !role.is_empty() {
                        engine.set_persona(role);
                        println!("{}", "Persona updated.".green());
                    }
                }
            }
            Command::Upload(path) => match engine.upload(Path::new(&path)) {
                Ok(id) => println!("{} {id}", "Loaded:".green()),
                Err(e) => eprintln!("{} {e}", "Upload failed:".red()),
            },
            Command::Forget(id) => {
                if engine.forget(&id) {
                    println!("{} {id}", "Forgot:".green());
                } else {
                    println!("{} {id}", "No such memory item:".yellow());
                }
            }
            Command::ForgetAll => {
                engine.forget_all();
                println!("{}", "All memory items dropped.".green());
            }
            Command::Wipe => match engine.wipe() {
                Ok(()) => {
                    println!("{}", "ALL DATA & CONFIG WIPED.".red().bold());
                    break;
                }
                Err(e) => eprintln!("{} {e}", "Wipe failed:".red()),
            },
            Command::Search(query) => {
                println!("{}", format!("Searching for '{query}'...").green());
                // A search failure degrades to an annotation the model
                // can see; the turn itself still runs.
                let search_text = match engine.search(&query).await {
                    Ok(results) => format_results(&results),
                    Err(e) => {
                        eprintln!("{} {e}", "Search error:".red());
                        format!("SEARCH_ERROR: {e}")
                    }
                };
                let turn = format!("Web Research: {query}");
                execute_turn(&mut engine, &turn, Some(&search_text)).await;
            }
            Command::Turn(text) => execute_turn(&mut engine, &text, None).await,
        }
    }

    Ok(())
}

/// Run one turn, printing the growing display snapshot incrementally.
/// Ctrl-C aborts the in-flight call; the partial buffer is discarded and
/// nothing is appended to history.
async fn execute_turn(engine: &mut SessionEngine, text: &str, search_text: Option<&str>) {
    println!("\n{}:", engine.model().label.as_str().magenta().bold());

    let mut printed = 0usize;
    let on_render = |display: &str| {
        // Snapshots grow monotonically, so the unseen suffix is safe to
        // slice off by byte offset.
        if display.len() > printed {
            print!("{}", &display[printed..]);
            let _ = io::stdout().flush();
            printed = display.len();
        }
    };

    tokio::select! {
        result = engine.run_turn(text, search_text, on_render) => match result {
            Ok(TurnOutcome::Text { directives, .. }) => {
                println!();
                report_directives(&directives);
            }
            Ok(TurnOutcome::Image { path }) => {
                println!("{} {}", "Saved:".green(), path.display());
            }
            Err(TermbrainError::Stream { message, .. }) => {
                eprintln!("\n{} {message}", "Stream failed:".red());
            }
            Err(e) => eprintln!("\n{} {e}", "AI error:".red()),
        },
        _ = tokio::signal::ctrl_c() => {
            println!("\n{}", "Turn interrupted; partial output discarded.".yellow());
        }
    }
}

fn report_directives(outcomes: &[DirectiveOutcome]) {
    for outcome in outcomes {
        match outcome {
            DirectiveOutcome::Written { path, .. } => {
                println!("{} {}", "AUTO-SAVED:".green().bold(), path.display());
            }
            DirectiveOutcome::Skipped { filename } => {
                println!("{}", format!("Skipped empty file: {filename}").dimmed());
            }
            DirectiveOutcome::Rejected { filename, reason } => {
                println!("{} {filename} ({reason})", "Rejected directive:".yellow());
            }
            DirectiveOutcome::Failed { filename, error } => {
                eprintln!("{} {filename}: {error}", "Write error:".red());
            }
        }
    }
}

fn show_status(engine: &SessionEngine, token: &str) {
    println!("{}", "Session status".cyan().bold());
    println!(
        "  Model:     {} ({})",
        engine.model().label,
        kind_label(engine.model().kind)
    );
    println!("  Memory:    {} objects", engine.memory().len());
    println!("  History:   {} messages", engine.history_len());
    println!("  Persona:   {}", engine.persona());
    println!(
        "  Workspace: {}",
        engine.settings().workspace_dir.display()
    );
    println!("  Token:     {}", mask_token(token));
}

/// Show only a short prefix of the credential. Counted in chars, not
/// bytes; the token is opaque text we never validated.
fn mask_token(token: &str) -> String {
    if token.chars().count() >= 8 {
        let prefix: String = token.chars().take(8).collect();
        format!("{prefix}****")
    } else {
        "****".to_string()
    }
}

fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_token_keeps_an_eight_char_prefix() {
        assert_eq!(mask_token("hf_abcdefghij"), "hf_abcde****");
        assert_eq!(mask_token("short"), "****");
    }

    #[test]
    fn mask_token_handles_multibyte_credentials() {
        // Must not slice mid-character.
        assert_eq!(mask_token("héllo-wörld-token"), "héllo-wö****");
        assert_eq!(mask_token("héllo"), "****");
    }
}
