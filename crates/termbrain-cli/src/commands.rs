/// What one line of operator input asks for. Anything that isn't a
/// recognized command word is a normal turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Turn(String),
    Search(String),
    Upload(String),
    Role,
    Status,
    Switch,
    Forget(String),
    ForgetAll,
    Wipe,
    Help,
    Exit,
}

pub fn parse(input: &str) -> Command {
    let input = input.trim();
    let (word, arg) = match input.split_once(' ') {
        Some((w, a)) => (w.to_ascii_lowercase(), a.trim()),
        None => (input.to_ascii_lowercase(), ""),
    };

    match word.as_str() {
        "exit" | "quit" => Command::Exit,
        "help" => Command::Help,
        "role" => Command::Role,
        "status" => Command::Status,
        "switch" => Command::Switch,
        "wipe" => Command::Wipe,
        "search" if !arg.is_empty() => Command::Search(arg.to_string()),
        "upload" if !arg.is_empty() => {
            Command::Upload(arg.trim_matches(|c| c == '\'' || c == '"').to_string())
        }
        "forget" if arg.eq_ignore_ascii_case("all") => Command::ForgetAll,
        "forget" if !arg.is_empty() => Command::Forget(arg.to_string()),
        _ => Command::Turn(input.to_string()),
    }
}

pub fn help_text() -> &'static str {
    "\
Commands:
  search <query>     Web-search and fold the results into an AI turn
  upload <path>      Load a file or image into persistent memory
  forget <id>        Drop one memory item (forget all: drop everything)
  role               Change the persona prefixed to every prompt
  switch             Pick a different model
  status             Show model, memory, and credential status
  wipe               Delete all persisted data and exit
  help               Show this message
  exit               Quit

Anything else is sent to the model as a normal turn."
}
