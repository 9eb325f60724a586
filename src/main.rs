use std::io::Read;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use marknote::form::{FormError, NoteForm};
use marknote::{Config, Database, NoteFilter, NoteId, NoteService, Route, Tag, TagId};
use thiserror::Error;

/// marknote - markdown notes with tags, in the terminal
#[derive(Parser)]
#[command(name = "marknote")]
#[command(about = "Create, tag, filter and read markdown notes")]
#[command(version)]
struct Cli {
    /// Storage file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Launch interactive terminal UI (default)
    Tui {
        /// Screen to open first: `/`, `/new`, `/<id>` or `/<id>/edit`
        #[arg(default_value = "/")]
        path: String,
    },
    /// Create a new note
    Add(AddCommand),
    /// List notes, optionally filtered by title and tags
    List(ListCommand),
    /// Print a note
    Show {
        /// Note id
        id: String,
    },
    /// Change a note's title, body or tags
    Edit(EditCommand),
    /// Delete a note
    Delete {
        /// Note id
        id: String,
    },
    /// Manage tags
    #[command(subcommand)]
    Tags(TagsCommand),
}

/// Create a new note
#[derive(Parser)]
struct AddCommand {
    /// Note title
    #[arg(long)]
    title: String,

    /// Markdown body; read from stdin when omitted
    #[arg(long)]
    body: Option<String>,

    /// Comma-separated tag labels; unknown labels become new tags
    #[arg(short, long, value_name = "TAGS")]
    tags: Option<String>,
}

/// List notes
#[derive(Parser)]
struct ListCommand {
    /// Case-insensitive title fragment
    #[arg(long, default_value = "")]
    title: String,

    /// Comma-separated tag labels; a note must carry all of them
    #[arg(short, long, value_name = "TAGS")]
    tags: Option<String>,
}

/// Edit a note
#[derive(Parser)]
struct EditCommand {
    /// Note id
    id: String,

    /// New title
    #[arg(long)]
    title: Option<String>,

    /// New markdown body
    #[arg(long)]
    body: Option<String>,

    /// Replacement comma-separated tag labels
    #[arg(short, long, value_name = "TAGS")]
    tags: Option<String>,
}

#[derive(Subcommand)]
enum TagsCommand {
    /// List all tags
    List,
    /// Change a tag's label
    Rename {
        /// Tag id
        id: String,
        /// New label
        label: String,
    },
    /// Delete a tag (notes keep their reference)
    Delete {
        /// Tag id
        id: String,
    },
}

/// Lookup failures caused by user input.
#[derive(Debug, Error)]
enum CliError {
    #[error("No note with id {0}")]
    NoteNotFound(String),
    #[error("No tag with id {0}")]
    TagNotFound(String),
    #[error("Unknown tag: {0}")]
    UnknownTagLabel(String),
}

fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap prints help, version and usage errors itself
            let _ = e.print();
            std::process::exit(parse_exit_code(&e));
        }
    };

    if let Err(e) = run(cli) {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.db.as_deref())?;
    config.ensure_data_directory()?;
    marknote::logging::init(&config)?;

    let command = cli.command.unwrap_or(Commands::Tui {
        path: "/".to_string(),
    });
    match command {
        Commands::Tui { path } => marknote::tui::run(&config, Route::parse(&path)),
        command => {
            let mut service = open_service(&config)?;
            let mut out = std::io::stdout().lock();
            execute(command, &mut service, &mut out)
        }
    }
}

/// Exit code for a command line clap rejected or answered itself.
///
/// `--help` and `--version` succeed; malformed usage is a user error.
fn parse_exit_code(error: &clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are validation failures and unknown ids or labels.
/// Internal errors include storage failures and I/O errors.
fn is_user_error(error: &anyhow::Error) -> bool {
    error
        .chain()
        .any(|cause| cause.is::<FormError>() || cause.is::<CliError>())
}

fn open_service(config: &Config) -> Result<NoteService> {
    let db = Database::open(&config.db_path).context("Failed to open database")?;
    NoteService::new(Rc::new(db))
}

/// Runs a non-interactive command against `service`, writing to `out`.
///
/// Separated from `run` to allow testing with in-memory storage.
fn execute(
    command: Commands,
    service: &mut NoteService,
    out: &mut impl std::io::Write,
) -> Result<()> {
    match command {
        Commands::Tui { .. } => Ok(()),
        Commands::Add(cmd) => {
            let body = match cmd.body {
                Some(body) => body,
                None => read_stdin()?,
            };
            execute_add(service, &cmd.title, &body, cmd.tags.as_deref(), out)
        }
        Commands::List(cmd) => execute_list(service, &cmd.title, cmd.tags.as_deref(), out),
        Commands::Show { id } => execute_show(service, &id, out),
        Commands::Edit(cmd) => execute_edit(service, &cmd, out),
        Commands::Delete { id } => {
            let id = find_note_id(service, &id)?;
            service.delete_note(&id)?;
            writeln!(out, "Note deleted (id: {id})")?;
            Ok(())
        }
        Commands::Tags(TagsCommand::List) => {
            for tag in service.tags() {
                writeln!(out, "{}  {}", tag.id, tag.label)?;
            }
            Ok(())
        }
        Commands::Tags(TagsCommand::Rename { id, label }) => {
            let id = find_tag_id(service, &id)?;
            service.update_tag(&id, &label)?;
            writeln!(out, "Tag renamed (id: {id}) to: {label}")?;
            Ok(())
        }
        Commands::Tags(TagsCommand::Delete { id }) => {
            let id = find_tag_id(service, &id)?;
            service.delete_tag(&id)?;
            writeln!(out, "Tag deleted (id: {id})")?;
            Ok(())
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut body = String::new();
    std::io::stdin()
        .read_to_string(&mut body)
        .context("Failed to read note body from stdin")?;
    Ok(body)
}

fn execute_add(
    service: &mut NoteService,
    title: &str,
    body: &str,
    tags: Option<&str>,
    out: &mut impl std::io::Write,
) -> Result<()> {
    let labels = tags.map(parse_tags).unwrap_or_default();

    // Validate before creating any tags
    NoteForm::prefilled(title, body, Vec::new()).submit()?;

    let tags = resolve_or_create_tags(service, &labels)?;
    let data = NoteForm::prefilled(title, body, tags).submit()?;
    let note = service.create_note(data).context("Failed to create note")?;

    write!(out, "Note created (id: {})", note.id)?;
    if !labels.is_empty() {
        write!(out, " with tags: {}", labels.join(", "))?;
    }
    writeln!(out)?;

    Ok(())
}

fn execute_list(
    service: &NoteService,
    title: &str,
    tags: Option<&str>,
    out: &mut impl std::io::Write,
) -> Result<()> {
    let labels = tags.map(parse_tags).unwrap_or_default();
    let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();

    let mut selected = Vec::new();
    for (label, found) in labels.iter().zip(service.find_tags_by_label(&label_refs)) {
        selected.push(found.ok_or_else(|| CliError::UnknownTagLabel(label.clone()))?);
    }

    let filter = NoteFilter::new(title, selected);
    let notes = service.notes_with_tags();
    for note in filter.apply(&notes) {
        write!(out, "{}  {}", note.id, note.title)?;
        if !note.tags.is_empty() {
            write!(out, "  [{}]", join_labels(&note.tags))?;
        }
        writeln!(out)?;
    }

    Ok(())
}

fn execute_show(service: &NoteService, id: &str, out: &mut impl std::io::Write) -> Result<()> {
    let note = service
        .note_with_tags(&NoteId::new(id))
        .ok_or_else(|| CliError::NoteNotFound(id.to_string()))?;

    writeln!(out, "# {}", note.title)?;
    if !note.tags.is_empty() {
        writeln!(out, "tags: {}", join_labels(&note.tags))?;
    }
    writeln!(out)?;
    writeln!(out, "{}", note.markdown)?;
    Ok(())
}

fn execute_edit(
    service: &mut NoteService,
    cmd: &EditCommand,
    out: &mut impl std::io::Write,
) -> Result<()> {
    let note = service
        .note_with_tags(&NoteId::new(cmd.id.as_str()))
        .ok_or_else(|| CliError::NoteNotFound(cmd.id.clone()))?;

    let title = cmd.title.clone().unwrap_or_else(|| note.title.clone());
    let body = cmd.body.clone().unwrap_or_else(|| note.markdown.clone());

    NoteForm::prefilled(title.as_str(), body.as_str(), Vec::new()).submit()?;

    let tags = match cmd.tags.as_deref() {
        Some(raw) => resolve_or_create_tags(service, &parse_tags(raw))?,
        None => note.tags.clone(),
    };

    let data = NoteForm::prefilled(title, body, tags).submit()?;
    service.update_note(&note.id, data)?;
    writeln!(out, "Note updated (id: {})", note.id)?;
    Ok(())
}

/// Maps labels to existing tags, creating a tag for each unknown label.
fn resolve_or_create_tags(service: &mut NoteService, labels: &[String]) -> Result<Vec<Tag>> {
    let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    let found = service.find_tags_by_label(&label_refs);

    let mut tags: Vec<Tag> = Vec::new();
    for (label, existing) in labels.iter().zip(found) {
        let tag = match existing {
            Some(tag) => tag,
            None => service.create_tag(label)?,
        };
        if !tags.iter().any(|t| t.id == tag.id) {
            tags.push(tag);
        }
    }
    Ok(tags)
}

fn find_note_id(service: &NoteService, raw: &str) -> Result<NoteId> {
    let id = NoteId::new(raw);
    if service.notes().iter().any(|note| note.id == id) {
        Ok(id)
    } else {
        Err(CliError::NoteNotFound(raw.to_string()).into())
    }
}

fn find_tag_id(service: &NoteService, raw: &str) -> Result<TagId> {
    let id = TagId::new(raw);
    if service.tags().iter().any(|tag| tag.id == id) {
        Ok(id)
    } else {
        Err(CliError::TagNotFound(raw.to_string()).into())
    }
}

fn join_labels(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| tag.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parses comma-separated tags from a string.
///
/// Splits on commas, trims whitespace from each tag, and filters out empty strings.
fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
