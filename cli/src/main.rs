mod output;
mod settings;
mod shell;

use std::path::{Path, PathBuf};

use bookshelf_core::{BookFields, BookId, CommandError, Library, Session, Variant};
use bookshelf_sqlite::SqliteBookStore;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::output::{OutputFormat, format_books};
use crate::settings::Settings;

/// CLI-specific layout enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliVariant {
    Minimal,
    Full,
}

impl From<CliVariant> for Variant {
    fn from(variant: CliVariant) -> Self {
        match variant {
            CliVariant::Minimal => Self::Minimal,
            CliVariant::Full => Self::Full,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version)]
#[command(about = "Manage book records in a local SQLite database")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// YAML settings file (missing file means defaults).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Database file path (overrides the settings file).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Book table name (overrides the settings file).
    #[arg(long, global = true)]
    table: Option<String>,
    /// Table layout (overrides the settings file).
    #[arg(long, global = true)]
    variant: Option<CliVariant>,
    /// Output format for listings.
    #[arg(long, global = true, default_value = "table")]
    format: OutputFormat,
    /// Log SQL statements and migration steps to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create or migrate the book table, and write --config if it is missing.
    Init,
    /// Add a book. Every field of the layout must be filled.
    Add(FieldArgs),
    /// List books whose fields contain every given value (case-sensitive).
    Search(FieldArgs),
    /// Show all books.
    List,
    /// Replace every field of a book.
    Update(UpdateArgs),
    /// Delete a book.
    Delete(DeleteArgs),
    /// Show table and row status.
    Status,
    /// Drop the book table.
    Reset(ResetArgs),
    /// Interactive session with persistent inputs and selection.
    Shell,
}

#[derive(Debug, Args)]
struct FieldArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    year: Option<String>,
    #[arg(long)]
    isbn: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    #[arg(long)]
    current_page: Option<String>,
}

impl FieldArgs {
    fn into_fields(self) -> BookFields {
        BookFields {
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            year: self.year.unwrap_or_default(),
            isbn: self.isbn.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
            current_page: self.current_page.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Id of the book to update.
    #[arg(long)]
    id: Option<i64>,
    #[command(flatten)]
    fields: FieldArgs,
}

#[derive(Debug, Args)]
struct DeleteArgs {
    /// Id of the book to delete.
    #[arg(long)]
    id: Option<i64>,
}

#[derive(Debug, Args)]
struct ResetArgs {
    /// Confirm dropping the table and every book in it.
    #[arg(long)]
    yes: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let result = resolve_settings(&cli.global).and_then(|settings| {
        let format = cli.global.format;
        match cli.command {
            Command::Init => run_init(&settings, cli.global.config.as_deref()),
            Command::Add(args) => run_add(&settings, args, format),
            Command::Search(args) => run_search(&settings, args, format),
            Command::List => run_list(&settings, format),
            Command::Update(args) => run_update(&settings, args, format),
            Command::Delete(args) => run_delete(&settings, args, format),
            Command::Status => run_status(&settings),
            Command::Reset(args) => run_reset(&settings, args),
            Command::Shell => run_shell(&settings, format),
        }
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

/// Settings file first, then command-line overrides.
fn resolve_settings(global: &GlobalArgs) -> Result<Settings, String> {
    let mut settings = Settings::load_or_default(global.config.as_deref())
        .map_err(|e| format!("Failed to load settings: {e}"))?;
    if let Some(db) = &global.db {
        settings.database = db.clone();
    }
    if let Some(table) = &global.table {
        settings.table = table.clone();
    }
    if let Some(variant) = global.variant {
        settings.variant = variant.into();
    }
    debug!(?settings, "resolved settings");
    Ok(settings)
}

fn open_store(settings: &Settings) -> Result<SqliteBookStore, String> {
    SqliteBookStore::new(&settings.database, settings.variant)
        .with_table(settings.table.as_str())
        .map_err(|e| format!("Invalid table: {e}"))
}

/// Opens the library and brings its table up to date.
fn open_library(settings: &Settings) -> Result<Library<SqliteBookStore>, String> {
    let library = Library::new(open_store(settings)?, settings.variant)
        .with_placeholders(settings.placeholders.clone());
    library.ensure_schema().map_err(|e| {
        format!(
            "Failed to prepare database '{}': {e}",
            settings.database.display()
        )
    })?;
    Ok(library)
}

fn command_error(err: CommandError) -> String {
    format!("{}: {err}", err.title())
}

fn print_books(
    books: &[bookshelf_core::Book],
    settings: &Settings,
    format: OutputFormat,
) -> Result<(), String> {
    print!("{}", format_books(books, settings.variant, format)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// record commands
// ---------------------------------------------------------------------------

fn run_init(settings: &Settings, config: Option<&Path>) -> Result<(), String> {
    open_library(settings)?;
    println!(
        "Table '{}' ready in '{}' ({} layout).",
        settings.table,
        settings.database.display(),
        settings.variant
    );
    if let Some(path) = config.filter(|path| !path.exists()) {
        settings
            .save(path)
            .map_err(|e| format!("Failed to write settings '{}': {e}", path.display()))?;
        println!("Settings written to '{}'.", path.display());
    }
    Ok(())
}

fn run_add(settings: &Settings, args: FieldArgs, format: OutputFormat) -> Result<(), String> {
    let library = open_library(settings)?;
    let listing = library.add(&args.into_fields()).map_err(command_error)?;
    print_books(&listing, settings, format)
}

fn run_search(settings: &Settings, args: FieldArgs, format: OutputFormat) -> Result<(), String> {
    let library = open_library(settings)?;
    let listing = library.search(&args.into_fields()).map_err(command_error)?;
    print_books(&listing, settings, format)
}

fn run_list(settings: &Settings, format: OutputFormat) -> Result<(), String> {
    let library = open_library(settings)?;
    let listing = library.list_all().map_err(command_error)?;
    print_books(&listing, settings, format)
}

fn run_update(settings: &Settings, args: UpdateArgs, format: OutputFormat) -> Result<(), String> {
    let library = open_library(settings)?;
    let listing = library
        .update(args.id.map(BookId), &args.fields.into_fields())
        .map_err(command_error)?;
    print_books(&listing, settings, format)
}

fn run_delete(settings: &Settings, args: DeleteArgs, format: OutputFormat) -> Result<(), String> {
    let library = open_library(settings)?;
    let listing = library.delete(args.id.map(BookId)).map_err(command_error)?;
    print_books(&listing, settings, format)
}

// ---------------------------------------------------------------------------
// table commands
// ---------------------------------------------------------------------------

fn run_status(settings: &Settings) -> Result<(), String> {
    let status = open_store(settings)?
        .status()
        .map_err(|e| format!("Failed to get table status: {e}"))?;
    println!("Table Status:");
    println!("  Database: {}", settings.database.display());
    println!("  Table: {}", settings.table);
    println!(
        "  Table exists: {}",
        if status.tables_exist { "yes" } else { "no" }
    );
    println!("  Columns: {}", status.columns.join(", "));
    println!("  Book count: {}", status.book_count);
    Ok(())
}

fn run_reset(settings: &Settings, args: ResetArgs) -> Result<(), String> {
    if !args.yes {
        return Err("reset drops every book; pass --yes to confirm".to_string());
    }
    open_store(settings)?
        .reset()
        .map_err(|e| format!("Reset failed: {e}"))?;
    println!(
        "Table '{}' dropped from '{}'.",
        settings.table,
        settings.database.display()
    );
    Ok(())
}

fn run_shell(settings: &Settings, format: OutputFormat) -> Result<(), String> {
    let mut session = Session::new(open_library(settings)?);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    shell::run_shell(&mut session, stdin.lock(), &mut stdout, format)
        .map_err(|e| format!("Shell I/O failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_field_args_default_to_empty() {
        let cli = Cli::parse_from(["bookshelf", "search", "--author", "Herb"]);
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        let fields = args.into_fields();
        assert_eq!(fields.author, "Herb");
        assert_eq!(fields.title, "");
    }

    #[test]
    fn test_overrides_beat_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("bookshelf.yml");
        std::fs::write(&config, "database: from-file.db\nvariant: full\n").unwrap();

        let cli = Cli::parse_from([
            "bookshelf",
            "list",
            "--config",
            config.to_str().unwrap(),
            "--variant",
            "minimal",
        ]);
        let settings = resolve_settings(&cli.global).unwrap();
        assert_eq!(settings.database, PathBuf::from("from-file.db"));
        assert_eq!(settings.variant, Variant::Minimal);
    }

    #[test]
    fn test_update_without_id_parses() {
        let cli = Cli::parse_from(["bookshelf", "update", "--title", "X"]);
        let Command::Update(args) = cli.command else {
            panic!("expected update");
        };
        assert_eq!(args.id, None);
    }
}
