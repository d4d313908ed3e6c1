//! Interactive session over a [`Session`].
//!
//! The shell keeps the form inputs and selection between commands, the way
//! a window keeps its entry widgets. Failed operations print a message and
//! the session carries on.

use std::io::{self, BufRead, Write};

use bookshelf_core::{Book, BookId, BookStore, Field, Result, Session};

use crate::output::{OutputFormat, format_books, format_form};

const HELP: &str = "\
Commands:
  set <field> <value>   Fill an input (fields: title, author, year, isbn, notes, current_page)
  unset <field>         Empty an input
  select <id>           Select a book and load its fields from the listing
  deselect              Drop the selection
  add                   Add Book
  search                Search Book (non-empty inputs are substring filters)
  all                   Show All Books
  update                Update the selected book with the inputs
  delete                Delete the selected book
  clear                 Clear Fields
  form                  Show the inputs and selection
  help                  Show this help
  quit                  Leave the shell
";

enum Step {
    Print(String),
    Quit,
}

/// Runs the shell until `quit` or end of input.
pub fn run_shell<S: BookStore>(
    session: &mut Session<S>,
    mut input: impl BufRead,
    out: &mut impl Write,
    format: OutputFormat,
) -> io::Result<()> {
    writeln!(out, "bookshelf shell. Type 'help' for commands.")?;
    let variant = session_variant(session);
    let initial = show_listing(session.show_all(), variant, format);
    out.write_all(initial.as_bytes())?;

    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }
        match execute(session, line.trim_end_matches(['\r', '\n']), format) {
            Step::Print(text) => out.write_all(text.as_bytes())?,
            Step::Quit => break,
        }
    }
    Ok(())
}

fn session_variant<S: BookStore>(session: &Session<S>) -> bookshelf_core::Variant {
    session.library().variant()
}

fn execute<S: BookStore>(session: &mut Session<S>, line: &str, format: OutputFormat) -> Step {
    let line = line.trim_start();
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let variant = session_variant(session);

    let text = match command {
        "" => String::new(),
        "help" => HELP.to_string(),
        "quit" | "exit" => return Step::Quit,
        "set" => {
            let (name, value) = rest.split_once(' ').unwrap_or((rest, ""));
            match name.parse::<Field>() {
                Ok(field) => {
                    session.form_mut().set_field(field, value);
                    String::new()
                }
                Err(err) => format!("error: {err}\n"),
            }
        }
        "unset" => match rest.trim().parse::<Field>() {
            Ok(field) => {
                session.form_mut().set_field(field, "");
                String::new()
            }
            Err(err) => format!("error: {err}\n"),
        },
        "select" => match rest.parse::<BookId>() {
            Ok(id) if session.form_mut().load_selected(id) => format!("selected book {id}\n"),
            Ok(id) => {
                session.form_mut().select(Some(id));
                format!("selected book {id} (not in the current listing)\n")
            }
            Err(_) => format!("error: invalid book id '{}'\n", rest.trim()),
        },
        "deselect" => {
            session.form_mut().select(None);
            String::new()
        }
        "add" => show_listing(session.add(), variant, format),
        "search" => show_listing(session.search(), variant, format),
        "all" | "list" => show_listing(session.show_all(), variant, format),
        "update" => show_listing(session.update(), variant, format),
        "delete" => show_listing(session.delete(), variant, format),
        "clear" => {
            session.clear_fields();
            String::new()
        }
        "form" => format_form(session.form(), variant),
        other => format!("unknown command '{other}'; type 'help'\n"),
    };
    Step::Print(text)
}

fn show_listing(
    result: Result<&[Book]>,
    variant: bookshelf_core::Variant,
    format: OutputFormat,
) -> String {
    match result {
        Ok(books) => {
            format_books(books, variant, format).unwrap_or_else(|e| format!("error: {e}\n"))
        }
        Err(err) => format!("{}: {err}\n", err.title()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::{Library, Variant};
    use bookshelf_sqlite::SqliteBookStore;
    use std::io::Cursor;

    fn run(script: &str) -> (String, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteBookStore::new(dir.path().join("shell.db"), Variant::Minimal);
        let library = Library::new(store, Variant::Minimal);
        library.ensure_schema().unwrap();
        let mut session = Session::new(library);

        let mut out = Vec::new();
        run_shell(&mut session, Cursor::new(script), &mut out, OutputFormat::Table).unwrap();
        (String::from_utf8(out).unwrap(), dir)
    }

    #[test]
    fn test_add_then_list() {
        let (out, _dir) = run(
            "set title Dune\nset author Frank Herbert\nset year 1965\nset isbn 0001\nadd\nform\nquit\n",
        );
        assert!(out.contains("1   Dune   Frank Herbert  1965  0001"));
        // Inputs are cleared after a successful add.
        assert!(out.contains("Title:   \n"));
    }

    #[test]
    fn test_initial_listing_is_printed_before_the_prompt() {
        let (out, _dir) = run("");
        let banner = out.find("bookshelf shell").unwrap();
        let empty = out.find("(no books)").unwrap();
        let prompt = out.find("> ").unwrap();
        assert!(banner < empty && empty < prompt);
    }

    #[test]
    fn test_validation_error_is_reported_and_session_continues() {
        let (out, _dir) = run("set title Dune\nadd\nhelp\n");
        assert!(out.contains(
            "Input Error: all fields must be filled out (missing: author, year, isbn)"
        ));
        assert!(out.contains("Commands:"));
    }

    #[test]
    fn test_select_update_delete() {
        let script = "\
set title Dune
set author Herbert
set year 1965
set isbn 0001
add
select 1
set year 1966
update
search
delete
delete
";
        let (out, _dir) = run(script);
        assert!(out.contains("selected book 1\n"));
        assert!(out.contains("1   Dune   Herbert  1966  0001"));
        assert!(out.contains("(no books)"));
        assert!(out.contains("Selection Error: no book selected"));
    }

    #[test]
    fn test_selecting_unknown_id_then_delete_is_not_found() {
        let (out, _dir) = run("select 9\ndelete\n");
        assert!(out.contains("selected book 9 (not in the current listing)"));
        assert!(out.contains("Not Found: no book with id 9"));
    }

    #[test]
    fn test_bad_input() {
        let (out, _dir) = run("set publisher X\nselect abc\nfrobnicate\n");
        assert!(out.contains("error: unknown field 'publisher'"));
        assert!(out.contains("error: invalid book id 'abc'"));
        assert!(out.contains("unknown command 'frobnicate'"));
    }
}
