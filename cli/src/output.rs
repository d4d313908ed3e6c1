//! Output formatting for book listings.

use bookshelf_core::{Book, Field, Variant};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

/// Formats a listing in the requested output format.
///
/// Table output shows only the columns the layout stores.
pub fn format_books(
    books: &[Book],
    variant: Variant,
    format: OutputFormat,
) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(books)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(books).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(books_to_table(books, variant)),
    }
}

fn books_to_table(books: &[Book], variant: Variant) -> String {
    if books.is_empty() {
        return "(no books)\n".to_string();
    }

    let mut header = vec!["ID".to_string()];
    header.extend(variant.fields().iter().map(|f| f.label().to_string()));

    let rows: Vec<Vec<String>> = books
        .iter()
        .map(|book| {
            std::iter::once(book.id.to_string())
                .chain(
                    variant
                        .fields()
                        .iter()
                        .map(|&f| book.fields.get(f).to_string()),
                )
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            rows.iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(header[col].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Formats the form inputs as `label: value` lines, marking the selection.
pub fn format_form(form: &bookshelf_core::FormState, variant: Variant) -> String {
    let mut out = String::new();
    match form.selected() {
        Some(id) => out.push_str(&format!("Selected: {id}\n")),
        None => out.push_str("Selected: (none)\n"),
    }
    let fields: &[Field] = variant.fields();
    let width = fields.iter().map(|f| f.label().len()).max().unwrap_or(0);
    for &field in fields {
        out.push_str(&format!(
            "{:<width$}  {}\n",
            format!("{}:", field.label()),
            form.field(field),
            width = width + 1
        ));
    }
    out
}
