use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use pagewise::paginator::Paginator;
use pagewise::paging::{apply, CursorPageRequest, PageRequest, PageWindow, SqlTail};
use serde::Serialize;

use crate::output;

#[derive(Args)]
pub struct ResolveArgs {
    /// Raw query string, e.g. "page=2&page_size=10&sort_by=name&order_by=asc"
    #[arg(value_name = "QUERY")]
    query: String,

    /// Pagination mode
    #[arg(long, value_enum, default_value_t = Mode::Offset)]
    mode: Mode,

    /// Field used for the keyset comparison in cursor mode
    #[arg(long, value_name = "FIELD")]
    cursor_field: Option<String>,

    /// Number of the first `$n` placeholder in the rendered SQL
    #[arg(long, value_name = "N", default_value_t = 1)]
    first_bind: usize,

    /// Config file to load instead of the standard search paths
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Numbered pages
    Offset,
    /// Keyset pages continuing after a cursor
    Cursor,
}

/// Everything a request resolves to before it reaches storage
#[derive(Debug, Serialize)]
pub struct Resolution {
    mode: Mode,
    request: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor_field: Option<String>,
    sort_clause: String,
    window: PageWindow,
    sql: String,
    binds: Vec<String>,
}

pub fn execute(args: ResolveArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let paginator = Paginator::from_config(&config);

    let resolution = resolve(
        &paginator,
        &args.query,
        args.mode,
        args.cursor_field.as_deref(),
        args.first_bind,
    )?;

    output::json(&resolution)
}

/// Resolve `query` in the given mode
pub fn resolve(
    paginator: &Paginator,
    query: &str,
    mode: Mode,
    cursor_field: Option<&str>,
    first_bind: usize,
) -> Result<Resolution> {
    let defaults = paginator.defaults();

    let (request, cursor_field, sort_clause, window) = match mode {
        Mode::Offset => {
            if cursor_field.is_some() {
                output::warning("--cursor-field has no effect in offset mode");
            }
            let request = paginator.resolve(PageRequest::from_query_str(query));
            let window = paginator.offset_window(&request);
            (
                serde_json::to_value(&request)?,
                None,
                request.sort_clause(defaults),
                window,
            )
        }
        Mode::Cursor => {
            let mut request = CursorPageRequest::from_query_str(query);
            if let Some(field) = cursor_field {
                request = request.with_cursor_field(field);
            }
            let request = paginator.resolve_cursor(request);
            let window = paginator.cursor_window(&request);
            (
                serde_json::to_value(&request)?,
                Some(request.cursor_field.clone()),
                request.sort_clause(defaults),
                window,
            )
        }
    };

    let mut tail = SqlTail::starting_at(first_bind);
    apply(&mut tail, Some(&window));

    Ok(Resolution {
        mode,
        request,
        cursor_field,
        sort_clause,
        sql: tail.to_sql(),
        binds: tail.binds().to_vec(),
        window,
    })
}
