//! Shared output layer for pretty/text/JSON parity across all commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: pretty output for humans, compact tab-separated text for
//! pipes, or stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / `--json` flag
//! 2. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `output` in the config file
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use bday_core::error::ErrorCode;
use bday_core::roster::RosterError;
use bday_core::store::StoreError;
use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 48;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<10} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, visual framing).
    Pretty,
    /// Tab-separated plain text for scripts and pipes.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    fn parse_loose(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Core resolution logic, separated from I/O for testability.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    config_output: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if json_flag {
        return OutputMode::Json;
    }

    // Unknown values fall through to the next source.
    if let Some(mode) = format_env.and_then(OutputMode::parse_loose) {
        return mode;
    }
    if let Some(mode) = config_output.and_then(OutputMode::parse_loose) {
        return mode;
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, config, and TTY defaults.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    config_output: Option<&str>,
) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(
        format_flag,
        json_flag,
        env_val.as_deref(),
        config_output,
        is_tty,
    )
}

/// Trait implemented by any CLI row type that can be rendered in all modes.
pub trait Renderable: Serialize {
    /// Render for human consumption.
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()>;

    /// Render as a single text row (no header; see [`Renderable::table_headers`]).
    fn render_table(&self, w: &mut dyn Write) -> io::Result<()>;

    /// Column headers for text mode, in the same order as `render_table` fields.
    fn table_headers() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }
}

/// Render a list of [`Renderable`] rows to `out`.
///
/// - In JSON mode, writes a JSON array.
/// - In pretty/text mode, renders rows sequentially; `empty_message` is
///   printed instead when there are none.
pub fn write_list<R: Renderable>(
    out: &mut dyn Write,
    items: &[R],
    mode: OutputMode,
    empty_message: &str,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, items)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text if items.is_empty() => {
            writeln!(out, "{empty_message}")?;
        }
        OutputMode::Pretty => {
            for item in items {
                item.render_human(out)?;
            }
        }
        OutputMode::Text => {
            let headers = R::table_headers();
            if !headers.is_empty() {
                writeln!(out, "{}", headers.join("\t"))?;
            }
            for item in items {
                item.render_table(out)?;
            }
        }
    }
    Ok(())
}

/// [`write_list`] to stdout.
pub fn render_list<R: Renderable>(
    items: &[R],
    mode: OutputMode,
    empty_message: &str,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_list(&mut out, items, mode, empty_message)
}

/// Render a serializable value with explicit pretty/text renderers.
pub fn write_mode<T: Serialize>(
    out: &mut dyn Write,
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, out)?,
        OutputMode::Pretty => pretty_fn(value, out)?,
    }
    Ok(())
}

/// [`write_mode`] to stdout.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_mode(&mut out, mode, value, text_fn, pretty_fn)
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (`E####`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Create an error with a suggestion and error code.
    pub fn with_details(
        message: impl Into<String>,
        suggestion: impl Into<String>,
        error_code: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            suggestion: Some(suggestion.into()),
            error_code: Some(error_code.into()),
        }
    }

    fn from_code(message: String, code: ErrorCode) -> Self {
        Self {
            message,
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

impl From<&RosterError> for CliError {
    fn from(err: &RosterError) -> Self {
        Self::from_code(err.to_string(), err.code())
    }
}

impl From<&anyhow::Error> for CliError {
    /// Store failures keep their own code; anything else is unexpected.
    fn from(err: &anyhow::Error) -> Self {
        let code = err
            .downcast_ref::<StoreError>()
            .map_or(ErrorCode::InternalUnexpected, StoreError::code);
        Self::from_code(format!("{err:#}"), code)
    }
}

/// Write an error to `out` in the requested format.
pub fn write_error(out: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            writeln!(out, "error: {}", error.message)?;
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_error(&mut out, mode, error)
}

/// Print a non-fatal warning to stderr. Suppressed by `--quiet`.
pub fn render_warning(quiet: bool, message: &str) -> io::Result<()> {
    if quiet {
        return Ok(());
    }
    let stderr = io::stderr();
    let mut out = stderr.lock();
    writeln!(out, "warning: {message}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut Vec<u8>) -> anyhow::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── resolve_output_mode_inner ───────────────────────────────────────────

    #[test]
    fn resolve_format_flag_wins_over_everything() {
        let mode = resolve_output_mode_inner(
            Some(OutputMode::Text),
            true,
            Some("pretty"),
            Some("json"),
            true,
        );
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_json_flag_wins_over_env() {
        let mode = resolve_output_mode_inner(None, true, Some("pretty"), None, true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_env_wins_over_config() {
        let mode = resolve_output_mode_inner(None, false, Some("TEXT"), Some("json"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_config_used_without_env() {
        let mode = resolve_output_mode_inner(None, false, None, Some("json"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_unknown_values_fall_through_to_tty() {
        let mode_tty = resolve_output_mode_inner(None, false, Some("fancy"), Some("loud"), true);
        assert_eq!(mode_tty, OutputMode::Pretty);
        let mode_pipe = resolve_output_mode_inner(None, false, Some("fancy"), None, false);
        assert_eq!(mode_pipe, OutputMode::Text);
    }

    // ── Renderable / write_list ─────────────────────────────────────────────

    #[derive(Serialize)]
    struct SimpleItem {
        name: String,
        count: u32,
    }

    impl Renderable for SimpleItem {
        fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
            writeln!(w, "{}: {}", self.name, self.count)
        }

        fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
            writeln!(w, "{}\t{}", self.name, self.count)
        }

        fn table_headers() -> &'static [&'static str] {
            &["NAME", "COUNT"]
        }
    }

    fn items() -> Vec<SimpleItem> {
        vec![
            SimpleItem {
                name: "a".into(),
                count: 1,
            },
            SimpleItem {
                name: "b".into(),
                count: 2,
            },
        ]
    }

    #[test]
    fn write_list_pretty() {
        let out = written(|w| write_list(w, &items(), OutputMode::Pretty, "none"));
        assert_eq!(out, "a: 1\nb: 2\n");
    }

    #[test]
    fn write_list_text_has_headers() {
        let out = written(|w| write_list(w, &items(), OutputMode::Text, "none"));
        assert_eq!(out, "NAME\tCOUNT\na\t1\nb\t2\n");
    }

    #[test]
    fn write_list_json_is_an_array() {
        let out = written(|w| write_list(w, &items(), OutputMode::Json, "none"));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["name"], "b");
    }

    #[test]
    fn write_list_empty_message_except_json() {
        let empty: Vec<SimpleItem> = vec![];
        let out = written(|w| write_list(w, &empty, OutputMode::Pretty, "No rows."));
        assert_eq!(out, "No rows.\n");
        let out = written(|w| write_list(w, &empty, OutputMode::Json, "No rows."));
        assert_eq!(out.trim(), "[]");
    }

    // ── errors ──────────────────────────────────────────────────────────────

    #[test]
    fn cli_error_from_roster_error() {
        let err = RosterError::Capacity { limit: 60 };
        let cli_err = CliError::from(&err);
        assert_eq!(cli_err.message, "Maximum of 60 birthdays reached.");
        assert!(cli_err.suggestion.is_some());
        assert_eq!(cli_err.error_code.as_deref(), Some("E2002"));
    }

    #[test]
    fn cli_error_from_wrapped_store_error() {
        use anyhow::Context as _;

        let source = std::io::Error::other("Is a directory");
        let err = Err::<(), _>(StoreError::Io {
            path: "roster".into(),
            source,
        })
        .context("failed to open roster at roster")
        .unwrap_err();
        let cli_err = CliError::from(&err);
        assert_eq!(cli_err.error_code.as_deref(), Some("E5003"));
        assert!(cli_err.message.starts_with("failed to open roster at roster: "));
        assert!(cli_err.message.contains("Is a directory"));
        assert!(cli_err.suggestion.is_some());
    }

    #[test]
    fn cli_error_from_other_error_is_unexpected() {
        let err = anyhow::anyhow!("something odd");
        let cli_err = CliError::from(&err);
        assert_eq!(cli_err.error_code.as_deref(), Some("E9001"));
        assert_eq!(cli_err.message, "something odd");
    }

    #[test]
    fn write_error_human() {
        let err = CliError::with_details("bad input", "try again", "E2001");
        let out = written(|w| write_error(w, OutputMode::Pretty, &err));
        assert_eq!(out, "error: bad input\n  suggestion: try again\n");
    }

    #[test]
    fn write_error_json_envelope() {
        let err = CliError::from(&RosterError::DuplicateName { name: "ann".into() });
        let out = written(|w| write_error(w, OutputMode::Json, &err));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["error"]["message"], "This name already exists.");
        assert_eq!(value["error"]["error_code"], "E2003");
    }

    #[test]
    fn write_mode_dispatches() {
        #[derive(Serialize)]
        struct Data {
            val: u32,
        }
        let data = Data { val: 9 };
        let text = written(|w| {
            write_mode(
                w,
                OutputMode::Text,
                &data,
                |d, w| writeln!(w, "t{}", d.val),
                |d, w| writeln!(w, "p{}", d.val),
            )
        });
        assert_eq!(text, "t9\n");
        let pretty = written(|w| {
            write_mode(
                w,
                OutputMode::Pretty,
                &data,
                |d, w| writeln!(w, "t{}", d.val),
                |d, w| writeln!(w, "p{}", d.val),
            )
        });
        assert_eq!(pretty, "p9\n");
    }
}
