//! pyrite - terminal demo shell
//!
//! Demonstrates the complete system working together: loads a Python file,
//! prints the highlighted buffer with its line-number gutter as ANSI text,
//! and optionally runs it through an interpreter, streaming the output.

use anyhow::{bail, Context, Result};
use pyrite::theme::{rgb, Theme, Themes};
use pyrite::{Editor, Gutter, OutputKind, SaveChoice, StyleSpan};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const RESET: &str = "\x1b[0m";

fn fg(color: u32) -> String {
    let (r, g, b) = rgb(color);
    format!("\x1b[38;2;{r};{g};{b}m")
}

fn styled(text: &str, color: u32, bold: bool, italic: bool) -> String {
    let mut out = fg(color);
    if bold {
        out.push_str("\x1b[1m");
    }
    if italic {
        out.push_str("\x1b[3m");
    }
    out.push_str(text);
    out.push_str(RESET);
    out
}

/// Print one line: right-aligned number, then the styled text runs
fn print_line(line_no: usize, digits: usize, text: &str, spans: &[StyleSpan], theme: &Theme) {
    let number = format!("{:>digits$}", line_no + 1);
    print!("{} ", styled(&number, theme.chrome.gutter_foreground, false, false));

    let mut cursor = 0;
    for span in spans {
        if span.start > cursor {
            print!("{}", styled(&text[cursor..span.start], theme.chrome.foreground, false, false));
        }
        let token = theme.token(span.tag);
        print!(
            "{}",
            styled(&text[span.range()], token.color, token.bold, token.italic)
        );
        cursor = span.start + span.len;
    }
    if cursor < text.len() {
        print!("{}", styled(&text[cursor..], theme.chrome.foreground, false, false));
    }
    println!();
}

fn drain_output(editor: &Editor, theme: &Theme, printed: &mut usize) {
    for entry in &editor.output().entries()[*printed..] {
        let colored = match entry.kind {
            OutputKind::Stdout => entry.text.clone(),
            OutputKind::Stderr => styled(&entry.text, theme.chrome.stderr, false, false),
            OutputKind::Notice => styled(&entry.text, theme.chrome.notice, false, false),
        };
        if entry.kind == OutputKind::Notice {
            println!("{colored}");
        } else {
            print!("{colored}");
        }
        *printed += 1;
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(file) = args.next() else {
        bail!("usage: pyrite <file.py> [--run [interpreter]]");
    };
    let mut run = false;
    let mut interpreter = "python3".to_string();
    if let Some(flag) = args.next() {
        if flag != "--run" {
            bail!("unknown argument: {flag}");
        }
        run = true;
        if let Some(custom) = args.next() {
            interpreter = custom;
        }
    }

    let theme = Themes::dark();
    let mut editor = Editor::new();
    let path = PathBuf::from(&file);
    editor
        .open(&path, SaveChoice::Discard)
        .with_context(|| format!("could not open {file}"))?;

    let buffer = editor.buffer();
    let digits = Gutter::digits_for(buffer.line_count() as u32) as usize;
    for line in 0..buffer.line_count() {
        print_line(
            line,
            digits,
            buffer.line(line),
            editor.highlighter().spans(line),
            &theme,
        );
    }

    if run {
        editor
            .run_script(Path::new(&interpreter), SaveChoice::Discard)
            .context("could not start the interpreter")?;
        let mut printed = 0;
        loop {
            let finished = editor.wait_output(Duration::from_millis(100));
            drain_output(&editor, &theme, &mut printed);
            if finished {
                break;
            }
        }
    }

    Ok(())
}
