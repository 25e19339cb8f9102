// SPDX-License-Identifier: MIT
//
// n-seek: a headless driver for the n-motion character-seek engine.
//
// Loads a buffer, replays a key script through an in-memory host, and prints
// where every motion left the cursor:
//
//   --keys "fx;2fx<CR>" → Driver::step per key → Engine / BufferHost
//                       → one report line per motion on stdout
//
// Key script syntax, beyond plain chars and Vim notation (`<CR>`, `<Esc>`):
//
//   [count] f F t T <char>   character motions
//   ; ,                      repeat last motion, same / reversed direction
//   h j k l 0 $              plain cursor moves (not engine motions)
//   v V <C-v> <C-g>          visual char / line / block, select
//   d c y                    operator-pending for the next motion
//   i … <Esc>                insert mode (text is never modified)
//   <C-w>                    window focus change
//   <Reset> <ResetAll>       engine resets
//   <Sleep:MS>               wait, for timeout experiments

use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use std::{env, thread};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use n_editor::buffer::Buffer;
use n_editor::mode::{Mode, VisualKind};
use n_editor::position::Position;
use n_motion::buffer_host::BufferHost;
use n_motion::config::{Config, parse_set};
use n_motion::engine::{Engine, Outcome};
use n_motion::host::{Host, Severity};
use n_motion::input::Key;

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "n-seek")]
#[command(about = "Replay clever f/F/t/T motions over a buffer")]
#[command(version)]
struct Cli {
    /// File to search in
    #[arg(required_unless_present = "text", conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Search in this text instead of a file
    #[arg(long)]
    text: Option<String>,

    /// Key script to replay
    #[arg(short, long, default_value = "")]
    keys: String,

    /// TOML file with motion options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Option directive, as with `:set` (repeatable)
    #[arg(short, long = "set", value_name = "DIRECTIVE")]
    set: Vec<String>,

    /// Start the cursor at LINE:COL (1-indexed)
    #[arg(long, value_parser = parse_position)]
    at: Option<Position>,
}

fn parse_position(s: &str) -> Result<Position, String> {
    let (line, col) = s
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COL, got {s}"))?;
    let line: usize = line.parse().map_err(|_| format!("bad line: {line}"))?;
    let col: usize = col.parse().map_err(|_| format!("bad column: {col}"))?;
    if line == 0 || col == 0 {
        return Err("LINE and COL start at 1".to_string());
    }
    Ok(Position::new(line - 1, col - 1))
}

/// Defaults, then the TOML file, then each `--set` directive in order.
fn load_config(path: Option<&PathBuf>, directives: &[String]) -> Result<Config> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => Config::default(),
    };
    for arg in directives {
        for directive in parse_set(arg) {
            config
                .apply(&directive)
                .with_context(|| format!("--set {arg}"))?;
        }
    }
    Ok(config)
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// `N_SEEK_LOG` > `RUST_LOG` > `warn`. A bare level in `N_SEEK_LOG` applies
/// to this workspace's crates only.
fn log_filter() -> EnvFilter {
    if let Ok(level) = env::var("N_SEEK_LOG") {
        if level.contains(['=', ',', ':']) {
            return EnvFilter::new(level);
        }
        return EnvFilter::new(format!(
            "warn,n_seek={level},n_motion={level},n_editor={level}"
        ));
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();
}

// ─── Driver ─────────────────────────────────────────────────────────────────

/// Feeds a key script to the engine, one key at a time.
///
/// Keys the engine reads at its prompt come out of the same queue, so
/// `fx` is "press `f`, then type `x` at the prompt".
struct Driver {
    host: BufferHost,
    engine: Engine,
    /// Count typed before the next command. `None` means no count entered.
    count: Option<usize>,
    /// Operator waiting for its motion (`d`, `c`, `y`).
    operator: Option<char>,
    /// Host messages already printed.
    messages_seen: usize,
}

impl Driver {
    fn new(buffer: Buffer, config: Config) -> Self {
        Self {
            host: BufferHost::new(buffer),
            engine: Engine::new(config),
            count: None,
            operator: None,
            messages_seen: 0,
        }
    }

    /// Queue keys and run them all, returning one line per reported step.
    fn run(&mut self, script: &str) -> Vec<String> {
        self.host.push_keys(script);
        let mut lines = Vec::new();
        while let Some(key) = self.host.next_key() {
            lines.extend(self.step(&key));
            lines.extend(self.drain_messages());
        }
        lines
    }

    fn take_count(&mut self) -> usize {
        self.count.take().unwrap_or(1)
    }

    fn step(&mut self, key: &Key) -> Option<String> {
        if self.host.editor_mode().is_insert() {
            if *key == Key::Escape {
                self.host.set_mode(Mode::Normal);
            }
            return None;
        }

        match key {
            Key::Char(d @ '1'..='9') => {
                self.push_digit(*d);
                None
            }
            Key::Char('0') if self.count.is_some() => {
                self.push_digit('0');
                None
            }
            Key::Char(ch @ ('f' | 'F' | 't' | 'T')) => {
                let count = self.take_count();
                let before = self.host.cursor();
                let result = self.engine.find_with_key(&mut self.host, *ch, count);
                let line = match result {
                    Ok(outcome) => self.report(&ch.to_string(), outcome),
                    Err(err) => format!("{ch}  error: {err}"),
                };
                self.after_motion(before);
                Some(line)
            }
            Key::Char(ch @ (';' | ',')) => {
                let count = self.take_count();
                let before = self.host.cursor();
                let outcome = self.engine.repeat(&mut self.host, *ch == ',', count);
                let line = self.report(&ch.to_string(), outcome);
                self.after_motion(before);
                Some(line)
            }
            Key::Char(ch @ ('h' | 'j' | 'k' | 'l' | '0' | '$')) => {
                let count = self.take_count();
                self.move_cursor(*ch, count);
                None
            }
            Key::Char('v') => self.toggle_visual(VisualKind::Char),
            Key::Char('V') => self.toggle_visual(VisualKind::Line),
            Key::Special(name) if name.eq_ignore_ascii_case("C-v") => {
                self.toggle_visual(VisualKind::Block)
            }
            Key::Special(name) if name.eq_ignore_ascii_case("C-g") => {
                if self.host.editor_mode().is_visual() {
                    self.host.set_mode(Mode::Select);
                }
                None
            }
            Key::Char(op @ ('d' | 'c' | 'y')) => {
                self.operator = Some(*op);
                self.host.set_mode(Mode::OperatorPending);
                None
            }
            Key::Char('i') => {
                self.count = None;
                self.host.set_mode(Mode::Insert);
                self.engine.on_insert_enter(&mut self.host);
                None
            }
            Key::Escape => {
                self.count = None;
                self.operator = None;
                self.host.set_mode(Mode::Normal);
                None
            }
            Key::Special(name) if name.eq_ignore_ascii_case("C-w") => {
                self.engine.on_window_change(&mut self.host);
                None
            }
            Key::Special(name) if name.eq_ignore_ascii_case("Reset") => {
                self.engine.reset(&mut self.host);
                Some("reset".to_string())
            }
            Key::Special(name) if name.eq_ignore_ascii_case("ResetAll") => {
                self.engine.reset_all(&mut self.host);
                Some("reset all".to_string())
            }
            Key::Special(name) if name.to_ascii_lowercase().starts_with("sleep") => {
                let ms = name
                    .split_once(':')
                    .and_then(|(_, ms)| ms.parse().ok())
                    .unwrap_or(0);
                debug!(ms, "sleeping");
                thread::sleep(Duration::from_millis(ms));
                None
            }
            other => {
                self.count = None;
                Some(format!("{other}  unmapped"))
            }
        }
    }

    fn push_digit(&mut self, digit: char) {
        let value = digit.to_digit(10).map_or(0, |d| d as usize);
        self.count = Some(self.count.unwrap_or(0).saturating_mul(10).saturating_add(value));
    }

    fn toggle_visual(&mut self, kind: VisualKind) -> Option<String> {
        let mode = if self.host.editor_mode() == Mode::Visual(kind) {
            Mode::Normal
        } else {
            Mode::Visual(kind)
        };
        self.host.set_mode(mode);
        None
    }

    /// Plain cursor movement, which the engine sees as an external move.
    fn move_cursor(&mut self, key: char, count: usize) {
        let cur = self.host.cursor();
        let target = match key {
            'h' => Position::new(cur.line, cur.col.saturating_sub(count)),
            'l' => Position::new(cur.line, cur.col + count),
            'j' => Position::new(cur.line + count, cur.col),
            'k' => Position::new(cur.line.saturating_sub(count), cur.col),
            '0' => Position::new(cur.line, 0),
            _ => Position::new(cur.line, usize::MAX),
        };
        self.host.move_to(target);
        if self.host.cursor() != cur {
            self.engine.on_cursor_moved(&mut self.host);
        }
    }

    /// Fire the cursor hook if the motion moved, and finish a pending
    /// operator.
    fn after_motion(&mut self, before: Position) {
        if self.host.cursor() != before {
            self.engine.on_cursor_moved(&mut self.host);
        }
        if self.operator.take().is_some() {
            self.host.set_mode(Mode::Normal);
        }
    }

    fn report(&self, key: &str, outcome: Outcome) -> String {
        let mut line = format!("{key:<2} {:<8}", self.host.editor_mode().display_name());
        match outcome {
            Outcome::Moved(motion) => {
                line.push_str(&format!(" {} -> {}", motion.from, motion.to));
                if let Some(op) = self.operator {
                    let kind = if motion.inclusive { "inclusive" } else { "exclusive" };
                    line.push_str(&format!(" ({op}, {kind})"));
                }
            }
            Outcome::Visual(pos) => {
                line.push_str(&format!(" selection -> {pos}"));
            }
            Outcome::NoMovement => line.push_str(" no match"),
            Outcome::Cancelled => line.push_str(" cancelled"),
            Outcome::Ignored => line.push_str(" ignored"),
        }
        let marks = self.host.char_marks();
        if !marks.is_empty() {
            line.push_str("  marks:");
            for range in marks {
                line.push_str(&format!(" {}", range.start));
            }
        }
        line
    }

    fn drain_messages(&mut self) -> Vec<String> {
        let new = self.host.messages()[self.messages_seen..]
            .iter()
            .map(|(severity, text)| match severity {
                Severity::Warning => format!("warning: {text}"),
                Severity::Error => format!("error: {text}"),
            })
            .collect::<Vec<_>>();
        self.messages_seen = self.host.messages().len();
        new
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let buffer = match (&cli.file, &cli.text) {
        (Some(path), _) => {
            Buffer::from_file(path).with_context(|| format!("opening {}", path.display()))?
        }
        (None, Some(text)) => Buffer::from_text(text),
        (None, None) => bail!("either a file or --text is required"),
    };
    let config = load_config(cli.config.as_ref(), &cli.set)?;
    info!(
        lines = buffer.line_count(),
        chars = buffer.len_chars(),
        path = ?buffer.path(),
        "buffer loaded"
    );

    let mut driver = Driver::new(buffer, config);
    if let Some(at) = cli.at {
        driver.host.move_to(at);
    }
    for line in driver.run(&cli.keys) {
        println!("{line}");
    }
    println!("cursor {}", driver.host.cursor());
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(text: &str) -> Driver {
        Driver::new(Buffer::from_text(text), Config::default())
    }

    fn cursor(d: &Driver) -> Position {
        d.host.cursor()
    }

    // ── Motions ───────────────────────────────────────────────────────────

    #[test]
    fn find_then_repeat_by_same_key() {
        let mut d = driver("a-b-c-d");
        d.run("f-ff");
        assert_eq!(cursor(&d), Position::new(0, 5));
    }

    #[test]
    fn count_prefix() {
        let mut d = driver("a-b-c-d");
        d.run("2f-");
        assert_eq!(cursor(&d), Position::new(0, 3));
    }

    #[test]
    fn semicolon_and_comma_repeat() {
        let mut d = driver("x x x x");
        d.run("fx;;,");
        assert_eq!(cursor(&d), Position::new(0, 4));
    }

    #[test]
    fn plain_move_forces_new_prompt() {
        let mut d = driver("xay xby");
        // After `l`, `f` prompts again and reads `y`.
        d.run("fxlfy");
        assert_eq!(cursor(&d), Position::new(0, 6));
        assert_eq!(d.host.reads(), 2);
    }

    #[test]
    fn reset_forces_new_prompt() {
        let mut d = driver("xax");
        d.run("fa<Reset>fx");
        assert_eq!(cursor(&d), Position::new(0, 2));
        assert_eq!(d.host.reads(), 2);
    }

    // ── Modes ─────────────────────────────────────────────────────────────

    #[test]
    fn operator_motion_reports_inclusive_and_returns_to_normal() {
        let mut d = driver("abc.def");
        let lines = d.run("df.");
        assert!(lines[0].contains("(d, inclusive)"), "{lines:?}");
        assert_eq!(d.host.editor_mode(), Mode::Normal);
    }

    #[test]
    fn visual_motion_moves_selection() {
        let mut d = driver("abc.def");
        let lines = d.run("vf.");
        assert!(lines[0].contains("selection -> 1:4"), "{lines:?}");
        assert_eq!(d.host.jump_mark(), Some(Position::new(0, 3)));
    }

    #[test]
    fn insert_mode_swallows_keys_and_clears_marks() {
        let mut d = driver("x x x");
        d.run("fx");
        assert!(!d.host.char_marks().is_empty());
        d.run("ifx<Esc>");
        assert!(d.host.char_marks().is_empty());
        assert_eq!(cursor(&d), Position::new(0, 2));
    }

    // ── Errors ────────────────────────────────────────────────────────────

    #[test]
    fn missing_previous_input_is_reported() {
        let mut d = driver("abc");
        let lines = d.run("f<CR>");
        assert_eq!(
            lines,
            vec![
                "f  error: Previous input not found.".to_string(),
                "error: Previous input not found.".to_string(),
            ]
        );
    }

    #[test]
    fn unmapped_keys_are_reported() {
        let mut d = driver("abc");
        let lines = d.run("q");
        assert_eq!(lines, vec!["q  unmapped".to_string()]);
    }

    // ── Command line ──────────────────────────────────────────────────────

    #[test]
    fn positions_are_one_indexed() {
        assert_eq!(parse_position("2:5"), Ok(Position::new(1, 4)));
        assert!(parse_position("0:1").is_err());
        assert!(parse_position("3").is_err());
    }

    #[test]
    fn set_directives_apply_in_order() {
        let config = load_config(
            None,
            &["smart_case timeout_ms=20".to_string(), "nosmart_case".to_string()],
        )
        .unwrap();
        assert!(!config.smart_case);
        assert_eq!(config.timeout_ms, 20);
    }

    #[test]
    fn bad_directive_is_an_error() {
        assert!(load_config(None, &["bogus".to_string()]).is_err());
    }

    #[test]
    fn cli_requires_input() {
        assert!(Cli::try_parse_from(["n-seek"]).is_err());
        let cli = Cli::try_parse_from(["n-seek", "--text", "abc", "-k", "fc", "-s", "smart_case"])
            .unwrap();
        assert_eq!(cli.text.as_deref(), Some("abc"));
        assert_eq!(cli.set, vec!["smart_case".to_string()]);
    }
}
