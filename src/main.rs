//! codeshell - line-oriented front end for the remote editing shell.

mod logging;

use logging::LoggingGuard;

use codeshell::app::Workbench;
use codeshell::core::Command;
use codeshell::kernel::services::adapters::{ensure_settings_file, load_settings, HttpFileBackend};
use codeshell::kernel::services::ports::KernelConfig;
use codeshell::kernel::{Action, EditorAction};
use codeshell::models::LoadState;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(50);
const EXIT_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);
const LOG_TAIL: usize = 200;
const LOGS_SHOWN: usize = 20;

const HELP: &str = "\
commands:
  ls                      show the explorer tree
  expand|collapse|toggle <dir>
  refresh [dir]           re-list a directory (root by default)
  touch <parent> <name>   create an empty file
  mv <path> <new-name>    rename a file or directory
  rm <path>               delete a file or empty directory
  open <path>             open a file in the editor
  show                    print the open buffer
  type <text>             append text to the open buffer
  line <n>                move the cursor to line n
  save | close | back | forward | collapseAll
  history                 list navigation entries
  dismiss <id>            drop a notification
  logs                    recent log lines
  quit";

enum Flow {
    Continue,
    Quit,
}

fn main() -> io::Result<()> {
    let logging = logging::init(LOG_TAIL);
    if let Err(e) = ensure_settings_file() {
        tracing::warn!(error = %e, "settings file unavailable, using defaults");
    }
    let mut settings = load_settings();
    for arg in std::env::args().skip(1) {
        if let Some(value) = arg.strip_prefix("--backend=") {
            settings.backend_url = value.to_string();
        } else if let Some(value) = arg.strip_prefix("--autosave-ms=") {
            settings.autosave_delay_ms = value.parse().unwrap_or(settings.autosave_delay_ms);
        }
    }

    let backend = HttpFileBackend::new(
        &settings.backend_url,
        Duration::from_millis(settings.request_timeout_ms),
    );
    println!("codeshell: backend {}", backend.endpoint());
    let mut workbench = Workbench::new(Arc::new(backend), KernelConfig::from_settings(&settings))?;
    let mut last_notification = 0u64;

    workbench.dispatch(Action::ExplorerLoadRoot);
    let lines = spawn_stdin_reader();
    prompt();

    loop {
        match lines.recv_timeout(TICK) {
            Ok(line) => {
                let flow = run_line(&mut workbench, line.trim(), logging.as_ref());
                if matches!(flow, Flow::Quit) {
                    break;
                }
                prompt();
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        workbench.tick();
        print_notifications(&workbench, &mut last_notification);
    }

    // Leave nothing unsaved behind.
    workbench.run_command(Command::Save);
    if !workbench.settle(EXIT_FLUSH_TIMEOUT) {
        eprintln!("codeshell: pending writes did not finish");
    }
    print_notifications(&workbench, &mut last_notification);
    Ok(())
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

fn run_line(workbench: &mut Workbench, line: &str, logging: Option<&LoggingGuard>) -> Flow {
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim()))
        .unwrap_or((line, ""));
    match word {
        "" => {}
        "quit" | "exit" => return Flow::Quit,
        "help" => println!("{HELP}"),
        "ls" => print_tree(workbench),
        "expand" => {
            workbench.dispatch(Action::ExplorerExpand(rest.to_string()));
        }
        "collapse" => {
            workbench.dispatch(Action::ExplorerCollapse(rest.to_string()));
        }
        "toggle" => {
            workbench.dispatch(Action::ExplorerToggle(rest.to_string()));
        }
        "refresh" => {
            workbench.dispatch(Action::ExplorerRefresh(rest.to_string()));
        }
        "touch" => match rest.rsplit_once(char::is_whitespace) {
            Some((parent, name)) => {
                workbench.dispatch(Action::ExplorerCreateFile {
                    parent: parent.trim().to_string(),
                    name: name.to_string(),
                });
            }
            None => {
                workbench.dispatch(Action::ExplorerCreateFile {
                    parent: String::new(),
                    name: rest.to_string(),
                });
            }
        },
        "mv" => match rest.split_once(char::is_whitespace) {
            Some((from, new_name)) => {
                workbench.dispatch(Action::ExplorerRename {
                    from: from.to_string(),
                    new_name: new_name.trim().to_string(),
                });
            }
            None => println!("usage: mv <path> <new-name>"),
        },
        "rm" => {
            workbench.dispatch(Action::ExplorerDelete(rest.to_string()));
        }
        "open" => {
            workbench.dispatch(Action::OpenPath(rest.to_string()));
        }
        "show" => print_buffer(workbench),
        "type" => {
            let text = rest.replace("\\n", "\n");
            workbench.dispatch(Action::Editor(EditorAction::AppendText(text)));
        }
        "line" => match rest.parse::<usize>() {
            Ok(line) => {
                workbench.dispatch(Action::Editor(EditorAction::SetCursorLine(
                    line.saturating_sub(1),
                )));
            }
            Err(_) => println!("usage: line <n>"),
        },
        "history" => print_history(workbench),
        "dismiss" => match rest.parse::<u64>() {
            Ok(id) => {
                workbench.dispatch(Action::DismissNotification(id));
            }
            Err(_) => println!("usage: dismiss <id>"),
        },
        "logs" => match logging {
            Some(guard) => {
                println!("({})", guard.log_dir().display());
                for line in guard.tail().recent(LOGS_SHOWN) {
                    println!("{line}");
                }
            }
            None => println!("logging is not available"),
        },
        other => match Command::from_name(other) {
            Some(cmd) => {
                workbench.run_command(cmd);
            }
            None => println!("unknown command '{other}' (try 'help')"),
        },
    }
    Flow::Continue
}

fn print_tree(workbench: &Workbench) {
    let rows = workbench.state().explorer.tree.flatten_for_view();
    if rows.is_empty() {
        println!("(empty)");
    }
    for row in rows {
        let marker = match (row.is_dir, row.is_expanded, row.load_state) {
            (false, _, _) => ' ',
            (true, _, LoadState::Loading) => '~',
            (true, true, _) => '-',
            (true, false, _) => '+',
        };
        println!("{}{marker} {}", "  ".repeat(usize::from(row.depth)), row.name);
    }
}

fn print_buffer(workbench: &Workbench) {
    let editor = &workbench.state().editor;
    let (Some(path), Some(text)) = (editor.current_path(), editor.text()) else {
        println!("(no file open)");
        return;
    };
    let dirty = if editor.is_dirty() { " [modified]" } else { "" };
    let line = editor.cursor_line().unwrap_or(0) + 1;
    println!("--- {path}{dirty} (line {line})");
    println!("{text}");
}

fn print_history(workbench: &Workbench) {
    let history = &workbench.state().history;
    for (idx, entry) in history.entries().enumerate() {
        let marker = if history.cursor() == Some(idx) { '>' } else { ' ' };
        println!("{marker} {}:{}", entry.file_path, entry.cursor_line + 1);
    }
}

fn print_notifications(workbench: &Workbench, last_seen: &mut u64) {
    for note in workbench.state().notifications.items() {
        if note.id > *last_seen {
            println!("! [{}] {:?}: {}", note.id, note.kind, note.message);
            *last_seen = note.id;
        }
    }
}
