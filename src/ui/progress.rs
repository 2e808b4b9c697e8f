use crate::scan::Progress;
use crate::types::RepositoryRef;
use crossterm::{
    cursor::MoveToColumn,
    execute,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::io::{self, IsTerminal};
use std::sync::Mutex;

/// Single-line progress indicator on stderr, redrawn in place.
pub struct TerminalProgress {
    enabled: bool,
    lock: Mutex<()>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self {
            enabled: io::stderr().is_terminal(),
            lock: Mutex::new(()),
        }
    }

    fn show(&self, text: &str) {
        if !self.enabled {
            return;
        }
        let Ok(_guard) = self.lock.lock() else {
            return;
        };
        let mut stderr = io::stderr();
        let _ = execute!(
            stderr,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(text)
        );
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for TerminalProgress {
    fn located(&self, total: usize) {
        self.show(&format!("Scanning {total} repositories..."));
    }

    fn fetching(&self, repo: &RepositoryRef) {
        self.show(&format!("Fetching origin: {}...", repo.name));
    }

    fn finished_repo(&self, repo: &RepositoryRef, done: usize, total: usize) {
        self.show(&format!("[{done}/{total}] {}", repo.name));
    }

    fn done(&self) {
        self.show("");
    }
}
