//! Live rendering of engine events

use console::{Style, Term};
use eavclean_events::{AppEvent, GeneralEvent, ReconcileEvent};

use crate::logging::log_event_with_tracing;

/// Prints what a run finds and removes while it runs
///
/// Output up to a failure is therefore complete even when the run aborts.
pub struct EventHandler {
    term: Term,
    colors_enabled: bool,
    /// Print every removed file and debug messages
    verbose: bool,
    /// Suppress console output entirely
    quiet: bool,
}

impl EventHandler {
    pub fn new(colors_enabled: bool, verbose: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            colors_enabled,
            verbose,
            quiet,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: AppEvent) {
        log_event_with_tracing(&event);
        if self.quiet {
            return;
        }

        match event {
            AppEvent::General(general) => self.handle_general(general),
            AppEvent::Reconcile(reconcile) => self.handle_reconcile(reconcile),
        }
    }

    fn handle_general(&self, event: GeneralEvent) {
        match event {
            GeneralEvent::Warning { message, context } => match context {
                Some(context) => self.show_warning(&format!("{message} ({context})")),
                None => self.show_warning(&message),
            },
            GeneralEvent::OperationStarted { operation } if self.verbose => {
                self.show_dim(&format!("Running {operation}"));
            }
            GeneralEvent::OperationFailed { operation, error } => {
                self.show_error(&format!("{operation} failed: {error}"));
            }
            _ => {}
        }
    }

    fn handle_reconcile(&self, event: ReconcileEvent) {
        match event {
            ReconcileEvent::OrphanedPathFound { path } => {
                self.show_status(&format!("{path} is orphaned."));
            }
            ReconcileEvent::ScopeDuplicateFound { path, value, rows } => {
                self.show_status(&format!(
                    "Config path {path} with value {value} has {rows} entries; deleting non-default values"
                ));
            }
            ReconcileEvent::OrphanedGalleryRowsPruned { rows } => {
                self.show_status(&format!(
                    "Removed {rows} gallery entries without store values."
                ));
            }
            ReconcileEvent::FileRemoved { file, .. } if self.verbose => {
                self.show_dim(&format!("Removed {file}"));
            }
            ReconcileEvent::FileRemovalFailed { file, error } => {
                self.show_warning(&format!("Could not remove {file}: {error}"));
            }
            _ => {}
        }
    }

    fn style(&self, style: Style) -> Style {
        if self.colors_enabled {
            style
        } else {
            Style::new()
        }
    }

    fn show_status(&self, message: &str) {
        let _ = self.term.write_line(message);
    }

    fn show_dim(&self, message: &str) {
        let style = self.style(Style::new().dim());
        let _ = self.term.write_line(&style.apply_to(message).to_string());
    }

    fn show_warning(&self, message: &str) {
        let style = self.style(Style::new().yellow());
        eprintln!("{}", style.apply_to(format!("Warning: {message}")));
    }

    fn show_error(&self, message: &str) {
        let style = self.style(Style::new().red().bold());
        eprintln!("{}", style.apply_to(format!("Error: {message}")));
    }
}
