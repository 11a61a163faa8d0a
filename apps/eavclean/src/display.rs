//! Output rendering and formatting

use console::{Style, Term};
use eavclean_types::{
    action_label, ColorChoice, MediaReport, OrphanedPathReport, ScopeDuplicateReport,
};
use std::io;

use crate::commands::{CombinedRun, CommandResult};

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render command result
    pub fn render_result(&self, result: &CommandResult) -> io::Result<()> {
        if self.json_output {
            return self.render_json(result);
        }

        match result {
            CommandResult::ConfigPath(report) => self.render_orphaned_paths(report),
            CommandResult::ConfigScope(report) => self.render_scope_duplicates(report),
            CommandResult::Media(report) => self.render_media(report),
            CommandResult::All(run) => self.render_combined(run),
        }
    }

    /// Print the confirmation warning for destructive runs
    pub fn render_destructive_warning(&self) -> io::Result<()> {
        let style = self.style(Style::new().yellow());
        self.term.write_line(
            &style
                .apply_to("WARNING: This is not a dry run. If you want to do that, add --dry-run.")
                .to_string(),
        )
    }

    /// Print the abort notice after a declined confirmation
    pub fn render_aborted(&self) {
        let style = self.style(Style::new().red());
        eprintln!("{}", style.apply_to("Aborted."));
    }

    fn render_json(&self, result: &CommandResult) -> io::Result<()> {
        let json = result.to_json().map_err(io::Error::other)?;
        println!("{json}");
        Ok(())
    }

    fn render_orphaned_paths(&self, report: &OrphanedPathReport) -> io::Result<()> {
        self.info(&orphaned_paths_line(report))
    }

    fn render_scope_duplicates(&self, report: &ScopeDuplicateReport) -> io::Result<()> {
        self.info(&scope_duplicates_line(report))
    }

    fn render_media(&self, report: &MediaReport) -> io::Result<()> {
        let (files, rows) = media_lines(report);
        self.info(&files)?;
        self.info(&rows)?;
        if !report.deletion_failures.is_empty() {
            let style = self.style(Style::new().yellow());
            self.term.write_line(
                &style
                    .apply_to(format!(
                        "{} files could not be removed; see warnings above.",
                        report.deletion_failures.len()
                    ))
                    .to_string(),
            )?;
        }
        Ok(())
    }

    fn render_combined(&self, run: &CombinedRun) -> io::Result<()> {
        if let Some(report) = &run.orphaned_paths {
            self.render_orphaned_paths(report)?;
        }
        if let Some(report) = &run.scope_duplicates {
            self.render_scope_duplicates(report)?;
        }
        if let Some(report) = &run.media {
            self.render_media(report)?;
        }
        if !run.summary.is_success() {
            let style = self.style(Style::new().red().bold());
            eprintln!(
                "{}",
                style.apply_to(format!(
                    "{} of 3 cleanups failed; see errors above.",
                    run.summary.failures.len()
                ))
            );
        }
        Ok(())
    }

    fn info(&self, line: &str) -> io::Result<()> {
        let style = self.style(Style::new().green());
        self.term.write_line(&style.apply_to(line).to_string())
    }

    fn style(&self, style: Style) -> Style {
        let enabled = match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        };
        if enabled {
            style.force_styling(true)
        } else {
            Style::new().force_styling(false)
        }
    }
}

fn orphaned_paths_line(report: &OrphanedPathReport) -> String {
    format!(
        "{} {} orphaned paths in configuration table.",
        action_label(report.dry_run),
        report.paths.len()
    )
}

fn scope_duplicates_line(report: &ScopeDuplicateReport) -> String {
    format!(
        "{} {} scope entries in database which are identical to global values.",
        action_label(report.dry_run),
        report.removed_rows
    )
}

fn media_lines(report: &MediaReport) -> (String, String) {
    let action = action_label(report.dry_run);
    (
        format!(
            "{action} {} unused images on disk with a total of {} MB.",
            report.file_count,
            report.megabytes_freed()
        ),
        format!(
            "{action} {} orphaned images in database.",
            report.files_to_remove_from_db.len()
        ),
    )
}
