//! Command handlers.
//!
//! Each handler calls into the core session or archive and renders the
//! result as markdown. Failures from the analysis service are shown in an
//! error panel before being returned, so the exit status reflects them.

use anyhow::{bail, Context, Result};
use geoscope_core::{
    display::{ConnectionStatus, ErrorPanel},
    models::StepStatus,
    presets::{ANALYSIS_PRESETS, COMPARISON_PRESETS},
    AnalysisForm, AnalysisService, Archive, ArchivedEntries, CompareForm, Generation,
    GeoscopeError, HistoryEntries, HttpAnalysisClient, ListHistory, OperationStatus, ProgressSnapshot,
    ProgressView,
};
use log::{debug, info};
use tokio::sync::watch;

use crate::{
    args::{AnalyzeArgs, ClearHistoryArgs, CompareArgs, HistoryArgs, ShowArgs},
    renderer::TerminalRenderer,
};

type Session = geoscope_core::AnalysisSession<HttpAnalysisClient>;

pub struct Cli {
    session: Session,
    archive: Archive,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(session: Session, archive: Archive, renderer: TerminalRenderer) -> Self {
        Self {
            session,
            archive,
            renderer,
        }
    }

    pub async fn analyze(mut self, args: AnalyzeArgs) -> Result<()> {
        let json = args.json;
        let form = AnalysisForm::try_from(args)?;

        let before = self.session.snapshot().await.generation;
        let watcher = tokio::spawn(report_progress(
            self.session.subscribe(),
            self.renderer_copy(),
            before,
        ));
        let outcome = self.session.run_analysis(form).await;

        let snapshot = self.session.snapshot().await;
        if snapshot.generation > before {
            // The final snapshot has been published; let the watcher print it.
            if let Err(e) = watcher.await {
                debug!("Progress reporter stopped early: {e}");
            }
        } else {
            watcher.abort();
        }
        match outcome {
            Ok(result) if json => {
                println!("{}", serde_json::to_string_pretty(&result)?);
                Ok(())
            }
            Ok(result) => {
                self.renderer.render(&ProgressView(&snapshot).to_string());
                println!();
                self.renderer.render(&result.to_string());
                Ok(())
            }
            Err(err) => {
                self.renderer.render(&ErrorPanel(&err).to_string());
                if !snapshot.steps.is_empty() {
                    println!();
                    self.renderer.render(&ProgressView(&snapshot).to_string());
                }
                Err(err).context("Analysis did not complete")
            }
        }
    }

    pub async fn compare(self, args: CompareArgs) -> Result<()> {
        let json = args.json;
        let form = CompareForm::try_from(args)?;

        match self.session.compare(form).await {
            Ok(result) if json => {
                println!("{}", serde_json::to_string_pretty(&result)?);
                Ok(())
            }
            Ok(result) => {
                self.renderer.render(&result.to_string());
                Ok(())
            }
            Err(err) => self.fail(err, "Comparison did not complete"),
        }
    }

    pub async fn history(self, args: HistoryArgs) -> Result<()> {
        if args.wants_local() || !self.session.service().is_available() {
            if !args.wants_local() {
                info!("No analysis service reachable, reading the local archive");
            }
            return self.local_history(&args).await;
        }

        match self.session.history(ListHistory::from(&args)).await {
            Ok(response) => {
                self.renderer
                    .render(&format!("# Analysis History ({} total)\n\n", response.total));
                self.renderer
                    .render(&HistoryEntries(response.analyses).to_string());
                Ok(())
            }
            Err(err) => self.fail(err, "Failed to load history"),
        }
    }

    async fn local_history(&self, args: &HistoryArgs) -> Result<()> {
        let limit = ListHistory::from(args).effective_limit();
        let rows = match &args.search {
            Some(text) => self.archive.search(text, limit).await,
            None => self.archive.recent(args.brand.as_deref(), limit).await,
        }
        .context("Failed to read the local archive")?;

        self.renderer.render("# Local Archive\n\n");
        self.renderer.render(&ArchivedEntries(rows).to_string());
        Ok(())
    }

    pub async fn show(self, args: ShowArgs) -> Result<()> {
        let result = self
            .archive
            .get(&args.id)
            .await
            .with_context(|| format!("Failed to load analysis {}", args.id))?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            self.renderer.render(&result.to_string());
        }
        Ok(())
    }

    pub async fn clear_history(self, args: ClearHistoryArgs) -> Result<()> {
        if !args.confirm {
            self.renderer.render(
                &OperationStatus::failure(
                    "This deletes every archived analysis. Re-run with --confirm".to_string(),
                )
                .to_string(),
            );
            bail!("Deletion not confirmed");
        }

        let removed = self
            .archive
            .clear()
            .await
            .context("Failed to clear the local archive")?;
        self.renderer.render(
            &OperationStatus::success(format!("Removed {removed} archived analyses")).to_string(),
        );
        Ok(())
    }

    pub async fn status(self) -> Result<()> {
        let client = self.session.service();
        self.renderer.render("# Connection\n\n");
        self.renderer
            .render(&ConnectionStatus(client.config()).to_string());
        self.renderer
            .render(&format!("- Archive: {}\n", self.archive.path().display()));

        if client.is_available() {
            self.renderer.render("\n## Backend Health\n\n");
            match self.session.health().await {
                Ok(health) => self.renderer.render(&health.to_string()),
                Err(err) => self.renderer.render(&format!("Unreachable: {}\n", err.user_message())),
            }
        }
        Ok(())
    }

    pub fn examples(self) -> Result<()> {
        let mut output = String::from("# Analysis Examples\n\n");
        for (i, preset) in ANALYSIS_PRESETS.iter().enumerate() {
            output.push_str(&format!(
                "{}. **{}**: \"{}\" for {} vs {}\n",
                i + 1,
                preset.name,
                preset.query,
                preset.brand_domain,
                preset.competitors
            ));
        }
        output.push_str("\n# Comparison Examples\n\n");
        for (i, preset) in COMPARISON_PRESETS.iter().enumerate() {
            output.push_str(&format!(
                "{}. **{}**: \"{}\" across {}\n",
                i + 1,
                preset.name,
                preset.query,
                preset.domains
            ));
        }
        output.push_str("\nUse `geo analyze --example N` or `geo compare --example N`.\n");
        self.renderer.render(&output);
        Ok(())
    }

    fn fail(&self, err: GeoscopeError, context: &'static str) -> Result<()> {
        self.renderer.render(&ErrorPanel(&err).to_string());
        Err(err).context(context)
    }

    fn renderer_copy(&self) -> TerminalRenderer {
        TerminalRenderer::new(self.renderer.is_rich())
    }
}

/// Prints a line whenever a step changes status.
///
/// Returns once an attempt newer than `after` has finished, or when the
/// session goes away. Yields the number of lines printed.
async fn report_progress(
    mut receiver: watch::Receiver<ProgressSnapshot>,
    renderer: TerminalRenderer,
    after: Generation,
) -> usize {
    let mut seen: Vec<(String, StepStatus)> = Vec::new();
    let mut printed = 0;
    while receiver.changed().await.is_ok() {
        let snapshot = receiver.borrow_and_update().clone();
        for step in &snapshot.steps {
            let known = seen.iter().find(|(id, _)| *id == step.id).map(|(_, s)| *s);
            if known != Some(step.status) && step.status != StepStatus::Pending {
                renderer.progress(&format!("{} **{}**", step.status.with_icon(), step.title));
                printed += 1;
            }
        }
        seen = snapshot
            .steps
            .iter()
            .map(|step| (step.id.clone(), step.status))
            .collect();

        if snapshot.generation > after && !snapshot.analyzing {
            break;
        }
    }
    printed
}
