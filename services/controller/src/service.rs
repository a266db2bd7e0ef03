use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::{Command, NetworkArgs, OptimizeArgs};
use crate::config::{resolve_speed, ControllerConfig};
use crate::csv_writer::{export_optimization, HistoryExport};
use crate::input::NetworkInput;
use network::{GreenwaveClient, HttpTransport, Transport};
use protocol::{check_junctions, CycleValidation, HealthResponse};
use state::{AppState, Completion, Store};

/// What a command produced, printed as JSON by the binary.
#[derive(Debug, Serialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum Report {
    Health(HealthResponse),
    Validate(CycleValidation),
    Extract { state: AppState },
    Optimize {
        state: AppState,
        #[serde(skip_serializing_if = "Option::is_none")]
        export: Option<ExportedFiles>,
    },
}

#[derive(Debug, Serialize)]
pub struct ExportedFiles {
    pub history: String,
    pub offsets: String,
}

impl From<HistoryExport> for ExportedFiles {
    fn from(export: HistoryExport) -> Self {
        Self {
            history: export.history.display().to_string(),
            offsets: export.offsets.display().to_string(),
        }
    }
}

pub struct ControllerHarness<T = HttpTransport> {
    config: ControllerConfig,
    client: GreenwaveClient<T>,
    store: Store,
    speed_override: Option<f64>,
}

impl ControllerHarness<HttpTransport> {
    /// # Errors
    /// Fails if the HTTP client cannot be built.
    pub fn connect(config: ControllerConfig) -> Result<Self> {
        let client = GreenwaveClient::connect(config.base_url.clone())
            .context("creating green-wave client")?;
        Ok(Self::new(config, client))
    }
}

impl<T: Transport> ControllerHarness<T> {
    pub fn new(config: ControllerConfig, client: GreenwaveClient<T>) -> Self {
        Self { config, client, store: Store::default(), speed_override: None }
    }

    /// Speed given on the command line; beats both the junction file and the config.
    #[must_use]
    pub fn with_speed_override(mut self, speed: Option<f64>) -> Self {
        self.speed_override = speed;
        self
    }

    /// # Errors
    /// Fails on unreadable input, refused requests and service errors.
    pub async fn execute(&self, command: Command) -> Result<Report> {
        match command {
            Command::Health => self.health().await,
            Command::Validate(args) => self.validate(&args),
            Command::Extract(args) => self.extract(&args).await,
            Command::Optimize(args) => self.optimize(&args).await,
        }
    }

    async fn health(&self) -> Result<Report> {
        let health = self
            .client
            .health_check()
            .await
            .with_context(|| format!("service at {} is not healthy", self.client.base_url()))?;
        info!("service says: {}", health.message);
        Ok(Report::Health(health))
    }

    fn validate(&self, args: &NetworkArgs) -> Result<Report> {
        let input = NetworkInput::load(args.junctions.as_deref())?;
        let report = check_junctions(&input.junctions)?;
        if !report.is_valid {
            bail!(
                "cycle lengths differ: {:?} (junctions at positions {:?} do not match {:?})",
                report.durations,
                report.mismatched(),
                report.common_duration
            );
        }
        info!("{} junctions share a cycle of {:?} s", report.durations.len(), report.common_duration);
        Ok(Report::Validate(report))
    }

    fn load_network(&self, args: &NetworkArgs) -> Result<()> {
        let input = NetworkInput::load(args.junctions.as_deref())?;
        self.store.replace_junctions(input.junctions);
        let speed = resolve_speed(self.speed_override, input.desired_speed_kmh, &self.config);
        self.store.set_desired_speed(speed);
        Ok(())
    }

    async fn extract(&self, args: &NetworkArgs) -> Result<Report> {
        self.load_network(args)?;
        let completion = state::extract(&self.store, &self.client).await?;
        log_completion("extraction", completion);
        Ok(Report::Extract { state: self.store.snapshot() })
    }

    async fn optimize(&self, args: &OptimizeArgs) -> Result<Report> {
        self.load_network(&args.network)?;
        let completion = state::optimize(&self.store, &self.client, &args.options()).await?;
        log_completion("optimization", completion);

        if args.apply {
            let applied = self.store.apply_optimized_offsets();
            info!("applied offsets to {applied} junctions");
        }

        let snapshot = self.store.snapshot();
        let export = if args.history_csv {
            let files = export_optimization(
                &self.config.history_dir,
                &snapshot.network.junctions,
                &snapshot.optimization.offsets,
                &snapshot.optimization.history,
            )?;
            Some(ExportedFiles::from(files))
        } else {
            None
        };
        Ok(Report::Optimize { state: snapshot, export })
    }
}

fn log_completion(what: &str, completion: Completion) {
    match completion {
        Completion::Applied => info!("{what} finished"),
        Completion::Superseded => warn!("{what} reply arrived after a newer request and was dropped"),
    }
}
