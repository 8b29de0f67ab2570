//! Command-line and environment configuration.
//!
//! Every flag falls back to a `JOBWATCH_*` environment variable, which may
//! itself come from a `.env` file loaded at startup.

use clap::{Args, Parser, Subcommand};
use jobwatch_core::{FieldLayout, MailApiConfig, TaleoConfig};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "jobwatch")]
#[command(about = "Watches a job board and emails subscribers about new and closed postings", long_about = None)]
pub struct Cli {
    /// SQLite store holding known postings and recipients
    #[arg(long, env = "JOBWATCH_DB", default_value = "jobwatch.sqlite3", global = true)]
    pub db: PathBuf,

    /// trace | debug | info | warn | error
    #[arg(long, env = "JOBWATCH_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Write rolling log files here instead of stderr
    #[arg(long, env = "JOBWATCH_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch, reconcile, persist and notify once
    Run(RunArgs),

    /// Manage notification subscribers
    Recipient {
        #[command(subcommand)]
        cmd: RecipientCmd,
    },

    /// Print the postings currently known to the store
    Postings,
}

#[derive(Subcommand)]
pub enum RecipientCmd {
    Add { email: String },
    Remove { email: String },
    List,
}

#[derive(Args)]
pub struct RunArgs {
    /// Job-board search endpoint
    #[arg(long, env = "JOBWATCH_SOURCE_URL")]
    pub source_url: Option<String>,

    /// LOCATION filter id
    #[arg(long, env = "JOBWATCH_LOCATION_ID")]
    pub location_id: Option<String>,

    /// JOB_FIELD filter id
    #[arg(long, env = "JOBWATCH_JOB_FIELD_ID")]
    pub job_field_id: Option<String>,

    /// Detail page URL; `{contest}` is replaced by the contest number
    #[arg(long, env = "JOBWATCH_DETAIL_URL_TEMPLATE")]
    pub detail_url_template: Option<String>,

    /// Per-request timeout for the job board and the mail API
    #[arg(long, env = "JOBWATCH_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub http_timeout_secs: u64,

    /// Mail API base URL
    #[arg(long, env = "JOBWATCH_MAIL_URL", default_value = "https://api.postmarkapp.com")]
    pub mail_url: String,

    /// Mail API token; notifications are only logged when absent
    #[arg(long, env = "JOBWATCH_MAIL_TOKEN", hide_env_values = true)]
    pub mail_token: Option<String>,

    /// Sender address for notification emails
    #[arg(long, env = "JOBWATCH_MAIL_FROM", default_value = "jobwatch@localhost")]
    pub mail_from: String,
}

impl RunArgs {
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn taleo_config(&self) -> TaleoConfig {
        let defaults = TaleoConfig::default();
        TaleoConfig {
            endpoint: self.source_url.clone().unwrap_or(defaults.endpoint),
            location_id: self.location_id.clone().unwrap_or(defaults.location_id),
            job_field_id: self.job_field_id.clone().unwrap_or(defaults.job_field_id),
            timeout: self.timeout(),
        }
    }

    pub fn field_layout(&self) -> FieldLayout {
        match &self.detail_url_template {
            Some(template) => FieldLayout {
                detail_url_template: template.clone(),
                ..FieldLayout::default()
            },
            None => FieldLayout::default(),
        }
    }

    /// `None` when no token is configured.
    pub fn mail_config(&self) -> Option<MailApiConfig> {
        let token = self.mail_token.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        Some(MailApiConfig {
            endpoint: self.mail_url.clone(),
            api_token: token.to_string(),
            from_address: self.mail_from.clone(),
            timeout: self.timeout(),
        })
    }
}
