//! `jobwatch` entry point.
//!
//! # Responsibility
//! - Load configuration, start logging, open the store and dispatch one
//!   command.
//! - Catch every failure once, log it and map it to an exit status.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Cli, Commands, RecipientCmd, RunArgs};
use jobwatch_core::db::open_db;
use jobwatch_core::{
    default_log_level, flush_logging, init_logging, LogNotifier, MailApiNotifier, Notifier,
    PostingNormalizer, PostingRepository, RecipientService, RunContext, RunError, SqliteGateway,
    SqlitePostingRepository, SqliteRecipientRepository, TaleoSource,
};
use log::{error, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let dotenv_loaded = dotenvy::dotenv().is_ok();
    let cli = Cli::parse();

    if let Err(err) = start_logging(&cli) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }
    if dotenv_loaded {
        log::debug!("event=config_load module=cli status=ok dotenv=true");
    }

    let code = match dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=command module=cli status=error error={err:#}");
            eprintln!("error: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    };

    flush_logging();
    code
}

fn start_logging(cli: &Cli) -> Result<()> {
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let log_dir = cli.log_dir.as_deref().map(absolute_path).transpose()?;
    let log_dir = log_dir.as_deref().and_then(Path::to_str);
    init_logging(level, log_dir).map_err(anyhow::Error::msg)
}

fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("resolving current directory")?;
    Ok(cwd.join(path))
}

fn exit_status(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<RunError>()
        .map_or(1, RunError::exit_code)
}

fn dispatch(cli: &Cli) -> Result<()> {
    match &cli.cmd {
        Commands::Run(args) => run(&cli.db, args),
        Commands::Recipient { cmd } => recipient(&cli.db, cmd),
        Commands::Postings => postings(&cli.db),
    }
}

fn run(db: &Path, args: &RunArgs) -> Result<()> {
    let source = TaleoSource::new(args.taleo_config()).context("configuring listing source")?;

    let notifier: Box<dyn Notifier> = match args.mail_config() {
        Some(mail) => Box::new(MailApiNotifier::new(mail).context("configuring mail API")?),
        None => {
            warn!("event=notifier_select module=cli status=ok transport=log reason=no_mail_token");
            Box::new(LogNotifier)
        }
    };

    let gateway = SqliteGateway::open(db)
        .map_err(RunError::Persistence)
        .with_context(|| format!("opening store {}", db.display()))?;

    let summary = RunContext::new(source, gateway, notifier)
        .with_normalizer(PostingNormalizer::new(args.field_layout()))
        .execute()?;

    println!("{summary}");
    Ok(())
}

fn recipient(db: &Path, cmd: &RecipientCmd) -> Result<()> {
    let conn = open_db(db).with_context(|| format!("opening store {}", db.display()))?;
    let service = RecipientService::new(SqliteRecipientRepository::new(&conn));

    match cmd {
        RecipientCmd::Add { email } => {
            let added = service.add_recipient(email)?;
            println!("added {} (id {})", added.email, added.recipient_id);
        }
        RecipientCmd::Remove { email } => {
            service.remove_recipient(email)?;
            println!("removed {}", email.trim().to_lowercase());
        }
        RecipientCmd::List => {
            for recipient in service.list_recipients()? {
                println!(
                    "{}\t{}\t{}",
                    recipient.recipient_id, recipient.email, recipient.date_added
                );
            }
        }
    }
    Ok(())
}

fn postings(db: &Path) -> Result<()> {
    let conn = open_db(db).with_context(|| format!("opening store {}", db.display()))?;
    for posting in SqlitePostingRepository::new(&conn).list_postings()? {
        println!(
            "{}\t{}\t{}\t{}",
            posting.source_contest_number, posting.title, posting.department, posting.detail_url
        );
    }
    Ok(())
}
