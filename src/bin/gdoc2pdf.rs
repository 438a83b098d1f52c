//! CLI binary for gdoc2pdf.
//!
//! A thin shim over the library crate that maps CLI flags to `MirrorConfig`,
//! wires up a credential provider, and prints one status line per document.

use anyhow::{bail, Context, Result};
use clap::Parser;
use gdoc2pdf::{
    mirror, DriveClient, ExportError, MirrorConfig, MirrorProgressCallback, MirrorStats,
    ProgressCallback, ServiceAccountProvider, StaticTokenProvider, TokenProvider,
};
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback ────────────────────────────────────────────────────

/// Prints one line per document as the walker reports it, plus a final
/// completion line. The traversal is sequential, so lines arrive in
/// traversal order.
struct CliProgressCallback {
    quiet: bool,
}

impl MirrorProgressCallback for CliProgressCallback {
    fn on_mirror_start(&self, source_name: &str, dest_name: &str) {
        if !self.quiet {
            eprintln!(
                "Exporting all Workspace files from {} to {}",
                bold(source_name),
                bold(dest_name)
            );
        }
    }

    fn on_exported(&self, path: &str, bytes: usize) {
        if !self.quiet {
            eprintln!(
                "{} Exported: {}  {}",
                green("✓"),
                path,
                dim(&format!("{bytes} bytes"))
            );
        }
    }

    fn on_skipped(&self, path: &str) {
        if !self.quiet {
            eprintln!("{} Skipped: {} already exists.", dim("·"), path);
        }
    }

    fn on_export_failed(&self, path: &str, error: &ExportError) {
        // Failures print even in quiet mode; they are the lines that matter.
        eprintln!("{} Failed to export: {} ({})", red("✗"), path, error);
    }

    fn on_mirror_complete(&self, stats: &MirrorStats) {
        if self.quiet {
            return;
        }
        let summary = format!(
            "{} exported, {} skipped, {} failed in {:.1}s",
            stats.exported,
            stats.skipped,
            stats.failed,
            stats.duration_ms as f64 / 1000.0
        );
        if stats.failed == 0 {
            eprintln!("{} All Workspace files have been exported. {}", green("✔"), dim(&summary));
        } else {
            eprintln!(
                "{} Export finished with failures — re-run to retry them. {}",
                red("⚠"),
                dim(&summary)
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Mirror a folder tree using an ambient gcloud session
  gdoc2pdf 1AbCsourceFolderId 1XyZdestFolderId \
      --access-token "$(gcloud auth print-access-token)"

  # Service-account key file (both folders must be shared with the account)
  GOOGLE_SERVICE_ACCOUNT_KEY=./key.json gdoc2pdf 1AbC... 1XyZ...

  # Re-run after a partial run: already-exported PDFs are skipped
  gdoc2pdf 1AbC... 1XyZ... --access-token "$TOKEN"

ENVIRONMENT VARIABLES:
  GOOGLE_OAUTH_TOKEN            Bearer token (same as --access-token)
  GOOGLE_SERVICE_ACCOUNT_KEY    Path to a service-account JSON key file
  GOOGLE_SERVICE_ACCOUNT_JSON   Service-account key content, inline

NOTES:
  Only Google Workspace files are exported: Docs, Sheets, and Slides. Every
  other file type is ignored. A document whose PDF already exists by name in
  the mirrored position is never re-exported, even if the source changed —
  delete the destination PDF to force a refresh.

  Documents over the Drive export size limit are reported and skipped; the
  run continues and exits successfully. Only store-access failures
  (bad folder ID, missing permissions) abort the run.
"#;

/// Mirror a Google Drive folder tree as PDFs.
#[derive(Parser, Debug)]
#[command(
    name = "gdoc2pdf",
    version,
    about = "Mirror a Google Drive folder tree as PDFs (Docs, Sheets, Slides)",
    long_about = "Recursively walks a source Google Drive folder, exports every Google \
Workspace document (Docs, Sheets, Slides) to PDF, and stores the PDFs in a destination \
folder tree mirroring the source's names and nesting. Existing PDFs are skipped, so \
re-runs only do the remaining work.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Drive file ID of the source folder.
    source_folder_id: String,

    /// Drive file ID of the destination folder.
    dest_folder_id: String,

    /// Bearer token for the Drive API (e.g. `gcloud auth print-access-token`).
    #[arg(long, env = "GOOGLE_OAUTH_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Path to a service-account JSON key file.
    #[arg(
        long,
        env = "GOOGLE_SERVICE_ACCOUNT_KEY",
        conflicts_with = "access_token"
    )]
    service_account_key: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "GDOC2PDF_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Drive files.list page size (1–1000).
    #[arg(long, env = "GDOC2PDF_PAGE_SIZE", default_value_t = 100,
          value_parser = clap::value_parser!(u32).range(1..=1000))]
    page_size: u32,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "GDOC2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except export failures and fatal errors.
    #[arg(short, long, env = "GDOC2PDF_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The per-document status lines come from the progress callback, so
    // library INFO logs would duplicate them; default to warnings only.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Credential provider ──────────────────────────────────────────────
    let provider: Arc<dyn TokenProvider> = if let Some(token) = cli.access_token {
        Arc::new(StaticTokenProvider::new(token))
    } else if cli.service_account_key.is_some()
        || std::env::var("GOOGLE_SERVICE_ACCOUNT_JSON").is_ok()
    {
        let sa = match cli.service_account_key {
            Some(path) => ServiceAccountProvider::from_file(&path).await,
            None => ServiceAccountProvider::from_env().await,
        }
        .context("Failed to load service-account credentials")?;
        Arc::new(sa)
    } else {
        bail!(
            "No credentials. Pass --access-token (or GOOGLE_OAUTH_TOKEN), or set \
             GOOGLE_SERVICE_ACCOUNT_KEY / GOOGLE_SERVICE_ACCOUNT_JSON."
        );
    };

    // ── Build config and run ─────────────────────────────────────────────
    let callback: ProgressCallback = Arc::new(CliProgressCallback { quiet: cli.quiet });
    let config = MirrorConfig::builder(cli.source_folder_id, cli.dest_folder_id)
        .api_timeout_secs(cli.api_timeout)
        .page_size(cli.page_size)
        .progress_callback(callback)
        .build()
        .context("Invalid configuration")?;

    let drive = DriveClient::new(provider, &config).context("Failed to build Drive client")?;

    mirror(&drive, &drive, &config)
        .await
        .context("Mirror run aborted")?;

    Ok(())
}
