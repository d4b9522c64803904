//! LCP CLI - Command line interface.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lcp_auth::{
    AuthenticatedLicense, AuthenticationReason, Authenticator, PassphraseAuthenticator, Sender,
};
use lcp_license::{LicenseDocument, Link, LinkRelation, User};

// ============================================================================
// CLI Structure
// ============================================================================

#[derive(Parser)]
#[command(name = "lcp")]
#[command(about = "LCP CLI - Inspect licenses and request passphrases")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    license: LicenseArgs,

    #[command(subcommand)]
    command: Commands,
}

/// License the commands operate on.
#[derive(Args)]
struct LicenseArgs {
    /// License identifier
    #[arg(long, default_value = "local-license")]
    id: String,

    /// URI of the license provider
    #[arg(long, env = "LCP_PROVIDER")]
    provider: String,

    /// Passphrase hint shown to the user
    #[arg(long, default_value = "")]
    hint: String,

    /// Page helping the user remember their passphrase
    #[arg(long)]
    hint_link: Option<String>,

    /// Support resource (URL, mailto: or tel:), repeatable
    #[arg(long = "support")]
    support_links: Vec<String>,

    /// User identifier
    #[arg(long)]
    user_id: Option<String>,

    /// User email
    #[arg(long)]
    user_email: Option<String>,

    /// User display name
    #[arg(long)]
    user_name: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what an authenticator is told about the license
    Inspect {
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Request a passphrase from the configured authenticator chain
    Request {
        /// Why the passphrase is requested (not-found, invalid)
        #[arg(long, default_value = "not-found")]
        reason: AuthenticationReason,

        /// Static passphrase, clear or hashed
        #[arg(long, env = "LCP_PASSPHRASE", hide_env_values = true)]
        passphrase: Option<String>,

        /// Second static passphrase, used when the first one is invalid
        #[arg(long, env = "LCP_FALLBACK_PASSPHRASE", hide_env_values = true)]
        fallback_passphrase: Option<String>,

        /// Prompt on the terminal when every static passphrase failed
        #[arg(long)]
        prompt: bool,

        /// Never prompt the user
        #[arg(long)]
        no_interaction: bool,

        /// Give up waiting for a passphrase after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

// ============================================================================
// License & Chain
// ============================================================================

impl LicenseArgs {
    fn to_document(&self) -> LicenseDocument {
        let mut builder =
            LicenseDocument::builder(self.id.as_str(), self.provider.as_str()).text_hint(&self.hint);

        if let Some(href) = &self.hint_link {
            builder = builder.link(Link::new(href.as_str(), LinkRelation::Hint));
        }
        for href in &self.support_links {
            builder = builder.link(Link::new(href.as_str(), LinkRelation::Support));
        }

        let user = User {
            id: self.user_id.clone(),
            email: self.user_email.clone(),
            name: self.user_name.clone(),
        };
        if !user.is_empty() {
            builder = builder.user(user);
        }

        builder.build()
    }
}

/// Builds the chain `passphrase -> fallback passphrase -> prompt`, skipping
/// whatever is not configured.
fn build_chain(
    passphrase: Option<&str>,
    fallback_passphrase: Option<&str>,
    prompt: bool,
) -> Option<Arc<dyn Authenticator>> {
    let mut chain: Option<Arc<dyn Authenticator>> = if prompt {
        Some(Arc::new(TerminalPrompt::new()))
    } else {
        None
    };

    for value in [fallback_passphrase, passphrase].into_iter().flatten() {
        let mut node = PassphraseAuthenticator::new(value);
        if let Some(next) = chain.take() {
            node = node.with_fallback(next);
        }
        chain = Some(Arc::new(node));
    }

    chain
}

// ============================================================================
// Terminal Prompt
// ============================================================================

/// Blocking source of one line of user input.
type ReadLineFn = Arc<dyn Fn() -> io::Result<String> + Send + Sync>;

/// Asks the user for their passphrase on the terminal.
///
/// The read runs on the blocking pool so a caller-side timeout can fire
/// while the user has not answered yet.
struct TerminalPrompt {
    read_line: ReadLineFn,
}

impl TerminalPrompt {
    fn new() -> Self {
        Self::with_reader(Arc::new(|| {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok(line)
        }))
    }

    fn with_reader(read_line: ReadLineFn) -> Self {
        Self { read_line }
    }

    async fn prompt(
        &self,
        license: &AuthenticatedLicense<'_>,
        reason: AuthenticationReason,
    ) -> io::Result<Option<String>> {
        write_prompt(&mut io::stderr(), license, reason)?;

        let read_line = self.read_line.clone();
        let line = tokio::task::spawn_blocking(move || read_line())
            .await
            .map_err(io::Error::other)??;

        let passphrase = line.trim_end_matches(['\r', '\n']);
        if passphrase.is_empty() {
            Ok(None)
        } else {
            Ok(Some(passphrase.to_string()))
        }
    }
}

#[async_trait]
impl Authenticator for TerminalPrompt {
    async fn request_passphrase(
        &self,
        license: &AuthenticatedLicense<'_>,
        reason: AuthenticationReason,
        allow_user_interaction: bool,
        _sender: Sender<'_>,
    ) -> Option<String> {
        if !allow_user_interaction {
            debug!(license_id = %license.document().id, "User interaction not allowed");
            return None;
        }

        match self.prompt(license, reason).await {
            Ok(passphrase) => passphrase,
            Err(e) => {
                warn!("Failed to read passphrase: {}", e);
                None
            },
        }
    }

    fn name(&self) -> &'static str {
        "terminal-prompt"
    }
}

fn write_prompt(
    out: &mut impl Write,
    license: &AuthenticatedLicense<'_>,
    reason: AuthenticationReason,
) -> io::Result<()> {
    writeln!(out, "Passphrase required: {}.", reason)?;
    writeln!(out, "  Provider: {}", license.provider())?;
    if !license.hint().is_empty() {
        writeln!(out, "  Hint:     {}", license.hint())?;
    }
    if let Some(link) = license.hint_link() {
        writeln!(out, "  Help:     {}", link.href)?;
    }
    for link in license.support_links() {
        writeln!(out, "  Support:  {}", link.href)?;
    }
    write!(out, "Enter passphrase (empty to cancel): ")?;
    out.flush()
}

// ============================================================================
// Commands
// ============================================================================

#[derive(Serialize)]
struct LicenseSummary<'a> {
    id: &'a str,
    provider: &'a str,
    hint: &'a str,
    hint_link: Option<&'a Link>,
    support_links: Vec<&'a Link>,
    user: Option<&'a User>,
}

impl<'a> From<AuthenticatedLicense<'a>> for LicenseSummary<'a> {
    fn from(license: AuthenticatedLicense<'a>) -> Self {
        Self {
            id: &license.document().id,
            provider: license.provider(),
            hint: license.hint(),
            hint_link: license.hint_link(),
            support_links: license.support_links(),
            user: license.user(),
        }
    }
}

fn cmd_inspect(document: &LicenseDocument, format: &str) -> Result<()> {
    let summary = LicenseSummary::from(AuthenticatedLicense::new(document));

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        },
        "text" => {
            println!("License {}:", summary.id);
            println!("  Provider: {}", summary.provider);
            println!("  Hint:     {}", summary.hint);
            if let Some(link) = summary.hint_link {
                println!("  Help:     {}", link.href);
            }
            for link in &summary.support_links {
                println!("  Support:  {}", link.href);
            }
            if let Some(user) = summary.user {
                let name = user.name.as_deref().or(user.email.as_deref());
                let id = user.id.as_deref().unwrap_or("-");
                println!("  User:     {} ({})", name.unwrap_or("-"), id);
            }
        },
        _ => bail!("Unknown format: {}. Use 'text' or 'json'", format),
    }

    Ok(())
}

async fn cmd_request(
    document: &LicenseDocument,
    authenticator: &dyn Authenticator,
    reason: AuthenticationReason,
    allow_user_interaction: bool,
    timeout: Option<Duration>,
) -> Result<()> {
    let license = AuthenticatedLicense::new(document);
    info!(
        license_id = %document.id,
        authenticator = authenticator.name(),
        reason = reason.as_str(),
        "Requesting passphrase"
    );

    let request = authenticator.request_passphrase(&license, reason, allow_user_interaction, None);
    let passphrase = match timeout {
        Some(limit) => match tokio::time::timeout(limit, request).await {
            Ok(passphrase) => passphrase,
            Err(_) => bail!("Timed out after {}s waiting for a passphrase", limit.as_secs()),
        },
        None => request.await,
    };

    match passphrase {
        Some(passphrase) => {
            debug!(license_id = %document.id, "Passphrase obtained");
            println!("{}", passphrase);
            Ok(())
        },
        None => bail!("No passphrase obtained ({})", reason),
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // A timed-out prompt leaves its stdin read on the blocking pool; shut
    // down without waiting for it.
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(cli));
    runtime.shutdown_background();

    result
}

async fn run(cli: Cli) -> Result<()> {
    let document = cli.license.to_document();

    match cli.command {
        Commands::Inspect { format } => cmd_inspect(&document, &format),
        Commands::Request {
            reason,
            passphrase,
            fallback_passphrase,
            prompt,
            no_interaction,
            timeout_secs,
        } => {
            let Some(chain) =
                build_chain(passphrase.as_deref(), fallback_passphrase.as_deref(), prompt)
            else {
                bail!("No authenticator configured. Set LCP_PASSPHRASE or use --passphrase/--prompt");
            };

            cmd_request(
                &document,
                chain.as_ref(),
                reason,
                !no_interaction,
                timeout_secs.map(Duration::from_secs),
            )
            .await
        },
    }
}
