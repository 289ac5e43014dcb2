//! SDU CLI: scriptable access to the health data backend.
//!
//! Commands:
//! - `ping`: check the backend is reachable
//! - `check-session`: report whether the cookie jar holds a live session
//! - `search`: list exams for a patient CPF
//! - `download`: resolve the signed download link for an exam
//! - `upload`: send an exam or diagnosis file
//! - `cid`: look up an ICD-10 code in the offline table
//! - `format-cpf`: apply the CPF mask

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sdu_core::api::Credentials;
use sdu_core::flows::login::validate_credentials;
use sdu_core::upload::AttachedFile;
use sdu_core::{
    cpf, reference, ApiClient, ClientConfig, DocumentKind, DownloadOutcome, HttpTransport,
    LoginOutcome, SearchOutcome, Transport, UploadForm, UploadOutcome,
};

#[derive(Parser)]
#[command(name = "sdu", about = "SDU CLI: Unified Health Data System client")]
struct Cli {
    /// Backend base URL (overrides the config file).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Config file path. Defaults to <config dir>/sdu/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Credentials for commands that need a session. Both or neither.
#[derive(Args, Debug, Default)]
struct LoginArgs {
    #[arg(long, requires = "password")]
    username: Option<String>,

    #[arg(long, requires = "username")]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backend answers.
    Ping,
    /// Report whether an authenticated session exists.
    CheckSession {
        #[command(flatten)]
        login: LoginArgs,
    },
    /// List exams for a patient CPF (masked or digits only).
    Search {
        cpf: String,

        /// Print the raw records as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,

        #[command(flatten)]
        login: LoginArgs,
    },
    /// Print the download link for an exam.
    Download {
        id: u64,

        #[command(flatten)]
        login: LoginArgs,
    },
    /// Upload an exam or diagnosis file (PNG, JPEG or PDF).
    Upload {
        #[arg(long)]
        name: String,

        #[arg(long)]
        cpf: String,

        /// `exame` or `diagnostico`.
        #[arg(long)]
        kind: String,

        #[arg(long)]
        description: String,

        /// Required for diagnoses.
        #[arg(long, default_value = "")]
        result: String,

        #[arg(long)]
        file: PathBuf,

        #[command(flatten)]
        login: LoginArgs,
    },
    /// Look up an ICD-10 code in the offline table.
    Cid { code: String },
    /// Apply the CPF mask to a value.
    FormatCpf { value: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(ClientConfig::default_path);
    let config = ClientConfig::load(&config_path)?.with_base_url(cli.base_url)?;
    init_logging(&config)?;

    // Offline commands never build a client.
    match &cli.command {
        Commands::Cid { code } => return run_cid(code),
        Commands::FormatCpf { value } => {
            println!("{}", cpf::format_cpf(value));
            return Ok(());
        }
        _ => {}
    }

    let transport = HttpTransport::new(&config).context("building HTTP client")?;
    let client = ApiClient::new(transport);
    tracing::debug!(base_url = %config.base_url, "client ready");

    match cli.command {
        Commands::Ping => run_ping(&client),
        Commands::CheckSession { login } => {
            login_if_requested(&client, &login)?;
            run_check_session(&client)
        }
        Commands::Search { cpf, json, login } => {
            login_if_requested(&client, &login)?;
            run_search(&client, &cpf, json)
        }
        Commands::Download { id, login } => {
            login_if_requested(&client, &login)?;
            run_download(&client, id)
        }
        Commands::Upload {
            name,
            cpf,
            kind,
            description,
            result,
            file,
            login,
        } => {
            login_if_requested(&client, &login)?;
            let form = build_upload_form(name, &cpf, &kind, description, result, &file)?;
            run_upload(&client, &form)
        }
        Commands::Cid { .. } | Commands::FormatCpf { .. } => Ok(()),
    }
}

fn init_logging(config: &ClientConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("parsing log filter")?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("installing tracing subscriber")?;
    Ok(())
}

fn login_if_requested<T: Transport>(client: &ApiClient<T>, args: &LoginArgs) -> Result<()> {
    let (Some(username), Some(password)) = (&args.username, &args.password) else {
        return Ok(());
    };
    let credentials: Credentials = validate_credentials(username, password)?;
    match client.login(&credentials)? {
        LoginOutcome::Accepted => {
            tracing::info!(username = %credentials.username, "logged in");
            Ok(())
        }
        LoginOutcome::Rejected { status, message } => {
            bail!("login rejected (HTTP {status}): {message}")
        }
    }
}

fn run_ping<T: Transport>(client: &ApiClient<T>) -> Result<()> {
    if client.health()? {
        println!("backend reachable");
        Ok(())
    } else {
        bail!("backend answered with an error status")
    }
}

fn run_check_session<T: Transport>(client: &ApiClient<T>) -> Result<()> {
    if client.check_session()? {
        println!("session active");
    } else {
        println!("no active session");
    }
    Ok(())
}

fn run_search<T: Transport>(client: &ApiClient<T>, raw_cpf: &str, json: bool) -> Result<()> {
    let query = cpf::digits_only(raw_cpf);
    let records = match client.search_exams(&query)? {
        SearchOutcome::Records(records) => records,
        SearchOutcome::NoResults => Vec::new(),
        SearchOutcome::Rejected { status } => bail!("search rejected (HTTP {status})"),
        SearchOutcome::Malformed(e) => bail!("unexpected search response: {e}"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("No records found for {}", cpf::format_cpf(&query));
        return Ok(());
    }
    println!("{:<8} {:<16} {:<28} {}", "ID", "CPF", "TYPE", "DATE");
    for exam in &records {
        println!(
            "{:<8} {:<16} {:<28} {}",
            exam.id,
            cpf::format_cpf(&exam.taxpayer_id),
            exam.kind,
            exam.display_date()
        );
    }
    println!("{} record(s)", records.len());
    Ok(())
}

fn run_download<T: Transport>(client: &ApiClient<T>, exam_id: u64) -> Result<()> {
    match client.resolve_download(exam_id)? {
        DownloadOutcome::Ready(url) => {
            println!("{url}");
            Ok(())
        }
        DownloadOutcome::Rejected { status } => bail!("download rejected (HTTP {status})"),
        DownloadOutcome::Malformed(e) => bail!("unexpected download response: {e}"),
    }
}

fn build_upload_form(
    patient_name: String,
    raw_cpf: &str,
    kind: &str,
    description: String,
    result_text: String,
    file: &std::path::Path,
) -> Result<UploadForm> {
    let Some(document_kind) = DocumentKind::from_wire(kind) else {
        bail!("unknown kind '{kind}', expected 'exame' or 'diagnostico'");
    };
    let attached = AttachedFile::from_path(file)
        .with_context(|| format!("reading {}", file.display()))?;
    Ok(UploadForm {
        patient_name,
        taxpayer_id: cpf::format_cpf(raw_cpf),
        document_kind: Some(document_kind),
        description,
        result_text,
        attached_file: Some(attached),
    })
}

fn run_upload<T: Transport>(client: &ApiClient<T>, form: &UploadForm) -> Result<()> {
    let upload = form.validate()?;
    match client.upload(&upload)? {
        UploadOutcome::Stored => {
            println!("{} uploaded", upload.kind.label());
            Ok(())
        }
        UploadOutcome::Rejected { status, message } => {
            bail!("upload rejected (HTTP {status}): {message}")
        }
    }
}

fn run_cid(code: &str) -> Result<()> {
    match reference::lookup(code) {
        Some(entry) => {
            println!("{}  {}", entry.code, entry.description);
            println!("Category:   {}", entry.category);
            println!("Cases:      {}", entry.case_count_label());
            println!("Prevalence: {}", entry.prevalence_label());
            Ok(())
        }
        None => bail!(
            "CID '{}' not found; known codes: {}",
            code.trim().to_uppercase(),
            reference::known_codes()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdu_core::api::endpoints;
    use sdu_core::transport::{HttpResponse, Method};
    use sdu_core::ScriptedTransport;
    use serde_json::json;

    fn client() -> (ApiClient<ScriptedTransport>, ScriptedTransport) {
        let transport = ScriptedTransport::new();
        (ApiClient::new(transport.clone()), transport)
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sdu",
            "search",
            "123.456.789-00",
            "--base-url",
            "http://backend:9000",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://backend:9000"));
        assert!(matches!(cli.command, Commands::Search { json: false, .. }));
    }

    #[test]
    fn username_requires_password() {
        let parsed = Cli::try_parse_from(["sdu", "check-session", "--username", "admin"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn login_skipped_without_credentials() {
        let (api, transport) = client();
        login_if_requested(&api, &LoginArgs::default()).unwrap();
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn rejected_login_is_an_error() {
        let (api, transport) = client();
        transport.reply(
            Method::Post,
            endpoints::LOGIN,
            HttpResponse::json(400, &json!({"status": "error", "message": "Invalid credentials"})),
        );
        let args = LoginArgs {
            username: Some("admin".into()),
            password: Some("nope".into()),
        };
        let err = login_if_requested(&api, &args).unwrap_err();
        assert!(err.to_string().contains("Invalid credentials"));
    }

    #[test]
    fn search_sends_digits_only() {
        let (api, transport) = client();
        transport.reply(Method::Get, endpoints::SEARCH_EXAM, HttpResponse::new(400, ""));
        run_search(&api, "123.456.789-00", false).unwrap();
        assert_eq!(transport.requests()[0].query_value("cpf"), Some("12345678900"));
    }

    #[test]
    fn rejected_search_fails() {
        let (api, transport) = client();
        transport.reply(Method::Get, endpoints::SEARCH_EXAM, HttpResponse::new(500, ""));
        assert!(run_search(&api, "12345678900", true).is_err());
    }

    #[test]
    fn download_without_url_fails() {
        let (api, transport) = client();
        transport.reply(
            Method::Get,
            endpoints::DOWNLOAD_EXAM,
            HttpResponse::json(200, &json!({})),
        );
        assert!(run_download(&api, 4).is_err());
    }

    #[test]
    fn upload_form_from_args() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("laudo.pdf");
        std::fs::write(&path, b"%PDF-1.7\n").unwrap();

        let form = build_upload_form(
            "Maria Santos".into(),
            "98765432100",
            "diagnostico",
            "Hipertensão".into(),
            String::new(),
            &path,
        )
        .unwrap();
        assert_eq!(form.taxpayer_id, "987.654.321-00");
        assert_eq!(form.document_kind, Some(DocumentKind::Diagnostic));

        // Diagnoses need a result; nothing is sent.
        let (api, transport) = client();
        assert!(run_upload(&api, &form).is_err());
        assert_eq!(transport.request_count(), 0);

        assert!(build_upload_form(
            "x".into(),
            "1",
            "raio-x",
            "y".into(),
            String::new(),
            &path
        )
        .is_err());
    }

    #[test]
    fn cid_lookup() {
        assert!(run_cid("m79").is_ok());
        assert!(run_cid("Z99").is_err());
    }
}
