mod render;

use std::fmt;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use queuedesk::config::normalize_base_url;
use queuedesk::error::ApiError;
use queuedesk::forms::{self, FormMode, StaffForm, ValidationError};
use queuedesk::net::api::{ScannerStatusFilter, VerificationFilter};
use queuedesk::net::auth::spawn_expiry_timer;
use queuedesk::net::types::{EmergencyAction, EmergencyRequest, QrSettings, Token, TokenStatus};
use queuedesk::qr_export::{self, ExportError};
use queuedesk::session::{FileSessionStore, SessionError, SessionPolicy, SystemClock};
use queuedesk::{
    ApiClient, AuthContext, ConsoleConfig, ConsoleError, ScanDesk, ScanError, ScanOutcome, SessionAuth, queue, report,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(thiserror::Error)]
enum CliError {
    #[error("{}{}", .0, relogin_hint(.0))]
    Console(#[from] ConsoleError),
    #[error("not logged in; run `queuedesk login` first")]
    NotLoggedIn,
    #[error("read input failed: {0}")]
    Input(#[source] io::Error),
    #[error("write {path} failed: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("encode output failed: {0}")]
    Encode(#[from] serde_json::Error),
}

fn relogin_hint(err: &ConsoleError) -> &'static str {
    if err.is_auth_failure() { "\nrun `queuedesk login` to start a new session" } else { "" }
}

// `main` reports a returned error through `Debug`.
impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl CliError {
    fn is_auth_failure(&self) -> bool {
        match self {
            Self::Console(err) => err.is_auth_failure(),
            Self::NotLoggedIn => true,
            _ => false,
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        Self::Console(err.into())
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        Self::Console(err.into())
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        Self::Console(err.into())
    }
}

impl From<ScanError> for CliError {
    fn from(err: ScanError) -> Self {
        Self::Console(err.into())
    }
}

impl From<ExportError> for CliError {
    fn from(err: ExportError) -> Self {
        Self::Console(err.into())
    }
}

// =============================================================================
// ARGUMENTS
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "queuedesk", about = "Staff and admin console for the queue token API")]
struct Cli {
    #[arg(long, env = "QUEUEDESK_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "QUEUEDESK_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[arg(long, env = "QUEUEDESK_SESSION_TTL_SECS")]
    session_ttl_secs: Option<u64>,

    /// Print raw JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange credentials for a session.
    Login {
        #[arg(long, env = "QUEUEDESK_USERNAME")]
        username: String,
        #[arg(long, env = "QUEUEDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Show the stored session and its remaining lifetime.
    Session,
    #[command(subcommand)]
    Dashboard(DashboardCommand),
    Sidebar,
    #[command(subcommand)]
    Staff(StaffCommand),
    #[command(subcommand)]
    Category(CategoryCommand),
    #[command(subcommand)]
    Token(TokenCommand),
    /// Resolve and dispatch scanned QR text. Reads stdin lines when no
    /// payload is given.
    Scan { payloads: Vec<String> },
    #[command(subcommand)]
    Monitor(MonitorCommand),
    #[command(subcommand)]
    QrSettings(QrSettingsCommand),
    /// QR codes managed outside the token queue.
    #[command(subcommand)]
    Qr(QrCommand),
    #[command(subcommand)]
    Report(ReportCommand),
}

#[derive(Subcommand, Debug)]
enum DashboardCommand {
    Admin,
    Staff,
}

#[derive(Args, Debug)]
struct StaffArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name: String,
    /// Category id; repeat for several.
    #[arg(long = "category")]
    categories: Vec<String>,
    #[arg(long, default_value_t = false)]
    can_scan_qr: bool,
    #[arg(long, default_value_t = false)]
    can_generate_qr: bool,
    #[arg(long, default_value_t = false)]
    can_view_analytics: bool,
    #[arg(long, default_value_t = false)]
    can_verify_qr: bool,
}

impl StaffArgs {
    fn into_form(self, password: Option<String>) -> StaffForm {
        StaffForm {
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            password: password.unwrap_or_default(),
            categories: self.categories,
            can_scan_qr: self.can_scan_qr,
            can_generate_qr: self.can_generate_qr,
            can_view_analytics: self.can_view_analytics,
            can_verify_qr: self.can_verify_qr,
        }
    }
}

#[derive(Subcommand, Debug)]
enum StaffCommand {
    List,
    Create {
        #[command(flatten)]
        fields: StaffArgs,
        #[arg(long, default_value = "")]
        password: String,
    },
    Update {
        id: String,
        #[command(flatten)]
        fields: StaffArgs,
        /// New password; omitted keeps the current one.
        #[arg(long)]
        password: Option<String>,
    },
    Delete {
        id: String,
    },
    Stats {
        id: String,
    },
    Activity {
        username: String,
    },
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    List,
    /// Categories readable without a session.
    Public,
    Settings,
    Create {
        name: String,
        #[arg(long)]
        color: Option<String>,
    },
    Update {
        id: String,
        name: String,
        #[arg(long)]
        color: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum StatusArg {
    Waiting,
    Called,
    Completed,
}

impl From<StatusArg> for TokenStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Waiting => Self::Waiting,
            StatusArg::Called => Self::Called,
            StatusArg::Completed => Self::Completed,
        }
    }
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    Create {
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        customer_name: String,
        #[arg(long, default_value = "")]
        customer_contact: String,
        /// Save the token's QR image as `qr_{token_id}.png` in this directory.
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
    Generate {
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, value_enum, default_value = "waiting")]
        status: StatusArg,
    },
    Bulk {
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value_t = 1)]
        count: u32,
        /// Save each created token's QR image in this directory.
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
    /// Admin-generated tokens, optionally filtered.
    Admin {
        #[arg(long, default_value = "")]
        search: String,
        /// Save each listed token's QR image in this directory.
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
    Active,
    Called,
    Completed,
    /// Categories served by the current staff member.
    Queue,
    Summary,
    CallNext,
    /// Call a token by id. Without `--category` only `MAN` tokens qualify.
    Call {
        token_id: String,
        #[arg(long)]
        category: Option<String>,
    },
    Verify {
        token_id: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum EmergencyArg {
    Pause,
    Resume,
    Clear,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum VerificationArg {
    All,
    Success,
    Failed,
}

#[derive(Subcommand, Debug)]
enum MonitorCommand {
    Live {
        #[arg(long, default_value = "")]
        search: String,
    },
    Emergency {
        #[arg(value_enum)]
        action: EmergencyArg,
        /// Limit the action to one category; all queues otherwise.
        #[arg(long)]
        category: Option<String>,
    },
    Scanner {
        #[arg(long, value_enum, default_value = "all")]
        status: VerificationArg,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum QrSettingsCommand {
    Show,
    /// Update the given fields, keeping the rest as stored.
    Save {
        #[arg(long)]
        size: Option<u32>,
        #[arg(long)]
        border: Option<u32>,
        #[arg(long)]
        error_correction: Option<String>,
        #[arg(long)]
        expiry_hours: Option<u32>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        daily_reset: Option<bool>,
    },
}

#[derive(Subcommand, Debug)]
enum QrCommand {
    List,
    Templates,
    Generate {
        data: String,
        #[arg(long)]
        color: Option<String>,
        /// Template id.
        #[arg(long)]
        template: Option<String>,
    },
    /// One QR per entry. Reads stdin lines when no entry is given.
    Bulk { data: Vec<String> },
    Verify { id: String },
    /// Print the share link.
    Share { id: String },
    /// Save the rendered image as `qr_{id}.png`.
    Download {
        id: String,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    TemplateCreate {
        name: String,
        #[arg(long)]
        color: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ReportFormat {
    Summary,
    Csv,
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    Daily {
        /// `YYYY-MM-DD`; defaults to today (UTC).
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long, value_enum, default_value = "summary")]
        format: ReportFormat,
        /// Write the export to `daily_report_{start}_to_{end}.{ext}` in this
        /// directory instead of stdout.
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
    Operational,
    ScanActivity,
    VerificationLogs,
}

// =============================================================================
// ENTRY
// =============================================================================

struct Console {
    client: ApiClient,
    auth: Arc<SessionAuth>,
    json: bool,
}

impl Console {
    fn open(cli: &Cli) -> Result<Self, CliError> {
        let mut config = ConsoleConfig::from_env().map_err(ConsoleError::from)?;
        if let Some(base_url) = &cli.base_url {
            config.api.base_url = normalize_base_url(base_url);
        }
        if let Some(path) = &cli.session_file {
            config.session_file.clone_from(path);
        }
        if let Some(secs) = cli.session_ttl_secs.filter(|secs| *secs > 0) {
            config.session_ttl = Duration::from_secs(secs);
        }
        tracing::debug!(base_url = %config.api.base_url, session_file = %config.session_file.display(), "console config");

        let auth = Arc::new(SessionAuth::new(
            Arc::new(FileSessionStore::new(&config.session_file)),
            SessionPolicy::new(config.session_ttl),
            Arc::new(SystemClock),
        ));
        let client = ApiClient::new(&config.api, auth.clone())?;
        Ok(Self { client, auth, json: cli.json })
    }

    /// Print `value` as JSON under `--json`, otherwise as the given lines.
    fn emit<T: Serialize>(&self, value: &T, lines: impl FnOnce(&T) -> Vec<String>) -> Result<(), CliError> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            for line in lines(value) {
                println!("{line}");
            }
        }
        Ok(())
    }

    fn emit_fields<T: Serialize>(&self, value: &T) -> Result<(), CliError> {
        let lines = render::fields(value)?;
        self.emit(value, |_| lines)
    }

    fn notice(&self, message: &str) {
        if !self.json {
            println!("{message}");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let console = Console::open(&cli)?;
    match cli.command {
        Command::Login { username, password } => run_login(&console, &username, &password).await,
        Command::Logout => {
            console.auth.clear();
            console.notice("Logged out");
            Ok(())
        }
        Command::Session => run_session(&console),
        Command::Dashboard(DashboardCommand::Admin) => console.emit_fields(&console.client.admin_dashboard().await?),
        Command::Dashboard(DashboardCommand::Staff) => console.emit_fields(&console.client.staff_dashboard().await?),
        Command::Sidebar => console.emit(&console.client.sidebar().await?, |s| render::sidebar(s)),
        Command::Staff(command) => run_staff(&console, command).await,
        Command::Category(command) => run_category(&console, command).await,
        Command::Token(command) => run_token(&console, command).await,
        Command::Scan { payloads } => run_scan(console, payloads).await,
        Command::Monitor(command) => run_monitor(&console, command).await,
        Command::QrSettings(command) => run_qr_settings(&console, command).await,
        Command::Qr(command) => run_qr(&console, command).await,
        Command::Report(command) => run_report(&console, command).await,
    }
}

// =============================================================================
// SESSION
// =============================================================================

async fn run_login(console: &Console, username: &str, password: &str) -> Result<(), CliError> {
    let request = forms::login(username, password)?;
    let tokens = console.client.login(&request.username, &request.password).await?;
    let session = console.auth.begin(tokens)?;
    let ttl = console.auth.policy().ttl().as_secs();
    tracing::info!(username, "logged in");
    let view = serde_json::json!({ "username": username, "issued_at": session.issued_at, "expires_in_secs": ttl });
    console.emit(&view, |_| vec![format!("Logged in as {username}; session expires in {ttl}s")])
}

fn run_session(console: &Console) -> Result<(), CliError> {
    let Some(session) = console.auth.current()? else {
        return Err(CliError::NotLoggedIn);
    };
    let remaining = console.auth.remaining().unwrap_or_default().as_secs();
    let view = serde_json::json!({ "issued_at": session.issued_at, "remaining_secs": remaining });
    console.emit(&view, |_| vec![format!("Session active; expires in {remaining}s")])
}

// =============================================================================
// STAFF + CATEGORIES
// =============================================================================

async fn run_staff(console: &Console, command: StaffCommand) -> Result<(), CliError> {
    let client = &console.client;
    match command {
        StaffCommand::List => console.emit(&client.list_staff().await?, |u| render::staff(u)),
        StaffCommand::Create { fields, password } => {
            let payload = forms::staff_payload(&fields.into_form(Some(password)), FormMode::Create)?;
            let created = client.create_staff(&payload).await?;
            console.emit(&created, |u| vec![format!("Staff added: {} ({})", u.username, u.id)])
        }
        StaffCommand::Update { id, fields, password } => {
            let payload = forms::staff_payload(&fields.into_form(password), FormMode::Edit)?;
            let updated = client.update_staff(&id, &payload).await?;
            console.emit(&updated, |u| vec![format!("Staff updated: {}", u.username)])
        }
        StaffCommand::Delete { id } => {
            client.delete_staff(&id).await?;
            console.notice(&format!("Staff {id} deleted"));
            Ok(())
        }
        StaffCommand::Stats { id } => console.emit_fields(&client.staff_full_stats(&id).await?),
        StaffCommand::Activity { username } => {
            console.emit(&client.staff_activity(&username).await?, |rows| render::staff_activity(rows))
        }
    }
}

async fn run_category(console: &Console, command: CategoryCommand) -> Result<(), CliError> {
    let client = &console.client;
    match command {
        CategoryCommand::List => console.emit(&client.categories().await?, |c| render::categories(c)),
        CategoryCommand::Public => console.emit(&client.public_categories().await?, |c| render::categories(c)),
        CategoryCommand::Settings => console.emit(&client.category_settings().await?, |c| render::categories(c)),
        CategoryCommand::Create { name, color } => {
            let body = forms::new_category(&name, color.as_deref())?;
            let created = client.create_category(&body).await?;
            console.emit(&created, |_| vec![format!("Category added: {name}")])
        }
        CategoryCommand::Update { id, name, color } => {
            let body = forms::category_update(&id, &name, color.as_deref())?;
            let updated = client.update_category(&body).await?;
            console.emit(&updated, |_| vec![format!("Category {id} updated")])
        }
        CategoryCommand::Delete { id } => {
            client.delete_category(&id).await?;
            console.notice(&format!("Category {id} deleted"));
            Ok(())
        }
    }
}

// =============================================================================
// TOKENS
// =============================================================================

async fn run_token(console: &Console, command: TokenCommand) -> Result<(), CliError> {
    let client = &console.client;
    match command {
        TokenCommand::Create { category, customer_name, customer_contact, export_dir } => {
            let body = forms::new_token(&category, &customer_name, &customer_contact)?;
            let token = client.create_token(&body).await?;
            console.emit(&token, |t| vec![format!("Token created: {}", t.token_id)])?;
            export_images(console, std::slice::from_ref(&token), export_dir.as_deref()).await
        }
        TokenCommand::Generate { category, status } => {
            let body = forms::admin_generate(&category, status.into())?;
            console.emit_fields(&client.admin_generate(&body).await?)
        }
        TokenCommand::Bulk { category, count, export_dir } => {
            let body = forms::bulk_generate(&category, count)?;
            let result = client.bulk_generate(&body).await?;
            let made = result.count.unwrap_or(result.created.len() as u64);
            console.emit(&result, |_| vec![format!("Generated {made} tokens")])?;
            export_images(console, &result.created, export_dir.as_deref()).await
        }
        TokenCommand::Admin { search, export_dir } => {
            let tokens = client.admin_tokens().await?;
            let matched: Vec<_> = queue::search_tokens(&tokens, &search).into_iter().cloned().collect();
            console.emit(&matched, |t| render::tokens(t))?;
            export_images(console, &matched, export_dir.as_deref()).await
        }
        TokenCommand::Active => {
            let tokens = client.active_tokens().await?;
            console.emit(&tokens, |t| {
                let mut lines = render::tokens(t);
                if let Some(current) = queue::current_called(t) {
                    lines.push(format!("Now serving: {}", current.token_id));
                }
                lines
            })
        }
        TokenCommand::Called => console.emit(&client.called_tokens().await?, |t| render::tokens(t)),
        TokenCommand::Completed => console.emit(&client.completed_tokens().await?, |t| render::tokens(t)),
        TokenCommand::Queue => {
            let queue = client.staff_queue().await?;
            console.emit(&queue, |q| render::categories(&q.staff_queue))
        }
        TokenCommand::Summary => console.emit_fields(&client.my_summary().await?),
        TokenCommand::CallNext => {
            let next = client.call_next().await?;
            console.emit(&next, |n| match &n.token_id {
                Some(id) => vec![format!("Token {id} is now currently attending!")],
                None => vec!["No waiting tokens available.".to_owned()],
            })
        }
        TokenCommand::Call { token_id, category } => {
            let request = match category {
                Some(category) => forms::manual_entry(&token_id, &category)?,
                None => forms::manual_queue_call(&token_id)?,
            };
            let response = client.manual_call(&request).await?;
            console.emit(&response, |r| {
                vec![r.detail.clone().unwrap_or_else(|| format!("Token {token_id} called manually!"))]
            })
        }
        TokenCommand::Verify { token_id } => {
            let request = forms::verify(&token_id)?;
            let result = client.verify(&request.token_id).await?;
            console.emit_fields(&result)
        }
    }
}

async fn export_images(console: &Console, tokens: &[Token], dir: Option<&Path>) -> Result<(), CliError> {
    let Some(dir) = dir else {
        return Ok(());
    };
    let written = qr_export::export_token_images(&console.client, tokens, dir).await?;
    if written.is_empty() {
        console.notice("No QR images to export");
    }
    for path in &written {
        console.notice(&format!("Exported {}", path.display()));
    }
    Ok(())
}

/// Feed every payload through the scan desk. Stops early only when the
/// session is gone; other failures are reported and the next scan proceeds.
async fn run_scan(console: Console, payloads: Vec<String>) -> Result<(), CliError> {
    if console.auth.current()?.is_none() {
        return Err(CliError::NotLoggedIn);
    }
    let timer = spawn_expiry_timer(console.auth.clone());

    let lines: Box<dyn Iterator<Item = io::Result<String>>> = if payloads.is_empty() {
        Box::new(io::stdin().lock().lines())
    } else {
        Box::new(payloads.into_iter().map(Ok))
    };

    let json = console.json;
    let mut desk = ScanDesk::new(console.client);
    let mut failed = 0_usize;
    let mut result = Ok(());
    for line in lines {
        let raw = match line {
            Ok(raw) => raw,
            Err(err) => {
                result = Err(CliError::Input(err));
                break;
            }
        };
        match desk.handle_scan(&raw).await {
            Ok(outcome) if json => println!("{}", serde_json::to_string(&scan_outcome_json(&outcome))?),
            Ok(ScanOutcome::Displayed { token_id }) => println!("Token {token_id} scanned!"),
            Ok(ScanOutcome::Called { token_id, .. }) => println!("Token {token_id} scanned and called!"),
            Err(err) => {
                let err = CliError::from(err);
                if err.is_auth_failure() {
                    result = Err(err);
                    break;
                }
                failed += 1;
                eprintln!("{err}");
            }
        }
    }
    timer.abort();
    if failed > 0 {
        tracing::warn!(failed, "some scans failed");
    }
    result
}

fn scan_outcome_json(outcome: &ScanOutcome) -> serde_json::Value {
    match outcome {
        ScanOutcome::Displayed { token_id } => serde_json::json!({ "outcome": "displayed", "token_id": token_id }),
        ScanOutcome::Called { token_id, category_id, response } => serde_json::json!({
            "outcome": "called",
            "token_id": token_id,
            "category_id": category_id,
            "response": response,
        }),
    }
}

// =============================================================================
// MONITOR + SETTINGS
// =============================================================================

async fn run_monitor(console: &Console, command: MonitorCommand) -> Result<(), CliError> {
    let client = &console.client;
    match command {
        MonitorCommand::Live { search } => {
            let queues = queue::filter_live_queues(&client.live_queue().await?, &search);
            console.emit(&queues, |q| render::live_queues(q))
        }
        MonitorCommand::Emergency { action, category } => {
            let action = match action {
                EmergencyArg::Pause => EmergencyAction::Pause,
                EmergencyArg::Resume => EmergencyAction::Resume,
                EmergencyArg::Clear => EmergencyAction::Clear,
            };
            let request = EmergencyRequest { action, category_id: category.filter(|c| !c.is_empty()) };
            let response = client.emergency(&request).await?;
            console.emit(&response, |_| vec![format!("Emergency {action:?} sent")])
        }
        MonitorCommand::Scanner { status, from, to } => {
            let verification = match status {
                VerificationArg::All => VerificationFilter::All,
                VerificationArg::Success => VerificationFilter::Success,
                VerificationArg::Failed => VerificationFilter::Failed,
            };
            let filter = ScannerStatusFilter { verification, from, to };
            console.emit(&client.scanner_status(&filter).await?, |r| render::scan_records(r))
        }
    }
}

async fn run_qr_settings(console: &Console, command: QrSettingsCommand) -> Result<(), CliError> {
    let client = &console.client;
    match command {
        QrSettingsCommand::Show => console.emit_fields(&client.qr_settings().await?),
        QrSettingsCommand::Save { size, border, error_correction, expiry_hours, start, end, daily_reset } => {
            let current = client.qr_settings().await?;
            let settings = QrSettings {
                size: size.unwrap_or(current.size),
                border: border.unwrap_or(current.border),
                error_correction: error_correction.unwrap_or(current.error_correction),
                expiry_hours: expiry_hours.unwrap_or(current.expiry_hours),
                generation_start_time: start.unwrap_or(current.generation_start_time),
                generation_end_time: end.unwrap_or(current.generation_end_time),
                daily_reset: daily_reset.unwrap_or(current.daily_reset),
            };
            let saved = client.save_qr_settings(&settings).await?;
            console.emit_fields(&saved)
        }
    }
}

// =============================================================================
// QR CODE MANAGER
// =============================================================================

async fn run_qr(console: &Console, command: QrCommand) -> Result<(), CliError> {
    let client = &console.client;
    match command {
        QrCommand::List => console.emit(&client.qr_codes().await?, |codes| render::qr_codes(codes)),
        QrCommand::Templates => console.emit(&client.qr_templates().await?, |t| render::qr_templates(t)),
        QrCommand::Generate { data, color, template } => {
            let request = forms::qr_generate(&data, color.as_deref(), template.as_deref())?;
            let ack = client.generate_qr(&request).await?;
            console.emit(&ack, |_| vec!["QR code generated".to_owned()])
        }
        QrCommand::Bulk { data } => {
            let entries = if data.is_empty() {
                io::stdin().lock().lines().collect::<Result<Vec<_>, _>>().map_err(CliError::Input)?
            } else {
                data
            };
            let request = forms::qr_bulk(&entries)?;
            let ack = client.bulk_generate_qr(&request).await?;
            let made = request.data.len();
            console.emit(&ack, |_| vec![format!("Bulk QR codes generated ({made} entries)")])
        }
        QrCommand::Verify { id } => {
            let ack = client.verify_qr(&id).await?;
            console.emit(&ack, |a| vec![a.detail.clone().unwrap_or_else(|| "Verification complete".to_owned())])
        }
        QrCommand::Share { id } => console.emit(&client.share_qr(&id).await?, |link| vec![link.share_url.clone()]),
        QrCommand::Download { id, out_dir } => {
            let bytes = client.download_qr(&id).await?;
            let path = qr_export::write_image(&out_dir, &id, &bytes)?;
            console.notice(&format!("Saved {}", path.display()));
            Ok(())
        }
        QrCommand::TemplateCreate { name, color } => {
            let request = forms::qr_template(&name, color.as_deref())?;
            let ack = client.create_qr_template(&request).await?;
            console.emit(&ack, |_| vec![format!("Template created: {name}")])
        }
    }
}

// =============================================================================
// REPORTS
// =============================================================================

async fn run_report(console: &Console, command: ReportCommand) -> Result<(), CliError> {
    let client = &console.client;
    match command {
        ReportCommand::Daily { start, end, format, export_dir } => {
            let start = start.unwrap_or_else(report::today);
            let end = end.unwrap_or_else(report::today);
            let daily = client.daily_report(&start, &end).await?;

            let (ext, body) = match format {
                ReportFormat::Csv => ("csv", report::daily_report_csv(&daily)),
                ReportFormat::Summary => ("txt", report::daily_summary_lines(&daily, &start, &end).join("\n")),
            };
            if let Some(dir) = export_dir {
                if format == ReportFormat::Csv && body.is_empty() {
                    console.notice("No data to export");
                    return Ok(());
                }
                let path = dir.join(report::daily_report_filename(&start, &end, ext));
                std::fs::write(&path, body).map_err(|source| CliError::Output { path: path.clone(), source })?;
                console.notice(&format!("Exported {}", path.display()));
                return Ok(());
            }
            console.emit(&daily, |_| body.lines().map(ToOwned::to_owned).collect())
        }
        ReportCommand::Operational => {
            let rows = report::flatten_operational(&client.operational_report().await?);
            console.emit(&rows, |r| render::metrics(r))
        }
        ReportCommand::ScanActivity => console.emit(&client.scan_activity().await?, |r| render::activity(r)),
        ReportCommand::VerificationLogs => {
            console.emit(&client.verification_logs().await?, |r| render::activity(r))
        }
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
