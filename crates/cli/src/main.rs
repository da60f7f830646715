use clap::{Parser, Subcommand};
use feedback_core::{
    AccessGate, AdminLogin, Category, CategoryFilter, CoreConfig, DeleteOutcome, DraftUpdate,
    FeedbackError, FeedbackResult, FeedbackView, FileSessionStore, GateDecision, HttpGateway,
    LoadOutcome, LoginOutcome, Route, SubmissionController, SubmitOutcome,
};
use feedback_files::AttachmentUpload;
use feedback_types::EntryId;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod terminal;

use terminal::{AssumeYes, StdinConfirm, TerminalNotifier};

#[derive(Parser)]
#[command(name = "feedback")]
#[command(about = "Feedback portal client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit feedback
    Submit {
        /// Category label, e.g. "Complaint" or "Report Corruption"
        #[arg(long)]
        category: Option<Category>,
        /// Feedback text
        #[arg(long)]
        body: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        /// Hide name and email from moderators
        #[arg(long)]
        anonymous: bool,
        /// Image or PDF to attach
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Report corruption
    Report {
        /// What happened
        #[arg(long)]
        body: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        anonymous: bool,
        /// Supporting image or PDF
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List feedback (moderators only)
    List {
        /// Category label, or "All"
        #[arg(long, default_value = "All")]
        category: CategoryFilter,
        /// Case-insensitive search over text and names
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Delete a feedback entry (moderators only)
    Delete {
        /// Entry ID
        id: EntryId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Log in as moderator
    Login {
        /// Prompted for on stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Drop the stored moderator session
    Logout,
    /// Resolve a route path through the access gate
    Open {
        /// Route path, e.g. /feedback/view
        path: String,
    },
}

/// Collaborators shared by every subcommand.
struct App {
    config: CoreConfig,
    session: Arc<FileSessionStore>,
    gateway: Arc<HttpGateway>,
    gate: AccessGate,
    notifier: Arc<TerminalNotifier>,
}

impl App {
    fn new(config: CoreConfig) -> anyhow::Result<Self> {
        let session = Arc::new(FileSessionStore::new(config.session_file()));
        let gateway = Arc::new(HttpGateway::new(&config)?.with_session(session.clone()));
        let gate = AccessGate::new(session.clone());

        Ok(Self {
            config,
            session,
            gateway,
            gate,
            notifier: Arc::new(TerminalNotifier),
        })
    }

    /// Evaluate the gate for `route`. Prints a hint and returns `false` when locked.
    fn allow(&self, route: Route) -> bool {
        match self.gate.enter(route) {
            GateDecision::Render(_) => true,
            GateDecision::Redirect(to) => {
                eprintln!(
                    "Moderator login required ({}). Run `feedback login` first.",
                    to.path()
                );
                false
            }
        }
    }

    fn submission(&self, default_category: Option<Category>) -> SubmissionController {
        SubmissionController::new(self.gateway.clone(), self.notifier.clone(), default_category)
    }

    fn view(&self) -> FeedbackView {
        FeedbackView::new(
            self.gateway.clone(),
            self.notifier.clone(),
            self.config.api_base_url(),
        )
    }

    fn login(&self) -> AdminLogin {
        AdminLogin::new(self.gateway.clone(), self.session.clone(), self.notifier.clone())
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load_attachment(path: Option<PathBuf>) -> FeedbackResult<Option<AttachmentUpload>> {
    path.map(|p| AttachmentUpload::load(&p))
        .transpose()
        .map_err(FeedbackError::from)
}

/// Entry point for the `feedback` command.
///
/// # Environment Variables
/// - `FEEDBACK_API_BASE_URL`: backend base URL (default: "http://localhost:5000")
/// - `FEEDBACK_SESSION_FILE`: moderator session file (default: ".feedback/session.json")
/// - `RUST_LOG`: log filter (default directive: "feedback=info")
#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("feedback=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CoreConfig::from_env_values(
        std::env::var("FEEDBACK_API_BASE_URL").ok(),
        std::env::var("FEEDBACK_SESSION_FILE").ok(),
    )?;
    let app = App::new(config)?;

    let code = match cli.command {
        Some(Commands::Submit {
            category,
            body,
            name,
            email,
            phone,
            anonymous,
            file,
        }) => {
            let controller = app.submission(category);
            controller.update_field(DraftUpdate::Name(name));
            controller.update_field(DraftUpdate::Email(email));
            controller.update_field(DraftUpdate::Phone(phone));
            controller.update_field(DraftUpdate::Body(body));
            controller.update_field(DraftUpdate::Anonymous(anonymous));
            controller.update_field(DraftUpdate::Attachment(load_attachment(file)?));
            exit_code(controller.submit().await == SubmitOutcome::Submitted)
        }
        Some(Commands::Report {
            body,
            name,
            email,
            anonymous,
            file,
        }) => {
            let controller = app.submission(seeded_category(Route::report_corruption()));
            controller.report_corruption();
            controller.update_field(DraftUpdate::Name(name));
            controller.update_field(DraftUpdate::Email(email));
            controller.update_field(DraftUpdate::Body(body));
            controller.update_field(DraftUpdate::Anonymous(anonymous));
            controller.update_field(DraftUpdate::Attachment(load_attachment(file)?));
            exit_code(controller.submit().await == SubmitOutcome::Submitted)
        }
        Some(Commands::List { category, search }) => {
            if !app.allow(Route::ViewFeedback) {
                return Ok(ExitCode::FAILURE);
            }
            let view = app.view();
            view.set_category_filter(category);
            view.set_search_query(search);
            let loaded = matches!(view.load().await, LoadOutcome::Loaded(_));
            println!("{}", terminal::render_list(&view.render()));
            exit_code(loaded)
        }
        Some(Commands::Delete { id, yes }) => {
            if !app.allow(Route::ViewFeedback) {
                return Ok(ExitCode::FAILURE);
            }
            let view = app.view();
            let outcome = if yes {
                view.delete(&id, &AssumeYes).await
            } else {
                view.delete(&id, &StdinConfirm).await
            };
            exit_code(matches!(
                outcome,
                DeleteOutcome::Deleted | DeleteOutcome::Declined
            ))
        }
        Some(Commands::Login { password }) => {
            let password = match password {
                Some(p) => p,
                None => {
                    tokio::task::spawn_blocking(|| terminal::prompt_line("Password: ")).await??
                }
            };
            match app.login().login(&password).await {
                LoginOutcome::Navigate(route) => {
                    println!("Continue at {}", route.path());
                    ExitCode::SUCCESS
                }
                LoginOutcome::Failed(_)
                | LoginOutcome::Invalid
                | LoginOutcome::Busy
                | LoginOutcome::Abandoned => ExitCode::FAILURE,
            }
        }
        Some(Commands::Logout) => {
            app.login().logout()?;
            println!("Logged out.");
            ExitCode::SUCCESS
        }
        Some(Commands::Open { path }) => match app.gate.navigate(&path) {
            GateDecision::Render(route) => {
                println!("{}", describe(route));
                ExitCode::SUCCESS
            }
            GateDecision::Redirect(route) => {
                println!("Redirected to {}", route.path());
                ExitCode::SUCCESS
            }
        },
        None => {
            println!("Use 'feedback --help' for commands");
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}

fn seeded_category(route: Route) -> Option<Category> {
    match route {
        Route::SubmitFeedback { default_category } => default_category,
        Route::ViewFeedback | Route::AdminLogin => None,
    }
}

fn describe(route: Route) -> String {
    match route {
        Route::SubmitFeedback {
            default_category: Some(category),
        } => format!("{} (category: {category})", route.path()),
        Route::SubmitFeedback {
            default_category: None,
        }
        | Route::ViewFeedback
        | Route::AdminLogin => route.path().to_string(),
    }
}
