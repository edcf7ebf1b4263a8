use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use modkit::{ModuleCtxBuilder, TracedClient};
use runtime::{AppConfig, AppConfigProvider, CliArgs};

use flickbox::domain::error::DomainError;
use flickbox::domain::events::LikeUpdated;
use flickbox::domain::like_control::ToggleOutcome;
use flickbox::domain::list_collection::{AddOutcome, ListState, RemoveOutcome};
use flickbox::domain::moderation::ModerationOutcome;
use flickbox::domain::ports::EventPublisher;
use flickbox::domain::user_admin::{AdminOutcome, UserForm};
use flickbox::error::FlickboxError;
use flickbox::model::{ListId, ReviewId, TmdbId, UserId, UserRole, UserStatus};
use flickbox::{Flickbox, MODULE_NAME};

mod prompt;
mod render;

use prompt::ConsolePrompt;

// Adapter to make AppConfigProvider implement modkit::ConfigProvider
struct ModkitConfigAdapter(Arc<AppConfigProvider>);

impl modkit::ConfigProvider for ModkitConfigAdapter {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.0.get_module_config(module_name)
    }
}

/// Flickbox - film catalogue client
#[derive(Parser)]
#[command(name = "flickbox")]
#[command(about = "Flickbox - browse lists, moderate reviews and manage users")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Acting user for likes (overrides config)
    #[arg(short, long)]
    user_id: Option<u64>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Answer yes to every confirmation
    #[arg(short, long)]
    yes: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with a film list
    #[command(subcommand)]
    List(ListCommand),
    /// Search the metadata API (popular films without a query)
    Search { query: Option<String> },
    /// Toggle the like on a review
    Like {
        review_id: u64,
        /// Like count currently shown for the review
        #[arg(long, default_value_t = 0)]
        likes: u64,
    },
    /// Moderate reviews
    #[command(subcommand)]
    Reviews(ReviewCommand),
    /// Manage users
    #[command(subcommand)]
    Users(UserCommand),
    /// Check configuration
    Check,
}

#[derive(Subcommand)]
enum ListCommand {
    /// Show a list and its films
    Show { list_id: u64 },
    /// Add a film picked from search results
    Add {
        list_id: u64,
        /// Search query; popular films when omitted
        #[arg(short, long)]
        query: Option<String>,
        /// Index of the result to add
        #[arg(short, long, default_value_t = 0)]
        pick: usize,
    },
    /// Remove a film by its metadata id
    Remove { list_id: u64, tmdb_id: u64 },
}

#[derive(Subcommand)]
enum ReviewCommand {
    List {
        #[arg(short, long, default_value = "")]
        filter: String,
    },
    Approve { id: u64 },
    Reject { id: u64 },
    Delete { id: u64 },
}

#[derive(Subcommand)]
enum UserCommand {
    List {
        #[arg(short, long, default_value = "")]
        filter: String,
    },
    Add(UserFields),
    Edit {
        id: u64,
        #[command(flatten)]
        fields: UserFields,
    },
    Delete { id: u64 },
    /// Suspend an active user or reactivate a suspended one
    Suspend { id: u64 },
}

#[derive(Args, Default)]
struct UserFields {
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    password: Option<String>,
    #[arg(long)]
    age: Option<u32>,
    #[arg(long, value_enum)]
    role: Option<RoleArg>,
    #[arg(long, value_enum)]
    status: Option<StatusArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    User,
    Admin,
}

impl From<RoleArg> for UserRole {
    fn from(r: RoleArg) -> Self {
        match r {
            RoleArg::User => UserRole::User,
            RoleArg::Admin => UserRole::Admin,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Active,
    Inactive,
    Suspended,
}

impl From<StatusArg> for UserStatus {
    fn from(s: StatusArg) -> Self {
        match s {
            StatusArg::Active => UserStatus::Active,
            StatusArg::Inactive => UserStatus::Inactive,
            StatusArg::Suspended => UserStatus::Suspended,
        }
    }
}

impl UserFields {
    /// Overlay the provided flags onto `form`.
    fn apply(self, mut form: UserForm) -> UserForm {
        if let Some(v) = self.username {
            form.username = v;
        }
        if let Some(v) = self.email {
            form.email = v;
        }
        if let Some(v) = self.phone {
            form.phone = v;
        }
        if let Some(v) = self.password {
            form.password = v;
        }
        if let Some(v) = self.age {
            form.age = Some(v);
        }
        if let Some(v) = self.role {
            form.role = v.into();
        }
        if let Some(v) = self.status {
            form.status = v.into();
        }
        form
    }
}

/// Prints like updates as they are confirmed.
struct LikeEcho;

impl EventPublisher<LikeUpdated> for LikeEcho {
    fn publish(&self, event: &LikeUpdated) {
        tracing::info!(
            review_id = %event.review_id,
            likes = event.likes,
            liked = event.liked,
            "Like updated"
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        user_id: cli.user_id,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides (user id / verbosity)
    config.apply_cli_overrides(&args);

    // Initialize logging
    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.client.home_dir));
    tracing::info!("Flickbox client starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let command = cli.command.unwrap_or(Commands::Check);
    if let Commands::Check = command {
        return check_config(&config);
    }

    let module = build_module(&config, cli.yes)?;
    run_command(&module, command).await
}

fn build_module(config: &AppConfig, assume_yes: bool) -> Result<Flickbox> {
    let timeout = match config.client.timeout_sec {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    let http = TracedClient::with_timeout(timeout).context("Failed to build HTTP client")?;

    // Provide module configs to modkit
    let provider = Arc::new(ModkitConfigAdapter(Arc::new(AppConfigProvider::new(
        config.clone(),
    ))));
    let ctx = ModuleCtxBuilder::new(MODULE_NAME)
        .with_config_provider(provider)
        .with_http(http)
        .build();

    let module = Flickbox::init(&ctx, Arc::new(ConsolePrompt::new(assume_yes)))?
        .with_user(config.client.user_id.map(UserId))
        .with_like_observer(Arc::new(LikeEcho));
    Ok(module)
}

fn fail(e: DomainError) -> anyhow::Error {
    anyhow::Error::new(FlickboxError::from(e))
}

async fn run_command(module: &Flickbox, command: Commands) -> Result<()> {
    match command {
        Commands::List(cmd) => run_list(module, cmd).await,
        Commands::Search { query } => {
            let search = module.film_search();
            search.open().await;
            if let Some(q) = query {
                search.set_query(&q).await;
            }
            print!("{}", render::search_results(&search.display()));
            Ok(())
        }
        Commands::Like { review_id, likes } => {
            let user = module.active_user().map_err(fail)?;
            tracing::debug!(%user, review_id, "Toggling like");
            let ctl = module.like_control(&flickbox::model::Review {
                id: ReviewId(review_id),
                username: String::new(),
                movie_title: String::new(),
                review_text: String::new(),
                status: flickbox::model::ReviewStatus::Approved,
                likes,
            });
            ctl.check().await;
            match ctl.toggle().await {
                ToggleOutcome::Toggled { .. } => {
                    print!("{}", render::like(&ctl.snapshot()));
                    Ok(())
                }
                ToggleOutcome::Ignored(reason) => {
                    Err(anyhow!("Like ignored: {reason:?} (set --user-id or client.user_id)"))
                }
                ToggleOutcome::Failed => Err(anyhow!("Like toggle failed, see log for details")),
            }
        }
        Commands::Reviews(cmd) => run_reviews(module, cmd).await,
        Commands::Users(cmd) => run_users(module, cmd).await,
        Commands::Check => Ok(()),
    }
}

async fn run_list(module: &Flickbox, cmd: ListCommand) -> Result<()> {
    match cmd {
        ListCommand::Show { list_id } => {
            let view = module.list_view(ListId(list_id));
            view.load().await;
            if let ListState::Ready(list) = view.state() {
                print!("{}", render::list_card(&list));
                println!();
            }
            print!("{}", render::list_detail(&view.state()));
            Ok(())
        }
        ListCommand::Add {
            list_id,
            query,
            pick,
        } => {
            let view = module.list_view(ListId(list_id));
            view.load().await;

            let search = module.film_search();
            search.open().await;
            if let Some(q) = query {
                search.set_query(&q).await;
            }
            let film = search
                .pick(pick)
                .ok_or_else(|| anyhow!("No search result at position {pick}"))?;
            search.close();

            match view.add_film(&film).await.map_err(fail)? {
                AddOutcome::Added(f) => println!("Added {} ({})", f.title, f.year_label()),
                AddOutcome::AlreadyPresent => println!("{} is already in the list", film.title),
                AddOutcome::NoList => return Err(anyhow!("List {list_id} not found")),
            }
            Ok(())
        }
        ListCommand::Remove { list_id, tmdb_id } => {
            let view = module.list_view(ListId(list_id));
            view.load().await;
            view.request_remove(TmdbId(tmdb_id));
            match view.confirm_remove().await.map_err(fail)? {
                RemoveOutcome::Removed { count } => println!("Removed {count} film(s) from the list"),
                RemoveOutcome::NothingPending => {}
                RemoveOutcome::NoList => return Err(anyhow!("List {list_id} not found")),
            }
            Ok(())
        }
    }
}

async fn run_reviews(module: &Flickbox, cmd: ReviewCommand) -> Result<()> {
    let view = module.moderation();
    view.load().await;
    let outcome = match cmd {
        ReviewCommand::List { filter } => {
            print!("{}", render::reviews(&view.listing(&filter)));
            return Ok(());
        }
        ReviewCommand::Approve { id } => view.approve(ReviewId(id)).await,
        ReviewCommand::Reject { id } => view.reject(ReviewId(id)).await,
        ReviewCommand::Delete { id } => view.delete(ReviewId(id)).await,
    };
    match outcome.map_err(fail)? {
        ModerationOutcome::Applied => println!("Done"),
        ModerationOutcome::Unchanged => println!("Nothing to change"),
        ModerationOutcome::Cancelled => println!("Cancelled"),
    }
    Ok(())
}

async fn run_users(module: &Flickbox, cmd: UserCommand) -> Result<()> {
    let admin = module.user_admin();
    admin.load().await;
    let outcome = match cmd {
        UserCommand::List { filter } => {
            print!("{}", render::users(&admin.listing(&filter)));
            return Ok(());
        }
        UserCommand::Add(fields) => admin.create(fields.apply(UserForm::default())).await,
        UserCommand::Edit { id, fields } => {
            let form = admin
                .edit_form(UserId(id))
                .ok_or_else(|| anyhow!("User {id} not found"))?;
            admin.update(UserId(id), fields.apply(form)).await
        }
        UserCommand::Delete { id } => admin.delete(UserId(id)).await,
        UserCommand::Suspend { id } => admin.toggle_suspension(UserId(id)).await,
    };
    match outcome.map_err(fail)? {
        AdminOutcome::Applied => println!("Done"),
        AdminOutcome::Cancelled => println!("Cancelled"),
        AdminOutcome::NotFound => return Err(anyhow!("User not found")),
    }
    Ok(())
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    // Wiring validates the module section and base URLs.
    let module = build_module(config, false)?;
    if module.config().metadata_api_key.trim().is_empty() {
        println!("warning: modules.{MODULE_NAME}.metadata_api_key is not set");
    }
    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_nested_commands() {
        let cli = Cli::try_parse_from([
            "flickbox", "-vv", "--yes", "list", "add", "3", "--query", "heat", "--pick", "1",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.yes);
        assert!(matches!(
            cli.command,
            Some(Commands::List(ListCommand::Add { list_id: 3, pick: 1, .. }))
        ));
    }

    #[test]
    fn user_fields_overlay_form() {
        let fields = UserFields {
            email: Some("new@example.com".into()),
            role: Some(RoleArg::Admin),
            ..UserFields::default()
        };
        let form = fields.apply(UserForm {
            username: "budi".into(),
            ..UserForm::default()
        });
        assert_eq!(form.username, "budi");
        assert_eq!(form.email, "new@example.com");
        assert_eq!(form.role, UserRole::Admin);
        assert_eq!(form.status, UserStatus::Active);
    }
}
