mod render;

use anyhow::{anyhow, Context, Result};
use browser::{BrowseConfig, BrowseController, BrowseDriver, Intent, Submission, UserDirectory, ViewModel};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rec_client::HttpRecommendationClient;
use rec_model::Algorithm;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// ReelBrowse - Recommendation browser and algorithm comparison
#[derive(Parser)]
#[command(name = "reel-browse")]
#[command(about = "Browse and compare movie recommendation algorithms", long_about = None)]
struct Cli {
    /// Recommendation service base URL (overrides REEL_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print the view model as JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one page of recommendations for a user
    Recommend {
        #[arg(long)]
        user_id: String,

        /// Algorithm name (hybrid, user_cf, item_cf, svd, content, collaborative, ...)
        #[arg(long, default_value = "hybrid")]
        algorithm: Algorithm,

        #[arg(long, default_value = "1")]
        page: u32,

        /// Only keep titles matching this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Compare two algorithms side by side
    Compare {
        #[arg(long)]
        user_id: String,

        #[arg(long, default_value = "hybrid")]
        algorithm_a: Algorithm,

        #[arg(long)]
        algorithm_b: Algorithm,

        #[arg(long, default_value = "1")]
        page: u32,

        #[arg(long)]
        search: Option<String>,
    },

    /// List user ids, or suggest ids starting with a prefix
    Users {
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Browse interactively (type `help` for commands)
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Keep tracing quiet by default so it doesn't interleave with the output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = BrowseConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    let client = config.build_client().context("Failed to create recommendation client")?;

    match cli.command {
        Commands::Recommend {
            user_id,
            algorithm,
            page,
            search,
        } => {
            let submission = Submission::new(user_id, algorithm).with_search(search.unwrap_or_default());
            handle_browse(client, submission, page, cli.json).await?
        }
        Commands::Compare {
            user_id,
            algorithm_a,
            algorithm_b,
            page,
            search,
        } => {
            let submission = Submission::new(user_id, algorithm_a)
                .compare_with(algorithm_b)
                .with_search(search.unwrap_or_default());
            handle_browse(client, submission, page, cli.json).await?
        }
        Commands::Users { prefix } => handle_users(client, prefix).await?,
        Commands::Interactive => handle_interactive(client, config).await?,
    }

    Ok(())
}

/// Handle the 'recommend' and 'compare' commands
async fn handle_browse(
    client: HttpRecommendationClient,
    submission: Submission,
    page: u32,
    json: bool,
) -> Result<()> {
    if submission.user_id.trim().is_empty() {
        return Err(anyhow!("User id must not be empty"));
    }

    let mut controller = BrowseController::new(client);
    controller.submit_at(submission, page).await;

    if let Some(shown) = controller.view().primary.as_ref().map(|p| p.page.page) {
        if shown != page.max(1) {
            println!(
                "{} page {} is out of range, showing page {} of {}",
                "!".yellow(),
                page,
                shown,
                controller.total_pages().unwrap_or(1)
            );
        }
    }

    let view = controller.view();
    if json {
        print_json(view)?;
    } else {
        render::print_view(view);
    }

    match &view.error {
        Some(message) => Err(anyhow!("{}", message)),
        None => Ok(()),
    }
}

/// Handle the 'users' command
async fn handle_users(client: HttpRecommendationClient, prefix: Option<String>) -> Result<()> {
    let directory = UserDirectory::new(client);

    let users = match prefix {
        Some(prefix) => directory.suggest(&prefix).await,
        None => directory.users().await.to_vec(),
    };

    if users.is_empty() {
        println!("{}", "No users found".dimmed());
    }
    for user in users {
        println!("{}", user);
    }
    Ok(())
}

/// One line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    User(String),
    Algo(Algorithm),
    AlgoB(Algorithm),
    Search(String),
    Page(u32),
    Next,
    Prev,
    Compare(bool),
    Suggest(String),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let algorithm = |rest: &str| -> Result<Algorithm, String> {
        if rest.is_empty() {
            return Err("missing algorithm name".to_string());
        }
        rest.parse().map_err(|_| format!("invalid algorithm '{}'", rest))
    };

    match name {
        "user" if !rest.is_empty() => Ok(ReplCommand::User(rest.to_string())),
        "user" => Err("usage: user <id>".to_string()),
        "algo" => algorithm(rest).map(ReplCommand::Algo),
        "algob" => algorithm(rest).map(ReplCommand::AlgoB),
        "search" => Ok(ReplCommand::Search(rest.to_string())),
        "page" => rest
            .parse()
            .map(ReplCommand::Page)
            .map_err(|_| "usage: page <number>".to_string()),
        "next" => Ok(ReplCommand::Next),
        "prev" => Ok(ReplCommand::Prev),
        "compare" => match rest {
            "on" => Ok(ReplCommand::Compare(true)),
            "off" => Ok(ReplCommand::Compare(false)),
            _ => Err("usage: compare on|off".to_string()),
        },
        "users" => Ok(ReplCommand::Suggest(rest.to_string())),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" => Ok(ReplCommand::Quit),
        "" => Err(String::new()),
        other => Err(format!("unknown command '{}', type 'help'", other)),
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  user <id>         select a user and load page 1");
    println!("  algo <name>       primary algorithm");
    println!("  algob <name>      algorithm to compare against");
    println!("  compare on|off    toggle the comparison");
    println!("  search <text>     filter titles (empty to clear)");
    println!("  page <n> | next | prev");
    println!("  users <prefix>    suggest user ids");
    println!("  quit");
}

/// Handle the 'interactive' command
async fn handle_interactive(client: HttpRecommendationClient, config: BrowseConfig) -> Result<()> {
    let directory = UserDirectory::new(client.clone());
    let driver = BrowseDriver::new(BrowseController::new(client), config.debounce());
    let mut updates = driver.subscribe();

    let (intents, rx) = mpsc::channel(32);
    let driver_handle = tokio::spawn(driver.run(rx));

    let render_handle = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let view = updates.borrow_and_update().clone();
            render::print_view(&view);
        }
    });

    println!("Connected to {} (type 'help' for commands)", config.base_url.bold());

    // Form values, resubmitted whenever the user or primary algorithm changes
    let mut form = Submission::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read from stdin")? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) if message.is_empty() => continue,
            Err(message) => {
                println!("{} {}", "!".yellow(), message);
                continue;
            }
        };

        let intent = match command {
            ReplCommand::User(user_id) => {
                form.user_id = user_id;
                Intent::Submit(form.clone())
            }
            ReplCommand::Algo(algorithm) => {
                form.algorithm_a = algorithm;
                Intent::Submit(form.clone())
            }
            ReplCommand::AlgoB(algorithm) => {
                form.algorithm_b = Some(algorithm.clone());
                Intent::SetAlgorithmB(algorithm)
            }
            ReplCommand::Compare(enabled) => {
                form.compare = enabled;
                Intent::ToggleCompare(enabled)
            }
            ReplCommand::Search(text) => {
                form.search = text.clone();
                Intent::Search(text)
            }
            ReplCommand::Page(page) => Intent::Paginate(page),
            ReplCommand::Next => Intent::NextPage,
            ReplCommand::Prev => Intent::PrevPage,
            ReplCommand::Suggest(prefix) => {
                let suggestions = directory.suggest(&prefix).await;
                println!("{}", suggestions.join(", "));
                continue;
            }
            ReplCommand::Help => {
                print_help();
                continue;
            }
            ReplCommand::Quit => break,
        };

        if intents.send(intent).await.is_err() {
            break;
        }
    }

    drop(intents);
    let controller = driver_handle.await.context("Browse driver panicked")?;
    drop(controller);
    render_handle.await.context("Renderer panicked")?;
    Ok(())
}

fn print_json(view: &ViewModel) -> Result<()> {
    let json = serde_json::to_string_pretty(view).context("Failed to serialize view")?;
    println!("{}", json);
    Ok(())
}
