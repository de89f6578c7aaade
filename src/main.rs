//! Search front-end shell CLI.
//!
//! Drives the route outlet and the search input headlessly, printing JSON.
//!
//! # Architecture Overview
//!
//! ```text
//!   config.toml ──▶ config ──▶ FeatureFlags (ArcSwap, hot reload via watch)
//!                     │
//!                     ▼
//!   resolve <path> ──▶ routing::RouteOutlet ──▶ Router ──▶ RouteTable
//!                            │                     └──▶ LazyCache
//!                            └──▶ History (replace / hard reload)
//!
//!   submit <query> ──▶ search::SearchInputController ──▶ NavigationDispatcher
//!                            │                                  │
//!                            └──▶ QueryStateStore               ▼
//!                                                     History (push /search?...)
//!
//!   suggest <query> ──▶ search::SuggestionSource ──▶ context fetcher
//! ```

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

use search_shell::config::{self, watcher, ConfigFeatureFlags, FeatureFlags, FrontendConfig};
use search_shell::history::History;
use search_shell::observability::logging::init_logging;
use search_shell::routing::app::{app_routes, BundledModules, COMMUNITY_SEARCH_CONTEXTS};
use search_shell::routing::{Mounted, RequestContext, RouteOutlet, Router};
use search_shell::search::navigation::{self, NavigationSink};
use search_shell::search::{
    InMemoryQueryStore, InputEnvironment, PatternType, SearchContextDescriptor,
    SearchInputController, SearchInputOptions, StaticEnvironment, StaticSearchContexts,
    SubmissionSource, SubmitOverrides, SuggestionDeps, SuggestionSource, UserNamespaces,
};
use search_shell::session::{AuthenticatedUser, PlatformContext};

#[derive(Parser)]
#[command(name = "search-shell")]
#[command(about = "Headless search front-end shell", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resolve as this signed-in user
    #[arg(short, long)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve paths through the route table and print what gets mounted
    Resolve {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Submit a query from the search page and print the resulting navigation
    Submit {
        query: String,
        /// Selected search context
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        pattern_type: Option<PatternType>,
        #[arg(long)]
        case_sensitive: bool,
    },
    /// Print completions for a partially typed query
    Suggest {
        query: String,
        /// Cursor position in bytes; defaults to the end of the query
        #[arg(long)]
        position: Option<usize>,
    },
    /// Watch the configuration file and log feature flag changes until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => FrontendConfig::default(),
    };
    init_logging(&config.observability)?;

    tracing::debug!(
        sourcegraph_url = %config.site.sourcegraph_url,
        dot_com = config.site.is_sourcegraph_dot_com,
        "Configuration loaded"
    );

    let user = cli.user.as_deref().map(|name| Arc::new(AuthenticatedUser::new(name, name)));
    let flags = Arc::new(ConfigFeatureFlags::new(config.experimental_features.clone()));

    let output = match cli.command {
        Commands::Resolve { paths } => resolve(&config, &flags, user, &paths).await?,
        Commands::Submit {
            query,
            context,
            pattern_type,
            case_sensitive,
        } => {
            let mut overrides = SubmitOverrides::default();
            if let Some(pattern_type) = pattern_type {
                overrides = overrides.pattern_type(pattern_type);
            }
            if case_sensitive {
                overrides = overrides.case_sensitive(true);
            }
            submit(&config, &flags, query, context, overrides)
        }
        Commands::Suggest { query, position } => {
            let position = position.unwrap_or(query.len());
            suggest(&config, user, &query, position).await
        }
        Commands::Watch => {
            let Some(path) = cli.config else {
                return Err("watch requires --config".into());
            };
            watch(path, flags).await?;
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn resolve(
    config: &FrontendConfig,
    flags: &ConfigFeatureFlags,
    user: Option<Arc<AuthenticatedUser>>,
    paths: &[String],
) -> Result<Value, Box<dyn std::error::Error>> {
    let table = app_routes(&config.site, Arc::new(BundledModules))?;
    let history = Arc::new(History::new());
    let outlet = RouteOutlet::new(Arc::new(Router::new(table)), history.clone());
    let ctx = RequestContext::new(Arc::new(config.site.clone()), flags.snapshot()).with_user(user);

    let mut results = Vec::with_capacity(paths.len());
    for path in paths {
        let mounted = outlet.navigate_and_load(path, &ctx).await;
        let kind = match &mounted {
            Mounted::Page(_) => "page",
            Mounted::Loading { .. } => "loading",
            Mounted::LoadError { .. } => "loadError",
            Mounted::NotFound(_) => "notFound",
            Mounted::Reloading => "reloading",
        };
        results.push(json!({
            "path": path,
            "mounted": kind,
            "page": mounted.descriptor(),
        }));
    }

    Ok(json!({ "results": results, "history": history.entries() }))
}

fn submit(
    config: &FrontendConfig,
    flags: &ConfigFeatureFlags,
    query: String,
    context: Option<String>,
    overrides: SubmitOverrides,
) -> Value {
    let (dispatcher, mut receiver) = navigation::channel();
    let environment =
        InputEnvironment::evaluate(&StaticEnvironment::desktop(config.site.clone()), flags);

    let mut controller = SearchInputController::new(SearchInputOptions {
        store: Arc::new(InMemoryQueryStore::from_defaults(&config.search)),
        dispatcher,
        environment,
        source: SubmissionSource::Home,
        search_contexts_enabled: true,
        selected_search_context_spec: context,
        auto_focus: true,
    });
    controller.set_query(query);
    controller.submit(overrides);

    let history = History::new();
    if let Some(params) = receiver.try_next() {
        history.submit_search(&params);
    }

    json!({
        "submitted": history.last().is_some(),
        "widget": controller.input_widget(),
        "history": history.entries(),
    })
}

async fn suggest(
    config: &FrontendConfig,
    user: Option<Arc<AuthenticatedUser>>,
    query: &str,
    position: usize,
) -> Value {
    let mut contexts = vec![SearchContextDescriptor {
        spec: "global".to_string(),
        description: "All repositories on the instance".to_string(),
        namespace: None,
        auto_defined: true,
    }];
    if let Some(user) = &user {
        contexts.push(SearchContextDescriptor {
            spec: format!("@{}", user.username),
            description: "Your repositories".to_string(),
            namespace: Some(user.id.clone()),
            auto_defined: true,
        });
    }
    if config.site.is_sourcegraph_dot_com {
        contexts.extend(COMMUNITY_SEARCH_CONTEXTS.iter().map(|&(_, spec)| {
            SearchContextDescriptor {
                spec: spec.to_string(),
                description: String::new(),
                namespace: None,
                auto_defined: false,
            }
        }));
    }

    let source = SuggestionSource::new(SuggestionDeps {
        platform_context: Arc::new(PlatformContext::new(config.site.sourcegraph_url.clone())),
        authenticated_user: user,
        fetch_search_contexts: Arc::new(StaticSearchContexts::new(contexts)),
        get_user_namespaces: Arc::new(UserNamespaces),
    });

    json!(source.suggest(query, position).await)
}

async fn watch(path: PathBuf, flags: Arc<ConfigFeatureFlags>) -> Result<(), notify::Error> {
    let (config_watcher, updates) = watcher::ConfigWatcher::new(&path);
    let _handle = config_watcher.run()?;

    tokio::select! {
        _ = watcher::apply_updates(updates, flags) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, stopping config watcher");
        }
    }
    Ok(())
}
