use crate::{
    config::{self, PlannerConfig},
    export::{self, PdfExporter},
    types::{
        Accommodation, Budget, BudgetBreakdown, Companions, CostCategory, CostQuery, Currency,
        Dining, Interest, Month, Pace, Transportation, TripPreferences,
    },
    PlannerSession, TripPlanner,
};
use anyhow::{anyhow, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn connection_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .global(true)
                .help("API key (or set GROQ_API_KEY / TRIP_PLANNER_API_KEY)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .global(true)
                .help("Chat completion base URL (or set TRIP_PLANNER_BASE_URL)"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .global(true)
                .help("Model identifier (or set TRIP_PLANNER_MODEL)"),
        )
        .arg(
            Arg::new("temperature")
                .long("temperature")
                .value_name("VALUE")
                .global(true)
                .value_parser(|raw: &str| config::parse_temperature(raw))
                .help("Sampling temperature between 0 and 2"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .global(true)
                .value_parser(|raw: &str| config::parse_timeout(raw))
                .help("Request timeout in seconds (no timeout by default)"),
        )
}

fn trip_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("destination")
                .help("City or location to visit")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("days")
                .short('d')
                .long("days")
                .value_name("COUNT")
                .value_parser(clap::value_parser!(u32))
                .default_value("3")
                .help("Number of days"),
        )
        .arg(
            Arg::new("budget")
                .short('b')
                .long("budget")
                .value_name("AMOUNT")
                .value_parser(clap::value_parser!(f64))
                .help("Total budget"),
        )
        .arg(
            Arg::new("month")
                .long("month")
                .value_name("MONTH")
                .value_parser(|raw: &str| raw.parse::<Month>())
                .default_value("January")
                .help("Month of travel"),
        )
        .arg(
            Arg::new("currency")
                .long("currency")
                .value_name("CODE:SYMBOL")
                .value_parser(parse_currency)
                .help("Currency for all amounts, e.g. USD:$ (default INR:₹)"),
        )
}

fn plan_command() -> Command {
    trip_args(Command::new("plan").about("Generate a day-by-day itinerary"))
        .arg(
            Arg::new("budget-accommodation")
                .long("budget-accommodation")
                .value_name("AMOUNT")
                .value_parser(clap::value_parser!(f64))
                .help("Accommodation share of the budget (enables the per-category breakdown)"),
        )
        .arg(
            Arg::new("budget-activities")
                .long("budget-activities")
                .value_name("AMOUNT")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("budget-dining")
                .long("budget-dining")
                .value_name("AMOUNT")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("budget-transportation")
                .long("budget-transportation")
                .value_name("AMOUNT")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("interest")
                .short('i')
                .long("interest")
                .value_name("INTEREST[=1-5]")
                .action(ArgAction::Append)
                .value_parser(parse_interest)
                .help("Interest with optional importance, repeatable (e.g. food=5)"),
        )
        .arg(
            Arg::new("companions")
                .long("companions")
                .value_parser(|raw: &str| raw.parse::<Companions>())
                .default_value("Solo"),
        )
        .arg(
            Arg::new("child-ages")
                .long("child-ages")
                .value_name("AGES")
                .help("Comma-separated ages of children (family trips)"),
        )
        .arg(
            Arg::new("accommodation")
                .long("accommodation")
                .value_parser(|raw: &str| raw.parse::<Accommodation>())
                .default_value("Hotel"),
        )
        .arg(
            Arg::new("transportation")
                .long("transportation")
                .value_parser(|raw: &str| raw.parse::<Transportation>())
                .default_value("Public transit"),
        )
        .arg(
            Arg::new("dining")
                .long("dining")
                .value_parser(|raw: &str| raw.parse::<Dining>())
                .default_value("Street food"),
        )
        .arg(
            Arg::new("pace")
                .long("pace")
                .value_parser(|raw: &str| raw.parse::<Pace>())
                .default_value("Moderate"),
        )
        .arg(Arg::new("special-requests").long("special-requests").value_name("TEXT"))
        .arg(Arg::new("dietary").long("dietary").value_name("TEXT"))
        .arg(Arg::new("accessibility").long("accessibility").value_name("TEXT"))
        .arg(Arg::new("nationality").long("nationality").value_name("TEXT"))
        .arg(
            Arg::new("show-prompt")
                .long("show-prompt")
                .action(ArgAction::SetTrue)
                .help("Print the generated prompt and exit without calling the API"),
        )
        .arg(
            Arg::new("markdown-out")
                .long("markdown-out")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("html-out")
                .long("html-out")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("pdf-out")
                .long("pdf-out")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Write a PDF (requires wkhtmltopdf)"),
        )
}

fn costs_command() -> Command {
    trip_args(Command::new("costs").about("Ask the model for price ranges of each option"))
}

/// Full command definition; exposed so argument parsing can be tested.
pub fn command() -> Command {
    connection_args(
        Command::new("trip-planner")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Generate personalised travel itineraries with an LLM")
            .subcommand_required(true)
            .arg_required_else_help(true),
    )
    .subcommand(plan_command())
    .subcommand(costs_command())
}

fn parse_interest(raw: &str) -> Result<(Interest, Option<u8>), String> {
    let (name, rating) = match raw.split_once('=') {
        Some((name, rating)) => {
            let rating: u8 = rating
                .trim()
                .parse()
                .map_err(|_| format!("invalid importance `{}`", rating))?;
            (name, Some(rating))
        }
        None => (raw, None),
    };
    let interest = name.parse::<Interest>().map_err(|err| err.to_string())?;
    Ok((interest, rating))
}

fn parse_currency(raw: &str) -> Result<Currency, String> {
    match raw.split_once(':') {
        Some((code, symbol)) if !code.trim().is_empty() => {
            Ok(Currency::new(code.trim().to_uppercase(), symbol.trim()))
        }
        _ => Err(format!("expected CODE:SYMBOL, got `{}`", raw)),
    }
}

fn resolve_config(matches: &ArgMatches) -> anyhow::Result<PlannerConfig> {
    let cli_key = matches.get_one::<String>("api-key");
    let mut config = PlannerConfig::from_lookup(|name| match cli_key {
        Some(key) if config::API_KEY_VARS.contains(&name) => Some(key.clone()),
        _ => std::env::var(name).ok(),
    })?;

    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config.base_url = base_url.clone();
    }
    if let Some(model) = matches.get_one::<String>("model") {
        config.model = model.clone();
    }
    if let Some(temperature) = matches.get_one::<f64>("temperature") {
        config.temperature = *temperature;
    }
    if let Some(timeout) = matches.get_one::<std::time::Duration>("timeout") {
        config.timeout = Some(*timeout);
    }
    Ok(config)
}

fn budget_from(matches: &ArgMatches) -> Option<Budget> {
    let category = |name: &str| matches.get_one::<f64>(name).copied();
    let parts = [
        category("budget-accommodation"),
        category("budget-activities"),
        category("budget-dining"),
        category("budget-transportation"),
    ];

    if parts.iter().any(Option::is_some) {
        return Some(Budget::Breakdown(BudgetBreakdown {
            accommodation: parts[0].unwrap_or(0.0),
            activities: parts[1].unwrap_or(0.0),
            dining: parts[2].unwrap_or(0.0),
            transportation: parts[3].unwrap_or(0.0),
        }));
    }

    matches.get_one::<f64>("budget").copied().map(Budget::Total)
}

/// Build a preference record from `plan` arguments.
pub fn preferences_from(matches: &ArgMatches) -> crate::Result<TripPreferences> {
    let text = |name: &str| matches.get_one::<String>(name).cloned().unwrap_or_default();

    let mut builder = TripPreferences::builder(text("destination"))
        .num_days(matches.get_one::<u32>("days").copied().unwrap_or(1))
        .budget(budget_from(matches).unwrap_or(Budget::Total(0.0)));

    if let Some(month) = matches.get_one::<Month>("month") {
        builder = builder.travel_month(*month);
    }
    if let Some(currency) = matches.get_one::<Currency>("currency") {
        builder = builder.currency(currency.clone());
    }
    if let Some(companions) = matches.get_one::<Companions>("companions") {
        builder = builder.companions(*companions);
    }
    if let Some(accommodation) = matches.get_one::<Accommodation>("accommodation") {
        builder = builder.accommodation(*accommodation);
    }
    if let Some(transportation) = matches.get_one::<Transportation>("transportation") {
        builder = builder.transportation(*transportation);
    }
    if let Some(dining) = matches.get_one::<Dining>("dining") {
        builder = builder.dining(*dining);
    }
    if let Some(pace) = matches.get_one::<Pace>("pace") {
        builder = builder.pace(*pace);
    }
    if let Some(interests) = matches.get_many::<(Interest, Option<u8>)>("interest") {
        for (interest, rating) in interests {
            builder = match rating {
                Some(rating) => builder.rated_interest(*interest, *rating),
                None => builder.interest(*interest),
            };
        }
    }

    builder
        .child_ages(text("child-ages"))
        .special_requests(text("special-requests"))
        .dietary_restrictions(text("dietary"))
        .accessibility_needs(text("accessibility"))
        .nationality(text("nationality"))
        .build()
}

fn cost_query_from(matches: &ArgMatches) -> anyhow::Result<CostQuery> {
    let destination = matches
        .get_one::<String>("destination")
        .cloned()
        .unwrap_or_default();
    let budget = matches
        .get_one::<f64>("budget")
        .copied()
        .ok_or_else(|| anyhow!("--budget is required for cost estimates"))?;
    let mut query = CostQuery::new(
        destination,
        matches.get_one::<u32>("days").copied().unwrap_or(1),
        matches.get_one::<Month>("month").copied().unwrap_or(Month::January),
        budget,
    );
    if let Some(currency) = matches.get_one::<Currency>("currency") {
        query = query.with_currency(currency.clone());
    }
    query.validate()?;
    Ok(query)
}

async fn run_plan(matches: &ArgMatches) -> anyhow::Result<()> {
    let prefs = match preferences_from(matches) {
        Ok(prefs) => prefs,
        Err(err) => {
            error!("{}", err);
            return Err(err.into());
        }
    };

    if matches.get_flag("show-prompt") {
        let planner = TripPlanner::new("");
        println!("{}", planner.prompt_for(&prefs));
        return Ok(());
    }

    let config = resolve_config(matches)?;
    info!(model = %config.model, base_url = %config.base_url, "using completion endpoint");
    let planner = TripPlanner::from_config(&config);

    let itinerary = match planner.plan(&prefs).await {
        Ok(itinerary) => itinerary,
        Err(err) => {
            error!("Itinerary generation failed: {}", err);
            return Err(err.into());
        }
    };

    println!("\n{}\n", itinerary.title());
    if !itinerary.preamble().is_empty() {
        println!("{}\n", itinerary.preamble());
    }
    for day in itinerary.days() {
        println!("{}\n{}\n", day.heading(), day.body);
    }

    if let Some(path) = matches.get_one::<PathBuf>("markdown-out") {
        export::write_markdown(path, &itinerary)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    let html_out = matches.get_one::<PathBuf>("html-out");
    let pdf_out = matches.get_one::<PathBuf>("pdf-out");
    if html_out.is_some() || pdf_out.is_some() {
        let exporter = PdfExporter::new()?;
        if let Some(path) = html_out {
            exporter
                .write_html(path, &itinerary)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        if let Some(path) = pdf_out {
            exporter
                .write_pdf(path, &itinerary)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
        }
    }

    Ok(())
}

async fn run_costs(matches: &ArgMatches) -> anyhow::Result<()> {
    let query = cost_query_from(matches)?;
    let config = resolve_config(matches)?;
    let planner = TripPlanner::from_config(&config);
    let mut session = PlannerSession::new();

    let lookup = planner.estimate_costs(&mut session, &query).await;
    if let Some(failure) = &lookup.failure {
        eprintln!("Could not get cost estimates ({}); showing default options.", failure);
    }

    for category in CostCategory::ALL {
        println!("\n{}:", category.key());
        for option in lookup.options(category) {
            println!("  - {}", option);
        }
    }

    Ok(())
}

/// CLI entry point for the trip-planner tool
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();

    match matches.subcommand() {
        Some(("plan", sub)) => run_plan(sub).await,
        Some(("costs", sub)) => run_costs(sub).await,
        _ => unreachable!("clap requires a subcommand"),
    }
}
