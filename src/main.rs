use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use faculty_scout::config::{find_config_file, load_config, Config};
use faculty_scout::models::{DepartmentResult, ProfessorProfile, PublicationRecord};
use faculty_scout::scrapers::{
    DepartmentScraper, ProfessorScraper, PublicationDiscovery, ScholarScraper, SemanticScholarScraper,
};
use faculty_scout::utils::HttpClient;
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Faculty Scout - Discover faculty members and their publications
#[derive(Parser, Debug)]
#[command(name = "faculty-scout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Discover faculty members and their publications", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Log format
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if std::io::stdout().is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List professor links on a faculty directory page
    #[command(alias = "dept")]
    Department {
        /// Directory page URL
        url: String,
    },

    /// Scrape a single faculty profile page
    #[command(alias = "prof")]
    Professor {
        /// Profile page URL
        url: String,
    },

    /// Find an author's papers (Semantic Scholar, then Scholar as fallback)
    #[command(alias = "p")]
    Papers {
        /// Author name ("First Last" or "Last, First")
        name: String,
    },

    /// Search Semantic Scholar only
    Semantic {
        /// Author name
        name: String,
    },

    /// Search the Scholar results page only
    Scholar {
        /// Author name
        name: String,
    },

    /// List papers on a Scholar author profile
    ScholarProfile {
        /// Profile URL
        url: String,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error".to_string()
    } else {
        match cli.verbose {
            0 => config.logging.level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("faculty_scout={}", level)),
    );

    let json = match cli.log_format {
        Some(format) => format == LogFormat::Json,
        None => config.logging.format.as_deref() == Some("json"),
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_effective_config(cli: &Cli) -> Result<Config> {
    let path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(path.as_deref())?;
    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_effective_config(&cli)?;
    init_tracing(&cli, &config);

    let client = HttpClient::from_config(&config.http)?;
    let format = cli.output.resolve();

    match &cli.command {
        Commands::Department { url } => {
            let result = DepartmentScraper::new(client).scrape(url).await?;
            output_department(&result, format)?;
        }
        Commands::Professor { url } => {
            let profile = ProfessorScraper::new(client).scrape(url).await?;
            output_profile(&profile, format)?;
        }
        Commands::Papers { name } => {
            let discovery = PublicationDiscovery::from_scrapers(
                SemanticScholarScraper::from_config(client.clone(), &config.semantic_scholar),
                ScholarScraper::from_config(client, &config.scholar),
            );
            let result = discovery.discover(name).await?;
            tracing::info!("Papers for {} came from {}", name, result.source);
            output_papers(&result.papers, format, &result)?;
        }
        Commands::Semantic { name } => {
            let result = SemanticScholarScraper::from_config(client, &config.semantic_scholar)
                .search_by_name(name)
                .await;
            output_papers(&result.papers, format, &result)?;
        }
        Commands::Scholar { name } => {
            let result = ScholarScraper::from_config(client, &config.scholar)
                .search_by_name(name)
                .await;
            output_papers(&result.papers, format, &result)?;
        }
        Commands::ScholarProfile { url } => {
            let result = ScholarScraper::from_config(client, &config.scholar)
                .get_author_profile(url)
                .await;
            output_papers(&result.papers, format, &result)?;
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn new_table(header: Vec<&str>) -> comfy_table::Table {
    let mut table = comfy_table::Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(header);
    table
}

fn output_department(result: &DepartmentResult, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(result);
    }

    use comfy_table::{Attribute, Cell};
    if let Some(name) = &result.department_name {
        println!("{}", name);
    }
    let mut table = new_table(vec!["Name", "Title", "URL"]);
    for candidate in &result.professor_links {
        table.add_row(vec![
            Cell::new(&candidate.name).add_attribute(Attribute::Bold),
            Cell::new(candidate.title.as_deref().unwrap_or_default()),
            Cell::new(&candidate.url),
        ]);
    }
    println!("{table}");
    println!("{} professor links", result.professor_links.len());
    Ok(())
}

fn output_profile(profile: &ProfessorProfile, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(profile);
    }

    let mut table = new_table(vec!["Field", "Value"]);
    let fields = [
        ("Name", profile.name.as_deref()),
        ("Title", profile.title.as_deref()),
        ("Department", profile.department.as_deref()),
        ("Email", profile.email.as_deref()),
        ("Phone", profile.phone.as_deref()),
        ("Office", profile.office.as_deref()),
        ("Image", profile.image_url.as_deref()),
        ("Website", Some(profile.website_url.as_str())),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            table.add_row(vec![label, value]);
        }
    }
    if !profile.research_areas.is_empty() {
        table.add_row(vec!["Research areas".to_string(), profile.research_areas.join(", ")]);
    }
    if let Some(summary) = &profile.research_summary {
        table.add_row(vec!["Summary".to_string(), truncate(summary, 300)]);
    }
    println!("{table}");

    if !profile.publications.is_empty() {
        output_papers(&profile.publications, OutputFormat::Table, &profile.publications)?;
    }
    if !profile.lab_members.is_empty() {
        let mut members = new_table(vec!["Lab member", "Role", "Email"]);
        for member in &profile.lab_members {
            members.add_row(vec![
                member.name.as_str(),
                member.role.as_deref().unwrap_or_default(),
                member.email.as_deref().unwrap_or_default(),
            ]);
        }
        println!("{members}");
    }
    Ok(())
}

/// Print papers as a table, or `json_value` as JSON
fn output_papers<T: Serialize>(papers: &[PublicationRecord], format: OutputFormat, json_value: &T) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(json_value);
    }

    use comfy_table::{Attribute, Cell};
    let mut table = new_table(vec!["Title", "Authors", "Year", "Cited by", "Source"]);
    for paper in papers {
        table.add_row(vec![
            Cell::new(truncate(&paper.title, 60)).add_attribute(Attribute::Bold),
            Cell::new(truncate(paper.authors.as_deref().unwrap_or_default(), 40)),
            Cell::new(paper.year.map(|y| y.to_string()).unwrap_or_default()),
            Cell::new(paper.cited_by.map(|c| c.to_string()).unwrap_or_default()),
            Cell::new(paper.source.to_string()),
        ]);
    }
    println!("{table}");
    println!("{} papers", papers.len());
    Ok(())
}
