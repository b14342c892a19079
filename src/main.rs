use anyhow::{anyhow, Result};
use clap::{App, AppSettings, Arg, SubCommand};
use folio::build::build_site;
use folio::config::{SiteConfig, SourceConfig};
use folio::datasource;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let matches = App::new("folio")
        .about("Generates a static blog from a folder of posts")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .long("config")
                .short("c")
                .takes_value(true)
                .default_value("config.json")
                .help("The site configuration file"),
        )
        .arg(
            Arg::with_name("verbose")
                .long("verbose")
                .short("v")
                .help("Logs every task"),
        )
        .subcommand(
            SubCommand::with_name("fetch-posts")
                .about("Fetches the posts from the configured data source"),
        )
        .subcommand(
            SubCommand::with_name("fetch-theme")
                .about("Fetches the theme from the configured source"),
        )
        .subcommand(SubCommand::with_name("generate").about("Generates the site"))
        .get_matches();

    init_logging(matches.is_present("verbose"));

    let config_path = PathBuf::from(matches.value_of("config").unwrap_or("config.json"));
    let config = SiteConfig::from_file(&config_path)?;

    match matches.subcommand_name() {
        Some("fetch-posts") => fetch("posts", &config.data_source, &config.temp_folder),
        Some("fetch-theme") => fetch("theme", &config.theme, &config.theme_folder),
        Some("generate") => {
            build_site(&config).map_err(|e| anyhow!("Generating the site: {}", e))
        }
        _ => Err(anyhow!("No subcommand given")),
    }
}

fn fetch(what: &str, source: &SourceConfig, to: &Path) -> Result<()> {
    let ds = datasource::new(&source.kind)
        .map_err(|e| anyhow!("Please configure where to fetch the {} from: {}", what, e))?;
    ds.fetch(&source.repository, to)
        .map_err(|e| anyhow!("Fetching the {}: {}", what, e))?;
    Ok(())
}

// `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
