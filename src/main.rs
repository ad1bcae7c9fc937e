use anyhow::{anyhow, Context, Result};
use apod::{
    apod::ApodClient,
    core::config::ApodConfig,
    eval::FETCH_FAILED,
    fetch::SearchSession,
    gallery,
    query::QueryParameters,
    search::{DatePicker, SearchFormState, SearchMode, ValidationError},
    utils::{progress::LoadingIndicator, terminal},
};
use colored::*;
use std::sync::Arc;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "apod",
    about = "Search NASA's Astronomy Picture of the Day. Without a search flag, shows today's picture."
)]
struct Opt {
    /// Picture of a single day (YYYY-MM-DD)
    #[structopt(long, conflicts_with_all = &["start-date", "end-date", "count"])]
    date: Option<String>,

    /// First day of a date range (YYYY-MM-DD)
    #[structopt(long, conflicts_with = "count")]
    start_date: Option<String>,

    /// Last day of a date range (YYYY-MM-DD)
    #[structopt(long, conflicts_with = "count")]
    end_date: Option<String>,

    /// Number of random pictures (1-100)
    #[structopt(long)]
    count: Option<String>,

    /// Print the full entry for result N instead of the gallery
    #[structopt(long)]
    show: Option<usize>,

    /// Print the records as JSON
    #[structopt(long)]
    json: bool,
}

impl Opt {
    fn mode(&self) -> Option<SearchMode> {
        if self.date.is_some() {
            Some(SearchMode::SingleDate)
        } else if self.start_date.is_some() || self.end_date.is_some() {
            Some(SearchMode::DateRange)
        } else if self.count.is_some() {
            Some(SearchMode::RandomCount)
        } else {
            None
        }
    }

    /// Query for the given flags; no search flag means today's picture.
    fn query(&self, picker: &DatePicker) -> Result<QueryParameters, ValidationError> {
        let Some(mode) = self.mode() else {
            return Ok(QueryParameters::default());
        };

        let parse = |arg: &Option<String>| arg.as_deref().map(|a| picker.parse(a)).transpose();

        let mut form = SearchFormState::with_mode(mode);
        match mode {
            SearchMode::SingleDate => form.set_date(parse(&self.date)?, picker)?,
            SearchMode::DateRange => {
                form.set_start_date(parse(&self.start_date)?, picker)?;
                form.set_end_date(parse(&self.end_date)?, picker)?;
            }
            SearchMode::RandomCount => form.set_count(self.count.as_deref())?,
        }
        form.submit()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let opt = Opt::from_args();
    log::debug!("Arguments: {:?}", opt);

    let params = opt.query(&DatePicker::today()).map_err(|e| anyhow!(e.message()))?;

    let config = ApodConfig::from_env()?;
    let client = ApodClient::new(config).context("Failed to create HTTP client")?;
    let mut session = SearchSession::new(Arc::new(client));

    let spinner = if opt.json {
        LoadingIndicator::hidden()
    } else {
        LoadingIndicator::start(&format!("Searching APOD ({})", params))
    };
    let outcome = session.search(params).await;
    spinner.finish();
    if let Err(e) = outcome {
        log::error!("APOD fetch failed: {}", e);
        eprintln!("{}", FETCH_FAILED.red());
        std::process::exit(1);
    }

    let width = terminal::text_width();
    match opt.show {
        Some(n) => {
            let found = session.results().len();
            let record = session
                .select(n.saturating_sub(1))
                .ok_or_else(|| anyhow!("No result number {} ({} found)", n, found))?;
            if opt.json {
                println!("{}", serde_json::to_string_pretty(record)?);
            } else {
                println!("{}", gallery::render_detail(record, width));
            }
        }
        None if opt.json => println!("{}", serde_json::to_string_pretty(session.results())?),
        None => println!("{}", gallery::render_gallery(session.results(), width)),
    }

    Ok(())
}
