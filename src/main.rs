//!
//! src/main.rs
//!
//! Main source file of unit tests for modules as well as
//! calls to all handlers etc. that define the sampler
//!

mod config;
mod errors;
mod logging;

mod fetch;
mod genres;
mod query;
mod random;
mod sampler;
mod sink;
mod types;

use clap::Parser;
use tracing::info;

use crate::errors::SamplerError;
use crate::query::SearchQueryField;

/// Command line surface. Scoped filters that are omitted stay out of
/// the query, except genre, year and offset which fall back to random
/// draws.
#[derive(Parser, Debug)]
#[command(name = "track-sampler", version, about = "Randomized catalog search sampler")]
struct Args {
    /// Free text matched against any field
    #[arg(long)]
    keyword: Option<String>,

    /// Scoped track title filter
    #[arg(long)]
    track: Option<String>,

    /// Scoped artist name filter
    #[arg(long)]
    artist: Option<String>,

    /// Scoped album title filter
    #[arg(long)]
    album: Option<String>,

    /// Scoped genre filter, drawn from the seed table when omitted
    #[arg(long)]
    genre: Option<String>,

    /// Scoped release year filter, drawn at random when omitted
    #[arg(long)]
    year: Option<String>,

    /// Scoped popularity filter
    #[arg(long)]
    popularity: Option<String>,

    /// Page size for the search call
    #[arg(long, default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..=50))]
    limit: u32,

    /// Catalog object type to search for
    #[arg(long = "type", default_value = "track",
        value_parser = ["album", "artist", "playlist", "track", "show", "episode"])]
    search_type: String,

    /// Result page offset, drawn at random when omitted
    #[arg(long)]
    offset: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<(), SamplerError> {
    let args = Args::parse();
    let cfgs = config::load_config()?;
    let _logger = logging::init_logging(&cfgs.logging)?;

    info!(
        service = "track-sampler",
        version = %env!("CARGO_PKG_VERSION"),
        "starting"
    );

    let search_type = types::SearchType::parse(&args.search_type)
        .ok_or_else(|| SamplerError::Config(
            format!("invalid search type: {}", args.search_type)
        ))?;

    let genre = match args.genre {
        Some(g) => g,
        None => {
            let at = random::random_up_to(genres::GENRES.len() as i64)?;
            genres::GENRES[at as usize].to_string()
        }
    };

    let year = match args.year {
        Some(y) => y,
        None => {
            random::random_in_range(cfgs.search.min_year, cfgs.search.max_year)?
                .to_string()
        }
    };

    let offset = match args.offset {
        Some(o) => o,
        None => random::random_up_to(cfgs.search.max_offset)? as u32
    };

    let field = SearchQueryField {
        keyword: args.keyword,
        track: args.track,
        artist: args.artist,
        album: args.album,
        genre: Some(genre),
        year: Some(year),
        popularity: args.popularity,
    };
    let query = field.to_query_string();

    info!(
        %query,
        offset,
        limit = args.limit,
        item_type = search_type.as_str(),
        "query.built"
    );

    let spotify = fetch::SpotifyClient::new(&cfgs.http, &cfgs.spotify)?;
    let sink = sink::ResultSink::new(&cfgs.search.output_dir);
    let sampler = sampler::Sampler::new(spotify, sink);

    let job = sampler::SearchJob {
        query,
        search_type,
        limit: args.limit,
        offset,
        market: cfgs.search.market.clone(),
    };
    let outcome = sampler.run(&job).await?;

    info!(
        items = outcome.items,
        json = %outcome.json_path.display(),
        csv = %outcome.csv_path.display(),
        "sampler.done"
    );

    Ok(())
}
