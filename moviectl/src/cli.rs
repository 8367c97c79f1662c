use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use moviepro_model::{CollectionID, MovieCategory, MovieID, MovieRating, TmdbId};

#[derive(Debug, Parser)]
#[command(
    name = "moviectl",
    version,
    about = "Import movies from TMDB and curate the MoviePro library"
)]
pub struct Cli {
    /// Path to a moviepro.toml (defaults to ./moviepro.toml when present)
    #[arg(long, global = true, env = "MOVIEPRO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Alternate .env file to load before reading the environment
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply database migrations
    Migrate,
    /// Import one or more movies by TMDB id into the default collection
    Import {
        #[arg(required = true, value_name = "TMDB_ID")]
        ids: Vec<TmdbId>,
    },
    /// Show a movie from the local library
    Show { id: MovieID },
    /// Preview a TMDB movie without importing it
    Preview { tmdb_id: TmdbId },
    /// List every movie in the library
    Library,
    /// Browse a TMDB list (now-playing, popular, top-rated, upcoming)
    Browse {
        category: MovieCategory,
        #[arg(long, default_value_t = 16)]
        count: usize,
    },
    /// Show a TMDB person
    Actor { person_id: TmdbId },
    /// Add a movie by hand
    Add {
        #[command(flatten)]
        fields: MovieFields,
        /// Collection to add the movie to (defaults to the default collection)
        #[arg(long)]
        collection: Option<CollectionID>,
    },
    /// Edit a movie; omitted flags keep their current value
    Edit {
        id: MovieID,
        #[command(flatten)]
        fields: EditFields,
    },
    /// Delete a movie with its credits and memberships
    Delete { id: MovieID },
    /// Manage collections
    Collection {
        #[command(subcommand)]
        action: CollectionAction,
    },
}

#[derive(Debug, Args)]
pub struct MovieFields {
    #[arg(long)]
    pub title: String,
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub release_date: NaiveDate,
    #[arg(long)]
    pub tmdb_id: Option<TmdbId>,
    #[arg(long, default_value = "")]
    pub tagline: String,
    #[arg(long, default_value = "")]
    pub overview: String,
    /// Runtime in minutes
    #[arg(long)]
    pub runtime: Option<u32>,
    #[arg(long, default_value_t = 0.0)]
    pub vote_average: f32,
    /// G, PG, PG-13, R, NC-17 or NR
    #[arg(long, value_parser = parse_rating, default_value = "NR")]
    pub rating: MovieRating,
    #[arg(long)]
    pub trailer: Option<String>,
    #[arg(long)]
    pub poster: Option<PathBuf>,
    #[arg(long)]
    pub backdrop: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct EditFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub release_date: Option<NaiveDate>,
    #[arg(long)]
    pub tagline: Option<String>,
    #[arg(long)]
    pub overview: Option<String>,
    #[arg(long)]
    pub runtime: Option<u32>,
    #[arg(long)]
    pub vote_average: Option<f32>,
    #[arg(long, value_parser = parse_rating)]
    pub rating: Option<MovieRating>,
    #[arg(long)]
    pub trailer: Option<String>,
    #[arg(long)]
    pub poster: Option<PathBuf>,
    #[arg(long)]
    pub backdrop: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum CollectionAction {
    /// List user collections
    List,
    /// Create a collection
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Rename a collection or change its description
    Rename {
        id: CollectionID,
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a collection (movies stay in the library)
    Delete { id: CollectionID },
    /// Show members in order and the movies outside the collection
    Members { id: Option<CollectionID> },
    /// Replace the members with the given movies, in order
    Set {
        id: CollectionID,
        #[arg(value_name = "MOVIE_ID")]
        movies: Vec<MovieID>,
    },
    /// Append a movie to the end of a collection
    Attach { id: CollectionID, movie: MovieID },
}

/// Accepts the display form (`PG-13`) as well as the stored one (`PG13`).
fn parse_rating(value: &str) -> Result<MovieRating, String> {
    value
        .replace('-', "")
        .parse()
        .map_err(|_| format!("unknown rating {value:?}"))
}
