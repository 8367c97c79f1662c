mod app;
mod cli;
mod output;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use moviepro_config::{Config, ConfigLoader};
use moviepro_model::{CollectionUpdate, MovieUpdate, NewCollection, NewMovieInput, TmdbId};

use app::{Local, Remote};
use cli::{Cli, CollectionAction, Command, EditFields, MovieFields};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moviectl=info,moviepro_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let json = cli.json;

    match cli.command {
        Command::Migrate => {
            Local::connect(&config).await?;
            println!("Migrations applied.");
        }
        Command::Import { ids } => import(&config, &ids).await?,
        Command::Show { id } => {
            let local = Local::connect(&config).await?;
            let movie = local
                .library_service(app::image_service(&config)?)
                .movie_details(id)
                .await?;
            output::movie(json, &movie)?;
        }
        Command::Preview { tmdb_id } => {
            let movie = Remote::connect(&config)?
                .catalog_service()
                .remote_movie_details(tmdb_id)
                .await?;
            output::movie(json, &movie)?;
        }
        Command::Library => {
            let local = Local::connect(&config).await?;
            let listings = local
                .library_service(app::image_service(&config)?)
                .library()
                .await?;
            output::listings(json, &listings)?;
        }
        Command::Browse { category, count } => {
            let movies = Remote::connect(&config)?
                .catalog_service()
                .browse(category, count)
                .await?;
            output::summaries(json, &movies)?;
        }
        Command::Actor { person_id } => {
            let actor = Remote::connect(&config)?
                .catalog_service()
                .actor_details(person_id)
                .await?;
            output::actor(json, &actor)?;
        }
        Command::Add { fields, collection } => add(&config, fields, collection).await?,
        Command::Edit { id, fields } => edit(&config, id, fields).await?,
        Command::Delete { id } => {
            let local = Local::connect(&config).await?;
            local
                .library_service(app::image_service(&config)?)
                .delete_movie(id)
                .await?;
            println!("Deleted movie {id}.");
        }
        Command::Collection { action } => collection(&config, json, action).await?,
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = &cli.env_file {
        loader = loader.with_env_file(path);
    }
    let load = loader.load().context("failed to load configuration")?;
    Ok(load.config)
}

/// Imports each id in turn. Ctrl-C cancels the import in flight and skips
/// the rest.
async fn import(config: &Config, ids: &[TmdbId]) -> Result<()> {
    let remote = Remote::connect(config)?;
    let local = Local::connect(config).await?;
    let importer = app::import_service(config, &remote, &local);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; cancelling import");
            on_signal.cancel();
        }
    });

    let mut failed = 0usize;
    for &tmdb_id in ids {
        if cancel.is_cancelled() {
            failed += 1;
            println!("{tmdb_id}: skipped");
            continue;
        }
        match importer.import_movie(tmdb_id, &cancel).await {
            Ok(outcome) if outcome.is_new() => {
                println!("{tmdb_id}: imported as {}", outcome.movie_id())
            }
            Ok(outcome) => println!("{tmdb_id}: already in library as {}", outcome.movie_id()),
            Err(err) => {
                failed += 1;
                let hint = if err.is_retryable() { " (retry later)" } else { "" };
                println!("{tmdb_id}: failed: {err}{hint}");
            }
        }
    }

    info!(requested = ids.len(), failed, "Import finished");
    if failed > 0 {
        bail!("{failed} of {} imports did not complete", ids.len());
    }
    Ok(())
}

async fn add(
    config: &Config,
    fields: MovieFields,
    collection: Option<moviepro_model::CollectionID>,
) -> Result<()> {
    let local = Local::connect(config).await?;
    let images = app::image_service(config)?;
    let collection_id = match collection {
        Some(id) => local.collections.get_collection(id).await?.id,
        None => local.collections.ensure_default_collection().await?.id,
    };

    let input = NewMovieInput {
        tmdb_id: fields.tmdb_id,
        title: fields.title,
        tagline: fields.tagline,
        overview: fields.overview,
        runtime: fields.runtime,
        release_date: fields.release_date,
        vote_average: fields.vote_average,
        rating: fields.rating,
        trailer_url: fields.trailer,
        poster: app::read_upload(&images, fields.poster.as_deref()).await?,
        backdrop: app::read_upload(&images, fields.backdrop.as_deref()).await?,
    };

    let id = local
        .library_service(images)
        .create_movie(input, collection_id)
        .await?;
    println!("Created movie {id}.");
    Ok(())
}

async fn edit(config: &Config, id: moviepro_model::MovieID, fields: EditFields) -> Result<()> {
    let local = Local::connect(config).await?;
    let images = app::image_service(config)?;
    let poster = app::read_upload(&images, fields.poster.as_deref()).await?;
    let backdrop = app::read_upload(&images, fields.backdrop.as_deref()).await?;
    let library = local.library_service(images);
    let current = library.movie_details(id).await?;

    let update = MovieUpdate {
        tmdb_id: current.tmdb_id,
        title: fields.title.unwrap_or(current.title),
        tagline: fields.tagline.unwrap_or(current.tagline),
        overview: fields.overview.unwrap_or(current.overview),
        runtime: fields.runtime.or(current.runtime),
        release_date: fields.release_date.unwrap_or(current.release_date),
        vote_average: fields.vote_average.unwrap_or(current.vote_average),
        rating: fields.rating.unwrap_or(current.rating),
        trailer_url: fields.trailer.or(current.trailer_url),
        poster,
        backdrop,
    };

    let movie = library.update_movie(id, update).await?;
    println!("Updated movie {} ({}).", movie.id, movie.title);
    Ok(())
}

async fn collection(config: &Config, json: bool, action: CollectionAction) -> Result<()> {
    let local = Local::connect(config).await?;
    let service = &local.collections;

    match action {
        CollectionAction::List => {
            let collections = service.list_collections().await?;
            output::collections(json, &collections)?;
        }
        CollectionAction::Create { name, description } => {
            let created = service
                .create_collection(NewCollection { name, description })
                .await?;
            println!("Created collection {} ({}).", created.name, created.id);
        }
        CollectionAction::Rename {
            id,
            name,
            description,
        } => {
            let change = service
                .update_collection(id, CollectionUpdate { name, description })
                .await?;
            output::change(change, "Collection updated.");
        }
        CollectionAction::Delete { id } => {
            let change = service.delete_collection(id).await?;
            output::change(change, "Collection deleted.");
        }
        CollectionAction::Members { id } => {
            let membership = service.collection_membership(id).await?;
            output::membership(json, &membership)?;
        }
        CollectionAction::Set { id, movies } => {
            let members = service.set_membership(id, &movies).await?;
            output::members(json, &members)?;
        }
        CollectionAction::Attach { id, movie } => {
            let member = service.attach_to_collection(movie, id).await?;
            output::members(json, std::slice::from_ref(&member))?;
        }
    }

    Ok(())
}
