use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use moviepro_config::{Config, DefaultCollectionConfig};
use moviepro_core::database::{
    CollectionRepository, MovieRepository, PostgresCollectionRepository, PostgresDatabase,
    PostgresMovieRepository,
};
use moviepro_core::providers::{RawActorDetail, RawMovieDetail, RawMovieSummary};
use moviepro_core::{
    BinaryFetcher, CatalogProvider, CollectionService, CoreError, ImageService, ImportOutcome,
    ImportService, MappingSettings, MovieMapper, ProviderError,
};
use moviepro_model::{
    Collection, CollectionID, ImageContent, Movie, MovieCast, MovieCategory, MovieCrew, MovieID,
    MovieRating, TmdbId,
};

fn movie(title: &str, tmdb_id: Option<TmdbId>) -> Movie {
    Movie {
        id: MovieID::new(),
        tmdb_id,
        title: title.to_string(),
        tagline: "tagline".into(),
        overview: "overview".into(),
        runtime: Some(95),
        release_date: NaiveDate::from_ymd_opt(1968, 4, 2).unwrap(),
        vote_average: 8.1,
        rating: MovieRating::G,
        trailer_url: Some("https://www.youtube.com/watch?v=oR_e9y-bka0".into()),
        poster: Some(ImageContent {
            bytes: vec![1, 2, 3],
            media_type: "image/jpg".into(),
        }),
        backdrop: None,
        cast: vec![
            MovieCast {
                cast_id: 10,
                name: "Keir Dullea".into(),
                character: "Dave Bowman".into(),
                department: "Acting".into(),
                image_url: "https://image.tmdb.org/t/p/w500/keir.jpg".into(),
            },
            MovieCast {
                cast_id: 11,
                name: "Gary Lockwood".into(),
                character: "Frank Poole".into(),
                department: "Acting".into(),
                image_url: "/images/default-cast.png".into(),
            },
        ],
        crew: vec![MovieCrew {
            crew_id: 240,
            name: "Stanley Kubrick".into(),
            job: "Director".into(),
            department: "Directing".into(),
            image_url: "/images/default-cast.png".into(),
        }],
    }
}

async fn collection(repo: &PostgresCollectionRepository, name: &str) -> Collection {
    let collection = Collection {
        id: CollectionID::new(),
        name: name.into(),
        description: String::new(),
    };
    repo.create(&collection).await.expect("create collection");
    collection
}

fn repos(pool: &PgPool) -> (PostgresMovieRepository, PostgresCollectionRepository) {
    let db = PostgresDatabase::from_pool(pool.clone(), 5);
    (db.movies(), db.collections())
}

#[sqlx::test(migrator = "moviepro_core::MIGRATOR")]
async fn movie_round_trips_with_ranked_credits(pool: PgPool) {
    let (movies, collections) = repos(&pool);
    let all = collection(&collections, "All").await;
    let stored = movie("2001: A Space Odyssey", Some(62));

    movies
        .insert_movie_with_membership(&stored, all.id)
        .await
        .expect("insert");

    let loaded = movies.get(stored.id).await.expect("get").expect("present");
    assert_eq!(loaded, stored);
    assert_eq!(movies.find_by_tmdb_id(62).await.unwrap(), Some(stored.id));
    assert!(movies.exists(stored.id).await.unwrap());

    let members = collections.members(all.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].order, 1);
}

#[sqlx::test(migrator = "moviepro_core::MIGRATOR")]
async fn duplicate_tmdb_id_conflicts_and_leaves_no_rows(pool: PgPool) {
    let (movies, collections) = repos(&pool);
    let all = collection(&collections, "All").await;
    movies
        .insert_movie_with_membership(&movie("First", Some(62)), all.id)
        .await
        .unwrap();

    let duplicate = movie("Second", Some(62));
    let err = movies
        .insert_movie_with_membership(&duplicate, all.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)), "{err:?}");

    let cast_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movie_cast WHERE movie_id = $1")
        .bind(duplicate.id.to_uuid())
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(cast_rows, 0);
    assert_eq!(collections.members(all.id).await.unwrap().len(), 1);
}

#[sqlx::test(migrator = "moviepro_core::MIGRATOR")]
async fn replace_members_rewrites_order(pool: PgPool) {
    let (movies, collections) = repos(&pool);
    let all = collection(&collections, "All").await;
    let noir = collection(&collections, "Noir").await;

    let mut ids = Vec::new();
    for i in 0..10 {
        let m = movie(&format!("Movie {i}"), Some(100 + i));
        movies.insert_movie_with_membership(&m, all.id).await.unwrap();
        ids.push(m.id);
    }

    collections
        .replace_members(noir.id, &[ids[0], ids[1]])
        .await
        .unwrap();
    collections
        .replace_members(noir.id, &[ids[5], ids[2], ids[9]])
        .await
        .unwrap();

    let members = collections.members(noir.id).await.unwrap();
    assert_eq!(
        members
            .iter()
            .map(|m| (m.movie_id, m.order))
            .collect::<Vec<_>>(),
        vec![(ids[5], 1), (ids[2], 2), (ids[9], 3)]
    );

    let listings = collections.member_listings(noir.id).await.unwrap();
    assert_eq!(listings[0].title, "Movie 5");
}

#[sqlx::test(migrator = "moviepro_core::MIGRATOR")]
async fn replace_members_rejects_unknown_targets(pool: PgPool) {
    let (movies, collections) = repos(&pool);
    let all = collection(&collections, "All").await;
    let kept = movie("Kept", Some(1));
    movies.insert_movie_with_membership(&kept, all.id).await.unwrap();

    let missing_collection = collections
        .replace_members(CollectionID::new(), &[kept.id])
        .await
        .unwrap_err();
    assert!(matches!(missing_collection, CoreError::NotFound(_)));

    let missing_movie = collections
        .replace_members(all.id, &[kept.id, MovieID::new()])
        .await
        .unwrap_err();
    assert!(matches!(missing_movie, CoreError::NotFound(_)), "{missing_movie:?}");

    // The failed transaction left the previous membership intact.
    assert_eq!(collections.members(all.id).await.unwrap().len(), 1);
}

#[sqlx::test(migrator = "moviepro_core::MIGRATOR")]
async fn append_member_uses_next_position(pool: PgPool) {
    let (movies, collections) = repos(&pool);
    let all = collection(&collections, "All").await;
    let noir = collection(&collections, "Noir").await;
    let a = movie("A", Some(1));
    let b = movie("B", Some(2));
    movies.insert_movie_with_membership(&a, all.id).await.unwrap();
    movies.insert_movie_with_membership(&b, all.id).await.unwrap();

    assert_eq!(collections.append_member(noir.id, a.id).await.unwrap().order, 1);
    assert_eq!(collections.append_member(noir.id, b.id).await.unwrap().order, 2);
    assert_eq!(collections.append_member(noir.id, a.id).await.unwrap().order, 1);
    assert_eq!(collections.members(noir.id).await.unwrap().len(), 2);
}

#[sqlx::test(migrator = "moviepro_core::MIGRATOR")]
async fn collection_names_are_unique_ignoring_case(pool: PgPool) {
    let (_, collections) = repos(&pool);
    collection(&collections, "Noir").await;

    let clash = Collection {
        id: CollectionID::new(),
        name: "NOIR".into(),
        description: String::new(),
    };
    assert!(matches!(
        collections.create(&clash).await,
        Err(CoreError::Conflict(_))
    ));
    assert!(collections.find_by_name("noir").await.unwrap().is_some());
}

#[sqlx::test(migrator = "moviepro_core::MIGRATOR")]
async fn deleting_a_movie_cascades(pool: PgPool) {
    let (movies, collections) = repos(&pool);
    let all = collection(&collections, "All").await;
    let doomed = movie("Doomed", Some(13));
    movies.insert_movie_with_membership(&doomed, all.id).await.unwrap();

    assert!(movies.delete(doomed.id).await.unwrap());
    assert!(!movies.delete(doomed.id).await.unwrap());
    assert!(collections.members(all.id).await.unwrap().is_empty());

    let crew_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movie_crew")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(crew_rows, 0);
}

#[sqlx::test(migrator = "moviepro_core::MIGRATOR")]
async fn update_keeps_credits(pool: PgPool) {
    let (movies, collections) = repos(&pool);
    let all = collection(&collections, "All").await;
    let original = movie("Original", Some(5));
    movies.insert_movie_with_membership(&original, all.id).await.unwrap();

    let edited = Movie {
        title: "Edited".into(),
        rating: MovieRating::NC17,
        poster: None,
        cast: Vec::new(),
        ..original.clone()
    };
    movies.update(&edited).await.unwrap();

    let loaded = movies.get(original.id).await.unwrap().unwrap();
    assert_eq!(loaded.title, "Edited");
    assert_eq!(loaded.rating, MovieRating::NC17);
    assert!(loaded.poster.is_none());
    assert_eq!(loaded.cast, original.cast);

    let ghost = Movie {
        id: MovieID::new(),
        ..edited
    };
    assert!(matches!(movies.update(&ghost).await, Err(CoreError::NotFound(_))));
}

/// Serves one fixed catalog record.
struct FixtureCatalog;

#[async_trait]
impl CatalogProvider for FixtureCatalog {
    async fn movie_detail(&self, tmdb_id: TmdbId) -> Result<RawMovieDetail, ProviderError> {
        serde_json::from_value(serde_json::json!({
            "id": tmdb_id,
            "title": "Solaris",
            "release_date": "1972-03-20",
            "credits": {"cast": [
                {"id": 1, "cast_id": 1, "name": "Natalya Bondarchuk", "popularity": 2.0},
                {"id": 1, "cast_id": 9, "name": "Natalya Bondarchuk", "popularity": 1.0}
            ]}
        }))
        .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    async fn actor_detail(&self, _: TmdbId) -> Result<RawActorDetail, ProviderError> {
        Err(ProviderError::NotFound)
    }

    async fn search_by_category(
        &self,
        _: MovieCategory,
        _: usize,
    ) -> Result<Vec<RawMovieSummary>, ProviderError> {
        Ok(Vec::new())
    }
}

struct NoImages;

#[async_trait]
impl BinaryFetcher for NoImages {
    async fn fetch_binary(&self, url: &str) -> moviepro_core::Result<Vec<u8>> {
        Err(CoreError::NotFound(url.to_string()))
    }
}

#[sqlx::test(migrator = "moviepro_core::MIGRATOR")]
async fn concurrent_imports_of_one_id_store_one_movie(pool: PgPool) {
    let db = PostgresDatabase::from_pool(pool.clone(), 5);
    let movies: Arc<dyn MovieRepository> = Arc::new(db.movies());
    let collections = CollectionService::new(
        Arc::new(db.collections()),
        movies.clone(),
        DefaultCollectionConfig {
            name: "All".into(),
            description: "Everything".into(),
        },
    );
    let mapper = MovieMapper::new(
        MappingSettings::from_config(&Config::default()),
        ImageService::new(Arc::new(NoImages)),
    );
    let import = ImportService::new(
        Arc::new(FixtureCatalog),
        mapper,
        movies.clone(),
        collections.clone(),
        Duration::from_secs(30),
    );

    let cancel = CancellationToken::new();
    let (a, b) = tokio::join!(
        import.import_movie(593, &cancel),
        import.import_movie(593, &cancel)
    );
    let (a, b) = (a.expect("first import"), b.expect("second import"));

    assert_eq!(a.movie_id(), b.movie_id());
    assert_eq!(
        [a, b].iter().filter(|o| o.is_new()).count(),
        1,
        "exactly one import should create the movie"
    );

    let stored = movies.get(a.movie_id()).await.unwrap().unwrap();
    assert_eq!(stored.cast.len(), 1);

    let view = collections.collection_membership(None).await.unwrap();
    assert_eq!(view.in_collection.len(), 1);

    let again = import.import_movie(593, &cancel).await.unwrap();
    assert_eq!(again, ImportOutcome::Existing(a.movie_id()));
}
