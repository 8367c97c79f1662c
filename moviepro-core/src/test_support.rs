use chrono::NaiveDate;

use moviepro_model::{Movie, MovieCast, MovieID, MovieRating, TmdbId};

pub(crate) fn sample_movie(title: &str, tmdb_id: Option<TmdbId>) -> Movie {
    Movie {
        id: MovieID::new(),
        tmdb_id,
        title: title.to_string(),
        tagline: String::new(),
        overview: format!("{title} overview"),
        runtime: Some(120),
        release_date: NaiveDate::from_ymd_opt(2001, 1, 1).expect("valid date"),
        vote_average: 7.0,
        rating: MovieRating::PG13,
        trailer_url: None,
        poster: None,
        backdrop: None,
        cast: vec![MovieCast {
            cast_id: 1,
            name: "Lead".into(),
            character: "Hero".into(),
            department: "Acting".into(),
            image_url: "/images/default-cast.png".into(),
        }],
        crew: Vec::new(),
    }
}
