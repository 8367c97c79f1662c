use anyhow::Result;
use serde_json::{Value, json};

use moviepro_core::providers::RawMovieSummary;
use moviepro_model::{
    ActorDetail, Collection, CollectionChange, CollectionMembership, ImageContent, Movie,
    MovieCollection, MovieListing,
};

const DATE_FORMAT: &str = "%b %d, %Y";

/// Prints either the JSON value or the text rendering.
fn emit(
    json_mode: bool,
    value: impl FnOnce() -> Result<Value>,
    text: impl FnOnce() -> String,
) -> Result<()> {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&value()?)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}

fn image_summary(image: Option<&ImageContent>) -> Value {
    match image {
        Some(image) => json!({ "media_type": image.media_type, "bytes": image.bytes.len() }),
        None => Value::Null,
    }
}

fn listing_line(listing: &MovieListing) -> String {
    format!(
        "{}  {:<40} {:>12}  {:<9} {:.1}\n",
        listing.id,
        listing.title,
        listing.release_date.format(DATE_FORMAT),
        listing.rating.label(),
        listing.vote_average
    )
}

pub fn movie(json_mode: bool, movie: &Movie) -> Result<()> {
    emit(
        json_mode,
        || {
            Ok(json!({
                "id": movie.id,
                "tmdb_id": movie.tmdb_id,
                "title": movie.title,
                "tagline": movie.tagline,
                "overview": movie.overview,
                "runtime": movie.runtime,
                "release_date": movie.release_date,
                "vote_average": movie.vote_average,
                "rating": movie.rating,
                "trailer_url": movie.trailer_url,
                "poster": image_summary(movie.poster.as_ref()),
                "backdrop": image_summary(movie.backdrop.as_ref()),
                "cast": movie.cast,
                "crew": movie.crew,
            }))
        },
        || {
            let mut out = format!("{} ({})\n", movie.title, movie.release_date.format(DATE_FORMAT));
            if !movie.tagline.is_empty() {
                out.push_str(&format!("  \"{}\"\n", movie.tagline));
            }
            out.push_str(&format!("  id:       {}\n", movie.id));
            if let Some(tmdb_id) = movie.tmdb_id {
                out.push_str(&format!("  tmdb:     {tmdb_id}\n"));
            }
            out.push_str(&format!("  rating:   {}\n", movie.rating.label()));
            out.push_str(&format!("  score:    {:.1}\n", movie.vote_average));
            if let Some(runtime) = movie.runtime {
                out.push_str(&format!("  runtime:  {runtime} min\n"));
            }
            if let Some(trailer) = &movie.trailer_url {
                out.push_str(&format!("  trailer:  {trailer}\n"));
            }
            for (label, image) in [("poster", &movie.poster), ("backdrop", &movie.backdrop)] {
                if let Some(image) = image {
                    out.push_str(&format!(
                        "  {label:<9} {} ({} bytes)\n",
                        image.media_type,
                        image.bytes.len()
                    ));
                }
            }
            if !movie.overview.is_empty() {
                out.push_str(&format!("\n{}\n", movie.overview));
            }
            if !movie.cast.is_empty() {
                out.push_str("\nCast:\n");
                for member in &movie.cast {
                    out.push_str(&format!("  {} as {}\n", member.name, member.character));
                }
            }
            if !movie.crew.is_empty() {
                out.push_str("\nCrew:\n");
                for member in &movie.crew {
                    out.push_str(&format!("  {} ({})\n", member.name, member.job));
                }
            }
            out
        },
    )
}

pub fn listings(json_mode: bool, listings: &[MovieListing]) -> Result<()> {
    emit(
        json_mode,
        || Ok(serde_json::to_value(listings)?),
        || {
            if listings.is_empty() {
                return "No movies.\n".to_string();
            }
            listings.iter().map(listing_line).collect()
        },
    )
}

pub fn summaries(json_mode: bool, movies: &[RawMovieSummary]) -> Result<()> {
    emit(
        json_mode,
        || Ok(serde_json::to_value(movies)?),
        || {
            movies
                .iter()
                .map(|movie| {
                    format!(
                        "{:>8}  {:<40} {:<10} {:.1}\n",
                        movie.id,
                        movie.title,
                        movie.release_date.as_deref().unwrap_or("-"),
                        movie.vote_average
                    )
                })
                .collect()
        },
    )
}

pub fn actor(json_mode: bool, actor: &ActorDetail) -> Result<()> {
    emit(
        json_mode,
        || Ok(serde_json::to_value(actor)?),
        || {
            let mut out = format!("{} ({})\n", actor.name, actor.id);
            out.push_str(&format!("  born:     {}\n", actor.birthday));
            if let Some(deathday) = &actor.deathday {
                out.push_str(&format!("  died:     {deathday}\n"));
            }
            out.push_str(&format!("  from:     {}\n", actor.place_of_birth));
            out.push_str(&format!("  profile:  {}\n", actor.profile_url));
            out.push_str(&format!("\n{}\n", actor.biography));
            out
        },
    )
}

pub fn collections(json_mode: bool, collections: &[Collection]) -> Result<()> {
    emit(
        json_mode,
        || Ok(serde_json::to_value(collections)?),
        || {
            if collections.is_empty() {
                return "No collections.\n".to_string();
            }
            collections
                .iter()
                .map(|c| format!("{}  {:<30} {}\n", c.id, c.name, c.description))
                .collect()
        },
    )
}

pub fn membership(json_mode: bool, membership: &CollectionMembership) -> Result<()> {
    emit(
        json_mode,
        || Ok(serde_json::to_value(membership)?),
        || {
            let mut out = format!(
                "{} ({})\n\nIn collection:\n",
                membership.collection.name, membership.collection.id
            );
            for (position, listing) in membership.in_collection.iter().enumerate() {
                out.push_str(&format!("{:>3}. {}", position + 1, listing_line(listing)));
            }
            out.push_str("\nNot in collection:\n");
            for listing in &membership.not_in_collection {
                out.push_str(&format!("     {}", listing_line(listing)));
            }
            out
        },
    )
}

pub fn members(json_mode: bool, members: &[MovieCollection]) -> Result<()> {
    emit(
        json_mode,
        || Ok(serde_json::to_value(members)?),
        || {
            members
                .iter()
                .map(|m| format!("{:>3}. {}\n", m.order, m.movie_id))
                .collect()
        },
    )
}

/// Reports the outcome of a change to a collection the caller may not own.
pub fn change(change: CollectionChange, what: &str) {
    match change {
        CollectionChange::Applied => println!("{what}"),
        CollectionChange::Protected => {
            println!("The default collection cannot be renamed or deleted; nothing changed.")
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use moviepro_model::{MovieID, MovieRating};

    use super::*;

    #[test]
    fn listing_line_uses_the_display_label() {
        let listing = MovieListing {
            id: MovieID::new(),
            tmdb_id: Some(603),
            title: "The Matrix".into(),
            release_date: NaiveDate::from_ymd_opt(1999, 3, 30).expect("date"),
            rating: MovieRating::R,
            vote_average: 8.2,
        };
        let line = listing_line(&listing);
        assert!(line.contains("Mar 30, 1999"));
        assert!(line.contains("8.2"));
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn image_summary_omits_bytes() {
        let image = ImageContent {
            bytes: vec![1, 2, 3],
            media_type: "image/png".into(),
        };
        assert_eq!(
            image_summary(Some(&image)),
            json!({ "media_type": "image/png", "bytes": 3 })
        );
        assert_eq!(image_summary(None), Value::Null);
    }
}
