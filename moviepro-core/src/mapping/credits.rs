use std::cmp::Ordering;
use std::collections::HashSet;

use moviepro_model::{MAX_CREDITS, MovieCast, MovieCrew};

use crate::image::build_image_url;
use crate::providers::{RawCast, RawCrew};

use super::MappingSettings;

/// Profile picture URL, or the configured placeholder when the catalog has
/// none.
pub fn cast_image_url(settings: &MappingSettings, profile_path: Option<&str>) -> String {
    match profile_path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(path) => build_image_url(&settings.image_base, &settings.poster_size, path),
        None => settings.default_cast_image.clone(),
    }
}

fn by_popularity_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Highest-popularity credit per person, at most [`MAX_CREDITS`].
///
/// A credit is skipped when either its credit slot or its person was
/// already taken by a more popular entry.
pub fn select_cast(settings: &MappingSettings, cast: &[RawCast]) -> Vec<MovieCast> {
    let mut ranked: Vec<&RawCast> = cast.iter().collect();
    ranked.sort_by(|a, b| by_popularity_desc(a.popularity, b.popularity));

    let mut slots = HashSet::new();
    let mut people = HashSet::new();
    ranked
        .into_iter()
        .filter(|credit| {
            let fresh_slot = slots.insert(credit.cast_id);
            let fresh_person = people.insert(credit.id);
            fresh_slot && fresh_person
        })
        .take(MAX_CREDITS)
        .map(|credit| MovieCast {
            cast_id: credit.id,
            name: credit.name.clone(),
            character: credit.character.clone().unwrap_or_default(),
            department: credit.known_for_department.clone().unwrap_or_default(),
            image_url: cast_image_url(settings, credit.profile_path.as_deref()),
        })
        .collect()
}

pub fn select_crew(settings: &MappingSettings, crew: &[RawCrew]) -> Vec<MovieCrew> {
    let mut ranked: Vec<&RawCrew> = crew.iter().collect();
    ranked.sort_by(|a, b| by_popularity_desc(a.popularity, b.popularity));

    let mut people = HashSet::new();
    ranked
        .into_iter()
        .filter(|credit| people.insert(credit.id))
        .take(MAX_CREDITS)
        .map(|credit| MovieCrew {
            crew_id: credit.id,
            name: credit.name.clone(),
            job: credit.job.clone(),
            department: credit.department.clone(),
            image_url: cast_image_url(settings, credit.profile_path.as_deref()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> MappingSettings {
        MappingSettings {
            image_base: "https://img".into(),
            youtube_base: "https://yt/".into(),
            poster_size: "w500".into(),
            backdrop_size: "original".into(),
            default_cast_image: "/images/default-cast.png".into(),
        }
    }

    fn cast(id: u64, cast_id: u64, popularity: f64) -> RawCast {
        RawCast {
            id,
            cast_id,
            name: format!("person {id}"),
            character: Some(format!("role {cast_id}")),
            popularity,
            ..RawCast::default()
        }
    }

    fn crew(id: u64, job: &str, popularity: f64) -> RawCrew {
        RawCrew {
            id,
            name: format!("person {id}"),
            job: job.into(),
            department: "Crew".into(),
            popularity,
            ..RawCrew::default()
        }
    }

    #[test]
    fn cast_is_capped_and_unique() {
        let raw: Vec<RawCast> = (0..60)
            .map(|i| cast(i % 30, i, (i % 7) as f64))
            .collect();
        let selected = select_cast(&settings(), &raw);

        assert_eq!(selected.len(), MAX_CREDITS);
        let unique: HashSet<_> = selected.iter().map(|c| c.cast_id).collect();
        assert_eq!(unique.len(), selected.len());
    }

    #[test]
    fn most_popular_credit_represents_a_person() {
        let raw = vec![cast(7, 1, 2.5), cast(8, 2, 4.0), cast(7, 3, 9.0)];
        let selected = select_cast(&settings(), &raw);

        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].cast_id, 7);
        assert_eq!(selected[0].character, "role 3");
        assert_eq!(selected[1].cast_id, 8);
    }

    #[test]
    fn crew_keeps_highest_popularity_job() {
        let raw = vec![
            crew(1, "Writer", 1.0),
            crew(2, "Editor", 3.0),
            crew(1, "Director", 5.0),
        ];
        let selected = select_crew(&settings(), &raw);

        assert_eq!(
            selected
                .iter()
                .map(|c| (c.crew_id, c.job.as_str()))
                .collect::<Vec<_>>(),
            vec![(1, "Director"), (2, "Editor")]
        );
    }

    #[test]
    fn missing_profile_uses_placeholder() {
        let mut with_photo = cast(1, 1, 1.0);
        with_photo.profile_path = Some("/face.jpg".into());
        let mut blank = cast(2, 2, 0.5);
        blank.profile_path = Some(" ".into());

        let selected = select_cast(&settings(), &[with_photo, blank]);
        assert_eq!(selected[0].image_url, "https://img/w500/face.jpg");
        assert_eq!(selected[1].image_url, "/images/default-cast.png");
    }

    #[test]
    fn empty_credit_lists_map_to_nothing() {
        assert!(select_cast(&settings(), &[]).is_empty());
        assert!(select_crew(&settings(), &[]).is_empty());
    }
}
