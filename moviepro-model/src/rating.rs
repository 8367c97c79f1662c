use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// MPAA certification stored on a movie.
///
/// Variant names carry no hyphen so that upstream certifications such as
/// `PG-13` resolve after the hyphen is stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovieRating {
    G,
    PG,
    PG13,
    R,
    NC17,
    #[default]
    NR,
}

impl MovieRating {
    pub const ALL: [MovieRating; 6] = [
        MovieRating::G,
        MovieRating::PG,
        MovieRating::PG13,
        MovieRating::R,
        MovieRating::NC17,
        MovieRating::NR,
    ];

    /// Stable identifier used for persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieRating::G => "G",
            MovieRating::PG => "PG",
            MovieRating::PG13 => "PG13",
            MovieRating::R => "R",
            MovieRating::NC17 => "NC17",
            MovieRating::NR => "NR",
        }
    }

    /// Human readable label as printed on posters.
    pub fn label(&self) -> &'static str {
        match self {
            MovieRating::G => "G",
            MovieRating::PG => "PG",
            MovieRating::PG13 => "PG-13",
            MovieRating::R => "R",
            MovieRating::NC17 => "NC-17",
            MovieRating::NR => "Not Rated",
        }
    }
}

impl FromStr for MovieRating {
    type Err = ModelError;

    /// Case-insensitive match against the variant names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        MovieRating::ALL
            .into_iter()
            .find(|rating| rating.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownRating(s.to_string()))
    }
}

impl fmt::Display for MovieRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_variant_names_case_insensitively() {
        assert_eq!("pg13".parse::<MovieRating>().unwrap(), MovieRating::PG13);
        assert_eq!("Nc17".parse::<MovieRating>().unwrap(), MovieRating::NC17);
        assert_eq!("R".parse::<MovieRating>().unwrap(), MovieRating::R);
    }

    #[test]
    fn hyphenated_label_is_not_a_variant_name() {
        assert!("PG-13".parse::<MovieRating>().is_err());
    }

    #[test]
    fn defaults_to_not_rated() {
        assert_eq!(MovieRating::default(), MovieRating::NR);
    }
}
