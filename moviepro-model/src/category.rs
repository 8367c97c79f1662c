use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Upstream movie lists that can be browsed without a search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MovieCategory {
    NowPlaying,
    Popular,
    TopRated,
    Upcoming,
}

impl MovieCategory {
    pub const ALL: [MovieCategory; 4] = [
        MovieCategory::NowPlaying,
        MovieCategory::Popular,
        MovieCategory::TopRated,
        MovieCategory::Upcoming,
    ];

    /// Path segment used by the catalog API (`/movie/{segment}`).
    pub fn as_path(&self) -> &'static str {
        match self {
            MovieCategory::NowPlaying => "now_playing",
            MovieCategory::Popular => "popular",
            MovieCategory::TopRated => "top_rated",
            MovieCategory::Upcoming => "upcoming",
        }
    }
}

impl FromStr for MovieCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        MovieCategory::ALL
            .into_iter()
            .find(|category| category.as_path() == normalized)
            .ok_or_else(|| ModelError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for MovieCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_dashed_and_snake_forms() {
        assert_eq!(
            "top-rated".parse::<MovieCategory>().unwrap(),
            MovieCategory::TopRated
        );
        assert_eq!(
            "now_playing".parse::<MovieCategory>().unwrap(),
            MovieCategory::NowPlaying
        );
        assert!("trending".parse::<MovieCategory>().is_err());
    }
}
