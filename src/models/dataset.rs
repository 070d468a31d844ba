use std::collections::HashMap;

use super::{MovieId, UserId};

/// Tag tokens a movie received, keyed by the contributing user
pub type TagProfile = HashMap<UserId, Vec<String>>;

/// In-memory rating/title/tag dataset.
///
/// Ratings are indexed both ways so that user-keyed and movie-keyed algorithms can
/// read their profiles directly. The dataset is built once and then only read.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub user_ratings: HashMap<UserId, HashMap<MovieId, f32>>,
    pub movie_ratings: HashMap<MovieId, HashMap<UserId, f32>>,
    pub titles: HashMap<MovieId, String>,
    pub tags: HashMap<MovieId, TagProfile>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a rating in both indexes; a repeated (user, movie) pair keeps the last value
    pub fn add_rating(&mut self, user_id: UserId, movie_id: MovieId, rating: f32) {
        self.user_ratings
            .entry(user_id)
            .or_default()
            .insert(movie_id, rating);
        self.movie_ratings
            .entry(movie_id)
            .or_default()
            .insert(user_id, rating);
    }

    pub fn add_title(&mut self, movie_id: MovieId, title: impl Into<String>) {
        self.titles.insert(movie_id, title.into());
    }

    /// Appends already tokenized tags from one contributor
    pub fn add_tags<I, S>(&mut self, movie_id: MovieId, user_id: UserId, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags
            .entry(movie_id)
            .or_default()
            .entry(user_id)
            .or_default()
            .extend(tokens.into_iter().map(Into::into));
    }

    /// Total number of (user, movie) ratings
    pub fn rating_count(&self) -> usize {
        self.user_ratings.values().map(HashMap::len).sum()
    }

    /// Total number of tag tokens over all movies and contributors
    pub fn tag_token_count(&self) -> usize {
        self.tags
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn title(&self, movie_id: MovieId) -> Option<&str> {
        self.titles.get(&movie_id).map(String::as_str)
    }
}
