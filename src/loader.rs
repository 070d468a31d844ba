//! CSV ingestion of a MovieLens-style dataset directory.
//!
//! Expected files, each with a header row:
//! - `movies.csv`: `movieId,title,...`
//! - `ratings.csv`: `userId,movieId,rating,...`
//! - `tags.csv`: `userId,movieId,tag,...`
//!
//! Extra columns (genres, timestamps) are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{de::DeserializeOwned, Deserialize};

use crate::error::AppResult;
use crate::models::{Dataset, MovieId, UserId};
use crate::similarity::tokenize;

pub const MOVIES_FILE: &str = "movies.csv";
pub const RATINGS_FILE: &str = "ratings.csv";
pub const TAGS_FILE: &str = "tags.csv";

#[derive(Debug, Deserialize)]
struct MovieRow {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    title: String,
}

#[derive(Debug, Deserialize)]
struct RatingRow {
    #[serde(rename = "userId")]
    user_id: UserId,
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    rating: f32,
}

#[derive(Debug, Deserialize)]
struct TagRow {
    #[serde(rename = "userId")]
    user_id: UserId,
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    tag: String,
}

/// Loads titles, ratings and tags from `dir`.
///
/// `max_records` caps the number of data rows read from each file.
pub fn load_dataset(dir: &Path, max_records: Option<usize>) -> AppResult<Dataset> {
    let mut dataset = Dataset::new();

    let titles = load_titles(open(dir, MOVIES_FILE)?, max_records, &mut dataset)?;
    let rating_rows = load_ratings(open(dir, RATINGS_FILE)?, max_records, &mut dataset)?;
    let tag_rows = load_tags(open(dir, TAGS_FILE)?, max_records, &mut dataset)?;

    tracing::info!(
        dir = %dir.display(),
        titles,
        rating_rows,
        tag_rows,
        ratings = dataset.rating_count(),
        tag_tokens = dataset.tag_token_count(),
        users = dataset.user_ratings.len(),
        "Dataset loaded"
    );

    Ok(dataset)
}

fn open(dir: &Path, file: &str) -> AppResult<File> {
    let path = dir.join(file);
    tracing::debug!(path = %path.display(), "Reading CSV file");
    Ok(File::open(path)?)
}

fn rows<R, T>(source: R, limit: Option<usize>) -> impl Iterator<Item = csv::Result<T>>
where
    R: Read,
    T: DeserializeOwned,
{
    csv::Reader::from_reader(source)
        .into_deserialize()
        .take(limit.unwrap_or(usize::MAX))
}

/// Reads `movieId,title` rows; returns the number of rows read
pub fn load_titles<R: Read>(source: R, limit: Option<usize>, dataset: &mut Dataset) -> AppResult<usize> {
    let mut count = 0;
    for row in rows::<_, MovieRow>(source, limit) {
        let row = row?;
        dataset.add_title(row.movie_id, row.title.trim_matches('"'));
        count += 1;
    }
    Ok(count)
}

/// Reads `userId,movieId,rating` rows into both rating indexes
pub fn load_ratings<R: Read>(source: R, limit: Option<usize>, dataset: &mut Dataset) -> AppResult<usize> {
    let mut count = 0;
    for row in rows::<_, RatingRow>(source, limit) {
        let row = row?;
        dataset.add_rating(row.user_id, row.movie_id, row.rating);
        count += 1;
    }
    Ok(count)
}

/// Reads `userId,movieId,tag` rows, tokenizing each tag
pub fn load_tags<R: Read>(source: R, limit: Option<usize>, dataset: &mut Dataset) -> AppResult<usize> {
    let mut count = 0;
    for row in rows::<_, TagRow>(source, limit) {
        let row = row?;
        let tokens = tokenize(&row.tag);
        if !tokens.is_empty() {
            dataset.add_tags(row.movie_id, row.user_id, tokens);
        }
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::fs;

    const MOVIES: &str = "movieId,title,genres\n\
        1,Toy Story (1995),Adventure|Animation\n\
        2,\"American President, The (1995)\",Comedy|Drama|Romance\n";
    const RATINGS: &str = "userId,movieId,rating,timestamp\n\
        1,1,4.0,964982703\n\
        1,2,3.5,964981247\n\
        2,1,5.0,964982224\n";
    const TAGS: &str = "userId,movieId,tag,timestamp\n\
        2,1,Pixar!,1445714994\n\
        2,1,fun,1445714996\n\
        7,2,\"politics, romance\",1445715000\n";

    #[test]
    fn test_load_titles_handles_quoted_commas() {
        let mut dataset = Dataset::new();
        let count = load_titles(MOVIES.as_bytes(), None, &mut dataset).unwrap();

        assert_eq!(count, 2);
        assert_eq!(dataset.title(2), Some("American President, The (1995)"));
    }

    #[test]
    fn test_load_ratings_indexes_both_ways() {
        let mut dataset = Dataset::new();
        load_ratings(RATINGS.as_bytes(), None, &mut dataset).unwrap();

        assert_eq!(dataset.rating_count(), 3);
        assert_eq!(dataset.user_ratings[&1][&2], 3.5);
        assert_eq!(dataset.movie_ratings[&1].len(), 2);
    }

    #[test]
    fn test_load_tags_tokenizes() {
        let mut dataset = Dataset::new();
        load_tags(TAGS.as_bytes(), None, &mut dataset).unwrap();

        assert_eq!(dataset.tags[&1][&2], vec!["pixar", "fun"]);
        assert_eq!(dataset.tags[&2][&7], vec!["politics", "romance"]);
    }

    #[test]
    fn test_row_limit() {
        let mut dataset = Dataset::new();
        let count = load_ratings(RATINGS.as_bytes(), Some(2), &mut dataset).unwrap();

        assert_eq!(count, 2);
        assert!(!dataset.user_ratings.contains_key(&2));
    }

    #[test]
    fn test_malformed_row_is_a_dataset_error() {
        let mut dataset = Dataset::new();
        let result = load_ratings("userId,movieId,rating\n1,x,4.0\n".as_bytes(), None, &mut dataset);
        assert!(matches!(result, Err(AppError::Dataset(_))));
    }

    #[test]
    fn test_load_dataset_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MOVIES_FILE), MOVIES).unwrap();
        fs::write(dir.path().join(RATINGS_FILE), RATINGS).unwrap();
        fs::write(dir.path().join(TAGS_FILE), TAGS).unwrap();

        let dataset = load_dataset(dir.path(), None).unwrap();

        assert_eq!(dataset.titles.len(), 2);
        assert_eq!(dataset.user_ratings.len(), 2);
        assert_eq!(dataset.tag_token_count(), 4);
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_dataset(dir.path(), None);
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
