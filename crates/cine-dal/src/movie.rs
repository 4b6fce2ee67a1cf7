use cine_types::{ValidationErrors, Validator};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, Pool};
use time::OffsetDateTime;
use tracing::debug;

use crate::{error::Result, Error};

pub const MAX_TITLE_BYTES: usize = 500;
pub const FIRST_FILM_YEAR: i32 = 1888;
pub const MAX_GENRES: usize = 5;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Movie {
    pub id: i64,
    pub created_at: OffsetDateTime,
    pub title: String,
    pub year: i32,
    /// Minutes
    pub runtime: i32,
    #[sqlx(json)]
    pub genres: Vec<String>,
    pub version: i32,
}

impl Movie {
    /// Unsaved movie, id, creation time and version are assigned by [`MovieRepositoryImpl::insert`]
    pub fn new(title: impl Into<String>, year: i32, runtime: i32, genres: Vec<String>) -> Self {
        Movie {
            id: 0,
            created_at: OffsetDateTime::UNIX_EPOCH,
            title: title.into(),
            year,
            runtime,
            genres,
            version: 0,
        }
    }
}

pub fn validate_movie(v: &mut Validator, movie: &Movie) {
    validate_movie_at(v, movie, OffsetDateTime::now_utc().year())
}

/// Same as [`validate_movie`], with the year treated as current given explicitly.
pub fn validate_movie_at(v: &mut Validator, movie: &Movie, current_year: i32) {
    v.check(!movie.title.is_empty(), "title", "must be provided");
    v.check(
        movie.title.len() <= MAX_TITLE_BYTES,
        "title",
        "must not be more than 500 bytes long",
    );

    v.check(movie.year != 0, "year", "must be provided");
    v.check(
        movie.year >= FIRST_FILM_YEAR,
        "year",
        "must be greater than or equal to 1888",
    );
    v.check(
        movie.year <= current_year,
        "year",
        "must not be in the future",
    );

    v.check(movie.runtime != 0, "runtime", "must be provided");
    v.check(movie.runtime > 0, "runtime", "must be a positive integer");

    v.check(
        !movie.genres.is_empty(),
        "genres",
        "must contain at least 1 genre",
    );
    v.check(
        movie.genres.len() <= MAX_GENRES,
        "genres",
        "must not contain more than 5 genres",
    );
    v.check(
        Validator::unique(&movie.genres),
        "genres",
        "must not contain duplicate values",
    );
}

/// Payload for creating a movie. Missing fields decode as zero values and are
/// reported by validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MovieInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub runtime: i32,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
}

impl MovieInput {
    pub fn into_movie(self) -> std::result::Result<Movie, ValidationErrors> {
        let mut v = Validator::new();
        v.check(self.genres.is_some(), "genres", "must be provided");
        let movie = Movie::new(
            self.title,
            self.year,
            self.runtime,
            self.genres.unwrap_or_default(),
        );
        validate_movie(&mut v, &movie);
        v.into_result().map(|_| movie)
    }
}

/// Payload for replacing the mutable fields of a movie. `version` is the
/// version the caller last observed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMovieInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub runtime: i32,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub version: Option<i32>,
}

impl UpdateMovieInput {
    /// Validates the payload and, only if it is valid, copies it onto `movie`.
    pub fn apply(self, movie: &mut Movie) -> std::result::Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.check(self.genres.is_some(), "genres", "must be provided");
        v.check(self.version.is_some(), "version", "must be provided");
        v.check(
            !matches!(self.version, Some(version) if version <= 0),
            "version",
            "must be a positive integer",
        );
        let candidate = Movie {
            title: self.title,
            year: self.year,
            runtime: self.runtime,
            genres: self.genres.unwrap_or_default(),
            version: self.version.unwrap_or_default(),
            ..movie.clone()
        };
        validate_movie(&mut v, &candidate);
        v.into_result()?;
        *movie = candidate;
        Ok(())
    }
}

pub fn format_runtime(runtime: i32) -> String {
    if runtime == 0 {
        String::new()
    } else {
        format!("{runtime} mins")
    }
}

/// Client facing representation of [`Movie`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieView {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub runtime: String,
    pub genres: Vec<String>,
    pub version: i32,
}

impl From<&Movie> for MovieView {
    fn from(movie: &Movie) -> Self {
        MovieView {
            id: movie.id,
            title: movie.title.clone(),
            year: movie.year,
            runtime: format_runtime(movie.runtime),
            genres: movie.genres.clone(),
            version: movie.version,
        }
    }
}

impl From<Movie> for MovieView {
    fn from(movie: Movie) -> Self {
        MovieView {
            id: movie.id,
            title: movie.title,
            year: movie.year,
            runtime: format_runtime(movie.runtime),
            genres: movie.genres,
            version: movie.version,
        }
    }
}

pub type MovieRepository = MovieRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct MovieRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> MovieRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Stores a new movie and fills in its id, creation time and version from the stored row.
    pub async fn insert(&self, movie: &mut Movie) -> Result<()> {
        let (id, created_at, version): (i64, OffsetDateTime, i32) = sqlx::query_as(
            "INSERT INTO movies (title, year, runtime, genres) VALUES (?, ?, ?, ?)
            RETURNING id, created_at, version",
        )
        .bind(&movie.title)
        .bind(movie.year)
        .bind(movie.runtime)
        .bind(Json(&movie.genres))
        .fetch_one(&self.executor)
        .await?;

        movie.id = id;
        movie.created_at = created_at;
        movie.version = version;
        Ok(())
    }

    pub async fn get(&self, id: i64) -> Result<Movie> {
        if id < 1 {
            return Err(Error::RecordNotFound(format!("Movie {id}")));
        }
        sqlx::query_as::<_, Movie>(
            "SELECT id, created_at, title, year, runtime, genres, version FROM movies WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.executor)
        .await?
        .ok_or_else(|| Error::RecordNotFound(format!("Movie {id}")))
    }

    /// Writes mutable fields only if the stored version still equals `movie.version`,
    /// the new version is then copied back into `movie`.
    pub async fn update(&self, movie: &mut Movie) -> Result<()> {
        let updated: Option<(i32,)> = sqlx::query_as(
            "UPDATE movies SET title = ?, year = ?, runtime = ?, genres = ?, version = version + 1
            WHERE id = ? AND version = ?
            RETURNING version",
        )
        .bind(&movie.title)
        .bind(movie.year)
        .bind(movie.runtime)
        .bind(Json(&movie.genres))
        .bind(movie.id)
        .bind(movie.version)
        .fetch_optional(&self.executor)
        .await?;

        match updated {
            Some((version,)) => {
                movie.version = version;
                Ok(())
            }
            None => {
                debug!(id = movie.id, version = movie.version, "Movie update conflict");
                Err(Error::EditConflict {
                    id: movie.id,
                    version: movie.version,
                })
            }
        }
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if id < 1 {
            return Err(Error::RecordNotFound(format!("Movie {id}")));
        }
        let res = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound(format!("Movie {id}")))
        } else {
            Ok(())
        }
    }
}
