use cine_dal::movie::{MovieRepository, MovieView};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
#[allow(unused_imports)]
use axum::routing::{delete, get, post, put};

crate::repository_from_request!(MovieRepository);

#[derive(Debug, Serialize, Deserialize)]
pub struct MovieEnvelope {
    pub movie: MovieView,
}

mod crud_api {
    use super::*;
    use crate::error::{ApiError, ApiResult};
    use axum::{
        extract::{
            rejection::{JsonRejection, PathRejection},
            Path,
        },
        response::IntoResponse,
        Json,
    };
    use cine_dal::movie::{MovieInput, UpdateMovieInput};
    use http::{header, StatusCode};
    use serde_json::json;
    use tracing::debug;

    fn movie_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
        match path {
            Ok(Path(id)) if id > 0 => Ok(id),
            Ok(Path(id)) => Err(ApiError::ResourceNotFound(format!("Movie {id}"))),
            Err(e) => {
                debug!("Invalid movie id: {e}");
                Err(ApiError::ResourceNotFound("Movie".to_string()))
            }
        }
    }

    pub async fn create(
        repository: MovieRepository,
        payload: Result<Json<MovieInput>, JsonRejection>,
    ) -> ApiResult<impl IntoResponse> {
        let Json(input) = payload?;
        let mut movie = input.into_movie()?;
        repository.insert(&mut movie).await?;

        let location = format!("/v1/movies/{}", movie.id);
        Ok((
            StatusCode::CREATED,
            [(header::LOCATION, location)],
            Json(MovieEnvelope {
                movie: movie.into(),
            }),
        ))
    }

    pub async fn get(
        path: Result<Path<i64>, PathRejection>,
        repository: MovieRepository,
    ) -> ApiResult<impl IntoResponse> {
        let id = movie_id(path)?;
        let movie = repository.get(id).await?;

        Ok((
            StatusCode::OK,
            Json(MovieEnvelope {
                movie: movie.into(),
            }),
        ))
    }

    pub async fn update(
        path: Result<Path<i64>, PathRejection>,
        repository: MovieRepository,
        payload: Result<Json<UpdateMovieInput>, JsonRejection>,
    ) -> ApiResult<impl IntoResponse> {
        let id = movie_id(path)?;
        let Json(input) = payload?;
        let mut movie = repository.get(id).await?;
        input.apply(&mut movie)?;
        repository.update(&mut movie).await?;

        Ok((
            StatusCode::OK,
            Json(MovieEnvelope {
                movie: movie.into(),
            }),
        ))
    }

    pub async fn delete(
        path: Result<Path<i64>, PathRejection>,
        repository: MovieRepository,
    ) -> ApiResult<impl IntoResponse> {
        let id = movie_id(path)?;
        repository.delete(id).await?;

        Ok((
            StatusCode::OK,
            Json(json!({"message": "movie successfully deleted"})),
        ))
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/", post(crud_api::create)).route(
        "/{id}",
        get(crud_api::get)
            .put(crud_api::update)
            .delete(crud_api::delete),
    )
}
