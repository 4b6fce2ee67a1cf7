use cine_app::rest_api::movie::MovieEnvelope;
use cine_e2e_tests::{
    extend_url, prepare_env,
    rest::{create_movie, movies_url},
    spawn_server,
};
use serde_json::json;
use tracing::info;
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_movies() {
    let (args, _config_guard) = prepare_env("test_movies").await.unwrap();
    let base_url = args.base_url.clone();
    spawn_server(args).await.unwrap();

    let client = reqwest::Client::new();
    let api_url = movies_url(&base_url);

    let movie = create_movie(
        &client,
        &base_url,
        "The Breakfast Club",
        1985,
        96,
        &["drama", "comedy"],
    )
    .await
    .unwrap();
    assert!(movie.id > 0);
    assert_eq!(1, movie.version);
    assert_eq!("96 mins", movie.runtime);

    let record_url = extend_url(&api_url, movie.id);

    let response = client.get(record_url.clone()).send().await.unwrap();
    info!("Response: {:#?}", response);
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["movie"].get("created_at").is_none());
    let rec: MovieEnvelope = serde_json::from_value(body).unwrap();
    assert_eq!(movie, rec.movie);

    let update_rec = json!({"title": "The Breakfast Club", "year": 1985, "runtime": 97,
        "genres": ["drama", "comedy", "teen"], "version": rec.movie.version});
    let response = client
        .put(record_url.clone())
        .json(&update_rec)
        .send()
        .await
        .unwrap();
    info!("Response: {:#?}", response);
    assert!(response.status().is_success());
    let new_rec: MovieEnvelope = response.json().await.unwrap();
    assert_eq!(new_rec.movie.version, rec.movie.version + 1);
    assert_eq!("97 mins", new_rec.movie.runtime);

    // same version again is stale now
    let response = client
        .put(record_url.clone())
        .json(&update_rec)
        .send()
        .await
        .unwrap();
    info!("Response: {:#?}", response);
    assert_eq!(response.status().as_u16(), 409);

    let response = client.delete(record_url.clone()).send().await.unwrap();
    assert!(response.status().is_success());

    let response = client.get(record_url.clone()).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
#[traced_test]
async fn test_movie_validation() {
    let (args, _config_guard) = prepare_env("test_movie_validation").await.unwrap();
    let base_url = args.base_url.clone();
    spawn_server(args).await.unwrap();

    let client = reqwest::Client::new();

    let payload = json!({"title": "Future", "year": 3000, "runtime": 90,
        "genres": ["sci-fi", "sci-fi"]});
    let response = client
        .post(movies_url(&base_url))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        json!({"error": {
            "year": "must not be in the future",
            "genres": "must not contain duplicate values"
        }}),
        body
    );

    let response = client
        .post(movies_url(&base_url))
        .header("content-type", "application/json")
        .body(r#"{"title": "Broken""#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
#[traced_test]
async fn test_concurrent_updates() {
    let (args, _config_guard) = prepare_env("test_concurrent_updates").await.unwrap();
    let base_url = args.base_url.clone();
    spawn_server(args).await.unwrap();

    let client = reqwest::Client::new();
    let movie = create_movie(&client, &base_url, "Heat", 1995, 170, &["crime"])
        .await
        .unwrap();
    let record_url = extend_url(&movies_url(&base_url), movie.id);

    let update = |runtime: i32| {
        let payload = json!({"title": "Heat", "year": 1995, "runtime": runtime,
            "genres": ["crime", "thriller"], "version": movie.version});
        client.put(record_url.clone()).json(&payload).send()
    };
    let (r1, r2) = futures::future::join(update(171), update(172)).await;
    let mut statuses = vec![r1.unwrap().status().as_u16(), r2.unwrap().status().as_u16()];
    statuses.sort();
    assert_eq!(vec![200, 409], statuses);

    let response = client.get(record_url).send().await.unwrap();
    let rec: MovieEnvelope = response.json().await.unwrap();
    assert_eq!(movie.version + 1, rec.movie.version);
}
