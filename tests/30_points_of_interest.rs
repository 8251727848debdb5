mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn get_point(server: &common::TestServer, token: &str, city_id: i32, id: i32) -> Result<(StatusCode, Value)> {
    let res = server
        .client
        .get(server.url(&format!("/api/cities/{}/pointsofinterest/{}", city_id, id)))
        .bearer_auth(token)
        .send()
        .await?;
    let status = res.status();
    let body = res.json::<Value>().await.unwrap_or(Value::Null);
    Ok((status, body))
}

#[tokio::test]
async fn listing_requires_matching_city_claim() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;

    let res = server
        .client
        .get(server.url("/api/cities/2/pointsofinterest"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let points: Vec<Value> = res.json().await?;
    let names: Vec<&str> = points.iter().filter_map(|p| p["name"].as_str()).collect();
    assert_eq!(names, vec!["Cathedral Of Our Lady", "Antwerp Central Station"]);

    for city_id in [1, 3, 99] {
        let res = server
            .client
            .get(server.url(&format!("/api/cities/{}/pointsofinterest", city_id)))
            .bearer_auth(&token)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "city {}", city_id);
    }
    Ok(())
}

#[tokio::test]
async fn single_point_lookup_is_scoped_to_city() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;

    let (status, body) = get_point(&server, &token, 2, 3).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Cathedral Of Our Lady");
    assert!(body.get("cityId").is_none());

    let (status, _) = get_point(&server, &token, 1, 3).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get_point(&server, &token, 99, 1).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn create_returns_location_of_new_point() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;

    let res = server
        .client
        .post(server.url("/api/v1/cities/3/pointsofinterest"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Notre-Dame", "description": "Cathedral on the Île de la Cité" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("Location header");
    let created: Value = res.json().await?;
    assert_eq!(created["id"], 7);
    assert_eq!(location, "/api/v1/cities/3/pointsofinterest/7");

    let (status, body) = get_point(&server, &token, 3, 7).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Notre-Dame");
    Ok(())
}

#[tokio::test]
async fn create_validates_body_and_city() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;
    let url = server.url("/api/cities/3/pointsofinterest");

    let res = server
        .client
        .post(&url)
        .bearer_auth(&token)
        .json(&json!({ "description": "no name" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["field_errors"]["name"].is_string());

    let res = server
        .client
        .post(&url)
        .bearer_auth(&token)
        .json(&json!({ "name": "Long", "description": "x".repeat(201) }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .post(server.url("/api/cities/99/pointsofinterest"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Nowhere" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn put_replaces_name_and_description() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;

    let res = server
        .client
        .put(server.url("/api/cities/1/pointsofinterest/1"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Central Park NYC" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (_, body) = get_point(&server, &token, 1, 1).await?;
    assert_eq!(body["name"], "Central Park NYC");
    assert!(body["description"].is_null());

    let res = server
        .client
        .put(server.url("/api/cities/1/pointsofinterest/5"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Wrong city" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn put_accepts_a_body_echoing_the_point_id() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;

    let res = server
        .client
        .put(server.url("/api/cities/1/pointsofinterest/1"))
        .bearer_auth(&token)
        .json(&json!({ "id": 1, "name": "Central Park NYC", "description": "x" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (_, body) = get_point(&server, &token, 1, 1).await?;
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Central Park NYC");
    assert_eq!(body["description"], "x");
    Ok(())
}

#[tokio::test]
async fn malformed_path_ids_are_json_bad_requests() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;

    for path in ["/api/cities/1/pointsofinterest/xyz", "/api/cities/abc/pointsofinterest"] {
        let res = server.client.get(server.url(path)).bearer_auth(&token).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", path);
        let body = res.json::<Value>().await?;
        assert_eq!(body["error"], true, "{}", path);
        assert_eq!(body["code"], "BAD_REQUEST", "{}", path);
    }
    Ok(())
}

#[tokio::test]
async fn patch_applies_json_patch_or_leaves_point_unchanged() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;
    let url = server.url("/api/cities/1/pointsofinterest/2");

    let res = server
        .client
        .patch(&url)
        .bearer_auth(&token)
        .json(&json!([{ "op": "replace", "path": "/name", "value": "Empire State" }]))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let (_, body) = get_point(&server, &token, 1, 2).await?;
    assert_eq!(body["name"], "Empire State");
    assert_eq!(body["description"], "A 102-story skyscraper located in Midtown Manhattan.");

    let rejected = [
        json!([{ "op": "replace", "path": "/invalidproperty", "value": "x" }]),
        json!([{ "op": "add", "path": "/cityId", "value": 3 }]),
        json!([{ "op": "replace", "path": "/name", "value": "   " }]),
        json!([{ "op": "remove", "path": "/name" }]),
    ];
    for patch in rejected {
        let res = server.client.patch(&url).bearer_auth(&token).json(&patch).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "patch {}", patch);
    }

    let (_, body) = get_point(&server, &token, 1, 2).await?;
    assert_eq!(body["name"], "Empire State");
    Ok(())
}

#[tokio::test]
async fn delete_removes_point_and_sends_mail() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;
    let url = server.url("/api/cities/3/pointsofinterest/6");

    let res = server.client.delete(&url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (status, _) = get_point(&server, &token, 3, 6).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(
        server.mail.sent(),
        vec![(
            "Point Of Interest Deleted".to_string(),
            "Point of interest The Louvre with id 6 was deleted.".to_string()
        )]
    );

    let res = server.client.delete(&url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(server.mail.sent().len(), 1);

    let (status, _) = get_point(&server, &token, 3, 5).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}
