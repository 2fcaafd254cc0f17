mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;

use kwai_api::models::Team;
use kwai_api::{ApiClient, ClientError, QueryParams, ResourceApi};

fn resource_api(client: ApiClient) -> ResourceApi<ApiClient> {
    ResourceApi::new(client, Arc::new(common::transformer()))
}

#[tokio::test]
async fn concurrent_401s_refresh_once() -> Result<()> {
    let api = common::spawn_mock_api(false).await?;
    let client = ApiClient::new(&api.base_url)?;

    let requests = (0..5).map(|_| {
        let client = client.clone();
        async move { client.get("/v1/teams", &QueryParams::new()).await }
    });
    let results = join_all(requests).await;

    for result in results {
        let body = result?;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    }
    assert_eq!(api.state.refresh_count(), 1);
    Ok(())
}

#[tokio::test]
async fn second_401_is_unauthorized() -> Result<()> {
    let api = common::spawn_mock_api(false).await?;
    api.state.refresh_fails.store(true, Ordering::SeqCst);
    let client = ApiClient::new(&api.base_url)?;

    let err = client.get("/v1/teams", &QueryParams::new()).await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized { .. }), "got {:?}", err);
    assert_eq!(err.status_code(), Some(401));
    assert_eq!(api.state.refresh_count(), 1);
    Ok(())
}

#[tokio::test]
async fn login_opens_the_session() -> Result<()> {
    let api = common::spawn_mock_api(false).await?;
    let client = ApiClient::new(&api.base_url)?;

    assert!(client.login("jigoro@kwai.be", "wrong").await.is_err());
    client.login("jigoro@kwai.be", "judo").await?;
    client.get("/v1/teams", &QueryParams::new()).await?;
    assert_eq!(api.state.refresh_count(), 0);
    Ok(())
}

#[tokio::test]
async fn error_documents_are_parsed() -> Result<()> {
    let api = common::spawn_mock_api(true).await?;
    let client = ApiClient::new(&api.base_url)?;

    let err = client.get("/v1/broken", &QueryParams::new()).await.unwrap_err();
    let ClientError::Status { status, errors, .. } = &err else {
        panic!("expected status error, got {:?}", err);
    };
    assert_eq!(*status, 422);
    assert_eq!(errors[0].title, "Invalid team");
    assert_eq!(errors[0].source.as_ref().map(|s| s.pointer.as_str()), Some("/data/attributes/name"));
    assert!(err.to_string().contains("Invalid team"));
    Ok(())
}

#[tokio::test]
async fn fetch_maps_pages_and_single_resources() -> Result<()> {
    let api = common::spawn_mock_api(true).await?;
    let resources = resource_api(ApiClient::new(&api.base_url)?);

    let page = resources.fetch_page::<Team>("/v1/teams", &QueryParams::new().limit(10)).await?;
    assert_eq!(page.meta.count, 2);
    assert_eq!(page.items[1].name, "U13");

    let team = resources.fetch_one::<Team>("/v1/teams/1").await?;
    assert_eq!(team.members[0].nationality.as_ref().map(|c| c.name.as_str()), Some("Japan"));
    Ok(())
}

#[tokio::test]
async fn save_posts_new_and_patches_existing() -> Result<()> {
    let api = common::spawn_mock_api(true).await?;
    let resources = resource_api(ApiClient::new(&api.base_url)?);

    let team = Team { id: None, name: "U15".to_string(), active: true, remark: String::new(), members: Vec::new() };
    let created = resources.save("/v1/teams", &team).await?;
    assert_eq!(created.id.as_deref(), Some("42"));
    assert_eq!(created.name, "U15");

    let renamed = Team { name: "U15 A".to_string(), ..created };
    let updated = resources.save("/v1/teams", &renamed).await?;
    assert_eq!(updated.id.as_deref(), Some("42"));
    assert_eq!(updated.name, "U15 A");

    resources.delete("/v1/teams", "42").await?;

    assert_eq!(
        api.state.requests(),
        vec!["POST /v1/teams", "PATCH /v1/teams/42", "DELETE /v1/teams/42"]
    );
    Ok(())
}
