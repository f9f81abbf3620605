//! Repository tests against a real Postgres
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p checkin-server -- --ignored
//!
//! Each test gets its own schema (via `search_path`) so counts are not
//! disturbed by tests running in parallel.

use std::collections::HashSet;
use std::sync::Arc;

use checkin_server::db::repos::{PgUserRepo, RepoError, UserStore};
use checkin_server::db::{migrations, Gateway};
use checkin_server::models::NewUser;
use checkin_server::DatabaseConfig;
use url::Url;

async fn isolated_repo(schema: &str) -> (Arc<Gateway>, PgUserRepo) {
    let base = DatabaseConfig::from_env().expect("DATABASE_URL required");

    let admin = Gateway::connect(&base).await.expect("connect failed");
    admin
        .execute_script(&format!(
            "DROP SCHEMA IF EXISTS {schema} CASCADE; CREATE SCHEMA {schema};"
        ))
        .await
        .expect("schema setup failed");
    admin.close().await;

    let mut url = Url::parse(&base.url).expect("DATABASE_URL must be a URL");
    url.query_pairs_mut()
        .append_pair("options", &format!("-c search_path={schema}"));
    let config = DatabaseConfig::from_url(Some(url.to_string())).expect("url present");

    let gateway = Arc::new(Gateway::connect(&config).await.expect("connect failed"));
    migrations::run(&gateway).await.expect("bootstrap failed");
    // second run proves the script is idempotent
    migrations::run(&gateway).await.expect("bootstrap not idempotent");

    let repo = PgUserRepo::new(Arc::clone(&gateway));
    (gateway, repo)
}

fn sample(n: usize) -> NewUser {
    NewUser::new(
        format!("First{n}"),
        format!("Last{n}"),
        format!("555-{n:04}"),
        format!("user{n}@example.com"),
    )
}

#[tokio::test]
#[ignore = "requires database"]
async fn insert_then_get_round_trips() {
    let (gateway, repo) = isolated_repo("checkin_test_insert_get").await;

    let payload = sample(1);
    let created = repo.insert(payload.clone()).await.expect("insert failed");
    assert!(created.id > 0);

    let fetched = repo.get_by_id(created.id).await.expect("get failed");
    assert_eq!(fetched.first_name, payload.first_name);
    assert_eq!(fetched.last_name, payload.last_name);
    assert_eq!(fetched.phone, payload.phone);
    assert_eq!(fetched.email, payload.email);
    assert_eq!(fetched.id, created.id);
    assert_eq!(
        fetched.created_at.timestamp_micros(),
        created.created_at.timestamp_micros()
    );

    gateway.close().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn list_is_newest_first() {
    let (gateway, repo) = isolated_repo("checkin_test_list_order").await;

    assert!(repo.list_all().await.expect("list failed").is_empty());

    for n in 0..5 {
        repo.insert(sample(n)).await.expect("insert failed");
    }

    let users = repo.list_all().await.expect("list failed");
    assert_eq!(users.len(), 5);
    for pair in users.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }

    gateway.close().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn invalid_insert_writes_nothing() {
    let (gateway, repo) = isolated_repo("checkin_test_validation").await;
    repo.insert(sample(1)).await.expect("insert failed");
    let before = repo.count_all().await;

    let mut missing_email = sample(2);
    missing_email.email.clear();
    let err = repo.insert(missing_email).await.expect_err("must fail");
    assert!(matches!(err, RepoError::Validation(_)));

    assert_eq!(repo.count_all().await, before);
    gateway.close().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn unknown_id_is_not_found() {
    let (gateway, repo) = isolated_repo("checkin_test_not_found").await;

    let err = repo.get_by_id(i64::MAX).await.expect_err("must fail");
    assert!(matches!(err, RepoError::NotFound { id } if id == i64::MAX));

    gateway.close().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn count_degrades_when_table_is_missing() {
    let (gateway, repo) = isolated_repo("checkin_test_count").await;
    gateway
        .execute_script("DROP TABLE users")
        .await
        .expect("drop failed");

    assert!(repo.ping().await.is_ok());
    assert_eq!(repo.count_all().await, -1);

    gateway.close().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn concurrent_inserts_beyond_pool_size() {
    let (gateway, repo) = isolated_repo("checkin_test_concurrency").await;
    let repo = Arc::new(repo);
    let n = 60;

    let tasks = (0..n).map(|i| {
        let repo = Arc::clone(&repo);
        let gateway = Arc::clone(&gateway);
        tokio::spawn(async move {
            let user = repo.insert(sample(i)).await.expect("insert failed");
            assert!(gateway.pool().size() <= 25);
            user.id
        })
    });

    let ids: HashSet<i64> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    assert_eq!(ids.len(), n);
    assert_eq!(repo.count_all().await, n as i64);
    assert!(gateway.pool().size() <= 25);
    assert_eq!(gateway.pool().options().get_max_connections(), 25);

    gateway.close().await;
}
