//! MongoDB fixture integration tests using testcontainers.

#![cfg(feature = "mongodb")]

use dbfixtures_core::drivers::mongodb::MongoDriver;
use dbfixtures_core::{BoxedDriver, DbFixturesError, Driver, FixtureHandler};
use mongodb::bson::{Document, doc, oid::ObjectId};
use serde_json::json;
use std::collections::HashMap;
use testcontainers_modules::mongo::Mongo;
use testcontainers_modules::testcontainers::runners::AsyncRunner;

fn tables(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

#[tokio::test]
async fn test_mongodb_insert_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let container = Mongo::default().start().await?;
    let port = container.get_host_port_ipv4(27017).await?;
    let connection_string = format!("mongodb://localhost:{}/fixtures", port);

    let client = mongodb::Client::with_uri_str(&connection_string).await?;
    let users = client.database("fixtures").collection::<Document>("users");
    users
        .insert_many(vec![doc! { "name": "stale" }, doc! { "name": "stale" }])
        .await?;

    let drivers: Vec<BoxedDriver> = vec![Box::new(MongoDriver::new(&connection_string).await?)];
    let handler = FixtureHandler::new(drivers);

    let oid = "507f1f77bcf86cd799439011";
    let fixtures = HashMap::from([(
        "users".to_string(),
        vec![
            json!({"_id": {"$oid": oid}, "name": "ada", "tags": ["admin"]}),
            json!({"name": "grace", "profile": {"lang": "en"}}),
        ],
    )]);

    handler
        .insert_fixtures(&tables(&["users", "sessions"]), &fixtures)
        .await?;

    assert_eq!(users.count_documents(doc! {}).await?, 2);
    let ada = users
        .find_one(doc! { "_id": ObjectId::parse_str(oid)? })
        .await?
        .expect("fixture document should exist");
    assert_eq!(ada.get_str("name")?, "ada");

    handler.close_drivers().await?;
    Ok(())
}

#[tokio::test]
async fn test_mongodb_duplicate_key_reports_row() -> Result<(), Box<dyn std::error::Error>> {
    let container = Mongo::default().start().await?;
    let port = container.get_host_port_ipv4(27017).await?;
    let connection_string = format!("mongodb://localhost:{}/fixtures", port);

    let driver = MongoDriver::new(&connection_string).await?;
    let result = driver
        .insert_fixtures(
            "users",
            &[
                json!({"_id": 1, "name": "ada"}),
                json!({"_id": 2, "name": "bob"}),
                json!({"_id": 1, "name": "eve"}),
            ],
        )
        .await;

    match result {
        Err(DbFixturesError::Insert { table, row, .. }) => {
            assert_eq!(table, "users");
            assert_eq!(row, 2);
        }
        other => panic!("unexpected result: {other:?}"),
    }

    driver.truncate(&tables(&["users"])).await?;
    let remaining = driver
        .database
        .collection::<Document>("users")
        .count_documents(doc! {})
        .await?;
    assert_eq!(remaining, 0);

    driver.close().await?;
    Ok(())
}
