use serde_json::json;
use sqlfluent::{
    AnsiGrammar, Builder, MockConnection, MySqlGrammar, QbError, QbResult, Record, Row, raw,
};
use std::sync::Arc;

fn setup() -> (Arc<MockConnection>, Builder) {
    let conn = Arc::new(MockConnection::new());
    let builder = Builder::new(conn.clone(), Box::new(AnsiGrammar::new()));
    (conn, builder)
}

fn row(pairs: &[(&str, serde_json::Value)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[tokio::test]
async fn get_resolves_bindings_into_sql() -> QbResult<()> {
    let (conn, mut users) = setup();
    conn.expect_query(r#"select * from "users" where "id" = 1 and "name" = 'o''neil'"#)
        .respond(vec![row(&[("id", json!(1)), ("name", json!("o'neil"))])]);

    users.from("users").where_eq("id", 1).where_eq("name", "o'neil");
    let rows = users.get().await?;

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], json!("o'neil"));
    assert!(conn.is_done());
    Ok(())
}

#[tokio::test]
async fn first_and_find_leave_builder_untouched() -> QbResult<()> {
    let (conn, mut users) = setup();
    conn.expect_query(r#"select * from "users" limit 1"#)
        .respond(vec![row(&[("id", json!(1))])]);
    conn.expect_query(r#"select * from "users" where "id" = 7 limit 1"#);

    users.from("users");
    let first = users.first().await?;
    assert_eq!(first.map(|r| r["id"].clone()), Some(json!(1)));

    let missing = users.find(7).await?;
    assert!(missing.is_none());

    assert_eq!(users.get_limit(), None);
    assert!(users.wheres().is_empty());
    assert!(conn.is_done());
    Ok(())
}

#[tokio::test]
async fn value_and_lists_strip_table_qualifier() -> QbResult<()> {
    let (conn, mut users) = setup();
    conn.expect_query(r#"select "users"."email" from "users" limit 1"#)
        .respond(vec![row(&[("email", json!("a@x.io"))])]);
    conn.expect_query(r#"select "users"."email" from "users""#).respond(vec![
        row(&[("email", json!("a@x.io"))]),
        row(&[("email", json!("b@x.io"))]),
    ]);

    users.from("users");
    assert_eq!(users.value("users.email").await?, Some(json!("a@x.io")));
    assert_eq!(
        users.lists("users.email").await?,
        vec![json!("a@x.io"), json!("b@x.io")]
    );
    Ok(())
}

#[tokio::test]
async fn lists_keyed_maps_key_to_value() -> QbResult<()> {
    let (conn, mut users) = setup();
    conn.expect_query(r#"select "email", "id" from "users""#).respond(vec![
        row(&[("email", json!("a@x.io")), ("id", json!(1))]),
        row(&[("email", json!("b@x.io")), ("id", json!("2"))]),
    ]);

    users.from("users");
    let map = users.lists_keyed("email", "id").await?;
    assert_eq!(map.get("1"), Some(&json!("a@x.io")));
    assert_eq!(map.get("2"), Some(&json!("b@x.io")));
    Ok(())
}

#[tokio::test]
async fn count_reads_aggregate_column() -> QbResult<()> {
    let (conn, mut users) = setup();
    conn.expect_query(r#"select count(*) as aggregate from "users" where "active" = TRUE"#)
        .respond(vec![row(&[("aggregate", json!("3"))])]);
    conn.expect_query(r#"select count(*) as aggregate from "users" where "active" = TRUE"#)
        .respond(vec![row(&[("aggregate", json!(0))])]);

    users.select(["id", "email"]).from("users").where_eq("active", true);
    assert_eq!(users.count().await?, 3);
    assert!(!users.exists().await?);
    assert_eq!(users.columns().len(), 2);
    Ok(())
}

#[tokio::test]
async fn max_and_sum_use_the_column() -> QbResult<()> {
    let (conn, mut orders) = setup();
    conn.expect_query(r#"select max("total") as aggregate from "orders""#)
        .respond(vec![row(&[("aggregate", json!(99))])]);
    conn.expect_query(r#"select sum("orders"."total") as aggregate from "orders""#);

    orders.from("orders");
    assert_eq!(orders.max("total").await?, Some(json!(99)));
    assert_eq!(orders.sum("orders.total").await?, None);
    Ok(())
}

#[tokio::test]
async fn count_drops_paging_and_ordering() -> QbResult<()> {
    let (conn, mut users) = setup();
    conn.expect_query(r#"select count(*) as aggregate from "users" where "active" = TRUE"#)
        .respond(vec![row(&[("aggregate", json!(120))])]);

    users
        .select_raw("coalesce(nick, ?) as nick", ["anon"])
        .from("users")
        .where_eq("active", true)
        .order_by_raw("field(id, ?)", [3])
        .order_by("id", "desc")
        .limit(20)
        .offset(40);
    assert_eq!(users.count().await?, 120);

    assert_eq!(users.get_offset(), Some(40));
    assert_eq!(users.orders().len(), 2);
    assert_eq!(users.get_bindings().len(), 3);
    assert!(conn.is_done());
    Ok(())
}

#[tokio::test]
async fn insert_update_delete_truncate() -> QbResult<()> {
    let (conn, mut users) = setup();
    users.from("users");

    users
        .insert(&[
            Record::new().set("email", "a@x.io").set("created_at", raw("now()")),
            Record::new().set("email", "b@x.io").set("created_at", raw("now()")),
        ])
        .await?;

    let mut by_id = users.clone();
    by_id.where_eq("id", 1);
    by_id.update(&Record::new().set("score", 2.5)).await?;
    by_id.delete().await?;
    users.truncate().await?;

    assert_eq!(
        conn.executed(),
        vec![
            r#"insert into "users" ("email", "created_at") values ('a@x.io', now()), ('b@x.io', now())"#
                .to_string(),
            r#"update "users" set "score" = 2.5 where "id" = 1"#.to_string(),
            r#"delete from "users" where "id" = 1"#.to_string(),
            r#"truncate table "users""#.to_string(),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn empty_insert_does_not_execute() -> QbResult<()> {
    let (conn, mut users) = setup();
    users.from("users");
    let out = users.insert(&[]).await?;
    assert!(out.rows.is_empty());
    assert!(conn.executed().is_empty());
    Ok(())
}

#[tokio::test]
async fn mysql_statements_resolve_with_backticks() -> QbResult<()> {
    let conn = Arc::new(MockConnection::new());
    let mut posts = Builder::new(conn.clone(), Box::new(MySqlGrammar::new()));
    posts
        .from("posts")
        .where_eq("draft", false)
        .order_by("id", "asc")
        .limit(10);
    posts.delete().await?;

    assert_eq!(
        conn.executed(),
        vec!["delete from `posts` where `draft` = FALSE order by `id` asc limit 10".to_string()]
    );
    Ok(())
}

#[tokio::test]
async fn unexpected_statement_is_an_execution_error() {
    let (conn, mut users) = setup();
    conn.expect_query(r#"select * from "users""#);

    users.from("accounts");
    let err = users.get().await.unwrap_err();
    assert!(matches!(err, QbError::Execution(_)));
    assert!(err.is_execution());
}

#[tokio::test]
async fn missing_table_fails_before_execution() {
    let (conn, users) = setup();
    let err = users.get().await.unwrap_err();
    assert!(matches!(err, QbError::MissingTable(_)));
    assert!(conn.executed().is_empty());
}
