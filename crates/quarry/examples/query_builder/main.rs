//! Example demonstrating quarry's fluent builder and dialect grammars.
//!
//! Run with:
//!   cargo run --example query_builder -p quarry
//!
//! Every demo is pure SQL generation; no database is required.

use quarry::{Dialect, Operand, QueryResult, query};

fn demo_basic_select() -> QueryResult<()> {
    let sql = query(Dialect::Mysql)
        .select_fields(["id", "name"])
        .from("users")
        .where_("age", ">", 18)
        .order_by("name")
        .limit(10)
        .to_select_sql()?;
    println!("[basic select]");
    println!("  {sql}");
    println!();
    Ok(())
}

fn demo_joins_and_groups() -> QueryResult<()> {
    let sql = query(Dialect::Mysql)
        .select_fields(["users.name", "COUNT(*)"])
        .from("users")
        .left_join("orders", ("users.id", "=", "orders.user_id"))
        .where_group(|q| q.where_("age", ">=", 18).or_where("verified", "=", true))
        .group_by(["users.name"])
        .having("COUNT(*)", ">", 5)
        .to_select_sql()?;
    println!("[joins, groups, having]");
    println!("  {sql}");
    println!();
    Ok(())
}

fn demo_subqueries() -> QueryResult<()> {
    let sql = query(Dialect::Mysql)
        .add_field("name")
        .select_subquery_as(
            |q| q.select_fields(["COUNT(*)"]).from("orders"),
            "order_count",
        )
        .from("users")
        .where_query("id", "IN", |q| {
            q.select_fields(["user_id"])
                .from("orders")
                .where_("total", ">", 100)
        })
        .to_select_sql()?;
    println!("[subqueries]");
    println!("  {sql}");
    println!();
    Ok(())
}

fn demo_nested_aggregates() -> QueryResult<()> {
    let sql = query(Dialect::Mysql)
        .select_fields([("ROUND(AVG(price),2)", "avg_price")])
        .from("orders")
        .to_select_sql()?;
    println!("[nested aggregate]");
    println!("  {sql}");
    println!();
    Ok(())
}

fn demo_mutations() -> QueryResult<()> {
    let insert = query(Dialect::Mysql)
        .from("users")
        .to_insert_sql([("login", "alice"), ("email", "alice@example.com")])?;

    let update = query(Dialect::Mysql)
        .from("users")
        .where_("id", "=", 42)
        .to_update_sql([("status", Operand::from("active"))])?;

    let delete = query(Dialect::Mysql)
        .from("sessions")
        .where_("expired", "=", true)
        .to_delete_sql()?;

    println!("[mutations]");
    println!("  {insert}");
    println!("  {update}");
    println!("  {delete}");
    println!();
    Ok(())
}

fn demo_unions_and_dialects() -> QueryResult<()> {
    let archived = query(Dialect::Mysql).from("archived_users");
    let union = query(Dialect::Mysql)
        .from("users")
        .union_all(archived)
        .to_select_sql()?;

    // The same chain under the base grammar: identifiers pass through.
    let generic = query(Dialect::from_name("sqlite"))
        .select_fields(["id", "users.name"])
        .from("users")
        .to_select_sql()?;

    println!("[unions and dialects]");
    println!("  {union}");
    println!("  {generic}");
    Ok(())
}

fn main() -> QueryResult<()> {
    demo_basic_select()?;
    demo_joins_and_groups()?;
    demo_subqueries()?;
    demo_nested_aggregates()?;
    demo_mutations()?;
    demo_unions_and_dialects()?;
    Ok(())
}
