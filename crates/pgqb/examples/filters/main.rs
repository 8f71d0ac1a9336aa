//! Translate HTTP query parameters into a WHERE clause through a filter
//! registry. Run with `cargo run --example filters`.

use std::collections::HashMap;

use pgqb::{
    Filter, FilterRegistry, LikeMatch, Schema, Sort, col, equal_filter,
    int_greater_than_equal_filter, like_filter, rebind, select,
    time_greater_than_equal_filter, time_less_than_equal_filter,
};

fn main() {
    let user = Schema::builder("user")
        .alias("user")
        .primary_key("id")
        .columns(["id", "xid", "full_name", "email", "age", "created_at"])
        .build();

    // Registered once at startup; registration order is placeholder order.
    let registry = FilterRegistry::new()
        .register(
            "name",
            like_filter(user.col("full_name"), LikeMatch::Substring),
        )
        .register("email", equal_filter(user.col("email")))
        .register("min_age", int_greater_than_equal_filter(user.col("age")))
        .register(
            "since",
            time_greater_than_equal_filter(user.col("created_at"), &[]),
        )
        .register(
            "until",
            time_less_than_equal_filter(user.col("created_at"), &["%d/%m/%Y"]),
        );

    // What an HTTP handler would hand over. `page` has no parser, `email`
    // is empty, and `min_age` does not parse; all three drop out silently.
    let mut query = HashMap::new();
    query.insert("name".to_string(), "ann".to_string());
    query.insert("email".to_string(), String::new());
    query.insert("min_age".to_string(), "abc".to_string());
    query.insert("since".to_string(), "2024-03-01".to_string());
    query.insert("until".to_string(), "31/12/2024".to_string());
    query.insert("page".to_string(), "2".to_string());

    let filter = Filter::from_query(&query, &registry);
    println!("conditions: {}", filter.condition().render());
    println!("arguments:  {}", filter.args().len());

    let sql = select([col("*")])
        .from(&user)
        .where_(filter.condition())
        .order_by(col("created_at"), Sort::Desc)
        .limit(25)
        .build();

    println!("query:      {sql}");
    println!("driver:     {}", rebind(&sql));
}
