//! Declare a schema once, then build the statements a typical CRUD
//! handler needs. Run with `cargo run --example basic`.

use pgqb::{
    AuditColumns, AuditData, QbResult, Schema, Sort, add_audit_to_insert, col, equal,
    exclude_trashed, force_delete, insert, prepare_audit_fields, rebind, select, soft_delete,
    update,
};
use serde::Serialize;

#[derive(Serialize)]
struct Operator {
    id: i64,
    name: &'static str,
}

fn main() -> QbResult<()> {
    let user = Schema::builder("user")
        .alias("user")
        .primary_key("id")
        .columns([
            "id",
            "xid",
            "full_name",
            "email",
            "created_at",
            "created_by",
            "updated_at",
            "updated_by",
            "deleted_at",
        ])
        .soft_delete("deleted_at")
        .audit(AuditColumns::default())
        .build();

    // Listing: soft-deleted rows hidden, newest first.
    let mut list = select([col("*")]).from(&user).where_(equal(col("xid")));
    if let Some(hide_trashed) = exclude_trashed(&user) {
        list = list.where_(hide_trashed);
    }
    let list = list.order_by(col("created_at"), Sort::Desc).limit(20).build();
    println!("list:    {list}");
    println!("driver:  {}", rebind(&list));

    // Creation with audit stamping.
    let audit = AuditData::new().created_by(&Operator { id: 1, name: "cli" })?;
    let columns = add_audit_to_insert(&user, &["xid", "full_name", "email"], &audit);
    let refs: Vec<&str> = columns.iter().map(String::as_str).collect();
    println!("insert:  {}", insert(&user, &refs).build());

    let values = prepare_audit_fields(&user, &audit, false);
    let mut stamped: Vec<&str> = values.keys().map(String::as_str).collect();
    stamped.sort_unstable();
    println!("stamped: {stamped:?}");

    // Single-row update by primary key, named placeholders.
    println!("update:  {}", update(&user, &["full_name", "email"]).build());

    // Retiring a row keeps it around; only an explicit force removes it.
    println!("trash:   {}", soft_delete(&user).build());
    println!("purge:   {}", force_delete(&user).build());

    Ok(())
}
