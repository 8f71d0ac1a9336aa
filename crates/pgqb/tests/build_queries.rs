//! End-to-end statement building for a small account-management schema:
//! declare schemas once, build every statement family against them, and
//! check the exact SQL text a driver would receive.

use std::collections::HashMap;

use pgqb::{
    AuditColumns, AuditData, Filter, FilterRegistry, LikeMatch, Param, Schema, Sort, VarFormat,
    add_audit_to_insert, add_audit_to_update, and, bulk_insert, bulk_update, col, delete, equal,
    equal_filter, exclude_trashed, force_delete, greater_than_equal, in_list, insert, is_null,
    like_filter, on, only_trashed, or, params, prepare_audit_fields, rebind, restore, select,
    soft_delete, time_greater_than_equal_filter, update,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Serialize)]
struct Actor {
    id: i64,
    full_name: String,
}

fn actor() -> Actor {
    Actor {
        id: 1,
        full_name: "system".to_string(),
    }
}

fn user_schema() -> Schema {
    Schema::builder("user")
        .alias("user")
        .primary_key("id")
        .columns([
            "id",
            "xid",
            "full_name",
            "email",
            "role_id",
            "created_at",
            "created_by",
            "updated_at",
            "updated_by",
            "deleted_at",
        ])
        .soft_delete("deleted_at")
        .audit(AuditColumns::default())
        .build()
}

fn role_schema() -> Schema {
    Schema::builder("role")
        .alias("role")
        .primary_key("id")
        .columns(["id", "name", "created_at"])
        .build()
}

fn session_schema() -> Schema {
    Schema::builder("auth_session")
        .assigned_primary_key("token")
        .columns(["token", "user_id", "expired_at"])
        .build()
}

// ============================================
// SELECT
// ============================================

#[test]
fn list_endpoint_query() {
    let user = user_schema();
    let role = role_schema();

    let sql = select([user.col("xid"), user.col("email"), role.col("name")])
        .from(&user)
        .inner_join(&role, equal(user.col("role_id")).to(on("id")))
        .where_(exclude_trashed(&user).unwrap())
        .order_by(col("created_at"), Sort::Desc)
        .limit(20)
        .offset(40)
        .build();

    assert_eq!(
        sql,
        "SELECT \"user\".\"xid\", \"user\".\"email\", \"role\".\"name\" \
         FROM \"user\" AS \"user\" \
         INNER JOIN \"role\" AS \"role\" ON \"user\".\"role_id\" = \"role\".\"id\" \
         WHERE \"user\".\"deleted_at\" IS NULL \
         ORDER BY \"user\".\"created_at\" DESC LIMIT 20 OFFSET 40"
    );
}

#[test]
fn nested_conditions_and_rebinding() {
    let user = user_schema();

    let sql = select([col("*")])
        .from(&user)
        .where_(and([
            in_list(col("role_id"), 2),
            or([
                greater_than_equal(col("created_at")),
                is_null(col("deleted_at")),
            ]),
        ]))
        .build();

    assert_eq!(
        sql,
        "SELECT * FROM \"user\" AS \"user\" \
         WHERE \"user\".\"role_id\" IN (?, ?) \
         AND (\"user\".\"created_at\" >= ? OR \"user\".\"deleted_at\" IS NULL)"
    );
    assert_eq!(
        rebind(&sql),
        "SELECT * FROM \"user\" AS \"user\" \
         WHERE \"user\".\"role_id\" IN ($1, $2) \
         AND (\"user\".\"created_at\" >= $3 OR \"user\".\"deleted_at\" IS NULL)"
    );
}

#[test]
fn self_join_distinguishes_same_table_schemas() {
    let employee = Schema::builder("employee")
        .alias("emp")
        .primary_key("id")
        .columns(["id", "full_name", "manager_id"])
        .build();
    let manager = Schema::builder("employee")
        .alias("mgr")
        .primary_key("id")
        .columns(["id", "full_name", "manager_id"])
        .build();

    let sql = select([employee.col("full_name"), manager.col("full_name")])
        .from(&employee)
        .join(&manager, equal(employee.col("manager_id")).to(on("id")))
        .where_(is_null(manager.col("manager_id")))
        .build();

    assert_eq!(
        sql,
        "SELECT \"emp\".\"full_name\", \"mgr\".\"full_name\" \
         FROM \"employee\" AS \"emp\" \
         LEFT JOIN \"employee\" AS \"mgr\" ON \"emp\".\"manager_id\" = \"mgr\".\"id\" \
         WHERE \"mgr\".\"manager_id\" IS NULL"
    );
}

#[test]
fn trashed_rows_listing() {
    let user = user_schema();
    let sql = select([col("*")])
        .from(&user)
        .where_(only_trashed(&user).unwrap())
        .build();
    assert_eq!(
        sql,
        "SELECT * FROM \"user\" AS \"user\" WHERE \"user\".\"deleted_at\" IS NOT NULL"
    );
}

// ============================================
// INSERT / UPDATE with audit stamping
// ============================================

#[test]
fn create_flow_with_audit_columns() {
    let user = user_schema();
    let audit = AuditData::new()
        .created_by(&actor())
        .unwrap()
        .updated_by(&actor())
        .unwrap();

    let columns = add_audit_to_insert(&user, &["xid", "full_name", "email", "role_id"], &audit);
    let refs: Vec<&str> = columns.iter().map(String::as_str).collect();
    let sql = insert(&user, &refs).build();

    assert_eq!(
        sql,
        "INSERT INTO \"user\"(\"xid\", \"full_name\", \"email\", \"role_id\", \
         \"created_at\", \"created_by\", \"updated_at\", \"updated_by\") \
         VALUES (:xid, :full_name, :email, :role_id, \
         :created_at, :created_by, :updated_at, :updated_by) RETURNING \"id\""
    );

    let values = prepare_audit_fields(&user, &audit, false);
    let mut stamped: Vec<&str> = values.keys().map(String::as_str).collect();
    stamped.sort_unstable();
    assert_eq!(
        stamped,
        ["created_at", "created_by", "updated_at", "updated_by"]
    );
}

#[test]
fn update_flow_with_audit_columns() {
    let user = user_schema();
    let audit = AuditData::new().updated_by(&actor()).unwrap();

    let columns = add_audit_to_update(&user, &["full_name", "email"], &audit);
    let refs: Vec<&str> = columns.iter().map(String::as_str).collect();
    let sql = update(&user, &refs).build();

    assert_eq!(
        sql,
        "UPDATE \"user\" SET \"full_name\" = :full_name, \"email\" = :email, \
         \"updated_at\" = :updated_at, \"updated_by\" = :updated_by \
         WHERE \"id\" = :id"
    );

    let values = prepare_audit_fields(&user, &audit, true);
    assert_eq!(values.len(), 2);
}

#[test]
fn assigned_key_insert_has_no_returning() {
    let session = session_schema();
    let sql = insert(&session, &["*"]).build();
    assert_eq!(
        sql,
        "INSERT INTO \"auth_session\"(\"token\", \"user_id\", \"expired_at\") \
         VALUES (:token, :user_id, :expired_at)"
    );
}

#[test]
fn positional_update_for_prepared_reuse() {
    let user = user_schema();
    let sql = update(&user, &["email"])
        .format(VarFormat::Bind)
        .where_(equal(col("xid")))
        .build();
    assert_eq!(sql, "UPDATE \"user\" SET \"email\" = ? WHERE \"xid\" = ?");
    assert_eq!(
        rebind(&sql),
        "UPDATE \"user\" SET \"email\" = $1 WHERE \"xid\" = $2"
    );
}

// ============================================
// DELETE / soft delete lifecycle
// ============================================

#[test]
#[should_panic(expected = "has soft delete enabled")]
fn hard_delete_on_tombstoned_table_panics() {
    let user = user_schema();
    delete(&user);
}

#[test]
fn force_delete_and_session_cleanup() {
    let user = user_schema();
    let session = session_schema();

    assert_eq!(
        force_delete(&user).build(),
        "DELETE FROM \"user\" WHERE \"id\" = ?"
    );
    assert_eq!(
        delete(&session).where_(in_list(col("token"), 3)).build(),
        "DELETE FROM \"auth_session\" WHERE \"token\" IN (?, ?, ?)"
    );
}

#[test]
fn soft_delete_then_restore() {
    let user = user_schema();

    assert_eq!(
        soft_delete(&user).build(),
        "UPDATE \"user\" SET \"deleted_at\" = NOW() WHERE \"id\" = :id"
    );
    assert_eq!(
        restore(&user)
            .format(VarFormat::Bind)
            .where_(in_list(col("id"), 2))
            .build(),
        "UPDATE \"user\" SET \"deleted_at\" = NULL WHERE \"id\" IN (?, ?)"
    );
}

// ============================================
// Bulk statements
// ============================================

#[test]
fn seed_roles_in_bulk() {
    let role = role_schema();
    let rows: Vec<pgqb::BulkRow> = ["admin", "editor"]
        .iter()
        .map(|name| {
            let mut row = HashMap::new();
            row.insert("name".to_string(), Param::new(name.to_string()));
            row
        })
        .collect();

    let builder = bulk_insert(&role, &["name"]).values(rows);
    let keys: Vec<String> = builder.named_args().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["row0_name", "row1_name"]);
    assert_eq!(
        builder.build(),
        "INSERT INTO \"role\"(\"name\") VALUES (:row0_name), (:row1_name) RETURNING \"id\""
    );
}

#[test]
fn bulk_rename_users() {
    let user = user_schema();
    let rows: Vec<pgqb::BulkRow> = [(1i64, "Ann"), (2i64, "Ben")]
        .iter()
        .map(|(id, name)| {
            let mut row = HashMap::new();
            row.insert("id".to_string(), Param::new(*id));
            row.insert("full_name".to_string(), Param::new(name.to_string()));
            row
        })
        .collect();

    let builder = bulk_update(&user, &["full_name"]).values(rows);
    let keys: Vec<String> = builder.named_args().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["pk0", "row0_full_name", "pk1", "row1_full_name"]);
    assert_eq!(
        builder.build(),
        "UPDATE \"user\" SET \"full_name\" = CASE \
         WHEN \"id\" = :pk0 THEN :row0_full_name \
         WHEN \"id\" = :pk1 THEN :row1_full_name END \
         WHERE \"id\" IN (:pk0, :pk1)"
    );
}

// ============================================
// Querystring filters
// ============================================

#[test]
fn querystring_to_sql_round_trip() {
    let user = user_schema();
    let registry = FilterRegistry::new()
        .register(
            "name",
            like_filter(user.col("full_name"), LikeMatch::Substring),
        )
        .register("email", equal_filter(user.col("email")))
        .register(
            "since",
            time_greater_than_equal_filter(user.col("created_at"), &[]),
        );

    let mut query = HashMap::new();
    query.insert("name".to_string(), "ann".to_string());
    query.insert("email".to_string(), String::new());
    query.insert("since".to_string(), "2024-03-01".to_string());
    query.insert("page".to_string(), "2".to_string());

    let filter = Filter::from_query(&query, &registry);
    assert_eq!(filter.args().len(), 2);

    let sql = select([col("*")])
        .from(&user)
        .where_(filter.condition())
        .where_(exclude_trashed(&user).unwrap())
        .order_by(col("created_at"), Sort::Desc)
        .limit(20)
        .build();

    assert_eq!(
        rebind(&sql),
        "SELECT * FROM \"user\" AS \"user\" \
         WHERE (\"user\".\"full_name\" ILIKE $1 AND \"user\".\"created_at\" >= $2) \
         AND \"user\".\"deleted_at\" IS NULL \
         ORDER BY \"user\".\"created_at\" DESC LIMIT 20"
    );
}

// ============================================
// Parameter packing
// ============================================

#[test]
fn params_macro_accepts_driver_types() {
    let args = params![Uuid::new_v4(), "Ann", 42i64, 4.2f64];
    assert_eq!(args.len(), 4);
}
