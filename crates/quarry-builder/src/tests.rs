//! Golden-output tests for the SQL builders

use crate::select::Order;
use crate::QueryBuilder;

#[test]
fn test_select_distinct_with_inner_join() {
    let sql = QueryBuilder::mysql()
        .select("myTable")
        .alias("t")
        .distinct()
        .add(["t.a", "u.a"])
        .inner_join_on_column("t2", "u", "a", "t", "a")
        .to_sql();
    assert_eq!(
        sql,
        "SELECT DISTINCT t.a,u.a FROM `myTable` t INNER JOIN `t2` u ON u.a=t.a"
    );
}

#[test]
fn test_select_defaults_to_star() {
    let sql = QueryBuilder::mysql().select("accounts").to_sql();
    assert_eq!(sql, "SELECT * FROM `accounts`");
}

#[test]
fn test_select_where_order_limit() {
    let sql = QueryBuilder::mysql()
        .select("accounts")
        .add(["id", "name"])
        .and_where("rank > 3")
        .and_where("active = 1")
        .order_by("name", Order::Asc)
        .order_by("id", Order::Desc)
        .limit(10)
        .to_sql();
    assert_eq!(
        sql,
        "SELECT id,name FROM `accounts` WHERE rank > 3 AND active = 1 ORDER BY name,id DESC LIMIT 10"
    );
}

#[test]
fn test_insert_upsert_with_remove() {
    let sql = QueryBuilder::mysql()
        .insert("myTable")
        .add_auto_param(["a", "b"])
        .on_duplicate_key_update()
        .add_from_insert()
        .remove("a")
        .to_sql();
    assert_eq!(
        sql,
        "INSERT INTO `myTable` (`a`,`b`) VALUES (@a,@b) ON DUPLICATE KEY UPDATE `b`=@b"
    );
}

#[test]
fn test_insert_mixes_raw_values_and_params() {
    let sql = QueryBuilder::mysql()
        .insert("accounts")
        .add("created", "NOW()")
        .add_param("name", "account_name")
        .add_auto_param(["rank"])
        .to_sql();
    assert_eq!(
        sql,
        "INSERT INTO `accounts` (`created`,`name`,`rank`) VALUES (NOW(),@account_name,@rank)"
    );
}

#[test]
fn test_insert_remove_retracts_column_and_value() {
    let sql = QueryBuilder::mysql()
        .insert("myTable")
        .add_auto_param(["a", "b", "c"])
        .remove("b")
        .to_sql();
    assert_eq!(sql, "INSERT INTO `myTable` (`a`,`c`) VALUES (@a,@c)");
}

#[test]
fn test_insert_remove_twice_is_noop() {
    let sql = QueryBuilder::mysql()
        .insert("myTable")
        .add_auto_param(["a", "b"])
        .remove("a")
        .remove("a")
        .to_sql();
    assert_eq!(sql, "INSERT INTO `myTable` (`b`) VALUES (@b)");
}

#[test]
fn test_upsert_without_updates_renders_plain_insert() {
    let sql = QueryBuilder::mysql()
        .insert("myTable")
        .add_auto_param(["a"])
        .on_duplicate_key_update()
        .to_sql();
    assert_eq!(sql, "INSERT INTO `myTable` (`a`) VALUES (@a)");
}

#[test]
fn test_delete_where_limit() {
    let sql = QueryBuilder::mysql()
        .delete("myTable")
        .and_where("`a`=5")
        .limit(1)
        .to_sql();
    assert_eq!(sql, "DELETE FROM `myTable` WHERE `a`=5 LIMIT 1");
}

#[test]
fn test_update_auto_params_where_limit() {
    let sql = QueryBuilder::mysql()
        .update("accounts")
        .add_auto_param(["name", "rank"])
        .set("touched", "NOW()")
        .and_where("id = @id")
        .limit(1)
        .to_sql();
    assert_eq!(
        sql,
        "UPDATE `accounts` SET `name`=@name,`rank`=@rank,`touched`=NOW() WHERE id = @id LIMIT 1"
    );
}

#[test]
fn test_update_remove_assignment() {
    let sql = QueryBuilder::mysql()
        .update("accounts")
        .add_auto_param(["name", "rank"])
        .remove("rank")
        .to_sql();
    assert_eq!(sql, "UPDATE `accounts` SET `name`=@name");
}

#[test]
fn test_identifier_quoting_doubles_backticks() {
    let sql = QueryBuilder::mysql().delete("bad`name").to_sql();
    assert_eq!(sql, "DELETE FROM `bad``name`");
}

#[test]
fn test_output_is_deterministic() {
    let build = || {
        QueryBuilder::mysql()
            .select("t")
            .add(["a", "b"])
            .and_where("a = 1")
            .order_by("b", Order::Asc)
            .to_sql()
    };
    assert_eq!(build(), build());
}
