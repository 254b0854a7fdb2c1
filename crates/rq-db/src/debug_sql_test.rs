use super::*;
use crate::value::SqlValue;

#[test]
fn test_substitutes_and_escapes_quotes() {
    let sql = "SELECT * FROM t WHERE id=@id AND name=@name";
    let params = vec![Param::new("@id", 5), Param::new("@name", "O'Brien")];

    assert_eq!(
        query_to_debug_string(sql, &params),
        "SELECT * FROM t WHERE id='5' AND name='O''Brien'"
    );
}

#[test]
fn test_empty_string_becomes_null() {
    let sql = "SELECT * FROM t WHERE name=@name";
    let params = vec![Param::new("@name", "")];

    assert_eq!(
        query_to_debug_string(sql, &params),
        "SELECT * FROM t WHERE name=NULL"
    );
}

#[test]
fn test_null_value_becomes_null() {
    let params = vec![Param::new("@v", SqlValue::Null)];
    assert_eq!(
        query_to_debug_string("UPDATE t SET v=@v", &params),
        "UPDATE t SET v=NULL"
    );
}

#[test]
fn test_longest_name_substituted_first() {
    let sql = "SELECT * FROM t WHERE a=@id AND b=@identifier";
    // Short name listed first on purpose
    let params = vec![Param::new("@id", 1), Param::new("@identifier", 2)];

    assert_eq!(
        query_to_debug_string(sql, &params),
        "SELECT * FROM t WHERE a='1' AND b='2'"
    );
}

#[test]
fn test_every_occurrence_replaced() {
    let params = vec![Param::new("@x", 3)];
    assert_eq!(
        query_to_debug_string("SELECT @x + @x", &params),
        "SELECT '3' + '3'"
    );
}

#[test]
fn test_params_not_mutated() {
    let params = vec![Param::new("@b", 1), Param::new("@aaa", 2)];
    let before = params.clone();
    let _ = query_to_debug_string("SELECT @b, @aaa", &params);
    assert_eq!(params, before);
}

#[test]
fn test_empty_name_is_ignored() {
    let params = vec![Param::new("", 9)];
    assert_eq!(query_to_debug_string("SELECT 1", &params), "SELECT 1");
}

#[test]
fn test_no_params_returns_sql_unchanged() {
    assert_eq!(query_to_debug_string("SELECT 1", &[]), "SELECT 1");
}

#[test]
fn test_float_formatting_is_thread_independent() {
    let params = vec![Param::new("@f", 1234.5)];
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let params = params.clone();
            std::thread::spawn(move || {
                (0..100)
                    .map(|_| query_to_debug_string("SELECT @f", &params))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for rendered in handle.join().unwrap() {
            assert_eq!(rendered, "SELECT '1234.5'");
        }
    }
}
