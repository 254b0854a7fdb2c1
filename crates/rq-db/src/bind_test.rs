use super::*;

fn values(bound: &BoundStatement<'_>) -> Vec<SqlValue> {
    bound.values.iter().map(|v| (*v).clone()).collect()
}

#[test]
fn test_named_params_become_positional() {
    let params = vec![Param::new("@id", 5), Param::new("@name", "a")];
    let bound = bind_parameters("SELECT * FROM t WHERE id = @id AND name = @name", &params);

    assert_eq!(bound.sql, "SELECT * FROM t WHERE id = $1 AND name = $2");
    assert_eq!(values(&bound), vec![SqlValue::Int(5), SqlValue::Text("a".into())]);
}

#[test]
fn test_numbering_follows_first_appearance() {
    let params = vec![Param::new("@a", 1), Param::new("@b", 2)];
    let bound = bind_parameters("SELECT @b, @a, @b", &params);

    assert_eq!(bound.sql, "SELECT $1, $2, $1");
    assert_eq!(values(&bound), vec![SqlValue::Int(2), SqlValue::Int(1)]);
}

#[test]
fn test_prefix_names_do_not_collide() {
    let params = vec![Param::new("@id", 1), Param::new("@identifier", 2)];
    let bound = bind_parameters("SELECT @identifier, @id", &params);

    assert_eq!(bound.sql, "SELECT $1, $2");
    assert_eq!(values(&bound), vec![SqlValue::Int(2), SqlValue::Int(1)]);
}

#[test]
fn test_tokens_inside_literals_untouched() {
    let params = vec![Param::new("@id", 1)];
    let bound = bind_parameters("SELECT '@id', \"@id\", 'it''s @id', @id", &params);

    assert_eq!(bound.sql, "SELECT '@id', \"@id\", 'it''s @id', $1");
    assert_eq!(values(&bound).len(), 1);
}

#[test]
fn test_unknown_token_kept() {
    let params = vec![Param::new("@id", 1)];
    let bound = bind_parameters("SELECT @other", &params);

    assert_eq!(bound.sql, "SELECT @other");
    assert!(bound.values.is_empty());
}

#[test]
fn test_question_marks_bind_all_in_order() {
    let params = vec![Param::new("", 1), Param::new("", "x")];
    let bound = bind_parameters("INSERT INTO t VALUES (?, ?)", &params);

    assert_eq!(bound.sql, "INSERT INTO t VALUES (?, ?)");
    assert_eq!(values(&bound), vec![SqlValue::Int(1), SqlValue::Text("x".into())]);
}

#[test]
fn test_unreferenced_params_not_bound() {
    let params = vec![Param::new("@id", 1)];
    let bound = bind_parameters("CREATE TABLE t (id INT)", &params);

    assert_eq!(bound.sql, "CREATE TABLE t (id INT)");
    assert!(bound.values.is_empty());
}

#[test]
fn test_cast_syntax_left_alone() {
    let params = vec![Param::new("@v", "3")];
    let bound = bind_parameters("SELECT @v::INTEGER", &params);

    assert_eq!(bound.sql, "SELECT $1::INTEGER");
}

#[test]
fn test_apostrophe_in_comments_does_not_hide_params() {
    let params = vec![Param::new("@id", 1), Param::new("@name", "a")];
    let bound = bind_parameters(
        "-- don't touch @id here\nSELECT @id /* it's @name */, @name",
        &params,
    );

    assert_eq!(
        bound.sql,
        "-- don't touch @id here\nSELECT $1 /* it's @name */, $2"
    );
    assert_eq!(values(&bound), vec![SqlValue::Int(1), SqlValue::Text("a".into())]);
}

#[test]
fn test_markers_inside_comments_do_not_count() {
    let params = vec![Param::new("@x", 1)];
    let bound = bind_parameters("SELECT 1 -- is it ?\n/* or $1 */", &params);

    assert!(bound.values.is_empty());
}

#[test]
fn test_unterminated_block_comment_runs_to_end() {
    let params = vec![Param::new("@x", 1)];
    let bound = bind_parameters("SELECT 1 /* @x", &params);

    assert_eq!(bound.sql, "SELECT 1 /* @x");
    assert!(bound.values.is_empty());
}
