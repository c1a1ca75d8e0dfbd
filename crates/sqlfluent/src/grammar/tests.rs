use super::*;
use crate::expression::raw;

#[test]
fn test_quote_plain_and_wildcard() {
    assert_eq!(wrap::quote('"', "users"), r#""users""#);
    assert_eq!(wrap::quote('"', "*"), "*");
    assert_eq!(wrap::quote('`', "users"), "`users`");
}

#[test]
fn test_quote_doubles_embedded_delimiter() {
    assert_eq!(wrap::quote('"', r#"some"table"#), r#""some""table""#);
    assert_eq!(wrap::quote('`', "a`b`c"), "`a``b``c`");
    // Only the grammar's own delimiter is doubled.
    assert_eq!(wrap::quote('`', r#"a"b"#), r#"`a"b`"#);
}

#[test]
fn test_wrap_dotted_column() {
    let g = AnsiGrammar::new();
    assert_eq!(g.wrap(&"users.id".into()), r#""users"."id""#);
    assert_eq!(g.wrap(&"db.users.id".into()), r#""db"."users"."id""#);
    assert_eq!(g.wrap(&"users.*".into()), r#""users".*"#);
}

#[test]
fn test_wrap_raw_passes_through() {
    let g = AnsiGrammar::new();
    assert_eq!(g.wrap(&raw("count(*)").into()), "count(*)");
    assert_eq!(g.wrap_table(&raw("(select 1) t").into()), "(select 1) t");
}

#[test]
fn test_wrap_column_alias_is_not_prefixed() {
    let g = AnsiGrammar::new().with_table_prefix("p_");
    assert_eq!(g.wrap(&"name as n".into()), r#""name" as "n""#);
    assert_eq!(g.wrap(&"users.name as n".into()), r#""p_users"."name" as "n""#);
}

#[test]
fn test_wrap_table_prefixes_table_and_alias() {
    let g = AnsiGrammar::new().with_table_prefix("p_");
    assert_eq!(g.wrap_table(&"users".into()), r#""p_users""#);
    assert_eq!(g.wrap_table(&"users as u".into()), r#""p_users" as "p_u""#);
}

#[test]
fn test_set_table_prefix() {
    let mut g: Box<dyn Grammar> = Box::new(MySqlGrammar::new());
    assert_eq!(g.table_prefix(), "");
    g.set_table_prefix("wp_");
    assert_eq!(g.table_prefix(), "wp_");
    assert_eq!(g.wrap_table(&"posts".into()), "`wp_posts`");

    let cloned = g.clone();
    assert_eq!(cloned.table_prefix(), "wp_");
}

#[test]
fn test_columnize() {
    let g = MySqlGrammar::new();
    let columns: Vec<Ident> = vec!["id".into(), "users.email".into(), raw("now()").into()];
    assert_eq!(g.columnize(&columns), "`id`, `users`.`email`, now()");
}

#[test]
fn test_parameterize_inlines_raw() {
    let g = AnsiGrammar::new();
    let values = vec![Value::from(1), Value::from(raw("now()")), Value::Null];
    assert_eq!(g.parameterize(&values), "?, now(), ?");
}

#[test]
fn test_dialect_from_str() {
    assert_eq!("mysql".parse::<Dialect>().unwrap(), Dialect::MySql);
    assert_eq!("MySQL".parse::<Dialect>().unwrap(), Dialect::MySql);
    assert_eq!("postgres".parse::<Dialect>().unwrap(), Dialect::Ansi);
    assert_eq!("postgresql".parse::<Dialect>().unwrap(), Dialect::Ansi);
    assert_eq!("pgsql".parse::<Dialect>().unwrap(), Dialect::Ansi);
}

#[test]
fn test_unknown_adapter_fails() {
    let err = "oracle".parse::<Dialect>().unwrap_err();
    assert!(matches!(err, QbError::UnsupportedAdapter(ref a) if a == "oracle"));
    assert!(grammar_for("sqlite").is_err());
}

#[test]
fn test_grammar_for_picks_quote_char() {
    assert_eq!(grammar_for("mysql").unwrap().quote_char(), '`');
    assert_eq!(grammar_for("postgres").unwrap().quote_char(), '"');
}

#[test]
fn test_select_components_order() {
    assert_eq!(Component::SELECT.first(), Some(&Component::Aggregate));
    assert_eq!(Component::SELECT.last(), Some(&Component::Lock));
}

#[test]
fn test_compile_limit_and_offset() {
    let g = AnsiGrammar::new();
    assert_eq!(g.compile_limit(10), "limit 10");
    assert_eq!(g.compile_offset(0), "offset 0");
}

#[test]
fn test_remove_leading_boolean() {
    assert_eq!(ansi::remove_leading_boolean("and a = ?"), "a = ?");
    assert_eq!(ansi::remove_leading_boolean("or a = ?"), "a = ?");
    assert_eq!(ansi::remove_leading_boolean("a = ?"), "a = ?");
}
