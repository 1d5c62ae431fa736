//! Scenario tests for the public builder surface.

use esmapper::{
    Bucket, ClauseOptions, Comparison, Dir, IndexConfig, Params, QueryBuilder, QueryDsl,
    QueryError, RangeOp, Tool,
};
use serde_json::{json, Value};

// ============================================================================
// Helpers
// ============================================================================

fn filter_bucket(query: &QueryBuilder, bucket: &str) -> Value {
    query.to_value()["query"]["bool"]["filter"]["bool"][bucket].clone()
}

fn query_bucket(query: &QueryBuilder, bucket: &str) -> Value {
    query.to_value()["query"]["bool"][bucket].clone()
}

// ============================================================================
// Term fan-out
// ============================================================================

#[test]
fn term_single_key_single_value() {
    let mut query = QueryBuilder::new();
    query.term("name", "Muhannad Shelleh").unwrap();
    assert_eq!(
        query.to_json().unwrap(),
        r#"{"query":{"bool":{"must":[{"term":{"name":{"value":"Muhannad Shelleh"}}}]}}}"#
    );
}

#[test]
fn term_many_keys_single_value() {
    let mut query = QueryBuilder::new();
    query.term(["name", "email"], "Muhannad Shelleh").unwrap();
    assert_eq!(
        filter_bucket(&query, "must"),
        json!([{"or": [
            {"term": {"name": {"value": "Muhannad Shelleh"}}},
            {"term": {"email": {"value": "Muhannad Shelleh"}}}
        ]}])
    );
    assert_eq!(query_bucket(&query, "must"), Value::Null);
}

#[test]
fn term_many_keys_many_values() {
    let mut query = QueryBuilder::new();
    query
        .term(["name", "email"], ["Muhannad", "Shelleh"])
        .unwrap();
    assert_eq!(
        filter_bucket(&query, "must"),
        json!([{"or": [
            {"or": [
                {"term": {"name": {"value": "Muhannad"}}},
                {"term": {"name": {"value": "Shelleh"}}}
            ]},
            {"or": [
                {"term": {"email": {"value": "Muhannad"}}},
                {"term": {"email": {"value": "Shelleh"}}}
            ]}
        ]}])
    );
}

#[test]
fn fan_out_keeps_bucket_and_params() {
    let mut query = QueryBuilder::new();
    query
        .term_with(
            "tag",
            vec!["a", "b"],
            ClauseOptions::must_not().with_param("boost", 3),
        )
        .unwrap();
    assert_eq!(
        filter_bucket(&query, "must_not"),
        json!([{"or": [
            {"term": {"tag": {"value": "a", "boost": 3}}},
            {"term": {"tag": {"value": "b", "boost": 3}}}
        ]}])
    );
}

// ============================================================================
// Sub-queries
// ============================================================================

#[test]
fn or_where_with_matches() {
    let mut query = QueryBuilder::new();
    query
        .or_where()
        .where_("name", "Shehab", "*")
        .unwrap()
        .where_("email", "mhh1422", "*")
        .unwrap()
        .end_sub_query()
        .unwrap();
    assert_eq!(
        query.to_value(),
        json!({"query": {"bool": {"filter": {"bool": {"must": [
            {"or": [
                {"match": {"name": {"query": "Shehab"}}},
                {"match": {"email": {"query": "mhh1422"}}}
            ]}
        ]}}}}})
    );
}

#[test]
fn or_where_with_terms() {
    let mut query = QueryBuilder::new();
    query
        .or_where()
        .where_("name", "Muhannad Shelleh", "=")
        .unwrap()
        .where_("email", "muhannad.shelleh@live.com", "=")
        .unwrap()
        .end_sub_query()
        .unwrap();
    assert_eq!(
        filter_bucket(&query, "must"),
        json!([{"or": [
            {"term": {"name": {"value": "Muhannad Shelleh"}}},
            {"term": {"email": {"value": "muhannad.shelleh@live.com"}}}
        ]}])
    );
}

#[test]
fn or_where_with_prefix_and_like() {
    let mut query = QueryBuilder::new();
    query
        .or_where()
        .where_("name", "Muhannad", "=*")
        .unwrap()
        .where_("email", "hotmail", "*=*")
        .unwrap()
        .end_sub_query()
        .unwrap();
    assert_eq!(
        filter_bucket(&query, "must"),
        json!([{"or": [
            {"query": {"prefix": {"name": {"value": "Muhannad"}}}},
            {"wildcard": {"email": {"wildcard": "*hotmail*"}}}
        ]}])
    );
}

#[test]
fn and_where_in_must_not_with_params() {
    let mut params = Params::new();
    params.insert("_name".into(), json!("excluded"));
    let mut query = QueryBuilder::new();
    query
        .and_where_with(Bucket::MustNot, params)
        .where_("status", "deleted", "=")
        .unwrap()
        .where_("age", 100, ">")
        .unwrap()
        .end_sub_query()
        .unwrap();
    assert_eq!(
        filter_bucket(&query, "must_not"),
        json!([{"and": {
            "filters": [
                {"term": {"status": {"value": "deleted"}}},
                {"range": {"age": {"gt": 100}}}
            ],
            "_name": "excluded"
        }}])
    );
}

#[test]
fn nested_sub_queries() {
    let mut query = QueryBuilder::new();
    {
        let mut outer = query.and_where();
        outer.where_("status", "active", "=").unwrap();
        outer
            .or_where()
            .where_("role", "admin", "=")
            .unwrap()
            .where_("role", "owner", "=")
            .unwrap()
            .end_sub_query()
            .unwrap();
        outer.end_sub_query().unwrap();
    }
    assert_eq!(
        filter_bucket(&query, "must"),
        json!([{"and": [
            {"term": {"status": {"value": "active"}}},
            {"or": [
                {"term": {"role": {"value": "admin"}}},
                {"term": {"role": {"value": "owner"}}}
            ]}
        ]}])
    );
}

#[test]
fn sub_query_cannot_be_ended_twice() {
    let mut query = QueryBuilder::new();
    {
        let mut sub = query.or_where();
        sub.term("a", 1).unwrap();
        sub.end_sub_query().unwrap();
        let err = sub.end_sub_query().unwrap_err();
        assert!(matches!(err, QueryError::SubQueryConsumed));
        assert!(err.is_protocol_misuse());
    }
    assert_eq!(filter_bucket(&query, "must").as_array().map(Vec::len), Some(1));
}

// ============================================================================
// Ranges
// ============================================================================

#[test]
fn range_pairs_and_errors() {
    let mut query = QueryBuilder::new();
    query
        .range_with(
            "age",
            [RangeOp::Gte, RangeOp::Lte],
            [10, 20],
            ClauseOptions::new().with_filter(true),
        )
        .unwrap();
    assert_eq!(
        filter_bucket(&query, "must"),
        json!([{"range": {"age": {"gte": 10, "lte": 20}}}])
    );

    let before = query.clone();
    assert!(query.range("age", RangeOp::Gt, [1, 2]).is_err());
    assert!(query.range("age", [RangeOp::Gt, RangeOp::Lt], 1).is_err());
    assert_eq!(query, before);
}

#[test]
fn range_operators_parse_from_strings() {
    let ops: Vec<RangeOp> = ["gt", "lte"]
        .iter()
        .map(|op| op.parse().unwrap())
        .collect();
    let mut query = QueryBuilder::new();
    query.range("price", ops.as_slice(), [1.5, 9.5]).unwrap();
    assert_eq!(
        query_bucket(&query, "must"),
        json!([{"range": {"price": {"gt": 1.5, "lte": 9.5}}}])
    );
}

#[test]
fn range_over_many_keys() {
    let mut query = QueryBuilder::new();
    query
        .range(["created", "updated"], RangeOp::Gte, "2024-01-01")
        .unwrap();
    assert_eq!(
        filter_bucket(&query, "must"),
        json!([{"or": [
            {"range": {"created": {"gte": "2024-01-01"}}},
            {"range": {"updated": {"gte": "2024-01-01"}}}
        ]}])
    );
}

#[test]
fn empty_lists_are_rejected_without_inserting() {
    let no_keys: Vec<&str> = Vec::new();
    let no_values: Vec<&str> = Vec::new();

    let mut query = QueryBuilder::new();
    query.size(5);
    let before = query.clone();

    let err = query.term("tag", no_values.clone()).unwrap_err();
    assert!(matches!(err, QueryError::EmptyList("value")));
    assert!(matches!(
        query.match_(no_keys.clone(), "rust"),
        Err(QueryError::EmptyList("key"))
    ));
    assert!(query.where_("tag", no_values.clone(), "like").is_err());
    assert!(query.terms("tag", no_values.clone()).is_err());
    assert!(query.multi_match(no_keys.clone(), "rust").is_err());
    assert!(query.multi_matches(["a", "b"], no_values).is_err());
    assert!(matches!(
        query.range("age", Vec::<RangeOp>::new(), Vec::<i64>::new()),
        Err(QueryError::EmptyList("range operator"))
    ));
    assert!(query.range(no_keys, RangeOp::Gt, 1).is_err());
    assert_eq!(query, before);
}

#[test]
fn empty_list_inside_sub_query_leaves_group_untouched() {
    let mut query = QueryBuilder::new();
    {
        let mut sub = query.or_where();
        sub.term("a", 1).unwrap();
        assert!(sub.term("b", Vec::<&str>::new()).is_err());
        sub.end_sub_query().unwrap();
    }
    assert_eq!(
        filter_bucket(&query, "must"),
        json!([{"or": [{"term": {"a": {"value": 1}}}]}])
    );
}

// ============================================================================
// Comparison tokens
// ============================================================================

#[test]
fn comparison_table_through_where() {
    let cases: &[(&str, Value)] = &[
        ("<", json!({"range": {"f": {"lt": 5}}})),
        ("lte", json!({"range": {"f": {"lte": 5}}})),
        ("rx", json!({"query": {"regexp": {"f": {"value": 5}}}})),
        ("starts_with", json!({"query": {"prefix": {"f": {"value": 5}}}})),
        ("whatever", json!({"term": {"f": {"value": 5}}})),
    ];
    for (token, expected) in cases {
        let mut query = QueryBuilder::new();
        query.where_("f", 5, token).unwrap();
        assert_eq!(&filter_bucket(&query, "must")[0], expected, "token {token}");
    }
}

#[test]
fn comparison_is_public() {
    let parsed = Comparison::from("?between_to");
    assert_eq!(parsed.bucket, Bucket::Should);
    assert_eq!(parsed.tool, Tool::Range(&[RangeOp::Gt, RangeOp::Lte]));
}

#[test]
fn suffix_decoration_skips_booleans() {
    let mut query = QueryBuilder::new();
    query.where_("flag", true, "*=").unwrap();
    assert_eq!(
        query_bucket(&query, "must"),
        json!([{"wildcard": {"flag": {"wildcard": true}}}])
    );
}

// ============================================================================
// Document-level operations
// ============================================================================

#[test]
fn full_document() {
    let mut query = QueryBuilder::new();
    query
        .where_("status", "published", "=")
        .unwrap()
        .match_("title", "rust")
        .unwrap()
        .sort("date", Dir::Desc)
        .unwrap()
        .page(Some(10), Some(30));
    assert_eq!(
        query.to_value(),
        json!({
            "query": {"bool": {
                "filter": {"bool": {"must": [{"term": {"status": {"value": "published"}}}]}},
                "must": [{"match": {"title": {"query": "rust"}}}]
            }},
            "sort": [{"date": "desc"}],
            "size": 10,
            "from": 30
        })
    );
}

#[test]
fn builder_from_config_base() {
    let config = IndexConfig::from_yaml_str("index: tests\nbase_query:\n  size: 3\n").unwrap();
    let mut query = QueryBuilder::with_base(&config.base_query);
    query.term("alive", false).unwrap();
    assert_eq!(query.document()["size"], json!(3));
}
