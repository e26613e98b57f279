use dynfilter_core::{
    apply_filters, filter_indices, Condition, ConditionId, FieldValue, FilterModel, Operator,
    Predicate, Row, Scalar, Schema, StaticRows, StaticSchema, ValueType,
};

const SCHEMA: &str = include_str!("fixtures/schema.json");
const ROWS: &str = include_str!("fixtures/transactions.json");

fn rows() -> Vec<Row> {
    Row::parse_many(ROWS).unwrap()
}

fn ids(rows: &[Row], conditions: &[Condition]) -> Vec<String> {
    apply_filters(rows, conditions)
        .into_iter()
        .map(|row| row.get("id").map(FieldValue::to_text).unwrap_or_default())
        .collect()
}

fn cond(id: u64, key: &str, predicate: Predicate) -> Condition {
    Condition::with_predicate(ConditionId::Seq(id), key, predicate)
}

#[test]
fn fixtures_load() {
    let schema = Schema::from_json(SCHEMA).unwrap();
    let rows = rows();
    assert_eq!(schema.len(), 10);
    assert_eq!(rows.len(), 10);
    assert_eq!(schema.column("valor").unwrap().ty, ValueType::Number);
    let fields: Vec<&str> = rows.iter().flat_map(Row::field_names).collect();
    schema.ensure_fields(fields).unwrap();
}

#[test]
fn status_equals_active() {
    let rows = rows();
    let c = cond(0, "status", Predicate::Equals("ativo".into()));
    assert_eq!(ids(&rows, &[c]), ["1", "3", "4", "5", "7", "9"]);
}

#[test]
fn tax_regime_in_prc() {
    let rows = rows();
    let c = cond(0, "regimeTributacao", Predicate::In(vec![Scalar::str("prc")]));
    assert_eq!(ids(&rows, &[c]), ["1", "3", "5", "7", "10"]);
}

#[test]
fn amount_between() {
    let rows = rows();
    let c = cond(
        0,
        "valor",
        Predicate::Between {
            min: 10000.0.into(),
            max: Some(20000.0.into()),
        },
    );
    assert_eq!(ids(&rows, &[c]), ["1", "4", "7", "10"]);
}

#[test]
fn recipient_city_contains() {
    let rows = rows();
    let sh = cond(0, "cidadeDestinatario", Predicate::Contains("sh".into()));
    assert_eq!(ids(&rows, &[sh]), ["3", "8"]);
    let sha = cond(0, "cidadeDestinatario", Predicate::Contains("sha".into()));
    assert_eq!(ids(&rows, &[sha]), ["3"]);
}

#[test]
fn conditions_are_anded() {
    let rows = rows();
    let conditions = [
        cond(0, "status", Predicate::Equals("ativo".into())),
        cond(1, "paisDestinatario", Predicate::Equals("cn".into())),
    ];
    assert_eq!(ids(&rows, &conditions), ["1", "3", "7"]);
}

#[test]
fn no_conditions_keep_everything() {
    let rows = rows();
    assert_eq!(apply_filters(&rows, &[]).len(), rows.len());
    assert_eq!(filter_indices(&rows, &Vec::<Condition>::new()), (0..10).collect::<Vec<_>>());
}

#[test]
fn order_does_not_matter() {
    let rows = rows();
    let a = cond(0, "prc", Predicate::Equals("sim".into()));
    let b = cond(1, "valor", Predicate::GreaterThan(10000.0.into()));
    let c = cond(2, "cidadeRemetente", Predicate::NotContains("paulo".into()));
    let forward = ids(&rows, &[a.clone(), b.clone(), c.clone()]);
    let backward = ids(&rows, &[c, b, a]);
    assert_eq!(forward, backward);
    assert_eq!(forward, ["7", "10"]);
}

#[test]
fn combined_is_intersection() {
    let rows = rows();
    let a = cond(0, "status", Predicate::Equals("ativo".into()));
    let b = cond(1, "regimeTributacao", Predicate::In(vec![Scalar::str("prc")]));
    let only_a = filter_indices(&rows, [&a]);
    let only_b = filter_indices(&rows, [&b]);
    let both = filter_indices(&rows, [&a, &b]);
    let expected: Vec<usize> = only_a.into_iter().filter(|i| only_b.contains(i)).collect();
    assert_eq!(both, expected);
}

#[test]
fn in_and_not_in_partition_rows() {
    let rows = rows();
    let values = vec![Scalar::str("simples"), Scalar::str("outro1")];
    let inside = filter_indices(&rows, [&cond(0, "regimeTributacao", Predicate::In(values.clone()))]);
    let outside = filter_indices(&rows, [&cond(0, "regimeTributacao", Predicate::NotIn(values))]);
    assert_eq!(inside.len() + outside.len(), rows.len());
    assert!(inside.iter().all(|i| !outside.contains(i)));
}

#[test]
fn text_matching_ignores_case() {
    let rows = rows();
    let upper = cond(0, "cidadeRemetente", Predicate::Contains("SÃO".into()));
    let lower = cond(0, "cidadeRemetente", Predicate::Contains("são".into()));
    assert_eq!(ids(&rows, &[upper]), ["1", "5", "9"]);
    assert_eq!(ids(&rows, &[lower]), ["1", "5", "9"]);
}

#[test]
fn dates_do_not_compare_numerically() {
    let rows = rows();
    let c = cond(0, "data", Predicate::GreaterThan("2025-01-01".into()));
    assert!(ids(&rows, &[c]).is_empty());
    let c = cond(0, "data", Predicate::StartsWith("2025-02".into()));
    assert_eq!(ids(&rows, &[c]), ["2", "5", "8", "10"]);
}

#[test]
fn conditions_decode_from_records() {
    let rows = rows();
    let conditions: Vec<Condition> = serde_json::from_str(
        r#"[
            {"id": "filter-0", "columnKey": "paisDestinatario", "operator": "in", "values": ["us", "jp"]},
            {"id": "filter-1", "columnKey": "valor", "operator": "lessThan", "value": 30000},
            {"id": "filter-2", "columnKey": "cidade", "operator": "fuzzy", "value": "x"}
        ]"#,
    )
    .unwrap();
    assert_eq!(conditions[2].predicate, Predicate::Unrecognized("fuzzy".to_string()));
    assert_eq!(ids(&rows, &conditions), ["2", "9"]);
}

#[test]
fn model_session_round() {
    let schema = Schema::from_json(SCHEMA).unwrap();
    let mut model = FilterModel::new(StaticSchema::new(schema), StaticRows::new(rows()));
    model.poll();
    assert_eq!(model.visible_rows().len(), 10);

    let session = model.session_mut();
    let id = session.add_condition().unwrap();
    assert_eq!(session.get(&id).unwrap().column_key, "cidade");
    session.change_column(&id, "status");
    assert_eq!(session.get(&id).unwrap().operator(), Some(Operator::Equals));
    session.set_predicate(&id, Predicate::Equals("pendente".into()));
    let id = session.add_condition().unwrap();
    session.change_column(&id, "valor");
    session.change_operator(&id, Operator::GreaterThan);
    session.set_predicate(&id, Predicate::GreaterThan(20000.0.into()));

    model.apply();
    let visible: Vec<String> = model
        .visible_rows()
        .filter_map(|row| row.get("id").map(FieldValue::to_text))
        .collect();
    assert_eq!(visible, ["2", "6"]);

    model.session_mut().clear_all();
    assert_eq!(model.visible_rows().len(), 2);
    model.apply();
    assert_eq!(model.visible_rows().len(), 10);
}
