//! Integration tests for dtype-preserving merges

use kolosal_tabular::prelude::*;

fn primary() -> Table {
    Table::new(vec![
        Column::new("id", vec![1i64]),
        Column::new("a", vec![10i8]),
    ])
    .unwrap()
}

#[test]
fn test_matching_row() {
    let secondary = Table::new(vec![
        Column::new("id", vec![1i64]),
        Column::new("b", vec![20i16]),
    ])
    .unwrap();

    let merged = merge_preserving_types(primary(), &secondary, &["id"]).unwrap();
    assert_eq!(merged.get_column_names(), vec!["id", "a", "b"]);
    assert_eq!(merged.dtypes(), vec![DType::Int64, DType::Int8, DType::Int16]);
    assert_eq!(merged.column("b").unwrap().data(), &ColumnData::Int16(vec![Some(20)]));
}

#[test]
fn test_unmatched_row_gets_missing_value() {
    let secondary = Table::new(vec![
        Column::new("id", vec![2i64]),
        Column::new("b", vec![20i16]),
    ])
    .unwrap();

    let merged = merge_preserving_types(primary(), &secondary, &["id"]).unwrap();
    assert_eq!(merged.height(), 1);
    assert_eq!(merged.column("a").unwrap().data(), &ColumnData::Int8(vec![Some(10)]));
    assert_eq!(merged.column("b").unwrap().data(), &ColumnData::Int16(vec![None]));
}

#[test]
fn test_left_join_keeps_row_count_and_order() {
    let primary = Table::new(vec![
        Column::new("store", vec!["x", "y", "x", "z"]),
        Column::new("day", vec![1i32, 1, 2, 1]),
        Column::new("sales", vec![5.0f32, 6.0, 7.0, 8.0]),
    ])
    .unwrap();
    let secondary = Table::new(vec![
        Column::new("day", vec![2i32, 1]),
        Column::new("store", vec!["x", "x"]),
        Column::new("price", vec![1.25f64, 1.5]),
        Column::new("promo", vec![true, false]),
    ])
    .unwrap();

    let merged = merge_preserving_types(primary, &secondary, &["store", "day"]).unwrap();
    assert_eq!(merged.height(), 4);
    assert_eq!(merged.get_column_names(), vec!["store", "day", "sales", "price", "promo"]);
    assert_eq!(merged.column("sales").unwrap().dtype(), DType::Float32);
    assert_eq!(
        merged.column("price").unwrap().data(),
        &ColumnData::Float64(vec![Some(1.5), None, Some(1.25), None])
    );
    assert_eq!(
        merged.column("promo").unwrap().data(),
        &ColumnData::Boolean(vec![Some(false), None, Some(true), None])
    );
}

#[test]
fn test_null_keys_never_match() {
    let primary = Table::new(vec![Column::new("k", vec![None, Some("a")])]).unwrap();
    let secondary = Table::new(vec![
        Column::new("k", vec![None, Some("a")]),
        Column::new("v", vec![1i32, 2]),
    ])
    .unwrap();

    let merged = merge_preserving_types(primary, &secondary, &["k"]).unwrap();
    assert_eq!(merged.column("v").unwrap().data(), &ColumnData::Int32(vec![None, Some(2)]));
}

#[test]
fn test_merge_after_downcast_keeps_narrow_types() {
    let downcaster = Downcaster::new(DowncastConfig::default().with_verbose(false));
    let primary = downcaster.downcast(primary()).unwrap();
    let secondary = Table::new(vec![
        Column::new("id", vec![1i64]),
        Column::new("b", vec![0.5f64]),
    ])
    .unwrap();

    let merged = merge_preserving_types(primary, &secondary, &["id"]).unwrap();
    assert_eq!(merged.dtypes(), vec![DType::Int8, DType::Int8, DType::Float64]);
}

#[test]
fn test_missing_key_column() {
    let secondary = Table::new(vec![Column::new("other", vec![1i64])]).unwrap();
    let result = merge_preserving_types(primary(), &secondary, &["id"]);
    assert!(matches!(result, Err(TabularError::ColumnNotFound(name)) if name == "id"));
}

#[test]
fn test_empty_keys_rejected() {
    let result = merge_preserving_types(primary(), &primary(), &[]);
    assert!(matches!(result, Err(TabularError::InvalidInput(_))));
}

#[test]
fn test_matched_duplicate_secondary_key_rejected() {
    let secondary = Table::new(vec![
        Column::new("id", vec![1i64, 1]),
        Column::new("b", vec![1i32, 2]),
    ])
    .unwrap();
    let result = merge_preserving_types(primary(), &secondary, &["id"]);
    assert!(matches!(result, Err(TabularError::DuplicateJoinKey { row: 0 })));
}

#[test]
fn test_unmatched_duplicate_secondary_key_allowed() {
    let secondary = Table::new(vec![
        Column::new("id", vec![1i64, 2, 2]),
        Column::new("b", vec![10i32, 20, 30]),
    ])
    .unwrap();

    let merged = merge_preserving_types(primary(), &secondary, &["id"]).unwrap();
    assert_eq!(merged.height(), 1);
    assert_eq!(merged.column("b").unwrap().data(), &ColumnData::Int32(vec![Some(10)]));
}

#[test]
fn test_clashing_column_name_rejected() {
    let secondary = Table::new(vec![
        Column::new("id", vec![1i64]),
        Column::new("a", vec![99i8]),
    ])
    .unwrap();
    let result = merge_preserving_types(primary(), &secondary, &["id"]);
    assert!(matches!(result, Err(TabularError::DuplicateColumn(name)) if name == "a"));
}
