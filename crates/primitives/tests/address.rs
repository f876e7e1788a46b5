use datagrid_primitives::{
    column_headers, column_index_to_letters, column_letters_to_index, AddressError, CellAddress,
    CellRange,
};

#[test]
fn test_column_letters_roundtrip() {
    for index in [0, 1, 25, 26, 27, 51, 52, 701, 702, 16_383] {
        let letters = column_index_to_letters(index);
        assert_eq!(column_letters_to_index(&letters).unwrap(), index);
    }
    assert_eq!(column_index_to_letters(25), "Z");
    assert_eq!(column_index_to_letters(26), "AA");
    assert_eq!(column_index_to_letters(701), "ZZ");
    assert_eq!(column_index_to_letters(702), "AAA");
}

#[test]
fn test_column_letters_lowercase_and_invalid() {
    assert_eq!(column_letters_to_index("ab").unwrap(), 27);
    assert!(matches!(
        column_letters_to_index("A1"),
        Err(AddressError::InvalidColumn(_))
    ));
    assert!(column_letters_to_index("").is_err());
}

#[test]
fn test_column_headers() {
    assert_eq!(column_headers(3), vec!["A", "B", "C"]);
    assert_eq!(column_headers(28)[27], "AB");
    assert!(column_headers(0).is_empty());
}

#[test]
fn test_cell_address_from_a1() {
    assert_eq!(CellAddress::from_a1("B2").unwrap(), CellAddress::new(1, 1));
    assert_eq!(CellAddress::from_a1(" aa10 ").unwrap(), CellAddress::new(9, 26));
    assert_eq!(CellAddress::new(0, 0).to_a1(), "A1");
    assert!(CellAddress::from_a1("A0").is_err());
    assert!(CellAddress::from_a1("12").is_err());
    assert!(CellAddress::from_a1("B").is_err());
    assert!(CellAddress::from_a1("B2x").is_err());
}

#[test]
fn test_cell_range_from_a1() {
    let range = CellRange::from_a1("C3:A1").unwrap();
    assert_eq!(range.normalized().start, CellAddress::new(0, 0));
    assert_eq!(range.size(), 9);
    assert_eq!(range.to_string(), "C3:A1");

    let single = CellRange::from_a1("D4").unwrap();
    assert!(!single.is_multi_cell());
    assert_eq!(single.size(), 1);
}

#[test]
fn test_address_serde_shape() {
    let json = serde_json::to_string(&CellAddress::new(2, 3)).unwrap();
    assert_eq!(json, r#"{"row":2,"col":3}"#);
}
