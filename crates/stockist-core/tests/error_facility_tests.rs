use stockist_core::errors::{ExError, ExErrorKind, StockError};

#[test]
fn test_not_found_verifiable_by_kind() {
    let ex_err: ExError = StockError::NotFound { stock_id: 42 }.into();

    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.code(), "ERR_NOT_FOUND");
    assert_eq!(ex_err.stock_id(), Some(42));
}

#[test]
fn test_item_not_found_shares_kind_with_id_not_found() {
    let ex_err: ExError = StockError::ItemNotFound {
        item: "widget".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.item(), Some("widget"));
}

#[test]
fn test_not_implemented_names_statement() {
    let err = StockError::NotImplemented {
        statement: "update".to_string(),
        dialect: "schema-only".to_string(),
    };
    assert_eq!(err.kind(), ExErrorKind::NotImplemented);

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.op(), Some("update"));
    assert!(ex_err.message().contains("schema-only"));
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::InvalidItem, "ERR_INVALID_ITEM"),
        (ExErrorKind::DuplicateId, "ERR_DUPLICATE_ID"),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::Locked, "ERR_LOCKED"),
        (ExErrorKind::NoConnection, "ERR_NO_CONNECTION"),
        (ExErrorKind::NotImplemented, "ERR_NOT_IMPLEMENTED"),
        (ExErrorKind::InvalidValue, "ERR_INVALID_VALUE"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_user_facing_messages() {
    assert_eq!(
        StockError::DuplicateId { stock_id: 3 }.to_string(),
        "Stock ID already in use: 3"
    );
    assert_eq!(StockError::NoConnection.to_string(), "No database connection!");
}
