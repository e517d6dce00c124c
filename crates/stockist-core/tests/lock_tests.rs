mod common;

use common::{item, new_stockist};
use stockist_core::{StockError, StockKey};

#[test]
fn test_lock_flag_round_trip() {
    let mut stockist = new_stockist();
    assert!(!stockist.is_locked());

    stockist.lock_stock_list();
    assert!(stockist.is_locked());

    stockist.unlock_stock_list();
    assert!(!stockist.is_locked());

    stockist.set_locked(true);
    assert!(stockist.is_locked());
}

#[test]
fn test_non_boolean_lock_value_is_invalid() {
    let mut stockist = new_stockist();
    for bad in ["abc", "", "maybe"] {
        let result = stockist.set_locked_from_str(bad);
        assert!(
            matches!(result, Err(StockError::InvalidValue { .. })),
            "'{}' should be rejected",
            bad
        );
    }
    assert!(!stockist.is_locked());
}

#[test]
fn test_every_mutation_refused_while_locked() {
    // Given: a ledger with one record, then locked
    let mut stockist = new_stockist();
    let widget = item("widget");
    stockist.new_stock_item(&widget, None, false).unwrap();
    stockist.lock_stock_list();
    let before = stockist.clone();

    // When/Then: every mutating entry point signals Locked
    let locked = |r: Result<(), StockError>| matches!(r, Err(StockError::Locked { .. }));
    assert!(locked(stockist.new_stock_item(&widget, None, false).map(drop)));
    assert!(locked(stockist.new_stock_item(&widget, Some(0), true).map(drop)));
    assert!(locked(stockist.delete_stock_entry(0).map(drop)));
    assert!(locked(stockist.increase_stock(0, 1).map(drop)));
    assert!(locked(stockist.stock_item(Some(&widget), None, 1, false).map(drop)));
    assert!(locked(stockist.assign(StockKey::Id(3), &widget, false).map(drop)));
    assert!(locked(stockist.remove(StockKey::Id(0)).map(drop)));
    assert!(locked(stockist.remove(&widget).map(drop)));

    // And: nothing changed
    assert_eq!(stockist, before);
}

#[test]
fn test_unlock_allows_the_refused_operation() {
    let mut stockist = new_stockist();
    let widget = item("widget");
    stockist.lock_stock_list();

    assert!(matches!(
        stockist.new_stock_item(&widget, None, false),
        Err(StockError::Locked { .. })
    ));
    assert!(stockist.is_empty());

    stockist.unlock_stock_list();
    assert_eq!(stockist.new_stock_item(&widget, None, false).unwrap(), 0);
}

#[test]
fn test_reads_available_while_locked() {
    let mut stockist = new_stockist();
    let widget = item("widget");
    stockist.new_stock_item(&widget, None, false).unwrap();
    stockist.lock_stock_list();

    assert_eq!(stockist.stock_ids_for_item(&widget), vec![0]);
    assert!(stockist.get(0).is_ok());
    assert_eq!(stockist.next_free_stock_id(), 1);
}
