use stockist_core::{ItemName, StockId, Stockist};

/// Create a new empty ledger for testing
#[allow(dead_code)]
pub fn new_stockist() -> Stockist {
    Stockist::new()
}

/// Build an item name, panicking on invalid test input
#[allow(dead_code)]
pub fn item(name: &str) -> ItemName {
    ItemName::new(name).expect("test item names are non-empty")
}

/// Check that the id map and the name index describe the same records
#[allow(dead_code)]
pub fn assert_index_bijection(stockist: &Stockist) {
    let mut indexed: Vec<StockId> = Vec::new();
    for (name, ids) in stockist.name_id_map() {
        assert!(!ids.is_empty(), "empty index entry for {}", name);
        for (id, unique_name) in ids {
            let record = stockist
                .get(*id)
                .unwrap_or_else(|_| panic!("index references missing id {}", id));
            assert_eq!(&record.item, name, "record {} indexed under wrong item", id);
            assert_eq!(&record.unique_name, unique_name);
            indexed.push(*id);
        }
    }
    indexed.sort_unstable();
    assert_eq!(indexed, stockist.stock_ids(), "index and ledger disagree");
}
