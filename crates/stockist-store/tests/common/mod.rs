use stockist_core::{ItemName, StockId};
use stockist_store::{SqlDialect, SqliteStockist};

/// In-memory SQLite stockist with the stock table created
#[allow(dead_code)]
pub fn memory_stockist() -> SqliteStockist {
    let mut stockist = SqliteStockist::new(":memory:").expect("open in-memory store");
    stockist.create_database().expect("create stock table");
    stockist
}

/// In-memory SQLite stockist speaking the given dialect
#[allow(dead_code)]
pub fn memory_stockist_with(dialect: SqlDialect) -> SqliteStockist {
    let mut stockist = SqliteStockist::new(":memory:")
        .expect("open in-memory store")
        .with_dialect(dialect);
    stockist.create_database().expect("create stock table");
    stockist
}

#[allow(dead_code)]
pub fn item(name: &str) -> ItemName {
    ItemName::new(name).expect("test item names are non-empty")
}

/// Stored rows as `(pk, name, count)`, ascending pk
#[allow(dead_code)]
pub fn stored(stockist: &mut SqliteStockist) -> Vec<(StockId, String, i64)> {
    stockist
        .database_stock()
        .expect("read stock table")
        .into_values()
        .map(|row| (row.pk, row.name, row.count))
        .collect()
}

/// In-memory records as `(pk, name, count)`, ascending pk
#[allow(dead_code)]
pub fn in_memory(stockist: &SqliteStockist) -> Vec<(StockId, String, i64)> {
    stockist
        .records()
        .map(|r| (r.stock_id, r.unique_name.clone(), r.count))
        .collect()
}
