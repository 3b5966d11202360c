use crate::models::ProductRecord;

/// Total stock value of a record list: sum of quantity times average purchase
/// price, with missing values counted as zero
pub fn total_value(records: &[ProductRecord]) -> f64 {
    records.iter().map(ProductRecord::stock_value).sum()
}
