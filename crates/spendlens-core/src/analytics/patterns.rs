use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::analytics::types::{Transaction, TransactionSet};

#[derive(Debug, Clone, PartialEq)]
pub struct ItemTally {
    pub item: String,
    pub count: usize,
    pub total: f64,
}

/// Items bought more than `threshold` times, most frequent first.
pub fn recurring_items(transactions: &TransactionSet, threshold: usize) -> Vec<ItemTally> {
    let mut tallies = tally_by_item(transactions.iter())
        .into_iter()
        .filter(|tally| tally.count > threshold)
        .collect::<Vec<ItemTally>>();
    tallies.sort_by(|left, right| right.count.cmp(&left.count));
    debug!(threshold, items = tallies.len(), "detected recurring items");
    tallies
}

/// Small purchases that add up: rows under `item_cost_cap` grouped by item,
/// keeping groups whose total exceeds `total_floor`.
pub fn sneaky_totals(
    transactions: &TransactionSet,
    item_cost_cap: f64,
    total_floor: f64,
) -> Vec<ItemTally> {
    let mut tallies = tally_by_item(
        transactions
            .iter()
            .filter(|transaction| transaction.cost < item_cost_cap),
    )
    .into_iter()
    .filter(|tally| tally.total > total_floor)
    .collect::<Vec<ItemTally>>();
    tallies.sort_by(|left, right| right.total.total_cmp(&left.total));
    tallies
}

/// Items absent in January–June that were bought more than `threshold` times
/// in July–December.
pub fn newly_recurring(transactions: &TransactionSet, threshold: usize) -> Vec<ItemTally> {
    let first_half = transactions
        .iter()
        .filter(|transaction| transaction.month_num() <= 6)
        .map(|transaction| transaction.item.as_str())
        .collect::<BTreeSet<&str>>();

    let mut tallies = tally_by_item(
        transactions
            .iter()
            .filter(|transaction| transaction.month_num() > 6),
    )
    .into_iter()
    .filter(|tally| tally.count > threshold && !first_half.contains(tally.item.as_str()))
    .collect::<Vec<ItemTally>>();
    tallies.sort_by(|left, right| right.count.cmp(&left.count));
    tallies
}

/// Canonical categories with no spending in `transactions`.
pub fn no_spend_categories(
    transactions: &TransactionSet,
    canonical: &[String],
) -> BTreeSet<String> {
    let present = transactions
        .iter()
        .map(|transaction| transaction.category.to_ascii_lowercase())
        .collect::<BTreeSet<String>>();
    canonical
        .iter()
        .filter(|category| !present.contains(&category.to_ascii_lowercase()))
        .cloned()
        .collect()
}

/// Groups rows by exact item name, in first-occurrence order.
fn tally_by_item<'a, I>(rows: I) -> Vec<ItemTally>
where
    I: Iterator<Item = &'a Transaction>,
{
    let mut index_by_item: HashMap<&'a str, usize> = HashMap::new();
    let mut tallies: Vec<ItemTally> = Vec::new();
    for row in rows {
        match index_by_item.get(row.item.as_str()) {
            Some(index) => {
                tallies[*index].count += 1;
                tallies[*index].total += row.cost;
            }
            None => {
                index_by_item.insert(row.item.as_str(), tallies.len());
                tallies.push(ItemTally {
                    item: row.item.clone(),
                    count: 1,
                    total: row.cost,
                });
            }
        }
    }
    tallies
}
