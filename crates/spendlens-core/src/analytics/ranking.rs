use std::collections::{HashMap, HashSet};

use crate::analytics::stats::{mean, sample_stddev};
use crate::analytics::types::{Transaction, TransactionSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    #[default]
    Descending,
    Ascending,
}

impl Order {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Descending => "desc",
            Self::Ascending => "asc",
        }
    }
}

/// Highest (or lowest) `n` transactions, one per distinct item name.
///
/// Equal costs keep input order; for repeated names the first row after
/// sorting wins.
pub fn top_items(transactions: &TransactionSet, n: usize, order: Order) -> Vec<Transaction> {
    let mut sorted = transactions.iter().collect::<Vec<&Transaction>>();
    match order {
        Order::Descending => sorted.sort_by(|left, right| right.cost.total_cmp(&left.cost)),
        Order::Ascending => sorted.sort_by(|left, right| left.cost.total_cmp(&right.cost)),
    }

    let mut seen = HashSet::new();
    let mut picked = Vec::new();
    for transaction in sorted {
        if picked.len() == n {
            break;
        }
        if seen.insert(transaction.item.as_str()) {
            picked.push(transaction.clone());
        }
    }
    picked
}

/// One-off purchases at or above one standard deviation over the mean cost.
///
/// Items that clear the threshold more than once are repeat purchases and are
/// left out.
pub fn large_purchases(transactions: &TransactionSet) -> Vec<Transaction> {
    if transactions.is_empty() {
        return Vec::new();
    }

    let costs = transactions.costs();
    let threshold = large_purchase_threshold(&costs);
    let qualifying = transactions
        .iter()
        .filter(|transaction| transaction.cost >= threshold)
        .collect::<Vec<&Transaction>>();

    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for transaction in &qualifying {
        *occurrences.entry(transaction.item.as_str()).or_insert(0) += 1;
    }

    let mut singles = qualifying
        .into_iter()
        .filter(|transaction| occurrences.get(transaction.item.as_str()) == Some(&1))
        .cloned()
        .collect::<Vec<Transaction>>();
    singles.sort_by(|left, right| right.cost.total_cmp(&left.cost));
    singles
}

pub fn large_purchase_threshold(costs: &[f64]) -> f64 {
    mean(costs) + sample_stddev(costs)
}
