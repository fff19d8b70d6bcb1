use std::collections::HashMap;

use serde::Serialize;

use crate::ledger::{DateWindow, MovementKind, Tenant};

const UNCATEGORIZED: &str = "Uncategorized";

/// Signed total of one category inside a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub income: f64,
    pub expense: f64,
}

impl CategoryTotal {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Accounting totals for the movements dated inside a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub window: DateWindow,
    pub income: f64,
    pub expense: f64,
    pub net: f64,
    pub pending_total: f64,
    pub paid_total: f64,
    pub movement_count: usize,
    pub per_category: Vec<CategoryTotal>,
}

pub struct SummaryService;

impl SummaryService {
    /// Totals for `window`. Categories are ordered by absolute amount moved,
    /// largest first; movements without a category are grouped together.
    pub fn summarize(tenant: &Tenant, window: DateWindow) -> LedgerSummary {
        let mut summary = LedgerSummary {
            window,
            income: 0.0,
            expense: 0.0,
            net: 0.0,
            pending_total: 0.0,
            paid_total: 0.0,
            movement_count: 0,
            per_category: Vec::new(),
        };
        let mut categories: HashMap<String, CategoryTotal> = HashMap::new();

        for movement in tenant
            .movements
            .iter()
            .filter(|movement| window.contains(movement.date))
        {
            summary.movement_count += 1;
            let key = movement
                .category
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(UNCATEGORIZED)
                .to_string();
            let entry = categories
                .entry(key.clone())
                .or_insert_with(|| CategoryTotal {
                    category: key,
                    income: 0.0,
                    expense: 0.0,
                });
            match movement.kind {
                MovementKind::Income => {
                    summary.income += movement.amount;
                    entry.income += movement.amount;
                }
                MovementKind::Expense => {
                    summary.expense += movement.amount;
                    entry.expense += movement.amount;
                }
            }
            if movement.is_paid() {
                summary.paid_total += movement.amount;
            } else {
                summary.pending_total += movement.amount;
            }
        }

        summary.net = summary.income - summary.expense;
        let mut per_category: Vec<CategoryTotal> = categories.into_values().collect();
        per_category.sort_by(|a, b| {
            let weight = |total: &CategoryTotal| total.income + total.expense;
            weight(b)
                .total_cmp(&weight(a))
                .then_with(|| a.category.cmp(&b.category))
        });
        summary.per_category = per_category;
        summary
    }
}
