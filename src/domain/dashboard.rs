//! Dashboard aggregation

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::Serialize;

use crate::domain::format::{DisplayFormat, WEEKDAYS_SHORT, format_currency};
use crate::domain::transaction::{join_customers, newest_first};
use crate::domain::{Currency, Customer, Transaction, TransactionType, TransactionView};

/// Cards shown on the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Sum of all deposit amounts, currencies added as plain numbers
    pub total_revenue: f64,
    pub formatted_revenue: String,
    pub total_customers: usize,
    pub transactions_today: usize,
    pub new_customers_this_week: usize,
    pub recent_transactions: Vec<TransactionView>,
    pub weekly_summary: Vec<DayBucket>,
}

/// One day of the weekly chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBucket {
    pub label: String,
    pub total: f64,
}

/// Compute the dashboard cards as of `now`
///
/// "Today" and the current week follow the display offset; the week runs
/// Monday to Sunday.
pub fn summarize(
    customers: &[Customer],
    mut transactions: Vec<Transaction>,
    now: DateTime<Utc>,
    recent_limit: usize,
    fmt: &DisplayFormat,
) -> DashboardSummary {
    let total_revenue: f64 = transactions
        .iter()
        .filter(|tx| tx.kind == TransactionType::Deposit)
        .map(|tx| tx.amount)
        .sum();

    let today = fmt.local_date(now);
    let transactions_today = transactions
        .iter()
        .filter(|tx| fmt.local_date(tx.timestamp) == today)
        .count();

    let week_ago = now - Duration::days(7);
    let new_customers_this_week = customers
        .iter()
        .filter(|c| {
            let joined = c.join_date.unwrap_or(c.created_at);
            joined >= week_ago && joined <= now
        })
        .count();

    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let mut totals = [0.0_f64; 7];
    for tx in &transactions {
        let offset = (fmt.local_date(tx.timestamp) - week_start).num_days();
        if (0..7).contains(&offset) {
            totals[offset as usize] += tx.amount;
        }
    }
    let weekly_summary = WEEKDAYS_SHORT
        .iter()
        .zip(totals)
        .map(|(label, total)| DayBucket {
            label: label.to_string(),
            total,
        })
        .collect();

    newest_first(&mut transactions);
    transactions.truncate(recent_limit);
    let recent_transactions = join_customers(transactions, customers, fmt);

    DashboardSummary {
        total_revenue,
        formatted_revenue: format_currency(total_revenue, Currency::Idr),
        total_customers: customers.len(),
        transactions_today,
        new_customers_this_week,
        recent_transactions,
        weekly_summary,
    }
}
