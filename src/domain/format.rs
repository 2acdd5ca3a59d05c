//! Indonesian (id-ID) rendering of amounts and dates
//!
//! Amounts use `.` as thousands separator and `,` as decimal separator.
//! Dates are rendered in a fixed display offset (WIB, UTC+7, by default).

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Timelike, Utc};

use crate::domain::Currency;

const MONTHS_LONG: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Weekday labels, Monday first
pub const WEEKDAYS_SHORT: [&str; 7] = ["Sen", "Sel", "Rab", "Kam", "Jum", "Sab", "Min"];

/// Display settings shared by every formatted response
#[derive(Debug, Clone, Copy)]
pub struct DisplayFormat {
    offset: FixedOffset,
}

impl DisplayFormat {
    /// `utc_offset_minutes` east of UTC; out-of-range values fall back to UTC
    pub fn new(utc_offset_minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar date of `ts` in the display offset
    pub fn local_date(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.offset).date_naive()
    }

    /// `15 Januari 2024`
    pub fn date_long(&self, ts: DateTime<Utc>) -> String {
        let local = ts.with_timezone(&self.offset);
        format!(
            "{} {} {}",
            local.day(),
            MONTHS_LONG[local.month0() as usize],
            local.year()
        )
    }

    /// `15 Jan 2024, 14.30`
    pub fn date_time(&self, ts: DateTime<Utc>) -> String {
        let local = ts.with_timezone(&self.offset);
        format!(
            "{} {} {}, {:02}.{:02}",
            local.day(),
            MONTHS_SHORT[local.month0() as usize],
            local.year(),
            local.hour(),
            local.minute()
        )
    }

    /// `15/1/2024`
    pub fn date_short(&self, ts: DateTime<Utc>) -> String {
        let local = ts.with_timezone(&self.offset);
        format!("{}/{}/{}", local.day(), local.month(), local.year())
    }
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self::new(7 * 60)
    }
}

/// Render an amount with its currency symbol
///
/// IDR drops the fraction when the amount is whole (`Rp 1.500.000`);
/// USD and EUR always show two decimals (`US$ 1.234,50`, `€ 1.234,50`).
pub fn format_currency(amount: f64, currency: Currency) -> String {
    let decimals = match currency {
        Currency::Idr if amount.fract() == 0.0 => 0,
        _ => 2,
    };
    format!("{} {}", currency.symbol(), format_number(amount, decimals))
}

/// Group an amount id-ID style with a fixed number of decimals
pub fn format_number(amount: f64, decimals: u32) -> String {
    let factor = 10_u128.pow(decimals);
    let scaled = (amount.abs() * factor as f64).round() as u128;
    let integer = scaled / factor;
    let fraction = scaled % factor;

    let digits = integer.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && scaled > 0 { "-" } else { "" };
    if decimals == 0 {
        format!("{sign}{grouped}")
    } else {
        format!(
            "{sign}{grouped},{fraction:0width$}",
            width = decimals as usize
        )
    }
}
