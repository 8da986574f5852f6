//! Payroll row normalization.
//!
//! The table extractor often merges or splits columns, so a raw row's cell
//! count says little about its structure. What survives reliably is the
//! shape of currency amounts (`1.234,56`), and [`normalize`] anchors on it
//! to rebuild a `description + values` record of fixed width.
//!
//! Strategies, in order:
//! 1. Month-header and table-header rows are skipped.
//! 2. A row that splits on wide gaps into exactly the target width is
//!    taken as is.
//! 3. Otherwise every monetary token becomes a value, the text before the
//!    first one becomes the description, and missing values are padded
//!    with `""`.
//! 4. A row without monetary tokens is all description.
//!
//! A row with more monetary tokens than value slots is returned at its
//! natural width and dropped by the ledger merger.

use std::sync::LazyLock;

use payroll_ledger_models::NormalizedRow;
use regex::Regex;

/// Lower-cased prefixes of rows that are headers, not data.
pub const SKIP_PREFIXES: [&str; 2] = ["janeiro", "proventos/desconto"];

static WIDE_GAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s{2,}").unwrap_or_else(|_| unreachable!())
});

static MONETARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-?\d{1,3}(?:[.\d]{0,3})*,\d{2}").unwrap_or_else(|_| unreachable!())
});

/// Result of normalizing one raw row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Not a data row.
    Skip,
    /// A rebuilt record; its width equals the target width unless the row
    /// carried more monetary tokens than value slots.
    Record(NormalizedRow),
}

/// Returns every monetary token in `text`, left to right.
#[must_use]
pub fn monetary_tokens(text: &str) -> Vec<&str> {
    MONETARY.find_iter(text).map(|m| m.as_str()).collect()
}

/// Normalizes the space-joined cells of one raw row into a record of
/// `column_count` fields.
#[must_use]
pub fn normalize(row_text: &str, column_count: usize) -> RowOutcome {
    let trimmed = row_text.trim();
    let lowered = trimmed.to_lowercase();
    if SKIP_PREFIXES.iter().any(|prefix| lowered.starts_with(prefix)) {
        return RowOutcome::Skip;
    }

    let parts: Vec<&str> = WIDE_GAP.split(row_text).collect();
    if parts.len() == column_count {
        return RowOutcome::Record(parts.into_iter().collect());
    }

    let value_slots = column_count.saturating_sub(1);

    if let Some(first) = MONETARY.find(row_text) {
        let description = row_text[..first.start()].trim();
        let values = monetary_tokens(&row_text[first.start()..]);

        if values.len() > value_slots {
            log::debug!(
                "Row has {} monetary values for {value_slots} slots; it will not be written: {trimmed}",
                values.len()
            );
        }

        let mut fields = Vec::with_capacity(column_count.max(values.len() + 1));
        fields.push(description.to_owned());
        fields.extend(values.into_iter().map(str::to_owned));
        if fields.len() < column_count {
            fields.resize(column_count, String::new());
        }

        return RowOutcome::Record(NormalizedRow::new(fields));
    }

    let mut fields = vec![trimmed.to_owned()];
    fields.resize(column_count.max(1), String::new());
    RowOutcome::Record(NormalizedRow::new(fields))
}

#[cfg(test)]
mod tests {
    use payroll_ledger_models::COLUMN_COUNT;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn record(outcome: RowOutcome) -> Vec<String> {
        match outcome {
            RowOutcome::Record(row) => row.0,
            RowOutcome::Skip => panic!("expected a record, got Skip"),
        }
    }

    fn padded(head: &[&str]) -> Vec<String> {
        let mut fields: Vec<String> = head.iter().map(|s| (*s).to_owned()).collect();
        fields.resize(COLUMN_COUNT, String::new());
        fields
    }

    /// Formats cents as a `1.234,56` amount.
    fn brl(cents: u64, negative: bool) -> String {
        let units = (cents / 100).to_string();
        let mut grouped = String::new();
        for (i, ch) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let sign = if negative { "-" } else { "" };
        format!("{sign}{grouped},{:02}", cents % 100)
    }

    #[test]
    fn brl_helper_groups_thousands() {
        assert_eq!(brl(123_456, false), "1.234,56");
        assert_eq!(brl(100_000_000, true), "-1.000.000,00");
        assert_eq!(brl(5, false), "0,05");
    }

    #[test]
    fn anchors_on_monetary_values_and_pads() {
        let fields = record(normalize("João Silva   1.234,56   234,00", COLUMN_COUNT));
        assert_eq!(fields, padded(&["João Silva", "1.234,56", "234,00"]));
    }

    #[test]
    fn month_header_rows_are_skipped() {
        assert_eq!(normalize("janeiro", COLUMN_COUNT), RowOutcome::Skip);
        assert_eq!(normalize("  JANEIRO FEVEREIRO MARÇO", COLUMN_COUNT), RowOutcome::Skip);
        assert_eq!(
            normalize("PROVENTOS/DESCONTO JANEIRO", COLUMN_COUNT),
            RowOutcome::Skip
        );
    }

    #[test]
    fn exact_wide_gap_split_is_taken_verbatim() {
        let tokens: Vec<String> = std::iter::once("SALARIO BASE".to_owned())
            .chain((1..COLUMN_COUNT).map(|i| format!("v{i}")))
            .collect();
        let fields = record(normalize(&tokens.join("  "), COLUMN_COUNT));
        assert_eq!(fields, tokens);
    }

    #[test]
    fn exactly_thirteen_values_fill_every_slot() {
        let values: Vec<String> = (1..=13).map(|i| brl(i * 1_000, false)).collect();
        let text = format!("HORAS EXTRAS {}", values.join(" "));
        let fields = record(normalize(&text, COLUMN_COUNT));
        assert_eq!(fields.len(), COLUMN_COUNT);
        assert_eq!(fields[0], "HORAS EXTRAS");
        assert_eq!(fields[1..], values[..]);
    }

    #[test]
    fn overflowing_values_keep_natural_width() {
        let values: Vec<String> = (1..=14).map(|i| brl(i * 100, false)).collect();
        let text = format!("ADICIONAL {}", values.join(" "));
        let fields = record(normalize(&text, COLUMN_COUNT));
        assert_eq!(fields.len(), COLUMN_COUNT + 1);
        assert_eq!(fields[0], "ADICIONAL");
        assert_eq!(fields[14], "14,00");
    }

    #[test]
    fn row_without_values_is_all_description() {
        let fields = record(normalize("  OBSERVACOES GERAIS ", COLUMN_COUNT));
        assert_eq!(fields, padded(&["OBSERVACOES GERAIS"]));
    }

    #[test]
    fn negative_values_keep_their_sign() {
        let fields = record(normalize("INSS -1.100,50 -98,00", COLUMN_COUNT));
        assert_eq!(fields, padded(&["INSS", "-1.100,50", "-98,00"]));
    }

    #[test]
    fn monetary_tokens_ignore_plain_numbers() {
        assert_eq!(monetary_tokens("REF 30 DIAS 1.500,00"), vec!["1.500,00"]);
    }

    fn amount() -> impl Strategy<Value = String> {
        (0u64..100_000_000, any::<bool>()).prop_map(|(cents, neg)| brl(cents, neg))
    }

    proptest! {
        #[test]
        fn wide_gap_split_of_target_width_is_identity(
            first in "X[A-Z0-9.,]{0,7}",
            rest in prop::collection::vec("[A-Z0-9.,]{1,8}", COLUMN_COUNT - 1),
        ) {
            let mut tokens = vec![first];
            tokens.extend(rest);
            let fields = record(normalize(&tokens.join("  "), COLUMN_COUNT));
            prop_assert_eq!(fields, tokens);
        }

        #[test]
        fn k_values_are_kept_in_order_and_padded(
            description in "D[A-Z]{0,10}",
            values in prop::collection::vec(amount(), 1..COLUMN_COUNT),
        ) {
            let text = format!("{description} {}", values.join(" "));
            let fields = record(normalize(&text, COLUMN_COUNT));

            prop_assert_eq!(fields.len(), COLUMN_COUNT);
            prop_assert_eq!(&fields[0], &description);
            prop_assert_eq!(&fields[1..=values.len()], &values[..]);
            prop_assert!(fields[values.len() + 1..].iter().all(String::is_empty));
        }
    }
}
