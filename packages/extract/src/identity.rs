//! Employee identity extraction from statement text.
//!
//! Each field is matched independently and case-insensitively. A field
//! whose label is absent stays `None`; rendering it as "not found" is left
//! to whoever reports or persists the [`Identity`].

use std::sync::LazyLock;

use chrono::NaiveDate;
use payroll_ledger_models::Identity;
use regex::Regex;

static NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)MATRICULA:\s*\d+\s*-\s*(.+?)(?:\s+ADMISSÃO|\s*$)")
        .unwrap_or_else(|_| unreachable!())
});

static TAX_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)CPF:\s*([\d.-]+)").unwrap_or_else(|_| unreachable!())
});

static ADMISSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ADMISSÃO:\s*(\d{2}/\d{2}/\d{4})").unwrap_or_else(|_| unreachable!())
});

static COMPETENCE_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)COMPETÊNCIA\s*-\s*(\d{4})").unwrap_or_else(|_| unreachable!())
});

/// Returns the trimmed first capture group of `re` in `text`.
fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Extracts name, tax id, admission date, and competence year from `text`.
///
/// Never fails. Unmatched fields are `None`.
#[must_use]
pub fn extract(text: &str) -> Identity {
    let identity = Identity {
        name: capture(&NAME, text),
        tax_id: capture(&TAX_ID, text),
        admission_date: capture(&ADMISSION, text),
        competence_year: capture(&COMPETENCE_YEAR, text),
    };

    if let Some(date) = &identity.admission_date
        && NaiveDate::parse_from_str(date, "%d/%m/%Y").is_err()
    {
        log::warn!("Admission date '{date}' is not a valid calendar date; keeping it as printed");
    }

    for (field, value) in [
        ("name", &identity.name),
        ("tax id", &identity.tax_id),
        ("admission date", &identity.admission_date),
        ("competence year", &identity.competence_year),
    ] {
        if value.is_none() {
            log::debug!("Identity field not found: {field}");
        }
    }

    identity
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const STATEMENT: &str = "FICHA FINANCEIRA  COMPETÊNCIA - 2023\n\
                             MATRICULA: 001234 - JOÃO DA SILVA ADMISSÃO: 01/03/2015\n\
                             CPF: 123.456.789-00  CARGO: ANALISTA\n";

    #[test]
    fn extracts_all_fields() {
        let identity = extract(STATEMENT);
        assert_eq!(
            identity,
            Identity {
                name: Some("JOÃO DA SILVA".to_owned()),
                tax_id: Some("123.456.789-00".to_owned()),
                admission_date: Some("01/03/2015".to_owned()),
                competence_year: Some("2023".to_owned()),
            }
        );
    }

    #[test]
    fn labels_are_case_insensitive() {
        let identity = extract("matricula: 9 - ana souza admissão: 10/10/2010 cpf: 1.2-3");
        assert_eq!(identity.name.as_deref(), Some("ana souza"));
        assert_eq!(identity.tax_id.as_deref(), Some("1.2-3"));
        assert_eq!(identity.admission_date.as_deref(), Some("10/10/2010"));
    }

    #[test]
    fn name_runs_to_end_of_text_without_admission_label() {
        let identity = extract("CPF: 111.222.333-44\nMATRICULA: 77 - PEDRO ALVES\n");
        assert_eq!(identity.name.as_deref(), Some("PEDRO ALVES"));
    }

    #[test]
    fn missing_tax_id_is_none_and_renders_sentinel() {
        let identity = extract("MATRICULA: 1 - ANA ADMISSÃO: 01/01/2020");
        assert_eq!(identity.tax_id, None);
        assert_eq!(
            identity.display_tax_id(),
            payroll_ledger_models::TAX_ID_NOT_FOUND
        );
    }

    #[test]
    fn empty_text_yields_empty_identity() {
        assert_eq!(extract(""), Identity::default());
        assert_eq!(extract("").year_label(), payroll_ledger_models::UNKNOWN_YEAR);
    }

    #[test]
    fn invalid_admission_date_is_kept_verbatim() {
        let identity = extract("ADMISSÃO: 31/02/2020");
        assert_eq!(identity.admission_date.as_deref(), Some("31/02/2020"));
    }
}
