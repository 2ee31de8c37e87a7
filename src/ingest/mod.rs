//! Bulk CSV ingestion with contact-embedding precomputation.
//!
//! Offline, one-shot: reads invoice rows, coerces dirty fields leniently
//! (bad dates become `None`, bad amounts become `0.0`), encodes cleaned
//! contact names in batches, and replaces the store contents. Runs before
//! the live matching path ever reads the resulting vectors; the two never
//! interact concurrently.

mod error;


pub use error::IngestError;

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::embedding::ContactEncoder;
use crate::store::{InvoiceStore, NewInvoice};

/// Raw CSV row. Numeric and date fields come in as text so that dirty
/// values can be coerced instead of failing the whole file.
#[derive(Debug, Deserialize)]
struct CsvRow {
    invoice_file_name: String,
    #[serde(default)]
    seller_name: Option<String>,
    #[serde(default)]
    invoice_date: Option<String>,
    #[serde(default)]
    invoice_total_amount: Option<String>,
}

/// Summary of one ingestion run.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub rows_read: usize,
    pub inserted: usize,
    pub unique_contacts: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub amount_total: f64,
}

/// Reads `csv_path`, precomputes contact embeddings, and replaces the
/// store contents with the result.
pub fn ingest_csv(
    csv_path: &Path,
    encoder: &ContactEncoder,
    store: &dyn InvoiceStore,
    batch_size: usize,
) -> Result<IngestReport, IngestError> {
    let batch_size = batch_size.max(1);

    info!(path = %csv_path.display(), "Reading invoice CSV");

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize::<CsvRow>() {
        rows.push(record?);
    }

    info!(rows = rows.len(), "Parsed invoice rows");

    // Full replace, matching the drop-and-recreate ingestion contract.
    store.clear();

    let mut inserted = 0usize;
    let mut unique_contacts: HashSet<String> = HashSet::new();
    let mut date_min: Option<NaiveDate> = None;
    let mut date_max: Option<NaiveDate> = None;
    let mut amount_total = 0.0f64;

    for chunk in rows.chunks(batch_size) {
        let cleaned: Vec<String> = chunk
            .iter()
            .map(|row| {
                row.seller_name
                    .as_deref()
                    .unwrap_or_default()
                    .trim()
                    .to_string()
            })
            .collect();

        let texts: Vec<&str> = cleaned.iter().map(String::as_str).collect();
        let embeddings = encoder.encode_batch(&texts)?;

        let batch: Vec<NewInvoice> = chunk
            .iter()
            .zip(cleaned.iter())
            .zip(embeddings)
            .map(|((row, clean), embedding)| {
                let date = row.invoice_date.as_deref().and_then(parse_date_lenient);
                let amount = row
                    .invoice_total_amount
                    .as_deref()
                    .and_then(|raw| raw.trim().parse::<f64>().ok())
                    .unwrap_or(0.0);

                if let Some(name) = row.contact_name() {
                    unique_contacts.insert(name.to_string());
                }
                if let Some(date) = date {
                    date_min = Some(date_min.map_or(date, |d| d.min(date)));
                    date_max = Some(date_max.map_or(date, |d| d.max(date)));
                }
                amount_total += amount;

                NewInvoice {
                    file_name: row.invoice_file_name.clone(),
                    contact_name: row.contact_name().map(str::to_string),
                    contact_name_clean: Some(clean.clone()),
                    date,
                    amount,
                    contact_embedding: Some(embedding),
                }
            })
            .collect();

        inserted += store.insert_batch(batch)?;
        debug!(inserted, total = rows.len(), "Ingestion progress");
    }

    let report = IngestReport {
        rows_read: rows.len(),
        inserted,
        unique_contacts: unique_contacts.len(),
        date_range: date_min.zip(date_max),
        amount_total,
    };

    info!(
        inserted = report.inserted,
        unique_contacts = report.unique_contacts,
        amount_total = report.amount_total,
        "Ingestion complete"
    );

    Ok(report)
}

impl CsvRow {
    fn contact_name(&self) -> Option<&str> {
        self.seller_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Parses a date string leniently; anything unparsable becomes `None`.
fn parse_date_lenient(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date())
        })
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"));

    match parsed {
        Ok(date) => Some(date),
        Err(_) => {
            warn!(value = raw, "Unparsable invoice date, coercing to none");
            None
        }
    }
}
