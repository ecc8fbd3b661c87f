//! Flat record codec for the customer and parcel sources.
//!
//! Customer lines are `name,parcelId1;parcelId2;...` and parcel lines are
//! `id,days,weight,length,width,height`. Neither format has a header row and
//! quoting is not recognised: a comma always separates fields.

use crate::domain::model::{Dimension, ParcelRecord};
use crate::utils::error::{DepotError, Result};

pub const CUSTOMER_SOURCE: &str = "customer source";
pub const PARCEL_SOURCE: &str = "parcel source";

const PARCEL_ID_SEPARATOR: char = ';';

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerLine {
    pub name: String,
    pub parcel_ids: Vec<String>,
}

/// Records that parsed cleanly plus the lines that were skipped.
#[derive(Debug, Default)]
pub struct ParsedSource<T> {
    pub records: Vec<T>,
    pub rejected: Vec<DepotError>,
}

fn reader(data: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(data)
}

fn writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

/// 去掉尾端的空欄位；`Alice;;Bob,` 只算一個欄位
fn significant_fields(record: &csv::StringRecord) -> Vec<&str> {
    let mut fields: Vec<&str> = record.iter().collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

fn malformed(source_name: &str, line: u64, reason: impl Into<String>) -> DepotError {
    DepotError::MalformedRecord {
        source_name: source_name.to_string(),
        line,
        reason: reason.into(),
    }
}

fn parse_source<T>(
    data: &[u8],
    source_name: &str,
    parse: impl Fn(&[&str], u64) -> Result<T>,
) -> ParsedSource<T> {
    let mut parsed = ParsedSource {
        records: Vec::new(),
        rejected: Vec::new(),
    };

    for result in reader(data).records() {
        match result {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                let fields = significant_fields(&record);
                match parse(&fields, line) {
                    Ok(value) => parsed.records.push(value),
                    Err(e) => {
                        tracing::debug!("Skipping {} line {}: {}", source_name, line, e);
                        parsed.rejected.push(e);
                    }
                }
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                tracing::debug!("Skipping unreadable {} line {}: {}", source_name, line, e);
                parsed
                    .rejected
                    .push(malformed(source_name, line, e.to_string()));
            }
        }
    }

    parsed
}

pub fn parse_customer_fields(fields: &[&str], line: u64) -> Result<CustomerLine> {
    if fields.len() < 2 {
        return Err(malformed(
            CUSTOMER_SOURCE,
            line,
            format!("expected 2 fields, found {}", fields.len()),
        ));
    }

    let name = fields[0];
    if name.is_empty() {
        return Err(malformed(CUSTOMER_SOURCE, line, "customer name is empty"));
    }

    Ok(CustomerLine {
        name: name.to_string(),
        parcel_ids: split_parcel_ids(fields[1]),
    })
}

pub fn parse_parcel_fields(fields: &[&str], line: u64) -> Result<ParcelRecord> {
    if fields.len() < 6 {
        return Err(malformed(
            PARCEL_SOURCE,
            line,
            format!("expected 6 fields, found {}", fields.len()),
        ));
    }

    let number = |index: usize, name: &str| -> Result<f64> {
        fields[index]
            .parse::<f64>()
            .map_err(|e| malformed(PARCEL_SOURCE, line, format!("{} '{}': {}", name, fields[index], e)))
    };

    let days = fields[1]
        .parse::<u32>()
        .map_err(|e| malformed(PARCEL_SOURCE, line, format!("days '{}': {}", fields[1], e)))?;
    let weight = number(2, "weight")?;
    let length = number(3, "length")?;
    let width = number(4, "width")?;
    let height = number(5, "height")?;

    Dimension::new(length, width, height)
        .and_then(|dimension| ParcelRecord::new(fields[0], days, weight, dimension))
        .map_err(|e| malformed(PARCEL_SOURCE, line, e.to_string()))
}

pub fn parse_customers(data: &[u8]) -> ParsedSource<CustomerLine> {
    parse_source(data, CUSTOMER_SOURCE, parse_customer_fields)
}

pub fn parse_parcels(data: &[u8]) -> ParsedSource<ParcelRecord> {
    parse_source(data, PARCEL_SOURCE, parse_parcel_fields)
}

/// Splits a `;`-separated parcel list, dropping empty segments.
pub fn split_parcel_ids(list: &str) -> Vec<String> {
    list.split(PARCEL_ID_SEPARATOR)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn customer_line(name: &str, parcel_ids: &[String]) -> Result<Vec<u8>> {
    let mut w = writer();
    let joined = parcel_ids.join(&PARCEL_ID_SEPARATOR.to_string());
    w.write_record([name, joined.as_str()])?;
    w.into_inner().map_err(|e| DepotError::IoError(e.into_error()))
}

pub fn parcel_line(parcel: &ParcelRecord) -> Result<Vec<u8>> {
    let mut w = writer();
    let dim = &parcel.dimension;
    w.write_record([
        parcel.id.clone(),
        parcel.days.to_string(),
        parcel.weight.to_string(),
        dim.length().to_string(),
        dim.width().to_string(),
        dim.height().to_string(),
    ])?;
    w.into_inner().map_err(|e| DepotError::IoError(e.into_error()))
}
