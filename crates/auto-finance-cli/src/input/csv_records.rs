//! Deal-record CSV handling: raw dealer exports and the
//! normalized form used by the analytics pipeline.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

use auto_finance_core::types::DealRecord;

/// One row of a raw export. Header names match the dealer CSVs; unmapped
/// extra columns are ignored on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDealRow {
    #[serde(rename = "Deal ID")]
    pub deal_id: String,
    #[serde(rename = "Funded Date")]
    pub date_funded: NaiveDate,
    #[serde(rename = "Lender")]
    pub lender: String,
    #[serde(rename = "ZIP")]
    pub borrower_zip: String,
    #[serde(rename = "FICO")]
    pub fico_band: String,
    #[serde(rename = "Year")]
    pub vehicle_year: i32,
    #[serde(rename = "Make")]
    pub vehicle_make: String,
    #[serde(rename = "Model")]
    pub vehicle_model: String,
    #[serde(rename = "Retail")]
    pub retail_price: Decimal,
    #[serde(rename = "Sale")]
    pub sale_price: Decimal,
    #[serde(rename = "Down")]
    pub down_payment: Decimal,
    #[serde(rename = "Amt Financed")]
    pub amount_financed: Decimal,
    #[serde(rename = "APR")]
    pub apr: Decimal,
    #[serde(rename = "Term")]
    pub term_months: u32,
    #[serde(rename = "Pmt")]
    pub payment_monthly: Decimal,
    #[serde(rename = "DTI")]
    pub dti_ratio: Decimal,
    #[serde(rename = "LTV")]
    pub ltv_ratio: Decimal,
    #[serde(rename = "Status")]
    pub approval_status: String,
    #[serde(rename = "Callbacks")]
    pub callbacks: u32,
}

impl From<RawDealRow> for DealRecord {
    fn from(row: RawDealRow) -> Self {
        DealRecord {
            deal_id: row.deal_id,
            date_funded: row.date_funded,
            lender: row.lender,
            borrower_zip: row.borrower_zip,
            fico_band: row.fico_band,
            vehicle_year: row.vehicle_year,
            vehicle_make: row.vehicle_make,
            vehicle_model: row.vehicle_model,
            retail_price: row.retail_price,
            sale_price: row.sale_price,
            down_payment: row.down_payment,
            amount_financed: row.amount_financed,
            apr: row.apr,
            term_months: row.term_months,
            payment_monthly: row.payment_monthly,
            dti_ratio: row.dti_ratio,
            ltv_ratio: row.ltv_ratio,
            approval_status: row.approval_status,
            callbacks: row.callbacks,
        }
    }
}

impl From<DealRecord> for RawDealRow {
    fn from(record: DealRecord) -> Self {
        RawDealRow {
            deal_id: record.deal_id,
            date_funded: record.date_funded,
            lender: record.lender,
            borrower_zip: record.borrower_zip,
            fico_band: record.fico_band,
            vehicle_year: record.vehicle_year,
            vehicle_make: record.vehicle_make,
            vehicle_model: record.vehicle_model,
            retail_price: record.retail_price,
            sale_price: record.sale_price,
            down_payment: record.down_payment,
            amount_financed: record.amount_financed,
            apr: record.apr,
            term_months: record.term_months,
            payment_monthly: record.payment_monthly,
            dti_ratio: record.dti_ratio,
            ltv_ratio: record.ltv_ratio,
            approval_status: record.approval_status,
            callbacks: record.callbacks,
        }
    }
}

/// Read a raw export (dealer headers) from any reader.
pub fn read_raw<R: io::Read>(reader: R) -> Result<Vec<DealRecord>, Box<dyn std::error::Error>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for row in rdr.deserialize::<RawDealRow>() {
        records.push(row?.into());
    }
    Ok(records)
}

/// Read a raw export from a file path.
pub fn read_raw_path(path: &str) -> Result<Vec<DealRecord>, Box<dyn std::error::Error>> {
    let rdr = csv::Reader::from_path(path)
        .map_err(|e| format!("Failed to open '{path}': {e}"))?;
    let mut records = Vec::new();
    for row in rdr.into_deserialize::<RawDealRow>() {
        let row = row.map_err(|e| format!("Malformed row in '{path}': {e}"))?;
        records.push(row.into());
    }
    Ok(records)
}

/// Write records with the raw export headers (what `simulate` emits).
pub fn write_raw<W: io::Write>(
    writer: W,
    records: &[DealRecord],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(RawDealRow::from(record.clone()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read a normalized CSV (DealRecord field names as headers).
pub fn read_normalized_path(path: &str) -> Result<Vec<DealRecord>, Box<dyn std::error::Error>> {
    let rdr = csv::Reader::from_path(path)
        .map_err(|e| format!("Failed to open '{path}': {e}"))?;
    let mut records = Vec::new();
    for row in rdr.into_deserialize::<DealRecord>() {
        let row = row.map_err(|e| format!("Malformed row in '{path}': {e}"))?;
        records.push(row);
    }
    Ok(records)
}

/// Write a normalized CSV to a file path, creating parent directories.
pub fn write_normalized_path(
    path: &Path,
    records: &[DealRecord],
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| format!("Failed to create '{}': {e}", path.display()))?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_record() -> DealRecord {
        DealRecord {
            deal_id: "SIM-250101-0000".to_string(),
            date_funded: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            lender: "Westlake Financial".to_string(),
            borrower_zip: "06010".to_string(),
            fico_band: "670-739".to_string(),
            vehicle_year: 2019,
            vehicle_make: "Toyota".to_string(),
            vehicle_model: "RAV4".to_string(),
            retail_price: dec!(24000),
            sale_price: dec!(22000),
            down_payment: dec!(3000),
            amount_financed: dec!(19000),
            apr: dec!(9.5),
            term_months: 60,
            payment_monthly: dec!(399.04),
            dti_ratio: dec!(0.412),
            ltv_ratio: dec!(0.95),
            approval_status: "approved".to_string(),
            callbacks: 2,
        }
    }

    #[test]
    fn test_raw_roundtrip_preserves_fields() {
        let records = vec![sample_record()];
        let mut buf = Vec::new();
        write_raw(&mut buf, &records).unwrap();

        let header = String::from_utf8(buf.clone()).unwrap();
        assert!(header.starts_with("Deal ID,Funded Date,Lender,ZIP,FICO"));

        let back = read_raw(buf.as_slice()).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].deal_id, "SIM-250101-0000");
        assert_eq!(back[0].apr, dec!(9.5));
        assert_eq!(back[0].dti_ratio, dec!(0.412));
    }

    #[test]
    fn test_raw_read_ignores_extra_columns() {
        let csv_text = "\
Deal ID,Funded Date,Lender,ZIP,State,FICO,Year,Make,Model,Retail,Sale,Down,Amt Financed,APR,Term,Pmt,DTI,PTI,LTV,Status,Callbacks
D-1,2025-03-05,Greenwood Credit,06470,CT,740-799,2020,Honda,CR-V,26000,24500,5000,19500,5.5,60,372.41,0.31,0.08,0.88,approved,0
";
        let records = read_raw(csv_text.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].lender, "Greenwood Credit");
        assert_eq!(records[0].fico_band, "740-799");
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let csv_text = "\
Deal ID,Funded Date,Lender,ZIP,FICO,Year,Make,Model,Retail,Sale,Down,Amt Financed,APR,Term,Pmt,DTI,LTV,Status,Callbacks
D-1,not-a-date,Greenwood Credit,06470,740-799,2020,Honda,CR-V,26000,24500,5000,19500,5.5,60,372.41,0.31,0.88,approved,0
";
        assert!(read_raw(csv_text.as_bytes()).is_err());
    }
}
