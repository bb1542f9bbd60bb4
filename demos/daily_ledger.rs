//! A week of sales and payments, reconciled after each day

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sales_ledger::utils::MemoryStorage;
use sales_ledger::{LedgerConfig, ReceiptFilter, SaleFilter, SalesLedger};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = LedgerConfig::from_toml_str("overdue_days = 3")?;
    let ledger = SalesLedger::with_config(MemoryStorage::new(), config)?;

    let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).ok_or("invalid date");

    println!("Recording sales and receipts...\n");
    ledger
        .record_sale(day(1)?, BigDecimal::from_str("12.5")?, BigDecimal::from_str("40.00")?)
        .await?;
    ledger
        .record_sale(day(2)?, BigDecimal::from_str("8.250")?, BigDecimal::from_str("42.00")?)
        .await?;
    ledger
        .record_receipt(day(3)?, BigDecimal::from_str("300.00")?)
        .await?;
    ledger
        .record_sale(day(4)?, BigDecimal::from_str("3")?, BigDecimal::from_str("45.50")?)
        .await?;
    ledger
        .record_receipt(day(6)?, BigDecimal::from_str("400.00")?)
        .await?;

    let summary = ledger.summary().await?;
    println!("Total received:   {}", summary.total_received);
    println!("Total sold:       {}", summary.total_sold);
    println!("Balance owed:     {}", summary.balance);
    println!("Open sales value: {}", summary.open_sales_value);
    println!("Unsettled money:  {}\n", summary.unsettled_value);

    println!("Sales:");
    for sale in ledger.sales(SaleFilter::All).await? {
        let status = if sale.is_closed { "closed" } else { "open" };
        println!(
            "  #{} {} {} kg x {} = {} ({})",
            sale.id, sale.date, sale.weight, sale.unit_price, sale.total, status
        );
    }

    println!("\nUnsettled receipts:");
    for receipt in ledger.receipts(ReceiptFilter::Unsettled).await? {
        println!("  #{} {} {}", receipt.id, receipt.date, receipt.amount);
    }

    println!("\nOverdue as of {}:", day(8)?);
    for sale in ledger.overdue_sales_as_of(day(8)?).await? {
        println!("  #{} {} {}", sale.id, sale.date, sale.total);
    }

    Ok(())
}
