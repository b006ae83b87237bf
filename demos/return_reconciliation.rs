//! Return-file reconciliation and archiving example

use bigdecimal::BigDecimal;
use billing_core::utils::{MemoryArchive, MemoryStore};
use billing_core::{Billing, NewCharge, NewCustomer};
use chrono::NaiveDate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏦 Billing Core - Return-File Reconciliation Example\n");

    let billing = Billing::new(MemoryStore::new(), MemoryArchive::new());

    // Seed a customer with three shipped charges
    let customer = billing
        .create_customer(NewCustomer {
            name: "Ana Souza".to_string(),
            email: Some("ana@example.com".to_string()),
            phone: None,
            code: "C01".to_string(),
            bank_account: Some("12345-6".to_string()),
        })
        .await?;

    let due = NaiveDate::from_ymd_opt(2025, 1, 10).ok_or("invalid date")?;
    let mut charge_ids = Vec::new();
    for month in ["janeiro", "fevereiro", "março"] {
        let charge = billing
            .create_charge(NewCharge {
                customer_id: customer.id.clone(),
                description: format!("Mensalidade {month}"),
                amount: BigDecimal::from(450),
                due_date: due,
                status: None,
            })
            .await?;
        charge_ids.push(charge.id);
    }

    let sequence = billing.next_shipment_sequence().await?;
    billing.mark_charges_shipped(&charge_ids, &sequence).await?;
    println!("📦 Shipped {} charges under NSA {sequence}\n", charge_ids.len());

    // The bank answers with a return file: two paid, one rejected with
    // occurrence code 07, plus header/trailer records the parser skips
    let content = format!(
        "H0RETORNO\nT{:<16}00\nT{:<16}PG\nT{:<16}07\nX9TRAILER\n",
        charge_ids[0], charge_ids[1], charge_ids[2],
    );

    println!("📄 Processing Return File...");
    let summary = billing.process_return_file(content.as_bytes()).await?;
    println!(
        "  processed: {} | paid: {} | rejected: {} | failures: {}\n",
        summary.processed, summary.paid, summary.rejected, summary.update_failures
    );

    println!("📋 Charge Statuses After Reconciliation:");
    let charges = billing.list_charges().await?;
    for charge in &charges {
        println!("  {} | {} | {}", charge.id, charge.description, charge.status);
    }
    println!();

    // Close the period: back the charges up and remove them from the store
    println!("🗃  Closing the Period...");
    let deleted = billing.archive_charges(&charges, "2025-01").await?;
    println!("  ✓ Archived and removed {deleted} charge(s)");

    for name in billing.list_archives().await? {
        println!("  ✓ Archive available: {name}");
    }

    Ok(())
}
