//! Basic billing workflow example

use bigdecimal::BigDecimal;
use billing_core::utils::{MemoryArchive, MemoryStore};
use billing_core::{Billing, NewCharge, NewCustomer};
use chrono::NaiveDate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Billing Core - Basic Workflow Example\n");

    // Create a billing system with in-memory backends
    let billing = Billing::new(MemoryStore::new(), MemoryArchive::new());

    // 1. Register customers
    println!("👥 Registering Customers...");
    let ana = billing
        .create_customer(NewCustomer {
            name: "Ana Souza".to_string(),
            email: Some("ana@example.com".to_string()),
            phone: Some("11 98888-7777".to_string()),
            code: "C01".to_string(),
            bank_account: Some("12345-6".to_string()),
        })
        .await?;
    println!("  ✓ Created customer: {} - {}", ana.id, ana.name);

    let bruno = billing
        .create_customer(NewCustomer {
            name: "Bruno Lima".to_string(),
            email: Some("bruno@example.com".to_string()),
            phone: None,
            code: "C02".to_string(),
            bank_account: Some("65432-1".to_string()),
        })
        .await?;
    println!("  ✓ Created customer: {} - {}\n", bruno.id, bruno.name);

    // 2. Create monthly charges
    println!("💰 Creating Charges...");
    let due = NaiveDate::from_ymd_opt(2025, 1, 10).ok_or("invalid date")?;
    let mut charge_ids = Vec::new();
    for (customer, amount) in [(&ana, 450), (&bruno, 380)] {
        let charge = billing
            .create_charge(NewCharge {
                customer_id: customer.id.clone(),
                description: "Mensalidade janeiro".to_string(),
                amount: BigDecimal::from(amount),
                due_date: due,
                status: None,
            })
            .await?;
        println!(
            "  ✓ Charge {} for {}: R$ {} due {}",
            charge.id, customer.name, charge.amount, charge.due_date
        );
        charge_ids.push(charge.id);
    }
    println!();

    // 3. Ship the batch under a generated sequence number
    println!("📦 Shipping Remittance Batch...");
    let sequence = billing.next_shipment_sequence().await?;
    let updated = billing.mark_charges_shipped(&charge_ids, &sequence).await?;
    println!("  ✓ Marked {updated} charge(s) with NSA {sequence}\n");

    // 4. Show the current state
    println!("📋 Current Charges:");
    for charge in billing.list_charges().await? {
        println!(
            "  {} | {} | {} | {}",
            charge.id,
            charge.status,
            charge.shipment_status,
            charge.shipment_sequence.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}
