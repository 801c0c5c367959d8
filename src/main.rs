use clap::Parser;
use miette::{IntoDiagnostic, Result};
use remitdesk::application::orchestrator::{BeneficiarySelection, DeskPolicy, RemitDesk};
use remitdesk::config::DeskConfig;
use remitdesk::domain::beneficiary::{BankRoute, BeneficiaryDraft};
use remitdesk::domain::order::{Order, OrderDraft, Purpose};
use remitdesk::domain::quote::{BankChargeBearer, QuoteInputs};
use remitdesk::domain::sender::{
    ContactDetails, FundsSource, PayerDetails, PayerRelation, Residency, SenderDraft,
};
use remitdesk::error::RemitError;
use remitdesk::infrastructure::in_memory::{
    InMemoryBeneficiaryStore, InMemoryOrderStore, InMemorySenderStore,
};
use remitdesk::infrastructure::renderer::TextQuoteRenderer;
use remitdesk::infrastructure::tax::FlatTaxRules;
use remitdesk::interfaces::csv::command_reader::{CommandOp, CommandReader, CommandRow};
use remitdesk::interfaces::csv::order_writer::OrderWriter;
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input workflow-command CSV file
    input: PathBuf,

    /// Desk policy JSON (fees, tax rates, partner). Defaults apply if omitted.
    #[arg(long)]
    policy: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.policy {
        Some(path) => DeskConfig::load(path).into_diagnostic()?,
        None => DeskConfig::default(),
    };
    let desk = RemitDesk::new(
        Box::new(InMemoryOrderStore::new()),
        Box::new(InMemorySenderStore::new()),
        Box::new(InMemoryBeneficiaryStore::new()),
        Box::new(TextQuoteRenderer::new()),
        DeskPolicy {
            fees: config.pricing.fees,
            tax: Arc::new(FlatTaxRules::from_policy(&config.pricing)),
            partner: config.partner,
            upload_base: config.upload_base,
        },
    );

    // Replay commands, keeping going past per-row failures.
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    let mut aliases: HashMap<String, Uuid> = HashMap::new();
    for row_result in reader.commands() {
        match row_result {
            Ok(row) => {
                if let Err(e) = apply_row(&desk, &mut aliases, row).await {
                    eprintln!("Error applying command: {e}");
                }
            }
            Err(e) => {
                eprintln!("Error reading command: {e}");
            }
        }
    }

    // Output final state, keyed by file-local alias.
    let orders = desk.orders().await.into_diagnostic()?;
    let by_id: HashMap<Uuid, &str> = aliases
        .iter()
        .map(|(alias, id)| (*id, alias.as_str()))
        .collect();
    let mut rows: Vec<(String, Order)> = orders
        .into_iter()
        .map(|order| {
            let alias = by_id
                .get(&order.id)
                .map(|a| a.to_string())
                .unwrap_or_else(|| order.id.to_string());
            (alias, order)
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    let stdout = io::stdout();
    let mut writer = OrderWriter::new(stdout.lock());
    writer
        .write_orders(rows.iter().map(|(alias, order)| (alias.as_str(), order)))
        .into_diagnostic()?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn known_order(aliases: &HashMap<String, Uuid>, alias: &str) -> Result<Uuid, RemitError> {
    aliases
        .get(alias)
        .copied()
        .ok_or_else(|| RemitError::invalid("order", format!("unknown order alias {alias}")))
}

async fn apply_row(
    desk: &RemitDesk,
    aliases: &mut HashMap<String, Uuid>,
    row: CommandRow,
) -> Result<(), RemitError> {
    match row.op {
        CommandOp::Quote => {
            let draft = OrderDraft {
                student_name: CommandRow::require(row.name, "name")?,
                purpose: row.purpose.unwrap_or(Purpose::Other),
                destination_country: row.country,
                currency: None,
                amount: CommandRow::require(row.amount, "amount")?,
                reference_rate: CommandRow::require(row.ibr, "ibr")?,
                margin: CommandRow::require(row.margin, "margin")?,
                bank_charge_bearer: row.bearer.unwrap_or(BankChargeBearer::Our),
                has_education_loan: row.loan.unwrap_or(false),
                created_by: "cli".to_string(),
            };
            let order = desk.create_quote(draft).await?;
            aliases.insert(row.order, order.id);
        }
        CommandOp::Download => {
            desk.download_quote(known_order(aliases, &row.order)?).await?;
        }
        CommandOp::Sender => {
            let relation = row.relation.unwrap_or(PayerRelation::Self_);
            let contact = ContactDetails {
                email: CommandRow::require(row.email, "email")?,
                phone: String::new(),
                address_line: String::new(),
                city: String::new(),
                postal_code: String::new(),
                country: String::new(),
            };
            let payer_block = match relation {
                PayerRelation::Self_ => None,
                _ => Some(PayerDetails {
                    full_name: CommandRow::require(row.payer_name, "payer_name")?,
                    id_number: CommandRow::require(row.payer_id, "payer_id")?,
                    contact: contact.clone(),
                    funds_source: FundsSource::Savings,
                }),
            };
            let draft = SenderDraft {
                student_name: CommandRow::require(row.name, "name")?,
                student_id_number: row.student_id,
                payer: relation,
                contact,
                residency: Residency::Resident,
                payer_block,
            };
            desk.link_sender(known_order(aliases, &row.order)?, draft)
                .await?;
        }
        CommandOp::Beneficiary => {
            let country = CommandRow::require(row.country, "country")?;
            let account = CommandRow::require(row.account, "account")?;
            let draft = BeneficiaryDraft {
                name: CommandRow::require(row.name, "name")?,
                bank_name: CommandRow::require(row.bank, "bank")?,
                route: route_for(&country, row.bank_code, account)?,
                country,
                intermediary: None,
            };
            desk.attach_beneficiary(
                known_order(aliases, &row.order)?,
                BeneficiarySelection::New(draft),
            )
            .await?;
        }
        CommandOp::Docs => {
            desk.submit_documents(known_order(aliases, &row.order)?)
                .await?;
        }
        CommandOp::Authorize => {
            desk.authorize(known_order(aliases, &row.order)?).await?;
        }
        CommandOp::Status => {
            let status = CommandRow::require(row.status, "status")?;
            desk.set_status(known_order(aliases, &row.order)?, status)
                .await?;
        }
        CommandOp::Override => {
            desk.override_rate(
                known_order(aliases, &row.order)?,
                CommandRow::require(row.ibr, "ibr")?,
                CommandRow::require(row.customer_rate, "customer_rate")?,
                CommandRow::require(row.settlement_rate, "settlement_rate")?,
            )
            .await?;
        }
        CommandOp::Loan => {
            desk.set_education_loan(
                known_order(aliases, &row.order)?,
                CommandRow::require(row.loan, "loan")?,
            )
            .await?;
        }
        CommandOp::Block => {
            desk.block_rate(known_order(aliases, &row.order)?).await?;
        }
        CommandOp::Reprice => {
            let id = known_order(aliases, &row.order)?;
            let current = desk.order(id).await?;
            let inputs = QuoteInputs::new(
                row.ibr
                    .unwrap_or_else(|| current.reference_rate.value()),
                row.margin.unwrap_or_else(|| current.margin.value()),
                row.amount.unwrap_or_else(|| current.amount.value()),
                row.bearer.unwrap_or(current.bank_charge_bearer),
                row.loan.unwrap_or(current.has_education_loan),
            )?;
            desk.reprice(id, inputs).await?;
        }
    }
    Ok(())
}

/// Builds the country-appropriate bank route from the generic
/// `bank_code`/`account` replay columns.
fn route_for(
    country: &str,
    bank_code: Option<String>,
    account: String,
) -> Result<BankRoute, RemitError> {
    let code = |field: &'static str| -> Result<String, RemitError> {
        bank_code
            .clone()
            .ok_or_else(|| RemitError::invalid(field, "required for this country"))
    };
    let route = match country {
        "GB" => BankRoute::SortCode {
            sort_code: code("bank_code")?,
            account_number: account,
        },
        "US" => BankRoute::Aba {
            routing_number: code("bank_code")?,
            account_number: account,
        },
        "AU" => BankRoute::Bsb {
            bsb: code("bank_code")?,
            account_number: account,
        },
        "CA" => {
            let code = code("bank_code")?;
            let (transit, institution) = code.split_once('/').ok_or_else(|| {
                RemitError::invalid("bank_code", "expected transit/institution")
            })?;
            BankRoute::Transit {
                transit_number: transit.to_string(),
                institution_number: institution.to_string(),
                account_number: account,
            }
        }
        "DE" | "FR" | "IE" | "NL" | "ES" | "IT" | "AT" | "BE" | "FI" | "PT" => {
            BankRoute::Iban { iban: account }
        }
        _ => BankRoute::Swift {
            swift: code("bank_code")?,
            account_number: account,
        },
    };
    Ok(route)
}
