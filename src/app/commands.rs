use crate::core::depot::{DepotService, ProcessOutcome};
use crate::domain::model::{CustomerRecord, Dimension, ParcelClass, ParcelRecord, SequenceNumber};
use crate::domain::ports::{AuditLog, Storage};
use crate::utils::error::{DepotError, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fmt::Write;

/// Depot operations, shared by the `depot` subcommands and the shell.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Serve every queued customer, then write the report
    Run,
    /// Serve the next customer(s) in the queue
    Process {
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Look up a stored parcel by ID
    Search { id: String },
    /// Add a customer to the end of the queue
    AddCustomer {
        #[arg(long)]
        name: String,
        /// Comma separated parcel IDs
        #[arg(long = "parcel-ids", value_delimiter = ',', required = true)]
        parcel_ids: Vec<String>,
    },
    /// Store a new parcel, optionally for a queued customer
    AddParcel {
        #[arg(long)]
        id: String,
        #[arg(long)]
        days: u32,
        #[arg(long)]
        weight: f64,
        #[arg(long)]
        length: f64,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
        /// Sequence number of the customer collecting it
        #[arg(long)]
        customer: Option<SequenceNumber>,
    },
    /// Remove a customer from the queue by sequence number
    DeleteCustomer { sequence: SequenceNumber },
    /// Mark a parcel as collected
    Collect { id: String },
    /// Write the summary report
    Report {
        #[arg(long)]
        output: Option<String>,
    },
    /// Show the queue and the stored parcels
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show counts and the most recent processing step
    Status,
    /// Show processed parcels with their processing time
    History,
    /// Print the audit log kept for this session
    Log {
        #[arg(long)]
        clear: bool,
    },
    /// Read commands from standard input
    Shell,
}

#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_help_subcommand = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

/// 切分 shell 指令，雙引號內的空白不分割
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err(DepotError::validation("unterminated quote"));
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parses one shell line. Blank lines and `#` comments yield `None`.
pub fn parse_shell_line(line: &str) -> Result<Option<Command>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let tokens = tokenize(trimmed)?;
    let parsed = ShellLine::try_parse_from(tokens).map_err(|e| DepotError::validation(e.to_string()))?;
    Ok(Some(parsed.command))
}

#[derive(Serialize)]
struct ParcelView<'a> {
    #[serde(flatten)]
    parcel: &'a ParcelRecord,
    class: ParcelClass,
    fee: f64,
}

#[derive(Serialize)]
struct CustomerView<'a> {
    #[serde(flatten)]
    customer: &'a CustomerRecord,
    estimated_fee: f64,
}

#[derive(Serialize)]
struct DepotView<'a> {
    customers: Vec<CustomerView<'a>>,
    parcels: Vec<ParcelView<'a>>,
}

fn describe_outcome(out: &mut String, outcome: &ProcessOutcome) {
    let customer = &outcome.customer;
    let _ = writeln!(
        out,
        "Customer #{} {}: {} parcel(s) processed, total {:.2}",
        customer.sequence,
        customer.name,
        outcome.charges.len(),
        outcome.total_fee()
    );
    for charge in &outcome.charges {
        let _ = writeln!(out, "  {} ({}) {:.2}", charge.parcel_id, charge.class, charge.fee);
    }
    for id in &outcome.missing {
        let _ = writeln!(out, "  {} not in store, skipped", id);
    }
}

fn describe_parcel(out: &mut String, parcel: &ParcelRecord, class: ParcelClass, fee: f64) {
    let _ = writeln!(
        out,
        "  {} {}d {:.1}kg {} {} fee {:.2}",
        parcel.id, parcel.days, parcel.weight, parcel.dimension, class, fee
    );
}

fn list<S: Storage, L: AuditLog>(service: &DepotService<S, L>, json: bool) -> Result<String> {
    let customers = service.customers();
    let parcels = service.parcels();

    if json {
        let view = DepotView {
            customers: customers
                .iter()
                .map(|c| CustomerView {
                    customer: c,
                    estimated_fee: service.estimated_fee(c.sequence).unwrap_or(0.0),
                })
                .collect(),
            parcels: parcels
                .iter()
                .map(|p| ParcelView {
                    parcel: p,
                    class: service.classify(p),
                    fee: service.fee_for(p),
                })
                .collect(),
        };
        let mut text = serde_json::to_string_pretty(&view)?;
        text.push('\n');
        return Ok(text);
    }

    let mut out = String::new();
    let _ = writeln!(out, "Queue ({}):", customers.len());
    for c in &customers {
        let _ = writeln!(
            out,
            "  #{} {} [{}] est. {:.2}",
            c.sequence,
            c.name,
            c.parcel_ids.join(", "),
            service.estimated_fee(c.sequence).unwrap_or(0.0)
        );
    }
    let _ = writeln!(out, "Parcels ({}):", parcels.len());
    for p in &parcels {
        describe_parcel(&mut out, p, service.classify(p), service.fee_for(p));
    }
    Ok(out)
}

/// Runs `command` against the service and returns the text to show the user.
pub fn execute<S: Storage, L: AuditLog>(
    service: &mut DepotService<S, L>,
    command: &Command,
    report_path: &str,
) -> Result<String> {
    let mut out = String::new();

    match command {
        Command::Run => {
            let mut served = 0usize;
            loop {
                match service.process_next() {
                    Ok(outcome) => {
                        describe_outcome(&mut out, &outcome);
                        served += 1;
                    }
                    Err(DepotError::EmptyQueue) => break,
                    Err(e) => return Err(e),
                }
            }
            service.report(report_path)?;
            let _ = writeln!(out, "Served {} customer(s); report written to {}", served, report_path);
        }
        Command::Process { count } => {
            for i in 0..*count {
                match service.process_next() {
                    Ok(outcome) => describe_outcome(&mut out, &outcome),
                    Err(DepotError::EmptyQueue) if i > 0 => {
                        let _ = writeln!(out, "Queue is empty after {} customer(s)", i);
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Command::Search { id } => {
            let found = service.search_by_id(id).cloned();
            match found {
                Some(parcel) => {
                    let class = service.classify(&parcel);
                    let fee = service.fee_for(&parcel);
                    let _ = writeln!(out, "Found parcel:");
                    describe_parcel(&mut out, &parcel, class, fee);
                    if let Some(owner) = service.owner_of(id) {
                        let _ = writeln!(out, "  awaiting customer #{} {}", owner.sequence, owner.name);
                    }
                }
                None if service.is_parcel_processed(id) => {
                    let _ = writeln!(out, "Parcel {} has already been processed", id);
                }
                None => {
                    let _ = writeln!(out, "Parcel {} not found", id);
                }
            }
        }
        Command::AddCustomer { name, parcel_ids } => {
            let sequence = service.add_customer(name, parcel_ids)?;
            let _ = writeln!(out, "Added customer #{} {}", sequence, name.trim());
        }
        Command::AddParcel {
            id,
            days,
            weight,
            length,
            width,
            height,
            customer,
        } => {
            let dimension = Dimension::new(*length, *width, *height)?;
            let parcel = ParcelRecord::new(id.trim(), *days, *weight, dimension)?;
            let assigned = service.add_parcel(parcel, *customer)?;
            let _ = writeln!(out, "Added parcel {}", id.trim());
            match (customer, assigned) {
                (Some(sequence), true) => {
                    let _ = writeln!(out, "Assigned to customer #{}", sequence);
                }
                (Some(sequence), false) => {
                    let _ = writeln!(out, "No customer #{} in the queue; parcel left unassigned", sequence);
                }
                (None, _) => {}
            }
        }
        Command::DeleteCustomer { sequence } => {
            let removed = service.delete_customer(*sequence)?;
            let _ = writeln!(out, "Deleted customer #{} {}", removed.sequence, removed.name);
        }
        Command::Collect { id } => {
            if service.update_parcel_status(id, true) {
                let _ = writeln!(out, "Parcel {} marked as collected", id);
            } else {
                let _ = writeln!(out, "Parcel {} not found", id);
            }
        }
        Command::Report { output } => {
            let destination = output.as_deref().unwrap_or(report_path);
            let report = service.report(destination)?;
            out.push_str(&report.render());
            let _ = writeln!(out, "Report written to {}", destination);
        }
        Command::List { json } => return list(service, *json),
        Command::Status => {
            let _ = writeln!(out, "Customers waiting: {}", service.customer_count());
            let _ = writeln!(out, "Parcels stored: {}", service.parcel_count());
            let _ = writeln!(out, "Parcels processed: {}", service.processed_parcels().len());
            match service.next_customer() {
                Some(next) => {
                    let _ = writeln!(out, "Next customer: #{} {}", next.sequence, next.name);
                }
                None => {
                    let _ = writeln!(out, "Next customer: none");
                }
            }
            match service.last_processed() {
                Some(last) => {
                    let _ = writeln!(
                        out,
                        "Last processed: parcel {} for #{} {}, fee {:.2}",
                        last.parcel.id, last.customer_sequence, last.customer_name, last.fee
                    );
                }
                None => {
                    let _ = writeln!(out, "Last processed: none");
                }
            }
        }
        Command::History => {
            for entry in service.processed_parcels() {
                let _ = writeln!(
                    out,
                    "{} {}",
                    entry.processed_at.format("%Y-%m-%d %H:%M:%S"),
                    entry.parcel_id
                );
            }
        }
        Command::Log { clear } => {
            if *clear {
                service.clear_audit_log()?;
                let _ = writeln!(out, "Audit log cleared");
            } else {
                out.push_str(&service.audit_log().text());
            }
        }
        Command::Shell => {
            return Err(DepotError::validation("shell cannot be nested"));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            tokenize(r#"add-customer --name "Mary Ann" --parcel-ids P1,P2"#).unwrap(),
            vec!["add-customer", "--name", "Mary Ann", "--parcel-ids", "P1,P2"]
        );
        assert_eq!(tokenize(r#"search """#).unwrap(), vec!["search", ""]);
        assert!(tokenize(r#"search "P1"#).is_err());
    }

    #[test]
    fn test_parse_shell_line() {
        assert_eq!(parse_shell_line("   ").unwrap(), None);
        assert_eq!(parse_shell_line("# comment").unwrap(), None);
        assert_eq!(
            parse_shell_line("process --count 3").unwrap(),
            Some(Command::Process { count: 3 })
        );
        assert_eq!(
            parse_shell_line("add-customer --name Dave --parcel-ids P1,P2").unwrap(),
            Some(Command::AddCustomer {
                name: "Dave".to_string(),
                parcel_ids: vec!["P1".to_string(), "P2".to_string()],
            })
        );
        assert_eq!(
            parse_shell_line("delete-customer 4").unwrap(),
            Some(Command::DeleteCustomer { sequence: 4 })
        );
    }

    #[test]
    fn test_parse_shell_line_rejects_unknown_command() {
        assert!(matches!(
            parse_shell_line("teleport P1"),
            Err(DepotError::ValidationError { .. })
        ));
        assert!(parse_shell_line("delete-customer abc").is_err());
    }
}
