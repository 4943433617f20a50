//! Formatting events for New Relic log ingestion
//!
//! Writes a handful of events to stdout as newline-delimited JSON.
//!
//! Run with: cargo run --example format_event

use newrelic_log_formatter::build_info;
use newrelic_log_formatter::prelude::*;
use std::io;

#[derive(Debug, thiserror::Error)]
#[error("payment gateway timed out")]
struct GatewayTimeout {
    #[source]
    source: io::Error,
}

fn main() -> Result<()> {
    println!("=== New Relic Log Formatter - Format Event Example ===\n");

    let config = FormatterConfig::new().with_build_info(build_info!("environment" => "demo"));
    let formatter = StructuredJsonFormatter::new(config)?;
    let mut appender = JsonLinesAppender::with_formatter(io::stdout(), formatter);

    println!("1. Plain message:");
    appender.append(&LogEvent::new(LogLevel::Information, "Service started"))?;

    println!("\n2. Properties with formats:");
    let event = LogEvent::new(
        LogLevel::Warning,
        "Order {OrderId} for {Customer} totals {Total:F2}",
    )
    .with_property("OrderId", 1042)
    .with_property(
        "Customer",
        StructureValue::tagged("Customer")
            .with_property("Name", "Ada")
            .with_property("Tier", "gold"),
    )
    .with_property("Total", 87.456);
    appender.append(&event)?;

    println!("\n3. Exception with causes:");
    let error = GatewayTimeout {
        source: io::Error::new(io::ErrorKind::TimedOut, "no response in 30s"),
    };
    let event = LogEvent::new(LogLevel::Error, "Charge failed for {OrderId}")
        .with_property("OrderId", 1042)
        .with_exception(&error);
    appender.append(&event)?;

    println!("\n4. Trace linking metadata:");
    let linking = StructureValue::new()
        .with_property("trace.id", "4bf92f3577b34da6")
        .with_property("span.id", "00f067aa0ba902b7")
        .with_property("entity.name", "billing-api");
    let event = LogEvent::new(LogLevel::Debug, "Request handled")
        .with_property("newrelic.linkingmetadata", linking)
        .with_property("@timestamp", "reserved names are escaped");
    appender.append(&event)?;

    appender.flush()?;

    let metrics = appender.metrics();
    println!(
        "\nFormatted {} events, {} failures",
        metrics.formatted_count(),
        metrics.failed_count()
    );
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
