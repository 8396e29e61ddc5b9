use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;

use storefront_core::{Clock, FixedClock, Money};
use storefront_infra::{InMemoryOrderRepository, OrderService, Quote, StorefrontConfig};
use storefront_orders::Order;

/// Run one order through checkout and print the result as JSON.
#[derive(Debug, Parser)]
#[command(name = "storefront", version)]
struct Args {
    /// Order number to open.
    #[arg(long, default_value = "SO-1")]
    number: String,

    /// Cart line as SKU:QTY:UNIT_PRICE (repeatable).
    #[arg(long = "item", value_parser = parse_item)]
    items: Vec<ItemArg>,

    /// Check out as of this date (YYYY-MM-DD) instead of today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Close the order after checkout.
    #[arg(long)]
    close: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ItemArg {
    sku: String,
    quantity: u32,
    unit_price: Money,
}

fn parse_item(raw: &str) -> Result<ItemArg, String> {
    let mut parts = raw.splitn(3, ':');
    let (Some(sku), Some(quantity), Some(unit_price)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected SKU:QTY:UNIT_PRICE, got {raw:?}"));
    };

    let quantity = quantity
        .parse::<u32>()
        .map_err(|e| format!("bad quantity {quantity:?}: {e}"))?;
    let unit_price = unit_price.parse::<Money>().map_err(|e| e.to_string())?;

    Ok(ItemArg {
        sku: sku.to_string(),
        quantity,
        unit_price,
    })
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    order: &'a Order,
    quote: Quote,
}

fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let args = Args::parse();
    let config = StorefrontConfig::from_env().context("loading configuration")?;

    let clock: Arc<dyn Clock> = match args.date {
        Some(date) => Arc::new(FixedClock::at_date(date)),
        None => Arc::new(config.clock()),
    };
    tracing::info!(today = %clock.today(), discount = ?config.discount, "starting");

    let service =
        OrderService::new(InMemoryOrderRepository::new(), clock).with_policy(config.discount);

    let opened = service.open(args.number)?;
    let id = opened.id().context("repository did not assign an order id")?;

    for item in &args.items {
        service.add_item(id, &item.sku, item.quantity, item.unit_price)?;
    }

    let mut order = service.checkout(id)?;
    let quote = service.quote(id)?;
    if args.close {
        order = service.close(id)?;
    }

    let report = Report {
        order: &order,
        quote,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_item_lines() {
        let item = parse_item("book:2:12.50").unwrap();
        assert_eq!(item.sku, "book");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.unit_price, "12.50".parse::<Money>().unwrap());
    }

    #[test]
    fn rejects_malformed_item_lines() {
        assert!(parse_item("book").is_err());
        assert!(parse_item("book:x:1").is_err());
        assert!(parse_item("book:1:-3").is_err());
    }

    #[test]
    fn rejects_prices_past_the_money_range() {
        let err = parse_item("a:2:79228162514264337593543950335").unwrap_err();
        assert!(err.contains("exceed"));
        assert!(parse_item("a:2:1000000000000000").is_ok());
    }

    #[test]
    fn args_accept_repeated_items() {
        let args = Args::try_parse_from([
            "storefront",
            "--item",
            "book:1:10",
            "--item",
            "pen:3:1.20",
            "--date",
            "2023-05-01",
            "--close",
        ])
        .unwrap();

        assert_eq!(args.items.len(), 2);
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2023, 5, 1));
        assert!(args.close);
        assert_eq!(args.number, "SO-1");
    }
}
