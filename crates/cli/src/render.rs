//! Table rendering

use std::io;

use reqwest::Url;
use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use serde_json::Value;
use shoptech_app::{
    admin::AdminUser,
    domain::{
        carts::models::{CartRow, CartView},
        catalog::{CatalogItem, models::resolve_image_url},
    },
};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

const MISSING: &str = "-";

/// Price in roubles, the shop's only currency.
pub(crate) fn money(amount: Decimal) -> String {
    Money::from_decimal(amount, iso::RUB).to_string()
}

pub(crate) fn write_catalog(
    mut out: impl io::Write,
    cars: &[CatalogItem],
    origin: &Url,
) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record([
        "ID",
        "Brand",
        "Model",
        "Power",
        "Displacement",
        "Drive",
        "Price",
        "Image",
    ]);

    for car in cars {
        builder.push_record([
            car.id.to_string(),
            car.brand.clone(),
            car.model.clone(),
            passthrough(car.power.as_ref()),
            passthrough(car.displacement.as_ref()),
            passthrough(car.drive.as_ref()),
            money(car.price),
            car.image_url(origin)
                .unwrap_or_else(|| MISSING.to_string()),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(6..7), Alignment::right());

    writeln!(out, "{table}")
}

/// Write the cart table followed by its count and total.
pub(crate) fn write_cart(mut out: impl io::Write, view: &CartView, origin: &Url) -> io::Result<()> {
    if view.rows.is_empty() {
        return writeln!(out, "{} cart is empty", view.mode);
    }

    let mut builder = Builder::default();

    builder.push_record(["Item", "Car", "Title", "Price", "Image"]);

    for row in &view.rows {
        builder.push_record(cart_record(row, origin));
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..4), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(
        out,
        "{} cart: {} items, total {}",
        view.mode,
        view.summary.count,
        money(view.summary.total)
    )
}

pub(crate) fn write_users(mut out: impl io::Write, users: &[AdminUser]) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Username"]);

    for user in users {
        builder.push_record([
            user.id
                .map_or_else(|| MISSING.to_string(), |id| id.to_string()),
            user.username.clone(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());

    writeln!(out, "{table}")
}

fn cart_record(row: &CartRow, origin: &Url) -> [String; 5] {
    [
        row.cart_item_id.to_string(),
        row.car_id
            .map_or_else(|| MISSING.to_string(), |car| car.to_string()),
        row.title().unwrap_or_else(|| MISSING.to_string()),
        money(row.price),
        resolve_image_url(row.image_path.as_deref(), origin)
            .unwrap_or_else(|| MISSING.to_string()),
    ]
}

fn passthrough(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
