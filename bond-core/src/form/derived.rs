//! Derived value engine.
//!
//! `netInvestment` is the only derived field:
//!
//! | field         | formula                                   |
//! |---------------|-------------------------------------------|
//! | netInvestment | `totalAmount` − `adviserCharge`           |
//!
//! Operands are read with [`parse_number`], so text that is not a number
//! counts as zero. Negative results are stored as they are; the validation
//! panel reports them.

use rust_decimal::Decimal;
use tracing::debug;

use super::record::ApplicationRecord;
use crate::calculations::common::{format_number, parse_number};
use crate::models::{Field, FieldValue};

/// Fields whose change triggers a recompute.
pub const DEPENDENCIES: [Field; 2] = [Field::TotalAmount, Field::AdviserCharge];

pub fn is_dependency(field: Field) -> bool {
    DEPENDENCIES.contains(&field)
}

/// Net amount invested after the adviser's charge.
pub fn net_investment(
    total_amount: &str,
    adviser_charge: &str,
) -> Decimal {
    let total = parse_number(total_amount);
    let charge = parse_number(adviser_charge);
    total.checked_sub(charge).unwrap_or_else(|| {
        debug!(%total, %charge, "net investment out of range, using zero");
        Decimal::ZERO
    })
}

/// Recomputes `netInvestment` from the record's current operands and stores
/// it. Returns the stored text.
pub fn recompute(record: &mut ApplicationRecord) -> String {
    let net = net_investment(
        record.text(Field::TotalAmount),
        record.text(Field::AdviserCharge),
    );
    let text = format_number(net);
    debug!(net_investment = %text, "net investment recomputed");
    record.put(Field::NetInvestment, FieldValue::Text(text.clone()));
    text
}
