use chrono::NaiveDate;
use serde::Serialize;

use crate::config::BillingConfig;
use crate::dates;

/// Hours billed per invoice.
pub const QUANTITY: u32 = 40;
/// Sales tax applied to the total. Always zero.
pub const TAX_RATE_PERCENT: u32 = 0;

pub const ITEM_DESCRIPTION: &str = "Software development and consulting";
pub const PAYMENT_TERMS: &str = "Payment for direct deposit; to be paid within 2 weeks.";

/// What a missing invoice number prints as, both on the page and in the file name.
pub const MISSING_NUMBER: &str = "undefined";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Party {
    pub name: String,
    pub address: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub rate: f64,
    /// `quantity * rate`, less any adjustment.
    pub amount: f64,
}

impl LineItem {
    fn priced(rate: f64, adjust_amount: Option<f64>) -> Self {
        let gross = f64::from(QUANTITY) * rate;
        Self {
            description: ITEM_DESCRIPTION.to_string(),
            quantity: QUANTITY,
            rate,
            amount: gross - adjust_amount.unwrap_or(0.0),
        }
    }
}

/// One invoicing run's billing record. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    number: Option<String>,
    date: String,
    bill_from: Party,
    bill_to: Party,
    notes: String,
    terms: String,
    item: LineItem,
}

impl Invoice {
    /// Assembles the invoice for `reference`.
    ///
    /// Never fails: missing party fields stay empty, a missing number stays
    /// `None`, and the adjustment is subtracted as given (no floor at zero).
    pub fn build(
        reference: NaiveDate,
        number: Option<String>,
        adjust_amount: Option<f64>,
        billing: &BillingConfig,
    ) -> Self {
        let dates = dates::derive(reference);

        Self {
            number,
            date: dates.invoice_date,
            bill_from: Party {
                name: billing.name.clone(),
                address: billing.address.clone(),
                state: billing.state.clone(),
            },
            bill_to: Party {
                name: billing.company.clone(),
                address: billing.client_address.clone(),
                state: billing.client_state.clone(),
            },
            notes: format!("Hours worked {}-{}", dates.work_start, dates.work_end),
            terms: PAYMENT_TERMS.to_string(),
            item: LineItem::priced(billing.rate, adjust_amount),
        }
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    /// The number as printed: the literal [`MISSING_NUMBER`] when absent.
    pub fn number_label(&self) -> &str {
        self.number().unwrap_or(MISSING_NUMBER)
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn bill_from(&self) -> &Party {
        &self.bill_from
    }

    pub fn bill_to(&self) -> &Party {
        &self.bill_to
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn terms(&self) -> &str {
        &self.terms
    }

    pub fn item(&self) -> &LineItem {
        &self.item
    }

    pub fn amount(&self) -> f64 {
        self.item.amount
    }
}
