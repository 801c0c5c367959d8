use crate::domain::order::Order;
use crate::error::Result;
use std::io::Write;

/// Writes the final state of each order as CSV, one row per alias.
pub struct OrderWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OrderWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().from_writer(sink),
        }
    }

    pub fn write_orders<'a, I>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a Order)>,
    {
        self.writer.write_record([
            "order",
            "status",
            "customer_rate",
            "local_amount",
            "bank_fee",
            "tax_on_conversion",
            "tax_collected_at_source",
            "total_payable",
            "fx_rate_overridden",
        ])?;
        for (alias, order) in rows {
            self.writer.write_record([
                alias.to_string(),
                order.status.to_string(),
                order.pricing.customer_rate.to_string(),
                order.pricing.local_amount.to_string(),
                order.pricing.bank_fee.to_string(),
                order.pricing.tax_on_conversion.to_string(),
                order.pricing.tax_collected_at_source.to_string(),
                order.pricing.total_payable.to_string(),
                order.fx_rate_overridden.to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
