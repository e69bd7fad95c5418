use crate::domain::order::Order;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    id: u64,
    customer_name: &'a str,
    customer_email: &'a str,
    customer_phone: &'a str,
    status: String,
    total: String,
    transaction_id: &'a str,
}

/// Writes the order-management listing as CSV.
///
/// One row per order with the customer's contact details, status and total.
pub struct OrderReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OrderReportWriter<W> {
    pub fn new(sink: W) -> Self {
        let writer = csv::WriterBuilder::new().has_headers(false).from_writer(sink);
        Self { writer }
    }

    pub fn write_orders(&mut self, orders: impl IntoIterator<Item = Order>) -> Result<()> {
        self.writer.write_record([
            "id",
            "customer_name",
            "customer_email",
            "customer_phone",
            "status",
            "total",
            "transaction_id",
        ])?;
        for order in orders {
            self.writer.serialize(ReportRow {
                id: order.id,
                customer_name: &order.contact.name,
                customer_email: &order.contact.email,
                customer_phone: &order.contact.phone,
                status: order.status.to_string(),
                total: order.total.to_string(),
                transaction_id: order.transaction_id.as_deref().unwrap_or_default(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Product;
    use crate::domain::money::Price;
    use crate::domain::order::{CartLine, Contact, NewOrder};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_report_rows() {
        let product = Product {
            id: 1,
            slug: "a".to_string(),
            name: "A".to_string(),
            price: Price::new(dec!(100)),
        };
        let contact = Contact {
            name: "Asha, K".to_string(),
            email: "asha@example.com".to_string(),
            phone: "98400".to_string(),
        };
        let mut paid = Order::from_new(
            1,
            NewOrder::new(1, vec![CartLine::new(&product, 2)], String::new(), contact, Utc::now()),
        );
        paid.transaction_id = Some("pi_1".to_string());
        paid.mark_paid();
        let pending = Order::from_new(
            2,
            NewOrder::new(1, vec![], String::new(), Contact::default(), Utc::now()),
        );

        let mut out = Vec::new();
        OrderReportWriter::new(&mut out)
            .write_orders(vec![paid, pending])
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "id,customer_name,customer_email,customer_phone,status,total,transaction_id"
        );
        assert_eq!(lines[1], "1,\"Asha, K\",asha@example.com,98400,paid,200,pi_1");
        assert_eq!(lines[2], "2,,,,pending,0,");
    }

    #[test]
    fn test_empty_report_has_header() {
        let mut out = Vec::new();
        OrderReportWriter::new(&mut out)
            .write_orders(Vec::new())
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap().trim_end(),
            "id,customer_name,customer_email,customer_phone,status,total,transaction_id"
        );
    }
}
