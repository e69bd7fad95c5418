pub mod order_report;
