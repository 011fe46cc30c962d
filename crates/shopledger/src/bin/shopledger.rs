//! shopledger - Lot-tracked inventory ledger for small shops.
//!
//! Records purchases and sales against a JSON ledger file and reports
//! stock, costs, and the kardex of every product.

fn main() -> std::process::ExitCode {
    shopledger::cmd::main()
}
