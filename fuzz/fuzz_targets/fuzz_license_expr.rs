//! Fuzz target for SPDX license expression parsing and evaluation.
//!
//! Goal: parsing and evaluating against an arbitrary allow-set should **never panic**.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_license_expr
//! ```

#![no_main]

use arbitrary::Arbitrary;
use depaudit_domain::license_expr;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    expression: String,
    allowed: Vec<String>,
}

fuzz_target!(|input: Input| {
    if let Ok(expr) = license_expr::parse(&input.expression) {
        let _ = expr.requirements();
        let _ = expr.evaluate(&mut |req| input.allowed.iter().any(|a| *a == req.license));
    }
});
