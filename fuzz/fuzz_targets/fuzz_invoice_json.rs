#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Whatever a stored invoice holds, reading its totals must not panic.
    if let Ok(invoice) = serde_json::from_slice::<factuur::SalesInvoice>(data) {
        let _ = invoice.totals();
        for line in invoice.lines() {
            let _ = line.vat_amount();
        }
    }
});
