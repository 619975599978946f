//! Fuzz target for parsing and writing ProForma definitions
use afl::*;
use proforma::Term;

fn main() {
    fuzz!(|data: &[u8]| {
        if let Ok(s) = std::str::from_utf8(data)
            && let Ok((term, _)) = Term::pro_forma(s)
            && let Ok(written) = term.to_pro_forma()
        {
            // The canonical form has to be valid ProForma and a fixed point of parse then write
            let (reparsed, _) = Term::pro_forma(&written).unwrap();
            assert_eq!(reparsed.to_pro_forma().unwrap(), written);
        }
    });
}
