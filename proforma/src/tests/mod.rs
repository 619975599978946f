#![allow(clippy::missing_panics_doc)]
mod json;
mod settings;

/// Create a parse test based on a given case and its name.
///
/// * `"case", name` parses the case, writes it, and checks that parsing and writing again gives the same string
/// * `exact "case", name` additionally checks that the written string is the case itself
/// * `ne "case", Kind, name` checks that parsing fails with the given error kind
#[macro_export]
macro_rules! parse_test {
    (ne $case:literal, $kind:ident, $name:ident) => {
        #[test]
        fn $name() {
            let res = $crate::Term::pro_forma($case);
            println!("{}\n{:?}", $case, res);
            let errors = res.expect_err($case);
            assert_eq!(
                errors.last().map(|e| e.get_kind().clone()),
                Some($crate::ProFormaErrorKind::$kind),
                "{}",
                $case
            );
        }
    };
    (exact $case:literal, $name:ident) => {
        #[test]
        fn $name() {
            let back = $crate::parse_test!(@round_trip $case);
            assert_eq!(back, $case);
        }
    };
    ($case:literal, $name:ident) => {
        #[test]
        fn $name() {
            let _back = $crate::parse_test!(@round_trip $case);
        }
    };
    (@round_trip $case:literal) => {{
        use itertools::Itertools;
        let res = $crate::Term::pro_forma($case);
        println!("{}", $case);
        assert!(
            res.is_ok(),
            "{}",
            res.err().unwrap().into_iter().join("\n")
        );
        let (term, _) = res.unwrap();
        let back = term.to_pro_forma().unwrap();
        let res_back = $crate::Term::pro_forma(&back);
        assert!(
            res_back.is_ok(),
            "{back}\n{}",
            res_back.err().unwrap().into_iter().join("\n")
        );
        let (term_back, _) = res_back.unwrap();
        assert_eq!(term_back.to_pro_forma().unwrap(), back, "{} != {back}", $case);
        back
    }};
}
