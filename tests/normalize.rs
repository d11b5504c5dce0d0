use aggregate_topk::{
    base::{normalized_name, Len},
    data::Row,
    normalize::{normalize, normalize_in_place, DegeneratePolicy, NormalizeOptions},
    score::{score, AggregationMode},
    Error,
};
use ntest::assert_about_eq;
use rstest::rstest;

use helpers::dataset::create_rows;

const COLUMNS: [&str; 3] = ["a", "b", "c"];

#[rstest]
#[case(2, Some(1))]
#[case(100, Some(2))]
#[case(1000, Some(3))]
fn test_endpoints(#[case] count: usize, #[case] seed: Option<u64>) {
    let rows = create_rows(count, &COLUMNS, seed);
    let view = normalize(&rows, &NormalizeOptions::new(&COLUMNS, &["b"])).unwrap();
    assert_eq!(view.len(), count);

    for (col, column) in COLUMNS.iter().enumerate() {
        let domain = view.domain(col).unwrap();
        let inverted = view.is_inverted(col);
        assert_eq!(inverted, *column == "b");

        for (ix, row) in rows.iter().enumerate() {
            let raw = row.number(ix, column).unwrap();
            let value = view.value(ix, col);

            if raw == domain.min {
                assert_eq!(value, if inverted { 1. } else { 0. });
            } else if raw == domain.max {
                assert_eq!(value, if inverted { 0. } else { 1. });
            } else {
                assert!(value > 0. && value < 1., "{} out of (0,1)", value);
            }
        }
    }
}

#[test]
fn test_idempotent() {
    let options = NormalizeOptions::new(&COLUMNS, &["c"]);
    let mut rows = create_rows(50, &COLUMNS, Some(5));

    normalize_in_place(&mut rows, &options).unwrap();
    let first = rows.clone();
    normalize_in_place(&mut rows, &options).unwrap();
    assert_eq!(rows, first);

    // Normalizing the normalized fields again gives the same values
    let names: Vec<String> = COLUMNS.iter().map(|c| normalized_name(c)).collect();
    let names: Vec<&str> = names.iter().map(|c| c.as_str()).collect();
    let view = normalize(&rows, &NormalizeOptions::new(&names, &[])).unwrap();
    for (col, name) in names.iter().enumerate() {
        for (ix, row) in rows.iter().enumerate() {
            assert_about_eq!(view.value(ix, col), row.number(ix, name).unwrap(), 1e-12);
        }
    }
}

#[test]
fn test_view_matches_fields() {
    let options = NormalizeOptions::new(&COLUMNS, &["a"]);
    let rows = create_rows(30, &COLUMNS, Some(6));
    let view = normalize(&rows, &options).unwrap();
    let augmented = view.augment(&rows).unwrap();

    for (ix, row) in augmented.iter().enumerate() {
        for mode in AggregationMode::ALL {
            let expected = mode.aggregate(view.row(ix).iter().copied()).unwrap();
            let observed = score(row, ix, &["a_norm", "b_norm", "c_norm"], mode).unwrap();
            assert_eq!(observed, expected);
        }
    }
}

#[test]
fn test_missing_and_degenerate() {
    let rows = vec![
        Row::new().with("a", 1.).with("b", 2.),
        Row::new().with("a", 1.),
    ];
    assert!(matches!(
        normalize(&rows, &NormalizeOptions::new(&["b"], &[])),
        Err(Error::MissingAttribute { row: 1, .. })
    ));

    let mut options = NormalizeOptions::new(&["a"], &["a"]);
    assert!(matches!(
        normalize(&rows, &options),
        Err(Error::DegenerateDomain { .. })
    ));

    options.degenerate = DegeneratePolicy::Constant(0.5);
    let view = normalize(&rows, &options).unwrap();
    assert_eq!(view.column(0).to_vec(), vec![0.5, 0.5]);

    // Constants must be valid normalized values
    for c in [-0.1, 1.5, f64::NAN] {
        options.degenerate = DegeneratePolicy::Constant(c);
        assert!(matches!(
            normalize(&rows, &options),
            Err(Error::ConstantOutOfRange(_))
        ));
    }
    options.degenerate = DegeneratePolicy::Constant(1.);
    assert!(normalize(&rows, &options).is_ok());
}

#[test]
fn test_apply_row_count() {
    let rows = create_rows(5, &COLUMNS, Some(8));
    let view = normalize(&rows, &NormalizeOptions::new(&COLUMNS, &[])).unwrap();

    let mut fewer = rows[..3].to_vec();
    assert!(matches!(
        view.apply(&mut fewer),
        Err(Error::RowCountMismatch { expected: 5, actual: 3 })
    ));
    assert!(fewer[0].get("a_norm").is_none());
    assert!(matches!(
        view.augment(&create_rows(6, &COLUMNS, Some(9))),
        Err(Error::RowCountMismatch { expected: 5, actual: 6 })
    ));

    let augmented = view.augment(&rows).unwrap();
    assert!(matches!(
        score(&augmented[4], 4, &["a_norm", "d_norm"], AggregationMode::Sum),
        Err(Error::MissingAttribute { row: 4, .. })
    ));
}
