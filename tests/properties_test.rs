//! Property-based tests for the render dispatcher.
//!
//! Random small tables exercise the invariants that must hold for any
//! input: determinism, count conservation, fill normalisation, jitter
//! bounds and error naming.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use trueno_recipes::prelude::*;

const LEVELS: [&str; 4] = ["a", "b", "c", "d"];

fn table(cats: &[usize], groups: &[usize], values: &[f32]) -> Dataset {
    let n = cats.len().min(groups.len()).min(values.len());
    Dataset::new()
        .with_column("cat", cats[..n].iter().map(|&i| LEVELS[i]))
        .unwrap()
        .with_column("grp", groups[..n].iter().map(|&i| LEVELS[i]))
        .unwrap()
        .with_column("value", values[..n].iter().copied())
        .unwrap()
}

fn rect_tops(chart: &Chart) -> Vec<(f32, f32, f32)> {
    chart
        .marks()
        .filter_map(|m| match m {
            Mark::Rect {
                xmin,
                xmax,
                ymin,
                ymax,
                ..
            } => Some(((xmin + xmax) / 2.0, *ymin, *ymax)),
            _ => None,
        })
        .collect()
}

fn rows() -> impl Strategy<Value = (Vec<usize>, Vec<usize>, Vec<f32>)> {
    (1usize..40).prop_flat_map(|n| {
        (
            proptest::collection::vec(0usize..4, n),
            proptest::collection::vec(0usize..3, n),
            proptest::collection::vec(0.1f32..100.0, n),
        )
    })
}

proptest! {
    /// Rendering the same recipe twice gives the same chart.
    #[test]
    fn test_render_is_idempotent((cats, groups, values) in rows()) {
        let data = table(&cats, &groups, &values);
        let aes = Aes::new().x("cat").y("value").colour("grp");
        let spec = GeomSpec::point().position(Position::jitter());
        let a = render(&data, &aes, &spec, &StyleOptions::default()).unwrap();
        let b = render(&data, &aes, &spec, &StyleOptions::default()).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Count bars add up to the number of rows.
    #[test]
    fn test_count_bars_conserve_rows((cats, groups, values) in rows()) {
        let data = table(&cats, &groups, &values);
        let aes = Aes::new().x("cat").fill("grp");
        let chart = render(&data, &aes, &GeomSpec::bar(), &StyleOptions::default()).unwrap();
        let total: f32 = rect_tops(&chart).iter().map(|(_, lo, hi)| hi - lo).sum();
        let rows = data.nrow() as f32;
        prop_assert!((total - rows).abs() < 1e-3, "total {} rows {}", total, rows);
    }

    /// Every filled stack reaches exactly 1.
    #[test]
    fn test_fill_tops_are_one((cats, groups, values) in rows()) {
        let data = table(&cats, &groups, &values);
        let spec = GeomSpec::col().position(Position::Fill);
        let aes = Aes::new().x("cat").y("value").fill("grp");
        let chart = render(&data, &aes, &spec, &StyleOptions::default()).unwrap();
        let tops = rect_tops(&chart);
        let mut xs: Vec<f32> = tops.iter().map(|t| t.0).collect();
        xs.sort_by(f32::total_cmp);
        xs.dedup_by(|a, b| (*a - *b).abs() < 1e-4);
        for x in xs {
            let top = tops
                .iter()
                .filter(|t| (t.0 - x).abs() < 1e-4)
                .map(|t| t.2)
                .fold(0.0f32, f32::max);
            prop_assert!((top - 1.0).abs() < 1e-4, "stack at {} tops out at {}", x, top);
        }
    }

    /// Jittered points stay within 0.4 of their level and keep their y.
    #[test]
    fn test_jitter_stays_in_band((cats, groups, values) in rows()) {
        let data = table(&cats, &groups, &values);
        let spec = GeomSpec::point().position(Position::jitter());
        let aes = Aes::new().x("cat").y("value");
        let chart = render(&data, &aes, &spec, &StyleOptions::default()).unwrap();
        let nlevels = data.levels("cat").unwrap().len() as f32;
        prop_assert_eq!(chart.mark_count(), data.nrow());
        for mark in chart.marks() {
            let Mark::Point { x, y, .. } = mark else {
                return Err(TestCaseError::fail("expected point marks"));
            };
            let slot = x.round();
            prop_assert!((x - slot).abs() <= 0.4 + 1e-4, "x {} strays from its level", x);
            prop_assert!(slot >= 1.0 && slot <= nlevels);
            prop_assert!(values.contains(y));
        }
    }

    /// An unmapped column is reported by name whatever the geometry.
    #[test]
    fn test_unknown_column_is_named(name in "zz_[a-z]{1,8}", kind in 0usize..GeomKind::ALL.len()) {
        let data = table(&[0, 1], &[0, 1], &[1.0, 2.0]);
        let result = render(
            &data,
            &Aes::new().x(&name).y("value"),
            &GeomSpec::new(GeomKind::ALL[kind]),
            &StyleOptions::default(),
        );
        match result {
            Err(Error::UnknownColumn(c)) => prop_assert_eq!(c, name),
            other => {
                let reason = format!("expected UnknownColumn, got {other:?}");
                return Err(TestCaseError::fail(reason));
            }
        }
    }
}
