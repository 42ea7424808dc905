//! Integration tests for band storage of scattering matrices

use cccc_scatter::{
    decode_bands, decode_orders, encode_bands, encode_orders, BandWidths, DMatrix, ScatterMatrix,
};
use rstest::rstest;

fn dense(n: usize) -> DMatrix<f32> {
    DMatrix::from_fn(n, n, |source, dest| 1.0 + source as f32 + 0.01 * dest as f32)
}

fn in_band(widths: &BandWidths, source: usize, dest: usize) -> bool {
    widths
        .get(dest)
        .is_some_and(|band| band.sources(dest).contains(&source))
}

#[rstest]
#[case(&[0], &[0])] // single group
#[case(&[0, 0, 0], &[0, 0, 0])] // in-group only
#[case(&[0, 0, 0, 0], &[0, 1, 2, 3])] // full downscatter
#[case(&[0, 1, 0], &[0, 0, 1])] // mixed
#[case(&[3, 2, 1, 0], &[0, 1, 2, 3])] // dense
#[case(&[1, 2, 1, 0, 0], &[0, 1, 1, 2, 1])] // irregular
fn band_idempotence(#[case] up: &[usize], #[case] down: &[usize]) {
    let widths = BandWidths::new(up, down).unwrap();
    let n = widths.num_groups();
    let full = dense(n);

    let matrix = ScatterMatrix::from_dense(&full, &widths).unwrap();
    let values = encode_bands(&matrix, &widths).unwrap();
    assert_eq!(values.len(), widths.total());

    let back = decode_bands(&values, &widths).unwrap();
    assert_eq!(back, matrix);

    let result = back.to_dense();
    for source in 0..n {
        for dest in 0..n {
            match in_band(&widths, source, dest) {
                true => assert_eq!(result[(source, dest)], full[(source, dest)]),
                false => assert_eq!(result[(source, dest)], 0.0),
            }
        }
    }

    // a second pass changes nothing
    assert_eq!(encode_bands(&back, &widths).unwrap(), values);
}

#[rstest]
#[case(&[1, 2, 0], &[1, 1, 1])]
#[case(&[0, 2, 0], &[0, 2, 0])]
#[case(&[1, 0, 3], &[1, 0, 1])]
fn isotxs_widths(#[case] jband: &[i32], #[case] ijj: &[i32]) {
    let widths = BandWidths::from_isotxs(jband, ijj).unwrap();
    let (j, i) = widths.to_isotxs();
    assert_eq!(j, jband);
    for g in 0..jband.len() {
        if jband[g] > 0 {
            assert_eq!(i[g], ijj[g]);
        }
    }

    let kmax = jband.iter().sum::<i32>() as usize;
    assert_eq!(widths.total(), kmax);

    let values = (0..2 * kmax).map(|v| v as f32).collect::<Vec<_>>();
    let orders = decode_orders(&values, &widths, 2).unwrap();
    assert_eq!(encode_orders(&orders, &widths).unwrap(), values);
}

#[test]
fn encode_drops_values_outside_band() {
    let wide = BandWidths::new(&[1, 0], &[0, 1]).unwrap();
    let narrow = BandWidths::new(&[0, 0], &[0, 0]).unwrap();

    let matrix = ScatterMatrix::from_dense(&dense(2), &wide).unwrap();
    let values = encode_bands(&matrix, &narrow).unwrap();
    assert_eq!(values, vec![matrix.get(0, 0), matrix.get(1, 1)]);
}

#[test]
fn covering_widths() {
    let full = DMatrix::from_row_slice(3, 3, &[1.0, 0.0, 0.0, 0.5, 1.0, 0.0, 0.0, 0.5, 1.0]);
    let everything = BandWidths::new(&[2, 1, 0], &[0, 1, 2]).unwrap();
    let matrix = ScatterMatrix::from_dense(&full, &everything).unwrap();

    // explicit zeros in the band are dropped from the covering widths
    let widths = BandWidths::covering(&matrix);
    assert_eq!(widths, BandWidths::new(&[1, 1, 0], &[0, 0, 0]).unwrap());
    assert_eq!(widths.max_up(), 1);
    assert_eq!(widths.max_down(), 0);
}
