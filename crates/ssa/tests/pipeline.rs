use approx::assert_abs_diff_eq;
use caterpillar_ssa::{
    ComponentGroup, MemoryMode, SeriesIndex, SeriesInput, Ssa, SsaConfig, TimeSeries,
};
use ndarray::Array1;

/// Sine of period 10 on a slow linear trend, N = 100.
fn sine_with_trend() -> Vec<f64> {
    (0..100)
        .map(|t| (2.0 * std::f64::consts::PI * t as f64 / 10.0).sin() + 0.01 * t as f64)
        .collect()
}

#[test]
fn sine_with_trend_end_to_end() {
    let data = sine_with_trend();
    let ssa = Ssa::new(data.clone(), &SsaConfig::new(20)).unwrap();

    assert_eq!(ssa.series_length(), 100);
    assert_eq!(ssa.window_length(), 20);
    assert_eq!(ssa.n_windows(), 81);
    assert!(ssa.rank() >= 1 && ssa.rank() <= 20);

    // The sine pair leads the spectrum and its halves are strongly w-correlated.
    let wcorr = ssa.w_correlation().unwrap();
    assert!(
        wcorr.get(0, 1).unwrap() > 0.9,
        "wcorr(0, 1) = {}",
        wcorr.get(0, 1).unwrap()
    );

    let full = ssa.reconstruct(0..ssa.rank()).unwrap();
    for (reconstructed, original) in full.as_slice().iter().zip(&data) {
        assert_abs_diff_eq!(*reconstructed, *original, epsilon = 1e-9);
    }
}

#[test]
fn constant_series_is_one_component() {
    let ssa = Ssa::new(vec![5.0; 30], &SsaConfig::new(7)).unwrap();
    assert_eq!(ssa.rank(), 1);

    let table = ssa.components_table(0);
    assert_eq!(table.n_components(), 1);
    for &v in table.column(0).unwrap() {
        assert_abs_diff_eq!(v, 5.0, epsilon = 1e-12);
    }

    let wcorr = ssa.w_correlation().unwrap();
    assert_eq!(wcorr.n_components(), 1);
    assert_eq!(wcorr.get(0, 0), Some(1.0));
}

#[test]
fn constant_series_is_one_component_for_every_window() {
    for n in 6..80 {
        for l in 2..=n / 2 {
            let ssa = Ssa::new(vec![5.0; n], &SsaConfig::new(l)).unwrap();
            assert_eq!(ssa.rank(), 1, "n = {n}, l = {l}");
            assert!(ssa.reconstruction_error() < 1e-9, "n = {n}, l = {l}");
        }
    }
}

#[test]
fn memory_modes_produce_identical_components() {
    let data = sine_with_trend();
    let saving = Ssa::new(data.clone(), &SsaConfig::new(20)).unwrap();
    let retain = Ssa::new(
        data,
        &SsaConfig::new(20).with_memory_mode(MemoryMode::Retain),
    )
    .unwrap();

    assert_eq!(saving.rank(), retain.rank());
    assert_eq!(saving.components(), retain.components());
    assert_eq!(saving.singular_values(), retain.singular_values());
    assert!(!saving.elementary_matrices().is_available());
    assert!(retain.elementary_matrices().is_available());
}

#[test]
fn retained_elementary_matrices_sum_to_trajectory() {
    let data = sine_with_trend();
    let config = SsaConfig::new(10).with_retain(true);
    let ssa = Ssa::new(data.clone(), &config).unwrap();
    let elementary = ssa.elementary_matrices().into_option().unwrap();
    let sum = elementary.sum_axis(ndarray::Axis(0));

    for i in 0..10 {
        for j in 0..ssa.n_windows() {
            assert_abs_diff_eq!(sum[[i, j]], data[i + j], epsilon = 1e-9);
        }
    }
}

#[test]
fn input_representations_agree() {
    let data = sine_with_trend();
    let config = SsaConfig::new(12);
    let from_list = Ssa::new(data.clone(), &config).unwrap();
    let from_array = Ssa::new(Array1::from(data.clone()), &config).unwrap();
    let from_slice = Ssa::new(data.as_slice(), &config).unwrap();

    assert_eq!(from_list.components(), from_array.components());
    assert_eq!(from_list.components(), from_slice.components());
}

#[test]
fn labeled_index_is_carried_through() {
    let values: Vec<f64> = (0..24).map(|t| (t as f64 * 0.5).cos() + 2.0).collect();
    let index: Vec<String> = (0..24).map(|m| format!("2020-{:02}", m % 12 + 1)).collect();
    let input = SeriesInput::Labeled {
        index: index.clone(),
        values,
    };
    let ssa = Ssa::new(input, &SsaConfig::new(6)).unwrap();

    assert_eq!(ssa.components().index(), &SeriesIndex::Labels(index.clone()));
    let trend = ssa.reconstruct(0).unwrap();
    assert_eq!(trend.index(), &SeriesIndex::Labels(index));
}

#[test]
fn grouped_reconstruction_partitions_the_series() {
    let data = sine_with_trend();
    let ssa = Ssa::new(data.clone(), &SsaConfig::new(20)).unwrap();
    let d = ssa.rank();
    assert!(d >= 4);

    let groups = vec![
        ComponentGroup::new("periodic", [0, 1]),
        ComponentGroup::new("trend", 2..4),
        ComponentGroup::new("noise", 4..),
    ];
    let grouped = ssa.reconstruct_groups(&groups).unwrap();
    assert_eq!(grouped.names(), vec!["periodic", "trend", "noise"]);

    for t in 0..data.len() {
        let total: f64 = grouped.iter().map(|(_, values)| values[t]).sum();
        assert_abs_diff_eq!(total, data[t], epsilon = 1e-9);
    }
}

#[test]
fn json_input_decomposes() {
    let json = serde_json::json!({
        "index": ["a", "b", "c", "d", "e", "f", "g", "h"],
        "values": [1.0, 3.0, 2.0, 4.0, 3.0, 5.0, 4.0, 6.0]
    });
    let input = SeriesInput::from_json(&json).unwrap();
    let ssa = Ssa::new(input, &SsaConfig::new(3)).unwrap();
    assert!(ssa.reconstruction_error() < 1e-9);
    assert_eq!(ssa.series().index().label(7), Some("h".to_string()));
}

#[test]
fn reconstruct_returns_time_series() {
    let ssa = Ssa::new(sine_with_trend(), &SsaConfig::new(20)).unwrap();
    let trend: TimeSeries = ssa.reconstruct(0).unwrap();
    assert_eq!(trend.len(), 100);
    let empty = ssa.reconstruct(Vec::<usize>::new()).unwrap();
    assert!(empty.as_slice().iter().all(|&v| v == 0.0));
}
