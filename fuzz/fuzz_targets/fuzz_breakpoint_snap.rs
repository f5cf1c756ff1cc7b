#![no_main]

use libfuzzer_sys::fuzz_target;
use sheetkit_core::breakpoint::BreakpointSet;

fuzz_target!(|data: (Vec<f64>, f64)| {
    let (values, candidate) = data;
    if values.len() > 1024 {
        return;
    }
    let set = BreakpointSet::new(values);

    // Construction never yields an empty or unordered set.
    assert!(!set.is_empty());
    assert!(set.as_slice().windows(2).all(|w| w[0] < w[1]));
    assert!(set.iter().all(|b| b > 0.0 && b <= 1.0));

    let snapped = set.snap(candidate);
    assert!(set.contains(snapped), "snap left the set");
    if candidate.is_finite() {
        let best = (snapped - candidate).abs();
        assert!(set.iter().all(|b| (b - candidate).abs() >= best));
    }
});
