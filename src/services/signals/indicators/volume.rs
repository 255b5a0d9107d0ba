//! Volume statistics.

/// Mean of the trailing `window` volumes; `0.0` when nothing is available.
pub fn average_volume(volumes: &[f64], window: usize) -> f64 {
    let start = volumes.len().saturating_sub(window);
    let recent = &volumes[start..];
    if recent.is_empty() {
        return 0.0;
    }
    recent.iter().sum::<f64>() / recent.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_of_trailing_window() {
        let mut volumes = vec![1_000_000.0; 10];
        volumes.extend(vec![200.0; 20]);
        assert_eq!(average_volume(&volumes, 20), 200.0);
    }

    #[test]
    fn test_average_guards_empty_input() {
        assert_eq!(average_volume(&[], 20), 0.0);
        assert_eq!(average_volume(&[5.0, 6.0], 0), 0.0);
    }
}
